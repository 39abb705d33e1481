//! Chainable little-endian CRC-32, backed by `crc32fast`.
//!
//! Grounded in `libevtx_checksum_calculate_little_endian_crc32` (original
//! C), which takes a running checksum and a byte range and returns the
//! combined checksum — used by the chunk header CRC (two disjoint ranges)
//! and the chunk data CRC (one range). `crc32fast::Hasher` already supports
//! resuming from an arbitrary CRC via `new_with_initial`, so the "chain"
//! here is just that constructor plus `update`/`finalize`.

use crc32fast::Hasher;

/// CRC-32/ISO-HDLC over `bytes`, resuming from `previous`. Pass `previous =
/// 0` to start a fresh computation.
pub fn crc32_chain(previous: u32, bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(previous);
    hasher.update(bytes);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_crc_is_zero() {
        assert_eq!(crc32_chain(0, &[]), 0);
    }

    #[test]
    fn chaining_is_equivalent_to_one_shot() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let one_shot = crc32_chain(0, data);

        for split in 0..=data.len() {
            let (head, tail) = data.split_at(split);
            let chained = crc32_chain(crc32_chain(0, head), tail);
            assert_eq!(chained, one_shot, "split at {split} diverged");
        }
    }

    #[test]
    fn matches_known_vector() {
        // Standard CRC-32/ISO-HDLC check value for the ASCII string "123456789".
        assert_eq!(crc32_chain(0, b"123456789"), 0xCBF4_3926);
    }
}

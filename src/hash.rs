//! Seeded 32-bit hashing shared by the membership filter and the cardinality estimator.

use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Second SipHash key. The seed supplies the first key, so every seed selects an independent
/// member of the hash family.
const KEY_1: u64 = 0x736b_6574_6368_626b;

/// Hashes `item` with the hash function selected by `seed`, returning 32 bits.
///
/// The output is a pure function of `(item, seed)`. The 64-bit SipHash-1-3 digest is folded
/// into 32 bits by xoring its halves, which keeps every input bit influencing every output bit.
///
/// # Examples
///
/// ```
/// use sketchbook::hash::hash32;
///
/// assert_eq!(hash32(b"foo", 0), hash32(b"foo", 0));
/// assert_ne!(hash32(b"foo", 0), hash32(b"foo", 1));
/// ```
#[inline]
pub fn hash32(item: &[u8], seed: u32) -> u32 {
    let mut sip = SipHasher13::new_with_keys(u64::from(seed), KEY_1);
    sip.write(item);
    let hash = sip.finish();
    (hash ^ (hash >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::hash32;

    #[test]
    fn test_deterministic() {
        for seed in 0..8 {
            assert_eq!(hash32(b"password123", seed), hash32(b"password123", seed));
        }
    }

    #[test]
    fn test_seeds_select_different_functions() {
        let hashes = (0..16)
            .map(|seed| hash32(b"admin123", seed))
            .collect::<std::collections::HashSet<u32>>();
        assert_eq!(hashes.len(), 16);
    }

    #[test]
    fn test_empty_input_is_hashable() {
        assert_eq!(hash32(b"", 7), hash32(b"", 7));
        assert_ne!(hash32(b"", 7), hash32(b"", 8));
    }

    #[test]
    fn test_avalanche() {
        // Flipping one input bit should flip about half of the 32 output bits.
        let mut flipped = 0u64;
        let mut trials = 0u64;
        for i in 0u32..256 {
            let base = format!("item-{}", i).into_bytes();
            let base_hash = hash32(&base, 0);
            for bit in 0..8 {
                let mut changed = base.clone();
                changed[0] ^= 1 << bit;
                flipped += u64::from((hash32(&changed, 0) ^ base_hash).count_ones());
                trials += 1;
            }
        }
        let mean = flipped as f64 / trials as f64;
        assert!(mean > 15.0 && mean < 17.0, "mean flipped bits: {}", mean);
    }
}

//! String hashing.
//!
//! - [`djb2_xor`] is the string pool's bucket hash.
//! - [`fnv1a_64`] and [`sid`] produce stable 64-bit string ids and are
//!   `const fn`, so ids can be computed at compile time:
//!
//! ```
//! use cutekit::hash::sid;
//!
//! const PLAYER: u64 = sid("player");
//! assert_eq!(PLAYER, sid("player"));
//! assert_ne!(PLAYER, sid("enemy"));
//! ```

const DJB2_SEED: u32 = 5381;
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// DJB2 variant combining with XOR: `h = (h * 33) ^ byte`.
///
/// With `ignore_case`, ASCII lowercase letters are folded to uppercase
/// before mixing. A result of 0 is reserved for empty hash slots, so it is
/// remapped to 1.
#[must_use]
pub fn djb2_xor(bytes: &[u8], ignore_case: bool) -> u32 {
    let mut hash = DJB2_SEED;
    for &b in bytes {
        let c = if ignore_case { b.to_ascii_uppercase() } else { b };
        hash = ((hash << 5).wrapping_add(hash)) ^ u32::from(c);
    }
    if hash == 0 { 1 } else { hash }
}

/// 64-bit FNV-1a hash.
#[must_use]
pub const fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Stable string id.
#[must_use]
pub const fn sid(s: &str) -> u64 {
    fnv1a_64(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_djb2_empty_is_seed() {
        assert_eq!(djb2_xor(b"", false), 5381);
    }

    #[test]
    fn test_djb2_known_value() {
        // ((5381 * 33) ^ 'a')
        assert_eq!(djb2_xor(b"a", false), (5381u32 * 33) ^ 97);
    }

    #[test]
    fn test_djb2_ignore_case() {
        assert_eq!(djb2_xor(b"Hello", true), djb2_xor(b"HELLO", true));
        assert_eq!(djb2_xor(b"hello", true), djb2_xor(b"HELLO", false));
        assert_ne!(djb2_xor(b"hello", false), djb2_xor(b"HELLO", false));
    }

    #[test]
    fn test_djb2_never_zero() {
        for i in 0..10_000u32 {
            assert_ne!(djb2_xor(&i.to_le_bytes(), false), 0);
        }
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a_64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a_64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_sid_is_const() {
        const ID: u64 = sid("sprite");
        assert_eq!(ID, fnv1a_64(b"sprite"));
    }
}

//! Key hashing shared by the object map and the lexer's keyword check.
//!
//! The function is `const` so the reserved-word constants below are folded at
//! compile time and cannot drift from the function itself.

/// djb2, xor variant: `h = 5381`, then `h = h * 33 ^ byte` per byte, with
/// 64-bit wrapping arithmetic.
pub(crate) const fn djb2(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    let mut i = 0;
    while i < bytes.len() {
        hash = hash.wrapping_mul(33) ^ bytes[i] as u64;
        i += 1;
    }
    hash
}

pub(crate) const TRUE_HASH: u64 = djb2(b"true");
pub(crate) const FALSE_HASH: u64 = djb2(b"false");
pub(crate) const NULL_HASH: u64 = djb2(b"null");

#[cfg(test)]
mod tests {
    use super::{FALSE_HASH, NULL_HASH, TRUE_HASH, djb2};

    #[test]
    fn empty_input_is_the_seed() {
        assert_eq!(djb2(b""), 5381);
    }

    #[test]
    fn keyword_constants_are_distinct() {
        assert_ne!(TRUE_HASH, FALSE_HASH);
        assert_ne!(TRUE_HASH, NULL_HASH);
        assert_ne!(FALSE_HASH, NULL_HASH);
    }

    #[test]
    fn single_byte_keys_spread_by_xor() {
        // "a" and "q" differ only in bit 4 of the final byte, so their
        // hashes agree modulo 16 and disagree modulo 32. The collision
        // tests in the object suite rely on this pair.
        assert_eq!(djb2(b"a") % 16, djb2(b"q") % 16);
        assert_ne!(djb2(b"a") % 32, djb2(b"q") % 32);
        assert_ne!(djb2(b"a"), djb2(b"q"));
    }

    #[test]
    fn prefix_extension_changes_the_hash() {
        assert_ne!(djb2(b"true"), djb2(b"truex"));
        assert_ne!(djb2(b"fals"), djb2(b"false"));
    }
}

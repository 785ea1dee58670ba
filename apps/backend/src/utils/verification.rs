//! Group verification codes.
//!
//! A code is handed out exactly once at group creation; only its blake3
//! hash is stored. Codes use a Crockford-style alphabet with the
//! ambiguous letters (I, L, O, U) removed.

use rand::Rng;

const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const SEGMENT_LEN: usize = 3;
const SEGMENTS: usize = 3;

/// Generate a fresh verification code in `XXX-XXX-XXX` form.
pub fn generate_verification_code() -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(SEGMENTS * SEGMENT_LEN + SEGMENTS - 1);
    for segment in 0..SEGMENTS {
        if segment > 0 {
            code.push('-');
        }
        for _ in 0..SEGMENT_LEN {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            code.push(CODE_ALPHABET[idx] as char);
        }
    }
    code
}

/// Hash a verification code for storage.
pub fn hash_code(code: &str) -> String {
    blake3::hash(code.as_bytes()).to_hex().to_string()
}

/// Check a submitted code against a stored hash.
///
/// The comparison goes through [`blake3::Hash`] equality, which is
/// constant-time.
pub fn verify_code(code: &str, stored_hash: &str) -> bool {
    let Ok(stored) = blake3::Hash::from_hex(stored_hash) else {
        return false;
    };
    blake3::hash(code.as_bytes()) == stored
}

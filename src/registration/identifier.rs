//! Public registration identifiers (`HACK-XXXXXXXX`)
//!
//! Identifiers are random, not sequential. Collisions are not re-checked here;
//! the record store refuses a second record with an identifier it already holds.

use rand::Rng;

/// Prefix of every identifier.
pub const IDENTIFIER_PREFIX: &str = "HACK-";

/// Number of random characters after the prefix.
pub const IDENTIFIER_SUFFIX_LEN: usize = 8;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh identifier from the thread-local CSPRNG.
pub fn generate() -> String {
    generate_with(&mut rand::thread_rng())
}

/// Generate an identifier from the given RNG.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut id = String::with_capacity(IDENTIFIER_PREFIX.len() + IDENTIFIER_SUFFIX_LEN);
    id.push_str(IDENTIFIER_PREFIX);
    for _ in 0..IDENTIFIER_SUFFIX_LEN {
        let idx = rng.gen_range(0..ALPHABET.len());
        id.push(ALPHABET[idx] as char);
    }
    id
}

/// Canonical form of a lookup query: trimmed and upper-cased.
pub fn normalize(query: &str) -> String {
    query.trim().to_ascii_uppercase()
}

/// Whether `id` has the exact `HACK-[A-Z0-9]{8}` shape.
pub fn is_well_formed(id: &str) -> bool {
    match id.strip_prefix(IDENTIFIER_PREFIX) {
        Some(suffix) => {
            suffix.len() == IDENTIFIER_SUFFIX_LEN
                && suffix
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        }
        None => false,
    }
}

//! Entry key generation.

use rand::Rng;

/// Default length of generated entry keys.
pub const DEFAULT_KEY_LENGTH: usize = 6;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random base-36 key of `length` characters.
pub fn create_key(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

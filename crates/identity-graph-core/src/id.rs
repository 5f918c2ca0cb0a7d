//! Opaque identifier generation for nodes and edges.
//!
//! Identifiers are 14-character URL-safe strings drawn from the 62-symbol
//! `[A-Za-z0-9]` alphabet. They are generated once and never reused; the
//! store never validates uniqueness beyond the randomness itself.

use rand::Rng;

/// Length of every node and edge identifier.
pub const ID_LENGTH: usize = 14;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a fresh 14-character identifier.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

//! Throwaway passwords for re-created guest accounts.
use rand::rngs::OsRng;
use rand::Rng;

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;

pub const PASSWORD_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_-+=<>?";

/// `length` characters drawn uniformly from [`PASSWORD_ALPHABET`] using the OS CSPRNG.
pub fn generate_password(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())]))
        .collect()
}

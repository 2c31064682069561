//! Cryptographically strong secret generation.

use ring::rand::{SecureRandom, SystemRandom};

use crate::domain::error::SecretError;

/// Symbols drawn for session secrets and database passwords (72 symbols).
pub const ALPHABET: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()";

/// Length of the generated application session secret.
pub const SESSION_SECRET_LENGTH: usize = 32;

/// Generate `length` symbols from [`ALPHABET`] using the system CSPRNG.
///
/// Bytes at or above the largest multiple of the alphabet size are
/// discarded so every symbol is equally likely.
///
/// # Errors
///
/// Returns [`SecretError::EmptyLength`] for a zero length and
/// [`SecretError::RandomUnavailable`] if the OS random source fails.
pub fn generate(length: usize) -> Result<String, SecretError> {
    if length == 0 {
        return Err(SecretError::EmptyLength);
    }
    let rng = SystemRandom::new();
    let limit = 256 - (256 % ALPHABET.len());
    let mut secret = String::with_capacity(length);
    let mut buf = [0u8; 64];
    while secret.len() < length {
        rng.fill(&mut buf).map_err(|_| SecretError::RandomUnavailable)?;
        for byte in buf.iter().map(|b| usize::from(*b)) {
            if byte >= limit {
                continue;
            }
            secret.push(char::from(ALPHABET[byte % ALPHABET.len()]));
            if secret.len() == length {
                break;
            }
        }
    }
    Ok(secret)
}

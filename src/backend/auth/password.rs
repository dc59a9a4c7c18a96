/**
 * Password Hashing
 *
 * Salted, adaptive password hashes using bcrypt. The hash string embeds
 * its own salt and cost, so raising the cost later only affects newly
 * written hashes and needs no schema change.
 *
 * Both operations are CPU-bound (tens of milliseconds at the default cost)
 * and run on the blocking thread pool.
 *
 * bcrypt only reads the first 72 bytes of its input (including a trailing
 * NUL). Longer passwords are refused instead of silently truncated, so two
 * passwords sharing a long prefix never verify against each other.
 */

use bcrypt::{non_truncating_hash, non_truncating_verify, BcryptError};
use thiserror::Error;

use crate::shared::config::DEFAULT_PASSWORD_HASH_COST;

/// Longest password bcrypt hashes without truncation
pub const MAX_PASSWORD_BYTES: usize = 71;

/// Failure to produce a hash
#[derive(Debug, Error)]
pub enum HashError {
    #[error("password is {0} bytes, at most {MAX_PASSWORD_BYTES} are accepted")]
    TooLong(usize),

    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("hashing task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Two-way outcome of a password check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Match,
    Mismatch,
}

impl PasswordCheck {
    pub fn is_match(self) -> bool {
        self == Self::Match
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_HASH_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `plaintext` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// * `HashError::TooLong` - more than `MAX_PASSWORD_BYTES` bytes
    /// * otherwise only if the random source or the blocking task fails
    pub async fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(HashError::TooLong(plaintext.len()));
        }

        let cost = self.cost;
        let plaintext = plaintext.to_owned();
        let digest = tokio::task::spawn_blocking(move || non_truncating_hash(plaintext, cost)).await??;
        Ok(digest)
    }

    /// Check `plaintext` against a stored hash.
    ///
    /// A plaintext too long to have been hashed is a mismatch. A stored
    /// hash that cannot be parsed is logged and also reported as a
    /// mismatch; callers only ever learn match or mismatch.
    pub async fn verify(&self, stored_hash: &str, plaintext: &str) -> Result<PasswordCheck, HashError> {
        let stored_hash = stored_hash.to_owned();
        let plaintext = plaintext.to_owned();
        let outcome =
            tokio::task::spawn_blocking(move || non_truncating_verify(plaintext, &stored_hash)).await?;

        Ok(match outcome {
            Ok(true) => PasswordCheck::Match,
            Ok(false) => PasswordCheck::Mismatch,
            Err(BcryptError::Truncation(len)) => {
                tracing::debug!("Rejected {} byte password without hashing", len - 1);
                PasswordCheck::Mismatch
            }
            Err(e) => {
                tracing::error!("Stored password hash could not be read: {}", e);
                PasswordCheck::Mismatch
            }
        })
    }
}

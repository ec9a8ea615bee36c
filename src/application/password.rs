//! Password hashing and verification.
//!
//! bcrypt with a fixed, configured cost. Verification goes through bcrypt's
//! own routine, which compares in constant time.
//!
//! bcrypt only reads the first 72 bytes of its input, so longer plaintexts are
//! refused outright instead of being truncated.

use crate::{
    app_error::{AppError, AppResult},
    application::validators::MAX_PASSWORD_BYTES,
};

pub const DEFAULT_COST: u32 = 10;
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

// Plaintext used to build the hash checked when an email is unknown.
const DUMMY_PASSWORD: &str = "gatekeep-unknown-account";

#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Fails if `cost` is outside bcrypt's accepted range (4..=31).
    pub fn new(cost: u32) -> AppResult<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AppError::Internal(format!(
                "bcrypt cost must be between {} and {}, got {cost}",
                MIN_COST, MAX_COST
            )));
        }
        let dummy_hash = hash_with_cost(DUMMY_PASSWORD, cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::InvalidInput(format!(
                "password must be at most {MAX_PASSWORD_BYTES} bytes"
            )));
        }
        hash_with_cost(plaintext, self.cost)
    }

    /// A corrupted `encoded_hash` or an over-long `plaintext` counts as a mismatch.
    pub fn verify(&self, encoded_hash: &str, plaintext: &str) -> bool {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return self.verify_dummy(plaintext);
        }
        match bcrypt::verify(plaintext, encoded_hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Burns the same CPU as a real check; always returns false.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = bcrypt::verify(plaintext, &self.dummy_hash);
        false
    }
}

fn hash_with_cost(plaintext: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(plaintext, cost).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::Internal("Password hashing failed".into())
    })
}

//! Password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};

use crate::config::PasswordConfig;
use crate::errors::Error;

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl From<&PasswordConfig> for Argon2Params {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_string(input: &str, params: Argon2Params) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .to_argon2()?
        .hash_password(input.as_bytes(), &salt)
        .map_err(|e| Error::Internal {
            operation: format!("hash string: {e}"),
        })?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash. The parameters embedded in the hash are used.
pub fn verify_string(input: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Internal {
        operation: format!("parse hash: {e}"),
    })?;

    Ok(Argon2::default().verify_password(input.as_bytes(), &parsed_hash).is_ok())
}

/// Verify a password against an optional stored hash. Without a hash, the input is hashed
/// with `params` and discarded so that unknown accounts cost the same as known ones.
pub fn verify_or_equal_work(input: &str, stored_hash: Option<&str>, params: Argon2Params) -> Result<bool, Error> {
    match stored_hash {
        Some(hash) => verify_string(input, hash),
        None => hash_string(input, params).map(|_| false),
    }
}

/// Non-reversible stand-in for a stored credential, used wherever the credential has to be
/// represented (session claims, logs). Changes whenever the password hash changes.
pub fn credential_digest(password_hash: &str) -> String {
    format!("{:x}", Sha256::digest(password_hash.as_bytes()))
}

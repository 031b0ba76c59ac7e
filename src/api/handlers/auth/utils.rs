//! PIN hashing and small storage helpers.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a PIN for storage. Only the PHC string ever reaches the database.
pub(super) fn hash_pin(pin: u32) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(pin.to_string().as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash PIN: {err}"))?;
    Ok(hash.to_string())
}

/// Check a PIN against a stored PHC string. Malformed hashes verify as false.
pub(super) fn verify_pin(pin: u32, pin_hash: &str) -> bool {
    PasswordHash::new(pin_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(pin.to_string().as_bytes(), &parsed)
            .is_ok()
    })
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

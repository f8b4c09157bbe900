use std::sync::OnceLock;

use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Hashes `password` into a PHC string using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Checks `password` against a PHC string produced by [`hash_password`]. A
/// stored hash that doesn't parse is an error, not a mismatch
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, anyhow::Error> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| anyhow!("Stored password hash is invalid: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Runs a full verification against a throwaway hash and always reports a
/// mismatch. Used when the username doesn't exist so the response takes as
/// long as a wrong password
pub fn verify_dummy_password(password: &str) -> Result<bool, anyhow::Error> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();

    let hash = match DUMMY_HASH.get() {
        Some(hash) => hash,
        None => {
            let hash = hash_password("dummy password for unknown users")?;
            DUMMY_HASH.get_or_init(|| hash)
        },
    };
    verify_password(password, hash)?;

    Ok(false)
}

//! Argon2id password hashes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::warn;

/// PHC string with salt and parameters included.
pub fn hash_password(pass: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pass.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))
}

/// A malformed stored hash never verifies.
pub fn verify_password(pass: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(%err, "stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(pass.as_bytes(), &parsed)
        .is_ok()
}

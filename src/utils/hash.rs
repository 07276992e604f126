// src/utils/hash.rs

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hashes `password` with Argon2id and a fresh random salt (PHC string output).
///
/// Runs on the blocking pool: Argon2 is deliberately CPU-heavy.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?
}

/// Checks `password` against a stored PHC hash. A mismatch is `Ok(false)`;
/// only an unparseable stored hash is an error.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || -> Result<bool, AppError> {
        let parsed = PasswordHash::new(&password_hash)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::InternalServerError(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("correct horse".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn salts_differ() {
        let a = hash_password("same".to_string()).await.unwrap();
        let b = hash_password("same".to_string()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(verify_password("pw".to_string(), "not-a-hash".to_string()).await.is_err());
    }
}

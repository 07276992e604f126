// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::user::ROLE_ADMIN};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the user id, as a string.
    pub sub: String,
    pub email: String,
    /// 'user' or 'admin'.
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a new JWT for the user.
pub fn sign_jwt(
    id: i64,
    email: &str,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs();
    let expiration = now
        .checked_add(expiration_seconds)
        .and_then(|exp| usize::try_from(exp).ok())
        .ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Token expiration of {}s is out of range",
                expiration_seconds
            ))
        })?;

    let claims = Claims {
        sub: id.to_string(),
        email: email.to_owned(),
        role: role.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies signature and expiry, returning the claims.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Authenticated caller, from `Authorization: Bearer <token>`.
///
/// Taking this as a handler argument makes the route require a valid token;
/// the request is rejected with 401 before the handler runs otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;
        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

        let config = Config::from_ref(state);
        let claims = verify_jwt(token, &config.jwt_secret)?;
        AuthUser::try_from(claims)
    }
}

/// Authenticated caller holding the 'admin' role; 403 for anyone else.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin role required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit_test_secret";

    #[test]
    fn sign_and_verify() {
        let token = sign_jwt(42, "a@example.com", "admin", SECRET, 60).unwrap();
        let claims = verify_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "a@example.com");

        let user = AuthUser::try_from(claims).unwrap();
        assert_eq!(user.id, 42);
        assert!(user.is_admin());
    }

    #[test]
    fn huge_expiration_is_an_error() {
        let err = sign_jwt(1, "a@example.com", "user", SECRET, u64::MAX).unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(1, "a@example.com", "user", SECRET, 60).unwrap();
        assert!(matches!(
            verify_jwt(&token, "other_secret"),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = Claims {
            sub: "1".to_string(),
            email: "a@example.com".to_string(),
            role: "user".to_string(),
            // Well past the default 60s leeway.
            exp: 1_000,
        };
        let token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let claims = Claims {
            sub: "abc".to_string(),
            email: "a@example.com".to_string(),
            role: "user".to_string(),
            exp: usize::MAX,
        };
        assert!(AuthUser::try_from(claims).is_err());
    }
}

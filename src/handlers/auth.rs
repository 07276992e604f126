// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    db::DynRepository,
    error::AppError,
    models::user::{LoginRequest, NewUser, ROLE_USER, RegisterRequest},
    utils::{
        extract::AppJson,
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user with the 'user' role.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(repo): State<DynRepository>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(payload.password).await?;

    let user = repo
        .create_user(NewUser {
            email: payload.email.trim().to_lowercase(),
            password: hashed_password,
            role: ROLE_USER.to_string(),
        })
        .await?;

    tracing::info!(user_id = user.id, "Registered user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(repo): State<DynRepository>,
    State(config): State<Config>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = repo
        .find_user_by_email(&payload.email.trim().to_lowercase())
        .await?
        .ok_or(AppError::AuthError("Invalid email or password".to_string()))?;

    let is_valid = verify_password(payload.password, user.password.clone()).await?;
    if !is_valid {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        &user.email,
        &user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": user.role,
    })))
}

use axum::{Json, response::IntoResponse};

use crate::{models::user::ProfileResponse, utils::jwt::AuthUser};

/// Identity of the caller, straight from the verified token.
pub async fn get_profile(user: AuthUser) -> impl IntoResponse {
    Json(ProfileResponse {
        id: user.id,
        email: user.email,
        role: user.role,
    })
}

// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, profile, quiz, results},
    state::AppState,
};

/// Assembles the main application router.
///
/// Authorization is declared per handler through the `AuthUser` / `AdminUser`
/// extractors rather than router-level middleware.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
                return None;
            }
            match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let api_routes = Router::new()
        .route("/profile", get(profile::get_profile))
        .route("/tests", get(quiz::list_tests))
        .route("/tests/{id}", get(quiz::get_test))
        .route("/tests/{id}/submit", post(quiz::submit_test))
        .route("/results/me", get(results::my_results));

    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/tests", post(admin::create_test))
        .route("/tests/{id}/questions", post(admin::add_question))
        .route("/tests/{id}/results", get(results::test_results));

    Router::new()
        .merge(auth_routes)
        .nest("/api", api_routes)
        .nest("/api/admin", admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

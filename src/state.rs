// src/state.rs

use axum::extract::FromRef;

use crate::{config::Config, db::DynRepository};

/// Router state. The repository is built once at startup and handed to every
/// handler through `State`.
#[derive(Clone)]
pub struct AppState {
    pub repo: DynRepository,
    pub config: Config,
}

impl FromRef<AppState> for DynRepository {
    fn from_ref(state: &AppState) -> Self {
        state.repo.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

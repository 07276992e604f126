// src/main.rs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use dotenvy::dotenv;
use quizdesk::{
    config::Config,
    db::{DynRepository, MemoryRepository, PgRepository},
    models::user::{NewUser, ROLE_ADMIN},
    routes,
    state::AppState,
    utils::hash::hash_password,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CONNECT_RETRIES: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let repo: DynRepository = if config.uses_memory_store() {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryRepository::new())
    } else {
        let pool = connect_with_retry(&config.database_url).await?;
        tracing::info!("Database connected...");

        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied successfully.");

        Arc::new(PgRepository::new(pool))
    };

    if let Err(e) = seed_admin_user(&repo, &config).await {
        tracing::error!("Failed to seed admin user: {:?}", e);
    }

    let state = AppState {
        repo,
        config: config.clone(),
    };

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_with_retry(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt >= CONNECT_RETRIES => {
                tracing::error!("Failed to connect to database after {} retries", attempt);
                return Err(e);
            }
            Err(_) => {
                attempt += 1;
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", attempt);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

/// Creates the configured admin account unless its email is already registered.
async fn seed_admin_user(
    repo: &DynRepository,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    if repo.find_user_by_email(&email).await?.is_none() {
        tracing::info!("Seeding admin user: {}", email);
        let hashed_password = hash_password(password.clone()).await?;
        repo.create_user(NewUser {
            email,
            password: hashed_password,
            role: ROLE_ADMIN.to_string(),
        })
        .await?;
        tracing::info!("Admin user created successfully.");
    }
    Ok(())
}

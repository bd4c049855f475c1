#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use axum::{Router, ServiceExt, extract::Request};
use interntrack_api::{construct_router, state::State};
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting InternTrack API server");

    let config = config::Config::from_env()?;

    if !interntrack_api::session_jwt::is_configured() {
        tracing::warn!(
            "Session JWT secret not configured. Logins will fail until the \
            {} environment variable is set.",
            interntrack_api::session_jwt::SESSION_SECRET_ENV
        );
    }
    if config.platform.mail.is_none() {
        tracing::warn!(
            "SMTP not configured; verification, reset and credential emails cannot be sent."
        );
    }

    let state = Arc::new(State::new(config.platform.clone()).await);

    let router: Router = construct_router(state);
    // The documented routes carry Django-style trailing slashes; accept both.
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}

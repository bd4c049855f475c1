use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state};
use middleware::jwt::jwt_middleware;
use state::State;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
};

pub mod entity;
pub mod error;
pub mod mail;
mod middleware;
pub mod password;
mod routes;
pub mod session_jwt;
pub mod state;
pub mod tokens;

pub use axum;
pub use sea_orm;

pub mod auth {
    use crate::middleware;
    pub use middleware::jwt::AuthUser;
}

pub fn construct_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .nest("/health", routes::health::routes())
        .merge(routes::auth::routes())
        .merge(routes::user::routes())
        .nest("/admin", routes::admin::routes())
        .with_state(state.clone())
        .layer(from_fn_with_state(state, jwt_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new().nest("/api", router)
}

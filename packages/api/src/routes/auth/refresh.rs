use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::session_jwt::{self, TokenType};

#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshInput {
    pub refresh: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshOutput {
    pub access: String,
}

#[tracing::instrument(name = "POST /token/refresh", skip(input))]
pub async fn refresh_token(
    Json(input): Json<RefreshInput>,
) -> Result<Json<RefreshOutput>, ApiError> {
    let claims = session_jwt::verify(&input.refresh, TokenType::Refresh)
        .map_err(|_| ApiError::unauthorized("Token is invalid or expired"))?;

    let access = session_jwt::sign(
        &claims.sub,
        &claims.email,
        &claims.role,
        TokenType::Access,
        None,
    )
    .map_err(|e| ApiError::internal(format!("Failed to sign session token: {}", e)))?;

    Ok(Json(RefreshOutput { access }))
}

use axum::{Json, extract::State};
use sea_orm::{ActiveEnum, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::ApiError;
use crate::password::verify_password;
use crate::session_jwt::{self, TokenPair};
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Verified-only login. Valid credentials on an unverified account never
/// yield a token; the client gets a structured payload pointing at webmail
/// instead.
#[tracing::instrument(name = "POST /token", skip(state, input))]
pub async fn obtain_token_pair(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenPair>, ApiError> {
    let email = input.email.trim().to_lowercase();

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::unauthorized("No active account found with the given credentials")
        })?;

    if !verify_password(&input.password, &user.password_hash) {
        return Err(ApiError::unauthorized(
            "No active account found with the given credentials",
        ));
    }

    if !user.is_verified {
        return Err(ApiError::bad_request(
            "Your account is not verified yet. Please verify your email \
             and wait for admin/company approval.",
        )
        .with_action("VERIFY_EMAIL", state.config.webmail_url.clone()));
    }

    let pair = session_jwt::issue_pair(&user.id, &user.email, &user.role.to_value())
        .map_err(|e| ApiError::internal(format!("Failed to sign session token: {}", e)))?;

    Ok(Json(pair))
}

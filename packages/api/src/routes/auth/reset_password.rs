use axum::{Json, extract::State};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::{password_reset_token, user};
use crate::error::ApiError;
use crate::password::hash_password;
use crate::routes::ActionResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct ResetPasswordInput {
    pub token: String,
    pub new_password: String,
}

#[tracing::instrument(name = "POST /reset-password", skip(state, input))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordInput>,
) -> Result<Json<ActionResponse>, ApiError> {
    if input.new_password.is_empty() {
        return Err(ApiError::bad_request("new_password is required"));
    }

    let token = password_reset_token::Entity::find()
        .filter(password_reset_token::Column::Token.eq(input.token.trim()))
        .filter(password_reset_token::Column::Used.eq(false))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid/expired token"))?;

    let user = user::Entity::find_by_id(&token.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid/expired token"))?;

    let mut token = token.into_active_model();
    token.used = Set(true);
    token.update(&state.db).await?;

    let mut user = user.into_active_model();
    user.password_hash = Set(hash_password(&input.new_password)?);
    user.updated_at = Set(chrono::Utc::now().naive_utc());
    user.update(&state.db).await?;

    Ok(Json(ActionResponse::detail(
        "Password reset successful. You can login now.",
    )))
}

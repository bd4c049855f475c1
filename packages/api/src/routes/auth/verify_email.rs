use axum::{Json, extract::State};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::email_verification_token;
use crate::error::ApiError;
use crate::routes::ActionResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyEmailInput {
    pub token: String,
}

/// Redeems an ownership-proof token exactly once. Deliberately does NOT set
/// `is_verified`: verified status is company/admin approval, not the email
/// link alone.
#[tracing::instrument(name = "POST /verify-email", skip(state, input))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyEmailInput>,
) -> Result<Json<ActionResponse>, ApiError> {
    let token = email_verification_token::Entity::find()
        .filter(email_verification_token::Column::Token.eq(input.token.trim()))
        .filter(email_verification_token::Column::Used.eq(false))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid/expired token"))?;

    let mut token = token.into_active_model();
    token.used = Set(true);
    token.update(&state.db).await?;

    Ok(Json(
        ActionResponse::detail(
            "Email verified successfully. Please wait for admin/company approval.",
        )
        .with_action("WAIT_ADMIN_APPROVAL"),
    ))
}

use axum::{Json, extract::State};
use cuid2::create_id;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::{password_reset_token, user};
use crate::error::ApiError;
use crate::mail::{EmailMessage, templates};
use crate::routes::ActionResponse;
use crate::state::AppState;
use crate::tokens::new_token;

// The response is identical whether or not the account exists, so the
// endpoint cannot be used to enumerate registered emails.
const GENERIC_DETAIL: &str = "If that email exists, a reset link was sent.";

#[derive(Debug, Deserialize, Serialize)]
pub struct ForgotPasswordInput {
    pub email: String,
}

#[tracing::instrument(name = "POST /forgot-password", skip(state, input))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordInput>,
) -> Result<Json<ActionResponse>, ApiError> {
    let email = input.email.trim().to_lowercase();

    let Some(user) = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
    else {
        return Ok(Json(ActionResponse::detail(GENERIC_DETAIL)));
    };

    let token = new_token(16)?;
    password_reset_token::ActiveModel {
        id: Set(create_id()),
        user_id: Set(user.id.clone()),
        token: Set(token.clone()),
        used: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await?;

    let reset_url = format!(
        "{}/reset_password.html?token={}",
        state.config.frontend_base_url, token
    );
    let (subject, body) = templates::password_reset_email(&user.full_name, &reset_url);
    state
        .mailer()?
        .send(EmailMessage {
            to: user.email.clone(),
            subject,
            body_text: body,
        })
        .await?;

    Ok(Json(ActionResponse::detail(GENERIC_DETAIL)))
}

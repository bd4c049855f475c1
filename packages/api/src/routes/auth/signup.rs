use axum::{Json, extract::State, http::StatusCode};
use cuid2::create_id;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::user::{self, UserRole};
use crate::error::ApiError;
use crate::password::hash_password;
use crate::routes::ActionResponse;
use crate::state::AppState;

use super::send_verification_email;

#[derive(Debug, Deserialize, Serialize)]
pub struct SignupInput {
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub password: String,
}

/// Self-signup creates an unverified account. Email verification proves
/// ownership only; `is_verified` stays false until admin/company approval.
#[tracing::instrument(name = "POST /signup", skip(state, input))]
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> Result<(StatusCode, Json<ActionResponse>), ApiError> {
    let email = input.email.trim().to_lowercase();
    let full_name = input.full_name.trim().to_string();

    if email.is_empty() || full_name.is_empty() || input.password.is_empty() {
        return Err(ApiError::bad_request(
            "email, full_name and password are required",
        ));
    }
    if input.role == UserRole::Admin {
        return Err(ApiError::bad_request("Invalid role"));
    }

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::bad_request("Email already exists"));
    }

    let now = chrono::Utc::now().naive_utc();
    let created = user::ActiveModel {
        id: Set(create_id()),
        email: Set(email),
        full_name: Set(full_name),
        role: Set(input.role),
        employee_id: Set(None),
        department: Set(None),
        supervisor_id: Set(None),
        is_verified: Set(false),
        password_hash: Set(hash_password(&input.password)?),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    send_verification_email(&state.db, &state, &created).await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ActionResponse::detail(
                "Signup successful. Please verify your email in webmail, \
                 then wait for admin/company approval.",
            )
            .with_action("VERIFY_EMAIL")
            .with_redirect(state.config.webmail_url.clone()),
        ),
    ))
}

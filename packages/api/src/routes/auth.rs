use axum::{Router, routing::post};
use cuid2::create_id;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait};

use crate::entity::{email_verification_token, user};
use crate::error::ApiError;
use crate::mail::{EmailMessage, templates};
use crate::state::AppState;
use crate::tokens::new_token;

pub mod forgot_password;
pub mod login;
pub mod refresh;
pub mod reset_password;
pub mod signup;
pub mod verify_email;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup::signup))
        .route("/verify-email", post(verify_email::verify_email))
        .route("/forgot-password", post(forgot_password::forgot_password))
        .route("/reset-password", post(reset_password::reset_password))
        .route("/token", post(login::obtain_token_pair))
        .route("/token/refresh", post(refresh::refresh_token))
}

/// Issue a fresh verification token and mail the ownership-proof link.
pub(crate) async fn send_verification_email<C>(
    db: &C,
    state: &AppState,
    user: &user::Model,
) -> Result<(), ApiError>
where
    C: ConnectionTrait,
{
    let token = new_token(16)?;
    email_verification_token::ActiveModel {
        id: Set(create_id()),
        user_id: Set(user.id.clone()),
        token: Set(token.clone()),
        used: Set(false),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(db)
    .await?;

    let verify_url = format!(
        "{}/verify.html?token={}",
        state.config.frontend_base_url, token
    );
    let (subject, body) = templates::verification_email(&user.full_name, &verify_url);
    state
        .mailer()?
        .send(EmailMessage {
            to: user.email.clone(),
            subject,
            body_text: body,
        })
        .await
}

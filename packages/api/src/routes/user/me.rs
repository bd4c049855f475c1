use axum::{Extension, Json, extract::State};

use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::routes::UserOut;
use crate::state::AppState;

#[tracing::instrument(name = "GET /me", skip(state, auth))]
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserOut>, ApiError> {
    let user = auth.get_user(&state).await?;
    Ok(Json(UserOut::from(user)))
}

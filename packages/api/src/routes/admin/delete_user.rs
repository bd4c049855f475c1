use axum::{
    Extension, Json,
    extract::{Path, State},
};
use sea_orm::EntityTrait;

use crate::entity::user;
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::routes::ActionResponse;
use crate::state::AppState;

#[tracing::instrument(name = "DELETE /admin/delete-user/{user_id}", skip(state, auth))]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let admin = auth.require_admin(&state).await?;

    if admin.id == user_id {
        return Err(ApiError::bad_request("You cannot delete yourself"));
    }

    user::Entity::delete_by_id(&user_id).exec(&state.db).await?;

    Ok(Json(ActionResponse::detail("User deleted")))
}

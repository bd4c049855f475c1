use axum::{Extension, Json, extract::State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entity::user::{self, UserRole};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::routes::UserOut;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub interns: Vec<UserOut>,
    pub supervisors: Vec<UserOut>,
}

#[tracing::instrument(name = "GET /admin/users", skip(state, auth))]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserListResponse>, ApiError> {
    auth.require_admin(&state).await?;

    let interns = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Intern))
        .order_by_asc(user::Column::FullName)
        .all(&state.db)
        .await?;
    let supervisors = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Supervisor))
        .order_by_asc(user::Column::FullName)
        .all(&state.db)
        .await?;

    Ok(Json(UserListResponse {
        interns: interns.into_iter().map(UserOut::from).collect(),
        supervisors: supervisors.into_iter().map(UserOut::from).collect(),
    }))
}

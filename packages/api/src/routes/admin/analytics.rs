use axum::{Extension, Json, extract::State};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::{
    complaint::{self, ComplaintStatus},
    task,
    user::{self, UserRole},
};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Counts {
    pub interns: u64,
    pub supervisors: u64,
    pub tasks_total: u64,
    pub complaints_open: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub counts: Counts,
}

#[tracing::instrument(name = "GET /admin/analytics", skip(state, auth))]
pub async fn analytics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    auth.require_admin(&state).await?;

    let interns = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Intern))
        .count(&state.db)
        .await?;
    let supervisors = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Supervisor))
        .count(&state.db)
        .await?;
    let tasks_total = task::Entity::find().count(&state.db).await?;
    let complaints_open = complaint::Entity::find()
        .filter(complaint::Column::Status.eq(ComplaintStatus::Open))
        .count(&state.db)
        .await?;

    Ok(Json(AnalyticsResponse {
        counts: Counts {
            interns,
            supervisors,
            tasks_total,
            complaints_open,
        },
    }))
}

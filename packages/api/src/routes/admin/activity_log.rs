use axum::{Extension, Json, extract::State};
use chrono::NaiveDateTime;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entity::{activity_log, user};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: String,
    pub actor: Option<String>,
    pub action: String,
    pub created_at: NaiveDateTime,
}

#[tracing::instrument(name = "GET /admin/activity-log", skip(state, auth))]
pub async fn list_activity(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ActivityRow>>, ApiError> {
    auth.require_admin(&state).await?;

    let logs = activity_log::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(activity_log::Column::CreatedAt)
        .limit(200)
        .all(&state.db)
        .await?;

    let rows = logs
        .into_iter()
        .map(|(log, actor)| ActivityRow {
            id: log.id,
            actor: actor.map(|a| a.email),
            action: log.action,
            created_at: log.created_at,
        })
        .collect();

    Ok(Json(rows))
}

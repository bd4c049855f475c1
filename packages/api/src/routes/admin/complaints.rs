use std::collections::HashMap;

use axum::{Extension, Json, extract::State};
use chrono::NaiveDateTime;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entity::{
    complaint::{self, ComplaintStatus},
    user,
};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ComplaintRow {
    pub id: String,
    pub intern: Option<String>,
    pub supervisor: Option<String>,
    pub subject: String,
    pub status: ComplaintStatus,
    pub created_at: NaiveDateTime,
}

#[tracing::instrument(name = "GET /admin/complaints", skip(state, auth))]
pub async fn list_complaints(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ComplaintRow>>, ApiError> {
    auth.require_admin(&state).await?;

    let complaints = complaint::Entity::find()
        .order_by_desc(complaint::Column::CreatedAt)
        .limit(200)
        .all(&state.db)
        .await?;

    // One batch lookup instead of a user query per row.
    let mut user_ids: Vec<String> = complaints.iter().map(|c| c.intern_id.clone()).collect();
    user_ids.extend(complaints.iter().filter_map(|c| c.supervisor_id.clone()));
    let emails: HashMap<String, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect();

    let rows = complaints
        .into_iter()
        .map(|c| ComplaintRow {
            id: c.id,
            intern: emails.get(&c.intern_id).cloned(),
            supervisor: c
                .supervisor_id
                .as_ref()
                .and_then(|id| emails.get(id).cloned()),
            subject: c.subject,
            status: c.status,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(rows))
}

use axum::{Extension, Json, extract::State};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entity::{attendance, user};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub id: String,
    pub intern: String,
    pub email: String,
    pub date: NaiveDate,
    pub in_office: bool,
    pub location_validated: bool,
    pub distance_m: Option<f64>,
    pub created_at: NaiveDateTime,
}

#[tracing::instrument(name = "GET /admin/attendance", skip(state, auth))]
pub async fn list_attendance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<AttendanceRow>>, ApiError> {
    auth.require_admin(&state).await?;

    let records = attendance::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(attendance::Column::CreatedAt)
        .limit(300)
        .all(&state.db)
        .await?;

    let rows = records
        .into_iter()
        .map(|(record, intern)| {
            let (intern_name, intern_email) = intern
                .map(|i| (i.full_name, i.email))
                .unwrap_or_default();
            AttendanceRow {
                id: record.id,
                intern: intern_name,
                email: intern_email,
                date: record.date,
                in_office: record.in_office,
                location_validated: record.location_validated,
                distance_m: record.office_distance_m,
                created_at: record.created_at,
            }
        })
        .collect();

    Ok(Json(rows))
}

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::entity::{
    attendance, complaint, task,
    task::TaskStatus,
    task_report,
    user::{self, UserRole},
};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::routes::{MonthQuery, month_bounds, month_date_bounds};
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub tasks_created: usize,
    pub tasks_completed: usize,
    pub attendance_marked: usize,
    pub reports_submitted: usize,
    pub complaints: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InternProgressRow {
    pub intern: String,
    pub email: String,
    pub tasks_created: usize,
    pub tasks_completed: usize,
    pub attendance: usize,
    pub reports: usize,
    pub complaints: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub summary: ProgressSummary,
    pub rows: Vec<InternProgressRow>,
}

/// Monthly rollup: one pass over each month-filtered entity set, grouped by
/// intern in memory.
#[tracing::instrument(name = "GET /admin/progress", skip(state, auth))]
pub async fn monthly_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ProgressResponse>, ApiError> {
    auth.require_admin(&state).await?;

    let (year, month) = query.resolve();
    let (start, end) = month_bounds(year, month)?;
    let (start_date, end_date) = month_date_bounds(year, month)?;

    let tasks = task::Entity::find()
        .filter(task::Column::CreatedAt.gte(start))
        .filter(task::Column::CreatedAt.lt(end))
        .all(&state.db)
        .await?;
    let attendance = attendance::Entity::find()
        .filter(attendance::Column::Date.gte(start_date))
        .filter(attendance::Column::Date.lt(end_date))
        .all(&state.db)
        .await?;
    let reports = task_report::Entity::find()
        .filter(task_report::Column::CreatedAt.gte(start))
        .filter(task_report::Column::CreatedAt.lt(end))
        .all(&state.db)
        .await?;
    let complaints = complaint::Entity::find()
        .filter(complaint::Column::CreatedAt.gte(start))
        .filter(complaint::Column::CreatedAt.lt(end))
        .all(&state.db)
        .await?;

    let summary = ProgressSummary {
        tasks_created: tasks.len(),
        tasks_completed: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count(),
        attendance_marked: attendance.len(),
        reports_submitted: reports.len(),
        complaints: complaints.len(),
    };

    let interns = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Intern))
        .order_by_asc(user::Column::FullName)
        .all(&state.db)
        .await?;

    // Every intern gets a row, active this month or not.
    let mut per_intern: HashMap<String, InternProgressRow> = interns
        .iter()
        .map(|intern| (intern.id.clone(), empty_row(intern)))
        .collect();

    for task in &tasks {
        if let Some(row) = per_intern.get_mut(&task.intern_id) {
            row.tasks_created += 1;
            if task.status == TaskStatus::Completed {
                row.tasks_completed += 1;
            }
        }
    }
    for record in &attendance {
        if let Some(row) = per_intern.get_mut(&record.intern_id) {
            row.attendance += 1;
        }
    }
    for report in &reports {
        if let Some(row) = per_intern.get_mut(&report.intern_id) {
            row.reports += 1;
        }
    }
    for complaint in &complaints {
        if let Some(row) = per_intern.get_mut(&complaint.intern_id) {
            row.complaints += 1;
        }
    }

    let rows = interns
        .iter()
        .map(|intern| {
            per_intern
                .remove(&intern.id)
                .unwrap_or_else(|| empty_row(intern))
        })
        .collect();

    Ok(Json(ProgressResponse { summary, rows }))
}

fn empty_row(intern: &user::Model) -> InternProgressRow {
    InternProgressRow {
        intern: intern.full_name.clone(),
        email: intern.email.clone(),
        ..Default::default()
    }
}

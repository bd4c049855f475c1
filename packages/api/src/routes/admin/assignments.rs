use axum::{Extension, Json, extract::State};
use cuid2::create_id;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};

use crate::entity::{
    activity_log,
    user::{self, UserRole},
};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::routes::ActionResponse;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentsData {
    pub interns: Vec<AssignmentUser>,
    pub supervisors: Vec<AssignmentUser>,
}

fn assignment_user(user: user::Model) -> AssignmentUser {
    AssignmentUser {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
    }
}

#[tracing::instrument(name = "GET /admin/assignments-data", skip(state, auth))]
pub async fn assignments_data(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AssignmentsData>, ApiError> {
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

    Ok(Json(AssignmentsData {
        interns: interns.into_iter().map(assignment_user).collect(),
        supervisors: supervisors.into_iter().map(assignment_user).collect(),
    }))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AssignInput {
    pub intern_id: String,
    pub supervisor_id: String,
}

#[tracing::instrument(name = "POST /admin/assign-intern", skip(state, auth, input))]
pub async fn assign_intern(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<AssignInput>,
) -> Result<Json<ActionResponse>, ApiError> {
    let admin = auth.require_admin(&state).await?;

    if input.intern_id.is_empty() || input.supervisor_id.is_empty() {
        return Err(ApiError::bad_request(
            "intern_id and supervisor_id required",
        ));
    }

    let intern = user::Entity::find_by_id(&input.intern_id)
        .filter(user::Column::Role.eq(UserRole::Intern))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Intern not found"))?;

    let supervisor = user::Entity::find_by_id(&input.supervisor_id)
        .filter(user::Column::Role.eq(UserRole::Supervisor))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Supervisor not found"))?;

    let intern_email = intern.email.clone();
    let mut intern = intern.into_active_model();
    intern.supervisor_id = Set(Some(supervisor.id.clone()));
    intern.updated_at = Set(chrono::Utc::now().naive_utc());
    intern.update(&state.db).await?;

    log_activity(
        &state.db,
        &admin,
        format!("Assigned {} -> {}", intern_email, supervisor.email),
    )
    .await?;

    Ok(Json(ActionResponse::detail("Assigned")))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UnassignInput {
    pub intern_id: String,
}

#[tracing::instrument(name = "POST /admin/unassign-intern", skip(state, auth, input))]
pub async fn unassign_intern(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<UnassignInput>,
) -> Result<Json<ActionResponse>, ApiError> {
    let admin = auth.require_admin(&state).await?;

    if input.intern_id.is_empty() {
        return Err(ApiError::bad_request("intern_id required"));
    }

    let intern = user::Entity::find_by_id(&input.intern_id)
        .filter(user::Column::Role.eq(UserRole::Intern))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Intern not found"))?;

    let intern_email = intern.email.clone();
    let mut intern = intern.into_active_model();
    intern.supervisor_id = Set(None);
    intern.updated_at = Set(chrono::Utc::now().naive_utc());
    intern.update(&state.db).await?;

    log_activity(&state.db, &admin, format!("Unassigned {}", intern_email)).await?;

    Ok(Json(ActionResponse::detail("Unassigned")))
}

pub(crate) async fn log_activity<C>(
    db: &C,
    actor: &user::Model,
    action: String,
) -> Result<(), ApiError>
where
    C: ConnectionTrait,
{
    activity_log::ActiveModel {
        id: Set(create_id()),
        actor_id: Set(Some(actor.id.clone())),
        action: Set(action),
        created_at: Set(chrono::Utc::now().naive_utc()),
    }
    .insert(db)
    .await?;
    Ok(())
}

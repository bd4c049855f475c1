use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

pub mod activity_log;
pub mod analytics;
pub mod assignments;
pub mod attendance;
pub mod complaints;
pub mod delete_user;
pub mod import_users_csv;
pub mod progress;
pub mod report_csv;
pub mod report_pdf;
pub mod users;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/delete-user/{user_id}", delete(delete_user::delete_user))
        .route(
            "/import-users-csv",
            post(import_users_csv::import_users_csv),
        )
        .route("/assignments-data", get(assignments::assignments_data))
        .route("/assign-intern", post(assignments::assign_intern))
        .route("/unassign-intern", post(assignments::unassign_intern))
        .route("/analytics", get(analytics::analytics))
        .route("/activity-log", get(activity_log::list_activity))
        .route("/attendance", get(attendance::list_attendance))
        .route("/complaints", get(complaints::list_complaints))
        .route("/progress", get(progress::monthly_progress))
        .route("/monthly-report/csv", get(report_csv::monthly_report_csv))
        .route("/monthly-report/pdf", get(report_pdf::monthly_report_pdf))
}

use axum::{
    Extension,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use printpdf::{BuiltinFont, Line, Mm, PdfDocument, Point};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::collections::HashMap;

use crate::entity::{task, user};
use crate::error::ApiError;
use crate::middleware::jwt::AuthUser;
use crate::routes::{MonthQuery, month_bounds};
use crate::state::AppState;

use super::report_csv::{load_referenced_users, status_label};

#[tracing::instrument(name = "GET /admin/monthly-report/pdf", skip(state, auth))]
pub async fn monthly_report_pdf(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, ApiError> {
    auth.require_admin(&state).await?;

    let (year, month) = query.resolve();
    let (start, end) = month_bounds(year, month)?;

    let tasks = task::Entity::find()
        .filter(task::Column::CreatedAt.gte(start))
        .filter(task::Column::CreatedAt.lt(end))
        .all(&state.db)
        .await?;

    let users = load_referenced_users(&state, &tasks).await?;

    let bytes = render_report(year, month, &tasks, &users)?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"monthly_report_{}_{:02}.pdf\"",
                year, month
            ),
        ),
    ];

    Ok((headers, bytes).into_response())
}

/// A4 canvas listing, one row per task, new page when the cursor crosses the
/// bottom margin.
pub(crate) fn render_report(
    year: i32,
    month: u32,
    tasks: &[task::Model],
    users: &HashMap<String, user::Model>,
) -> Result<Vec<u8>, ApiError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Admin Monthly Report - {}-{:02}", year, month),
        Mm(210.0),
        Mm(297.0),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ApiError::internal(format!("Failed to load PDF font: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ApiError::internal(format!("Failed to load PDF font: {}", e)))?;

    let mut current_layer = doc.get_page(page).get_layer(layer);
    let mut y = 297.0 - 18.0;

    current_layer.use_text(
        format!("Admin Monthly Report - {}-{:02}", year, month),
        14.0,
        Mm(18.0),
        Mm(y),
        &bold,
    );

    y -= 7.0;
    current_layer.use_text(
        format!("Total Tasks: {}", tasks.len()),
        10.0,
        Mm(18.0),
        Mm(y),
        &font,
    );

    y -= 7.0;
    current_layer.use_text("Task", 10.0, Mm(18.0), Mm(y), &bold);
    current_layer.use_text("Intern", 10.0, Mm(95.0), Mm(y), &bold);
    current_layer.use_text("Status", 10.0, Mm(163.0), Mm(y), &bold);

    y -= 2.5;
    current_layer.set_outline_thickness(0.5);
    current_layer.add_line(Line {
        points: vec![
            (Point::new(Mm(18.0), Mm(y)), false),
            (Point::new(Mm(192.0), Mm(y)), false),
        ],
        is_closed: false,
    });
    y -= 5.5;

    for task in tasks {
        if y < 25.0 {
            let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            current_layer = doc.get_page(page).get_layer(layer);
            y = 297.0 - 18.0;
        }

        let intern_name = users
            .get(&task.intern_id)
            .map(|u| u.full_name.as_str())
            .unwrap_or_default();

        current_layer.use_text(
            format!("#{} {}", truncate(&task.id, 8), truncate(&task.title, 30)),
            9.0,
            Mm(18.0),
            Mm(y),
            &font,
        );
        current_layer.use_text(truncate(intern_name, 22), 9.0, Mm(95.0), Mm(y), &font);
        current_layer.use_text(
            truncate(&status_label(task), 12),
            9.0,
            Mm(163.0),
            Mm(y),
            &font,
        );
        y -= 5.0;
    }

    doc.save_to_bytes()
        .map_err(|e| ApiError::internal(format!("Failed to render PDF: {}", e)))
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::task::TaskStatus;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("ubersicht", 4), "uber");
        assert_eq!(truncate("übersicht", 4), "über");
        assert_eq!(truncate("ok", 30), "ok");
    }

    #[test]
    fn renders_a_parseable_pdf() {
        let created = chrono::NaiveDate::from_ymd_opt(2026, 7, 3)
            .expect("valid date")
            .and_hms_opt(9, 30, 0)
            .expect("valid time");
        let tasks: Vec<task::Model> = (0..120)
            .map(|i| task::Model {
                id: format!("task{}", i),
                title: format!("Task number {}", i),
                status: TaskStatus::Pending,
                intern_id: "i1".to_string(),
                supervisor_id: None,
                star_rating: None,
                supervisor_feedback: None,
                created_at: created,
                updated_at: created,
            })
            .collect();

        // 120 rows forces pagination past the first A4 page.
        let bytes = render_report(2026, 7, &tasks, &HashMap::new()).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
    }
}

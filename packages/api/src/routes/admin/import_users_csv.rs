//! Admin bulk import: company CSV -> create/update users -> auto-verified.
//!
//! CSV columns supported (case-insensitive):
//! `email, full_name, role, employee_id, department, supervisor_email`

use axum::{Extension, Json, extract::Multipart, extract::State};
use cuid2::create_id;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::bad_request;
use crate::entity::user::{self, UserRole};
use crate::error::ApiError;
use crate::mail::{EmailMessage, templates};
use crate::middleware::jwt::AuthUser;
use crate::password::hash_password;
use crate::state::AppState;
use crate::tokens::new_token;

const REQUIRED_COLUMNS: [&str; 3] = ["email", "full_name", "role"];
const MAX_REPORTED_ERRORS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub email: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportSummary {
    pub detail: String,
    pub created: usize,
    pub updated: usize,
    pub credentials_sent: usize,
    pub errors_count: usize,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Default)]
struct ImportOutcome {
    created: usize,
    updated: usize,
    credentials_sent: usize,
    errors: Vec<RowError>,
}

impl ImportOutcome {
    fn into_summary(self) -> ImportSummary {
        ImportSummary {
            detail: "CSV import completed.".to_string(),
            created: self.created,
            updated: self.updated,
            credentials_sent: self.credentials_sent,
            errors_count: self.errors.len(),
            errors: self
                .errors
                .into_iter()
                .take(MAX_REPORTED_ERRORS)
                .collect(),
        }
    }
}

/// The whole import is one transaction: any unhandled error (including a
/// failed credentials mail) rolls back every row. Row-level validation
/// problems are collected instead of aborting.
#[tracing::instrument(name = "POST /admin/import-users-csv", skip(state, auth, multipart))]
pub async fn import_users_csv(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>, ApiError> {
    auth.require_admin(&state).await?;

    let mut data = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            data = Some(field.bytes().await?);
            break;
        }
    }
    let data = data.ok_or_else(|| {
        ApiError::bad_request("CSV file is required. Use form-data field name: file")
    })?;

    let (headers, rows) = parse_csv(&data)?;

    let state_in_txn = state.clone();
    let outcome = state
        .db
        .transaction::<_, ImportOutcome, ApiError>(move |txn| {
            Box::pin(async move {
                let state = state_in_txn;
                let mut outcome = ImportOutcome::default();

                // Supervisors first, so intern rows can reference a
                // supervisor created by the same upload.
                for record in &rows {
                    if get_val(record, &headers, "role").to_uppercase() != "SUPERVISOR" {
                        continue;
                    }
                    let Some(fields) = required_fields(record, &headers, &mut outcome) else {
                        continue;
                    };
                    upsert_user(txn, &state, fields, UserRole::Supervisor, None, &mut outcome)
                        .await?;
                }

                for record in &rows {
                    if get_val(record, &headers, "role").to_uppercase() != "INTERN" {
                        continue;
                    }
                    let Some(fields) = required_fields(record, &headers, &mut outcome) else {
                        continue;
                    };

                    // An unresolvable supervisor_email leaves the intern
                    // unassigned rather than failing the row.
                    let supervisor_email =
                        get_val(record, &headers, "supervisor_email").to_lowercase();
                    let supervisor = if supervisor_email.is_empty() {
                        None
                    } else {
                        user::Entity::find()
                            .filter(user::Column::Email.eq(&supervisor_email))
                            .filter(user::Column::Role.eq(UserRole::Supervisor))
                            .one(txn)
                            .await?
                    };

                    upsert_user(txn, &state, fields, UserRole::Intern, supervisor, &mut outcome)
                        .await?;
                }

                Ok(outcome)
            })
        })
        .await?;

    Ok(Json(outcome.into_summary()))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowFields {
    pub email: String,
    pub full_name: String,
    pub employee_id: String,
    pub department: String,
}

pub(crate) fn parse_csv(data: &[u8]) -> Result<(Vec<String>, Vec<csv::StringRecord>), ApiError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ApiError::bad_request("CSV has no header."));
    }
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(bad_request!("CSV missing required column: {}", required));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?);
    }
    Ok((headers, rows))
}

pub(crate) fn get_val(record: &csv::StringRecord, headers: &[String], key: &str) -> String {
    headers
        .iter()
        .position(|h| h == key)
        .and_then(|i| record.get(i))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn required_fields(
    record: &csv::StringRecord,
    headers: &[String],
    outcome: &mut ImportOutcome,
) -> Option<RowFields> {
    let email = get_val(record, headers, "email").to_lowercase();
    let full_name = get_val(record, headers, "full_name");

    if email.is_empty() || full_name.is_empty() {
        outcome.errors.push(RowError {
            email,
            error: "Missing email/full_name".to_string(),
        });
        return None;
    }

    Some(RowFields {
        email,
        full_name,
        employee_id: get_val(record, headers, "employee_id"),
        department: get_val(record, headers, "department"),
    })
}

async fn upsert_user<C>(
    txn: &C,
    state: &AppState,
    fields: RowFields,
    role: UserRole,
    supervisor: Option<user::Model>,
    outcome: &mut ImportOutcome,
) -> Result<(), ApiError>
where
    C: ConnectionTrait,
{
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&fields.email))
        .one(txn)
        .await?;

    match existing {
        None => {
            let password = new_token(10)?;
            let now = chrono::Utc::now().naive_utc();
            let created = user::ActiveModel {
                id: Set(create_id()),
                email: Set(fields.email),
                full_name: Set(fields.full_name),
                role: Set(role),
                employee_id: Set(none_if_empty(fields.employee_id)),
                department: Set(none_if_empty(fields.department)),
                supervisor_id: Set(supervisor.map(|s| s.id)),
                // Company/admin data => auto-verified.
                is_verified: Set(true),
                password_hash: Set(hash_password(&password)?),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(txn)
            .await?;
            outcome.created += 1;

            let login_url = format!("{}/login.html", state.config.frontend_base_url);
            let (subject, body) =
                templates::credentials_email(&created.full_name, &created.email, &password, &login_url);
            state
                .mailer()?
                .send(EmailMessage {
                    to: created.email.clone(),
                    subject,
                    body_text: body,
                })
                .await?;
            outcome.credentials_sent += 1;
        }
        Some(existing) => {
            let supervisor_id = supervisor.as_ref().map(|s| s.id.as_str());
            let (mut active, changed) = diff_existing(&existing, &fields, role, supervisor_id);
            if changed {
                active.updated_at = Set(chrono::Utc::now().naive_utc());
                active.update(txn).await?;
                outcome.updated += 1;
            }
        }
    }

    Ok(())
}

/// Build an update writing only the fields that actually differ; returns
/// whether anything changed. Blank employee_id/department cells never clear
/// existing values, and imported rows are always forced verified.
fn diff_existing(
    existing: &user::Model,
    fields: &RowFields,
    role: UserRole,
    supervisor_id: Option<&str>,
) -> (user::ActiveModel, bool) {
    let mut active = existing.clone().into_active_model();
    let mut changed = false;

    if existing.full_name != fields.full_name {
        active.full_name = Set(fields.full_name.clone());
        changed = true;
    }
    if existing.role != role {
        active.role = Set(role);
        changed = true;
    }
    if !fields.employee_id.is_empty()
        && existing.employee_id.as_deref() != Some(fields.employee_id.as_str())
    {
        active.employee_id = Set(Some(fields.employee_id.clone()));
        changed = true;
    }
    if !fields.department.is_empty()
        && existing.department.as_deref() != Some(fields.department.as_str())
    {
        active.department = Set(Some(fields.department.clone()));
        changed = true;
    }
    if let Some(supervisor_id) = supervisor_id
        && existing.supervisor_id.as_deref() != Some(supervisor_id)
    {
        active.supervisor_id = Set(Some(supervisor_id.to_string()));
        changed = true;
    }
    if !existing.is_verified {
        active.is_verified = Set(true);
        changed = true;
    }

    (active, changed)
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn existing_user() -> user::Model {
        let now = chrono::NaiveDate::from_ymd_opt(2026, 1, 15)
            .expect("valid date")
            .and_hms_opt(8, 0, 0)
            .expect("valid time");
        user::Model {
            id: "u1".to_string(),
            email: "sup@x.com".to_string(),
            full_name: "S".to_string(),
            role: UserRole::Supervisor,
            employee_id: Some("E-1".to_string()),
            department: Some("Platform".to_string()),
            supervisor_id: None,
            is_verified: true,
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn fields(email: &str, full_name: &str) -> RowFields {
        RowFields {
            email: email.to_string(),
            full_name: full_name.to_string(),
            employee_id: String::new(),
            department: String::new(),
        }
    }

    #[test]
    fn parse_csv_validates_required_columns() {
        let err = parse_csv(b"email,full_name\na@x.com,A\n").expect_err("missing role");
        assert_eq!(err.detail(), "CSV missing required column: role");

        let err = parse_csv(b"").expect_err("empty file");
        assert_eq!(err.detail(), "CSV has no header.");
    }

    #[test]
    fn parse_csv_headers_are_case_insensitive() {
        let (headers, rows) =
            parse_csv(b"Email, FULL_NAME ,Role\nsup@x.com,S,SUPERVISOR\n").expect("valid csv");
        assert_eq!(headers, vec!["email", "full_name", "role"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(get_val(&rows[0], &headers, "email"), "sup@x.com");
        assert_eq!(get_val(&rows[0], &headers, "role"), "SUPERVISOR");
    }

    #[test]
    fn get_val_handles_missing_cells() {
        let (headers, rows) = parse_csv(
            b"email,full_name,role,department\nint@x.com,I,INTERN\n",
        )
        .expect("valid csv");
        // Short row: department cell is absent, not an error.
        assert_eq!(get_val(&rows[0], &headers, "department"), "");
        assert_eq!(get_val(&rows[0], &headers, "supervisor_email"), "");
    }

    #[test]
    fn required_fields_collects_row_errors() {
        let (headers, rows) =
            parse_csv(b"email,full_name,role\n,NoEmail,INTERN\nint@x.com,I,INTERN\n")
                .expect("valid csv");
        let mut outcome = ImportOutcome::default();

        assert!(required_fields(&rows[0], &headers, &mut outcome).is_none());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].error, "Missing email/full_name");

        let fields = required_fields(&rows[1], &headers, &mut outcome).expect("valid row");
        assert_eq!(fields.email, "int@x.com");
    }

    #[test]
    fn identical_reimport_changes_nothing() {
        let existing = existing_user();
        let (_, changed) = diff_existing(
            &existing,
            &RowFields {
                email: "sup@x.com".to_string(),
                full_name: "S".to_string(),
                employee_id: "E-1".to_string(),
                department: "Platform".to_string(),
            },
            UserRole::Supervisor,
            None,
        );
        assert!(!changed);
    }

    #[test]
    fn diff_writes_only_changed_fields() {
        let existing = existing_user();
        let (active, changed) = diff_existing(
            &existing,
            &RowFields {
                email: "sup@x.com".to_string(),
                full_name: "S. Lovelace".to_string(),
                employee_id: String::new(),
                department: "Platform".to_string(),
            },
            UserRole::Supervisor,
            None,
        );
        assert!(changed);
        assert_eq!(
            active.full_name,
            ActiveValue::Set("S. Lovelace".to_string())
        );
        // Untouched columns stay Unchanged so the UPDATE skips them.
        assert_eq!(
            active.department,
            ActiveValue::Unchanged(Some("Platform".to_string()))
        );
        assert_eq!(active.employee_id, ActiveValue::Unchanged(Some("E-1".to_string())));
    }

    #[test]
    fn blank_cells_never_clear_existing_values() {
        let existing = existing_user();
        let (active, changed) = diff_existing(
            &existing,
            &fields("sup@x.com", "S"),
            UserRole::Supervisor,
            None,
        );
        assert!(!changed);
        assert_eq!(active.employee_id, ActiveValue::Unchanged(Some("E-1".to_string())));
    }

    #[test]
    fn reimport_forces_verification_and_supervisor() {
        let mut existing = existing_user();
        existing.role = UserRole::Intern;
        existing.is_verified = false;
        let (active, changed) = diff_existing(
            &existing,
            &fields("sup@x.com", "S"),
            UserRole::Intern,
            Some("sup-id"),
        );
        assert!(changed);
        assert_eq!(active.is_verified, ActiveValue::Set(true));
        assert_eq!(
            active.supervisor_id,
            ActiveValue::Set(Some("sup-id".to_string()))
        );
    }
}

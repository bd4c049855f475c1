use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::entity::user as user_entity;
use crate::error::ApiError;

pub mod admin;
pub mod auth;
pub mod health;
pub mod user;

/// `?year=&month=` filter shared by the reporting endpoints; defaults to the
/// current UTC month.
#[derive(Clone, Deserialize, Serialize, Debug)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    pub fn resolve(&self) -> (i32, u32) {
        let now = chrono::Utc::now();
        (
            self.year.unwrap_or_else(|| now.year()),
            self.month.unwrap_or_else(|| now.month()),
        )
    }
}

/// Half-open `[start, end)` datetime range covering one calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime), ApiError> {
    let (start, end) = month_date_bounds(year, month)?;
    Ok((start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN)))
}

/// Half-open `[start, end)` date range covering one calendar month.
pub fn month_date_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ApiError::bad_request("Invalid year/month"))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ApiError::bad_request("Invalid year/month"))?;
    Ok((start, end))
}

/// User profile payload (never exposes the password hash).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserOut {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: user_entity::UserRole,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub supervisor_id: Option<String>,
    pub is_verified: bool,
}

impl From<user_entity::Model> for UserOut {
    fn from(user: user_entity::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            employee_id: user.employee_id,
            department: user.department,
            supervisor_id: user.supervisor_id,
            is_verified: user.is_verified,
        }
    }
}

/// Success payload mirroring the error contract: `detail` plus an optional
/// client navigation hint.
#[derive(Clone, Debug, Serialize)]
pub struct ActionResponse {
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl ActionResponse {
    pub fn detail(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            action: None,
            redirect_url: None,
        }
    }

    pub fn with_action(mut self, action: &'static str) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_redirect(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = Some(redirect_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_are_half_open() {
        let (start, end) = month_bounds(2026, 7).expect("valid month");
        assert_eq!(start.to_string(), "2026-07-01 00:00:00");
        assert_eq!(end.to_string(), "2026-08-01 00:00:00");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = month_bounds(2025, 12).expect("valid month");
        assert_eq!(start.date().year(), 2025);
        assert_eq!(end.date().year(), 2026);
        assert_eq!(end.date().month(), 1);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(month_bounds(2026, 0).is_err());
        assert!(month_bounds(2026, 13).is_err());
    }

    #[test]
    fn action_response_skips_empty_fields() {
        let body = serde_json::to_value(ActionResponse::detail("ok")).expect("serialize");
        assert_eq!(body, serde_json::json!({"detail": "ok"}));

        let body = serde_json::to_value(
            ActionResponse::detail("check your inbox")
                .with_action("VERIFY_EMAIL")
                .with_redirect("https://webmail.example.com/"),
        )
        .expect("serialize");
        assert_eq!(body["action"], "VERIFY_EMAIL");
        assert_eq!(body["redirect_url"], "https://webmail.example.com/");
    }
}

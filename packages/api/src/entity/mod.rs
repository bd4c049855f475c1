//! Manually written sea-orm entities for the InternTrack schema.

pub mod activity_log;
pub mod attendance;
pub mod complaint;
pub mod email_verification_token;
pub mod password_reset_token;
pub mod task;
pub mod task_report;
pub mod user;

pub mod prelude {
    pub use super::activity_log::Entity as ActivityLog;
    pub use super::attendance::Entity as Attendance;
    pub use super::complaint::Entity as Complaint;
    pub use super::email_verification_token::Entity as EmailVerificationToken;
    pub use super::password_reset_token::Entity as PasswordResetToken;
    pub use super::task::Entity as Task;
    pub use super::task_report::Entity as TaskReport;
    pub use super::user::Entity as User;
}

use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{MailConfig, MailProviderType};

mod smtp;
pub mod templates;

pub use smtp::SmtpMailClient;

/// A plaintext outbound message. Delivery failures always propagate to the
/// caller; nothing here is fail-silent.
#[derive(Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
}

#[async_trait::async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), ApiError>;
    fn from_email(&self) -> &str;
    fn from_name(&self) -> &str;
}

pub type DynMailClient = Arc<dyn MailClient>;

pub fn create_mail_client(config: &MailConfig) -> Result<DynMailClient, ApiError> {
    match config.provider {
        MailProviderType::Smtp => {
            let smtp_settings = config
                .smtp
                .as_ref()
                .ok_or_else(|| ApiError::internal("SMTP settings required for SMTP provider"))?;
            let client = SmtpMailClient::new(config, smtp_settings)?;
            Ok(Arc::new(client))
        }
    }
}

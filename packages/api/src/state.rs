use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

use crate::error::ApiError;
use crate::mail::{DynMailClient, create_mail_client};

pub type AppState = Arc<State>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProviderType {
    Smtp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MailConfig {
    pub provider: MailProviderType,
    pub from_email: String,
    pub from_name: String,
    pub smtp: Option<SmtpSettings>,
}

/// Deploy-level configuration handed to [`State::new`] by the server binary.
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub environment: Environment,
    /// Base URL the mailed verification/reset/login links point at.
    pub frontend_base_url: String,
    /// Where unverified users are sent to check their inbox.
    pub webmail_url: String,
    pub mail: Option<MailConfig>,
}

pub struct State {
    pub config: PlatformConfig,
    pub db: DatabaseConnection,
    pub mail_client: Option<DynMailClient>,
}

impl State {
    pub async fn new(config: PlatformConfig) -> Self {
        let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let mut opt = ConnectOptions::new(db_url);
        opt.max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(config.environment == Environment::Development);

        let db = Database::connect(opt)
            .await
            .expect("Failed to connect to database");

        let mail_client = if let Some(mail_config) = &config.mail {
            match create_mail_client(mail_config) {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!("Failed to initialize mail client: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            config,
            db,
            mail_client,
        }
    }

    /// The configured mail client; mail delivery is never fail-silent, so a
    /// missing client is an error at the point of use.
    pub fn mailer(&self) -> Result<&DynMailClient, ApiError> {
        self.mail_client
            .as_ref()
            .ok_or_else(|| ApiError::internal("Mail client is not configured"))
    }
}

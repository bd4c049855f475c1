use interntrack_api::state::{
    Environment, MailConfig, MailProviderType, PlatformConfig, SmtpSettings,
};
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub platform: PlatformConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let frontend_base_url = env::var("FRONTEND_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("FRONTEND_BASE_URL"))?
            .trim_end_matches('/')
            .to_string();

        let webmail_url = env::var("WEBMAIL_URL")
            .unwrap_or_else(|_| "https://webmail.migadu.com/".to_string());

        let mail = match env::var("SMTP_HOST") {
            Ok(host) => Some(MailConfig {
                provider: MailProviderType::Smtp,
                from_email: env::var("MAIL_FROM_EMAIL")
                    .map_err(|_| ConfigError::MissingVar("MAIL_FROM_EMAIL"))?,
                from_name: env::var("MAIL_FROM_NAME")
                    .unwrap_or_else(|_| "InternTrack".to_string()),
                smtp: Some(SmtpSettings {
                    host,
                    port: env::var("SMTP_PORT")
                        .unwrap_or_else(|_| "587".to_string())
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SMTP_PORT".to_string()))?,
                    username: env::var("SMTP_USERNAME")
                        .map_err(|_| ConfigError::MissingVar("SMTP_USERNAME"))?,
                    password: env::var("SMTP_PASSWORD")
                        .map_err(|_| ConfigError::MissingVar("SMTP_PASSWORD"))?,
                }),
            }),
            Err(_) => None,
        };

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            platform: PlatformConfig {
                environment,
                frontend_base_url,
                webmail_url,
                mail,
            },
        })
    }
}

#[derive(Debug)]
#[allow(dead_code)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}

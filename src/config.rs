use base64::{engine::general_purpose, Engine as _};
use chrono::Duration;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} missing")]
    Missing(&'static str),
    #[error("{0} must be base64")]
    Base64(&'static str),
    #[error("{0} is too short (need at least {1} bytes)")]
    KeyTooShort(&'static str, usize),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

const MIN_SESSION_KEY_BYTES: usize = 32;

#[derive(Clone, Debug)]
pub struct MailSettings {
    pub relay_url: String,
    pub relay_token: String,
    pub sender: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub session_key: Vec<u8>,
    pub session_ttl: Duration,
    pub mail: Option<MailSettings>,
    pub reminder_limit: usize,
    pub reminder_window_secs: u64,
    pub static_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| {
            let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
            format!("0.0.0.0:{}", port)
        });

        let session_key_b64 = lookup("SESSION_KEY").ok_or(ConfigError::Missing("SESSION_KEY"))?;
        let session_key = general_purpose::STANDARD
            .decode(session_key_b64.trim())
            .map_err(|_| ConfigError::Base64("SESSION_KEY"))?;
        if session_key.len() < MIN_SESSION_KEY_BYTES {
            return Err(ConfigError::KeyTooShort("SESSION_KEY", MIN_SESSION_KEY_BYTES));
        }

        let ttl_hours: i64 = parse_or(&lookup, "SESSION_TTL_HOURS", 24)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid("SESSION_TTL_HOURS", ttl_hours.to_string()));
        }

        let mail = match (
            lookup("MAIL_RELAY_URL"),
            lookup("MAIL_RELAY_TOKEN"),
            lookup("MAIL_SENDER"),
        ) {
            (Some(relay_url), Some(relay_token), Some(sender)) => Some(MailSettings {
                relay_url,
                relay_token,
                sender,
                timeout_secs: parse_or(&lookup, "MAIL_TIMEOUT_SECS", 10)?,
            }),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            session_key,
            session_ttl: Duration::hours(ttl_hours),
            mail,
            reminder_limit: parse_or(&lookup, "REMINDER_LIMIT", 3)?,
            reminder_window_secs: parse_or(&lookup, "REMINDER_WINDOW_SECS", 60)?,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(key, raw)),
        None => Ok(default),
    }
}

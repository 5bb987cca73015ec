// configuration lue depuis l'environnement (.env chargé par dotenv dans main)

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_MAIL_COMPANY: &str = "G3FIBRA";
const DEFAULT_JWT_SECRET: &str = "default-insecure-key-change-this";
/// Rétention par défaut des tokens expirés quand le sweeper est actif (24h)
const DEFAULT_RETENTION_SECS: u64 = 86_400;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

/// Nettoyage périodique des tokens expirés (désactivé par défaut)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeConfig {
    pub interval: Duration,
    pub retention: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub mail_company: String,
    pub smtp: Option<SmtpConfig>,
    pub purge: Option<PurgeConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lecture (testable sans toucher l'env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Une variable définie mais vide compte comme absente
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("⚠️  JWT_SECRET not set, using default (INSECURE)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let smtp = match get("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                from: get("MAIL_FROM").ok_or(ConfigError::Missing("MAIL_FROM"))?,
            }),
            None => None,
        };

        let purge = match get("TOKEN_PURGE_INTERVAL_SECS") {
            Some(raw) => {
                let interval: u64 = parse("TOKEN_PURGE_INTERVAL_SECS", &raw)?;
                if interval == 0 {
                    return Err(ConfigError::Invalid { key: "TOKEN_PURGE_INTERVAL_SECS", value: raw });
                }
                let retention = parse_or("TOKEN_RETENTION_SECS", get("TOKEN_RETENTION_SECS"), DEFAULT_RETENTION_SECS)?;
                Some(PurgeConfig {
                    interval: Duration::from_secs(interval),
                    retention: Duration::from_secs(retention),
                })
            }
            None => None,
        };

        Ok(Config {
            database_url,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            jwt_secret,
            mail_company: get("MAIL_COMPANY").unwrap_or_else(|| DEFAULT_MAIL_COMPANY.to_string()),
            smtp,
            purge,
        })
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid { key, value: raw.to_string() })
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}

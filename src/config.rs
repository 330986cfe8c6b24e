use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;

use crate::error::AppError;

/// Credentials live at most one year.
pub const SESSION_TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;

/// Work factors bcrypt accepts.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Process-wide settings, read once at startup and injected where needed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// HMAC secret used to sign session credentials. Never rotated at runtime.
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AppError::InternalServerError(format!("{} must be set", key)))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 3000)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            session_secret: required("SESSION_SECRET")?,
            session_ttl_hours: in_range(
                "SESSION_TTL_HOURS",
                parse_or(&lookup, "SESSION_TTL_HOURS", 24)?,
                &SESSION_TTL_HOURS_RANGE,
            )?,
            bcrypt_cost: in_range(
                "BCRYPT_COST",
                parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
                &BCRYPT_COST_RANGE,
            )?,
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} has an invalid value", key))),
        None => Ok(default),
    }
}

fn in_range<T>(key: &str, value: T, range: &RangeInclusive<T>) -> Result<T, AppError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(AppError::InternalServerError(format!(
            "{} must be between {} and {}, got {}",
            key,
            range.start(),
            range.end(),
            value
        )))
    }
}

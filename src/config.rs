use std::env;

use anyhow::Context;
use axum::http::HeaderValue;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    /// `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    pub event_buffer_size: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let cors_origin = match env::var("CORS_ORIGIN") {
            Ok(origin) if !origin.trim().is_empty() => Some(
                HeaderValue::from_str(origin.trim())
                    .with_context(|| format!("invalid CORS_ORIGIN: {origin}"))?,
            ),
            _ => None,
        };

        Ok(Self {
            port: parse_or_default("PORT", 3000)?,
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "takers.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            cors_origin,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 64)?,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| anyhow::anyhow!("invalid {key}: {err}")),
        Err(_) => Ok(default),
    }
}

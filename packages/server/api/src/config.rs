use anyhow::{Context, Result};
use axum::http::HeaderValue;
use database::repositories::tool_repo::{DEFAULT_PER_PAGE, MAX_PER_PAGE};
use std::net::SocketAddr;
use std::str::FromStr;

/// Runtime settings, read once at startup and handed to [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Allowed browser origin. `None` allows any origin without credentials.
    pub cors_origin: Option<HeaderValue>,
    pub default_per_page: i64,
    pub db_max_connections: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://tools.db".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_origin: None,
            default_per_page: DEFAULT_PER_PAGE,
            db_max_connections: 5,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let default_per_page: i64 =
            parse_or(&lookup, "DEFAULT_PER_PAGE", defaults.default_per_page)?;
        if !(1..=MAX_PER_PAGE).contains(&default_per_page) {
            anyhow::bail!("DEFAULT_PER_PAGE must be between 1 and {MAX_PER_PAGE}");
        }

        let cors_origin = lookup("CORS_ORIGIN")
            .filter(|origin| !origin.trim().is_empty())
            .map(|origin| {
                origin
                    .trim()
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS_ORIGIN: {origin}"))
            })
            .transpose()?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            cors_origin,
            default_per_page,
            db_max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key}: {raw}")),
        None => Ok(default),
    }
}

use anyhow::Context;
use serde::Deserialize;

/// One year.
pub const MAX_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Which persistence backend the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub timeline_include_own: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => anyhow::bail!("unknown STORAGE_BACKEND `{other}`"),
        };

        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required for the postgres backend");
        }

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("DATABASE_MAX_CONNECTIONS")?
            .unwrap_or(10);

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET is required")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "minitweet".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "minitweet-users".into()),
            ttl_minutes: lookup("JWT_TTL_MINUTES")
                .map(|v| v.parse::<i64>())
                .transpose()
                .context("JWT_TTL_MINUTES")?
                .unwrap_or(60),
        };
        if !(1..=MAX_TTL_MINUTES).contains(&jwt.ttl_minutes) {
            anyhow::bail!(
                "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {}",
                jwt.ttl_minutes
            );
        }

        let timeline_include_own = lookup("TIMELINE_INCLUDE_OWN")
            .map(|v| parse_bool(&v))
            .transpose()
            .context("TIMELINE_INCLUDE_OWN")?
            .unwrap_or(true);

        Ok(Self {
            storage,
            database_url,
            max_connections,
            jwt,
            timeline_include_own,
        })
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got `{other}`"),
    }
}

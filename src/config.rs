use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub server: ServerConfig,
    pub api_prefix: String,
    pub project_name: String,
    pub version: String,
    pub cors_origins: Vec<String>,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("APP_PORT", 8080)?,
        };
        Ok(Self {
            database_url,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            server,
            api_prefix: normalize_prefix(
                &std::env::var("API_PREFIX").unwrap_or_else(|_| "/api".into()),
            ),
            project_name: std::env::var("PROJECT_NAME").unwrap_or_else(|_| "Recipe API".into()),
            version: std::env::var("APP_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").into()),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
            ),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
        })
    }

    /// Config for tests and tooling that never reads the environment.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: 5,
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            api_prefix: "/api".into(),
            project_name: "Recipe API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            cors_origins: vec!["*".into()],
            static_dir: PathBuf::from("static"),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if origins.is_empty() {
        vec!["*".into()]
    } else {
        origins
    }
}

/// Leading slash, no trailing slash; "/" collapses to "" (routes mounted at root).
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

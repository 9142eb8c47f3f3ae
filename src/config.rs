//! Runtime settings read from the environment (and `.env` when present).

use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_APP_URL: &str = "https://caelum.com";
const DEFAULT_SITE_NAME: &str = "Caelum";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_address: SocketAddr,
    pub site: Site,
    pub admin: AdminSettings,
    pub search_index_path: Option<PathBuf>,
}

/// Public identity of the site, used for absolute URLs and structured data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub base_url: String,
    pub name: String,
}

impl Site {
    pub fn new(base_url: impl Into<String>, name: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            name: name.into(),
        }
    }

    /// Leaves absolute URLs alone and prefixes paths with the base URL.
    pub fn absolute_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http") {
            path_or_url.to_string()
        } else if path_or_url.starts_with('/') {
            format!("{}{}", self.base_url, path_or_url)
        } else {
            format!("{}/{}", self.base_url, path_or_url)
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::new(DEFAULT_APP_URL, DEFAULT_SITE_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub jwt_secret: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; real deployments set the variables.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse()
            .context("BIND_ADDRESS must be a socket address")?;

        let token_ttl_hours = match lookup("ADMIN_TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .parse()
                .context("ADMIN_TOKEN_TTL_HOURS must be a whole number")?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a whole number")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            bind_address,
            site: Site::new(
                lookup("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
                lookup("SITE_NAME").unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            ),
            admin: AdminSettings {
                jwt_secret: required("ADMIN_JWT_SECRET")?,
                email: lookup("ADMIN_EMAIL"),
                password: lookup("ADMIN_PASSWORD"),
                token_ttl_hours,
            },
            search_index_path: lookup("SEARCH_INDEX_PATH").map(PathBuf::from),
        })
    }
}

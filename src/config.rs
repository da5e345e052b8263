use anyhow::{Context, Result};
use std::path::PathBuf;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections: u32 = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("Invalid DATABASE_MAX_CONNECTIONS")?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "5500".to_string())
            .parse()
            .context("Invalid PORT")?;

        let static_dir = PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "public".to_string()));

        let admin_token = lookup("ADMIN_TOKEN").filter(|token| !token.trim().is_empty());

        Ok(Config {
            database_url,
            max_connections,
            host,
            port,
            static_dir,
            admin_token,
        })
    }
}

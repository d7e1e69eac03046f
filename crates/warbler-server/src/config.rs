use std::path::PathBuf;

use anyhow::{Result, bail};

/// Secrets that must never reach a running server.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

/// Cookie key derivation needs at least this much input.
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// `None` means "generate a throwaway key at startup".
    pub secret_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "warbler.db".into());
        let database_path = database_url
            .strip_prefix("sqlite://")
            .unwrap_or(&database_url)
            .into();

        let secret_key = lookup("WARBLER_SECRET_KEY").filter(|s| !s.is_empty());
        if let Some(secret) = &secret_key {
            if PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
                bail!("WARBLER_SECRET_KEY is still a placeholder");
            }
            if secret.len() < MIN_SECRET_LEN {
                bail!("WARBLER_SECRET_KEY must be at least {MIN_SECRET_LEN} bytes");
            }
        }

        let host = lookup("WARBLER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("WARBLER_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()?;
        let static_dir = lookup("WARBLER_STATIC_DIR")
            .unwrap_or_else(|| "./static".into())
            .into();

        Ok(Self {
            database_path,
            secret_key,
            host,
            port,
            static_dir,
        })
    }
}

use anyhow::{anyhow, Context, Result};
use std::env;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8088";
const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_LOG_FILTER: &str = "article_api=debug,actix_web=info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub pool_size: u32,
}

impl Settings {
    /// Reads settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;
        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned());
        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            Some(size) => size
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DATABASE_POOL_SIZE is not a number: {}", size))?,
            None => DEFAULT_POOL_SIZE,
        };
        if pool_size == 0 {
            return Err(anyhow!("DATABASE_POOL_SIZE must be at least 1"));
        }
        Ok(Self {
            database_url,
            bind_address,
            pool_size,
        })
    }
}

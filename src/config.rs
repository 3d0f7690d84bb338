use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::importer::SerialStrategy;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub downstream_url: String,
    pub downstream_products_path: String,
    pub downstream_timeout: Duration,
    pub products_file: PathBuf,
    pub serial_strategy: SerialStrategy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup so tests don't have to touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let mut products_path = var("DOWNSTREAM_PRODUCTS_PATH", "/api/products");
        if !products_path.starts_with('/') {
            products_path.insert(0, '/');
        }

        Ok(Self {
            host: var("HOST", "127.0.0.1"),
            port: var("PORT", "8000")
                .parse()
                .context("PORT must be a valid number")?,
            downstream_url: var("DOWNSTREAM_URL", "http://node:3000")
                .trim_end_matches('/')
                .to_string(),
            downstream_products_path: products_path,
            downstream_timeout: Duration::from_secs(
                var("DOWNSTREAM_TIMEOUT_SECS", "30")
                    .parse()
                    .context("DOWNSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            products_file: PathBuf::from(var("PRODUCTS_FILE", "products.json")),
            serial_strategy: var("SERIAL_STRATEGY", "monotonic")
                .parse()
                .context("SERIAL_STRATEGY must be `monotonic` or `jittered`")?,
        })
    }
}

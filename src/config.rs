use crate::model_store::default_model_path;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Location of the decision tree artifact.
    pub model_path: PathBuf,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_path: default_model_path(),
            body_limit_bytes: 64 * 1024,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            host: std::env::var("HOST")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            model_path: std::env::var("MODEL_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            body_limit_bytes: parse_var("BODY_LIMIT_BYTES", defaults.body_limit_bytes)
                .map_err(|_| anyhow::anyhow!("BODY_LIMIT_BYTES must be a positive integer"))?,
            rate_limit_per_second: parse_var("RATE_LIMIT_PER_SECOND", defaults.rate_limit_per_second)
                .and_then(|v| if v == 0 { Err(()) } else { Ok(v) })
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_SECOND must be a positive integer"))?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", defaults.rate_limit_burst)
                .and_then(|v| if v == 0 { Err(()) } else { Ok(v) })
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_BURST must be a positive integer"))?,
        };

        tracing::debug!("Server address: {}:{}", config.host, config.port);
        tracing::debug!("Model path: {}", config.model_path.display());
        tracing::debug!(
            "Rate limit: {}/s, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );

        Ok(config)
    }
}

/// Reads `name`, falling back to `default` when unset or blank.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ()> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| ()),
        _ => Ok(default),
    }
}

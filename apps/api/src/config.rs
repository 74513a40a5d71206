use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 120;

/// Application configuration loaded from environment variables.
/// Fails at startup only on malformed values; everything has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default credential when a generate request carries none.
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    /// Directory holding architecture diagrams and cover-page logos.
    pub assets_dir: PathBuf,
    /// Sessions untouched for this long are dropped.
    pub session_idle_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            assets_dir: optional_env("ASSETS_DIR")
                .unwrap_or_else(|| "diagrams".to_string())
                .into(),
            session_idle_ttl: parse_idle_minutes(optional_env("SESSION_IDLE_MINUTES"))?,
            port: parse_port(std::env::var("PORT").ok())?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(raw: Option<String>) -> Result<u16> {
    raw.unwrap_or_else(|| "8080".to_string())
        .parse::<u16>()
        .context("PORT must be a valid port number")
}

fn parse_idle_minutes(raw: Option<String>) -> Result<Duration> {
    let minutes = match raw {
        Some(v) => v
            .parse::<u64>()
            .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
        None => DEFAULT_SESSION_IDLE_MINUTES,
    };
    Ok(Duration::from_secs(minutes * 60))
}

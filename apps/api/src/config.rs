use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every field has a default, so the service starts on a bare machine;
/// the LLM key is optional and merely switches the question source to
/// the static bank when absent.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional. Without it, question generation and score explanations
    /// run entirely from local tables.
    pub anthropic_api_key: Option<String>,
    /// Path of the JSON history blob.
    pub history_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            history_path: std::env::var("HISTORY_PATH")
                .unwrap_or_else(|_| "history.json".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Present and non-empty, or `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

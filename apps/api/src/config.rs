use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Only the API key is required; everything else falls back to a fixed default.
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_folder: PathBuf,
    pub output_folder: PathBuf,
    pub log_file: PathBuf,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub completion_max_tokens: u32,
    pub completion_timeout_secs: u64,
    pub tika_server_url: String,
    pub tika_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            upload_folder: env_or("UPLOAD_FOLDER", "./uploaded-resumes").into(),
            output_folder: env_or("OUTPUT_FOLDER", "./output").into(),
            log_file: env_or("LOG_FILE", "./logs/parser.log").into(),
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            completion_model: env_or("COMPLETION_MODEL", DEFAULT_MODEL),
            completion_max_tokens: parse_env("COMPLETION_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            completion_timeout_secs: parse_env("COMPLETION_TIMEOUT_SECS", 120)?,
            tika_server_url: env_or("TIKA_SERVER_URL", "http://localhost:9998"),
            tika_timeout_secs: parse_env("TIKA_TIMEOUT_SECS", 120)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 16 * 1024 * 1024)?,
            port: parse_env("PORT", 5000).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("RESUME_PARSER_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUME_PARSER_TEST_BAD_NUMBER", "twelve");
        let result: Result<u64> = parse_env("RESUME_PARSER_TEST_BAD_NUMBER", 1);
        assert!(result.is_err());
        std::env::remove_var("RESUME_PARSER_TEST_BAD_NUMBER");
    }

    #[test]
    fn test_parse_env_trims_whitespace() {
        std::env::set_var("RESUME_PARSER_TEST_PADDED", " 8080 ");
        let value: u16 = parse_env("RESUME_PARSER_TEST_PADDED", 1).unwrap();
        assert_eq!(value, 8080);
        std::env::remove_var("RESUME_PARSER_TEST_PADDED");
    }
}

use anyhow::Result;
use dotenvy::dotenv;

use crate::error::AppError;

const MAX_FILE_SIZE_VAR: &str = "SHEET2JSON_MAX_FILE_SIZE";
const PRETTY_VAR: &str = "SHEET2JSON_PRETTY";
const ATOMIC_WRITE_VAR: &str = "SHEET2JSON_ATOMIC_WRITE";
const LOG_VAR: &str = "SHEET2JSON_LOG";

fn default_max_file_size() -> usize {
    // 100 MB in bytes
    100 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub max_file_size: usize,
    /// Indented, human-readable JSON output.
    pub pretty: bool,
    /// Write through a temp file in the destination directory, then rename.
    pub atomic_write: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            pretty: true,
            atomic_write: true,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Builds a config from an arbitrary variable source, falling back to
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_file_size = match lookup(MAX_FILE_SIZE_VAR) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AppError::ConfigError(format!("{MAX_FILE_SIZE_VAR}={raw:?}: {e}"))
            })?,
            None => defaults.max_file_size,
        };

        let pretty = match lookup(PRETTY_VAR) {
            Some(raw) => parse_flag(PRETTY_VAR, &raw)?,
            None => defaults.pretty,
        };

        let atomic_write = match lookup(ATOMIC_WRITE_VAR) {
            Some(raw) => parse_flag(ATOMIC_WRITE_VAR, &raw)?,
            None => defaults.atomic_write,
        };

        let log_filter = lookup(LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Config {
            max_file_size,
            pretty,
            atomic_write,
            log_filter,
        })
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::ConfigError(format!(
            "{name}={raw:?}: expected a boolean"
        ))),
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

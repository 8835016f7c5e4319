use anyhow::{bail, Context, Result};

use crate::layout::{HeightFallback, PolicyDefaults};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub min_font_size: f32,
    pub truncate_overflow: bool,
    pub height_fallback: HeightFallback,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            min_font_size: env_or("FIT_MIN_FONT_SIZE", "4")
                .parse::<f32>()
                .context("FIT_MIN_FONT_SIZE must be a number")?,
            truncate_overflow: env_or("FIT_TRUNCATE_OVERFLOW", "false")
                .parse::<bool>()
                .context("FIT_TRUNCATE_OVERFLOW must be true or false")?,
            height_fallback: parse_height_fallback(&env_or("FIT_HEIGHT_FALLBACK", "minimum"))?,
        })
    }

    /// Policy defaults every request starts from.
    pub fn policy_defaults(&self) -> PolicyDefaults {
        PolicyDefaults {
            min_font_size: self.min_font_size,
            truncate_overflow: self.truncate_overflow,
            height_fallback: self.height_fallback,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_height_fallback(value: &str) -> Result<HeightFallback> {
    match value.trim().to_ascii_lowercase().as_str() {
        "minimum" | "min" => Ok(HeightFallback::Minimum),
        "binary_search" | "binary-search" => Ok(HeightFallback::binary_search()),
        other => bail!("FIT_HEIGHT_FALLBACK must be 'minimum' or 'binary_search', got '{other}'"),
    }
}

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::analysis::aggregate::ScoreWeights;
use crate::llm_client::RetryPolicy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
/// Read once at startup; there is no runtime reload.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub debug: bool,
    pub log_level: String,
    pub max_upload_bytes: usize,
    pub llm_timeout: Duration,
    pub retry: RetryPolicy,
    pub weights: ScoreWeights,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic_api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("ANTHROPIC_API_KEY"))?;

        let debug = parse_or(&lookup, "DEBUG", false)?;
        let log_level = lookup("LOG_LEVEL")
            .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string());

        let max_attempts: u32 = parse_or(&lookup, "LLM_MAX_ATTEMPTS", 3)?;
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "LLM_MAX_ATTEMPTS",
                reason: "must be at least 1".to_string(),
            });
        }

        let llm_timeout_secs: u64 = parse_or(&lookup, "LLM_TIMEOUT_SECS", 60)?;
        if llm_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "LLM_TIMEOUT_SECS",
                reason: "must be at least 1".to_string(),
            });
        }

        let weights = ScoreWeights {
            keyword: parse_or(&lookup, "SCORE_KEYWORD_WEIGHT", 0.4)?,
            ai: parse_or(&lookup, "SCORE_AI_WEIGHT", 0.6)?,
            ats_ai_share: parse_or(&lookup, "ATS_AI_SHARE", 0.8)?,
        };
        weights.validate().map_err(|reason| ConfigError::Invalid {
            key: "SCORE_*",
            reason,
        })?;

        Ok(Config {
            anthropic_api_key,
            port: parse_or(&lookup, "PORT", 8080)?,
            debug,
            log_level,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            retry: RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(parse_or(&lookup, "LLM_BACKOFF_MS", 1000)?),
            },
            weights,
            session_ttl: Duration::from_secs(parse_or(&lookup, "SESSION_TTL_SECS", 3600)?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}

use crate::error::AppError;
use std::env;

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default bound on a single provider call, in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub application: ApplicationConfig,
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    pub models: ModelConfig,
}

#[derive(Debug, Clone)]
pub struct ApplicationConfig {
    pub host: String,
    /// Port to bind; 0 asks the OS for a random port (used by tests).
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: String,
    /// Overridable so tests can point the provider at a local mock server.
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub text_model: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `GOOGLE_API_KEY` has no default: without a provider credential the
    /// service cannot serve any request, so startup fails instead.
    pub fn load() -> Result<Self, AppError> {
        Ok(AppConfig {
            application: ApplicationConfig {
                host: get_env("APP_HOST", Some("0.0.0.0"))?,
                port: get_env("APP_PORT", Some("8000"))?
                    .parse()
                    .map_err(|e| {
                        AppError::ConfigError(anyhow::anyhow!("APP_PORT is not a valid port: {}", e))
                    })?,
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", Some("sqlite://bias_analysis.db"))?,
            },
            google: GoogleConfig {
                api_key: get_env("GOOGLE_API_KEY", None)?,
                base_url: get_env("GEMINI_API_BASE", Some(GEMINI_API_BASE))?,
                request_timeout_secs: get_env(
                    "GENAI_REQUEST_TIMEOUT_SECS",
                    Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
                )?
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
            models: ModelConfig {
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-2.0-flash"))?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

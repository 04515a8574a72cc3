//! Text generation provider abstraction.
//!
//! The service delegates all bias detection to an external generative model;
//! this module defines the seam between handlers and that model.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for text generation providers (e.g. Gemini).
///
/// One provider call per invocation; no retry or backoff. Any provider-side
/// failure propagates to the caller with the provider's message attached.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text from a system instruction plus the caller's text.
    async fn generate(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

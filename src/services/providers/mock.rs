//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock text provider that replays scripted responses in order.
///
/// `/analyse` makes two provider calls per request (findings, then summary),
/// so the mock holds a queue rather than a single canned answer. When the
/// queue is empty it echoes the prompt back.
#[derive(Default)]
pub struct MockTextProvider {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
}

impl MockTextProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push_back(Ok(text.into()));
    }

    pub fn push_error(&self, err: ProviderError) {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .push_back(Err(err));
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        _system_instruction: &str,
        user_text: &str,
    ) -> Result<String, ProviderError> {
        self.responses
            .lock()
            .expect("mock response queue poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(format!("Mock response for: {}", user_text)))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

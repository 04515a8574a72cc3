//! Request/response shapes for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BiasAnalysis, BiasFinding};

/// Body for `/preview`, `/analyse` and `/generate-questions`.
///
/// `text` must be present; an empty string is accepted (the provider may
/// still reject it).
#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    pub text: String,
}

/// Response for `/preview`: the model's suggested improvement, verbatim.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub text: String,
}

/// Response for `/analyse` and each element of `/history`.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: String,
    pub text: String,
    pub results: Vec<BiasFinding>,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

impl From<BiasAnalysis> for AnalysisResponse {
    fn from(record: BiasAnalysis) -> Self {
        Self {
            id: record.id,
            text: record.text,
            results: record.results.0,
            summary: record.summary,
            timestamp: record.timestamp,
        }
    }
}

/// A clarifying question with tappable answer options.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    pub question: String,
    pub options: Vec<String>,
}

/// Response for `/generate-questions`.
#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<ClarifyingQuestion>,
}

/// Message response for the root endpoint.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

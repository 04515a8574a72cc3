//! HTTP handlers for the bias analysis service.
//!
//! Each handler is a thin sequential pipeline: validate the request shape,
//! call the text provider, strictly parse what comes back, persist if the
//! endpoint persists, and shape the response.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{
    AnalysisResponse, ClarifyingQuestion, MessageResponse, PreviewResponse, QuestionsResponse,
    ScenarioRequest,
};
use crate::error::AppError;
use crate::models::{BiasFinding, NewAnalysis};
use crate::services::providers::TextProvider;
use crate::startup::AppState;

const PREVIEW_SYSTEM_PROMPT: &str = "You are an AI assistant that helps users improve their \
scenario descriptions for bias analysis. Provide constructive feedback on how to make the \
scenario more detailed and clear for better bias analysis. Suggest specific elements that \
could be added to provide more context.";

const ANALYSE_SYSTEM_PROMPT: &str = "You are an expert in cognitive biases and psychology. \
Analyze the given scenario and identify cognitive biases present. For each bias, provide a \
percentage indicating how strongly the bias is present (0-100%). Only use these bias types: \
confirmation, anchoring, availability, survivorship, bandwagon, dunning_kruger, negativity, \
sunk_cost. Ensure the percentages sum to 100%. Return the result as JSON with a 'biases' \
array containing objects with 'id' and 'percentage'. Respond with raw JSON only, without \
markdown fences or prose.";

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert in cognitive biases and psychology. \
Create a concise summary analysis of the cognitive biases identified in the scenario. \
Explain how these biases interact and their potential impact on decision-making.";

const QUESTIONS_SYSTEM_PROMPT: &str = "You are an expert in cognitive biases and psychology. \
A user has provided their initial thought or doubt. Generate between 6 and 10 clarifying \
questions to gather more context for a cognitive bias analysis. The questions should be \
simple, direct, and easy to answer on a mobile device. For each question, provide 3 to 5 \
short, tappable, multiple-choice options. Return the result as JSON with a 'questions' \
array containing objects with 'question' and 'options'. Respond with raw JSON only, without \
markdown fences or prose.";

/// Tolerance when checking that finding percentages sum to 100.
const PERCENTAGE_SUM_TOLERANCE: f64 = 0.01;

/// Liveness/identity check.
///
/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Bias Analysis API".to_string(),
    })
}

/// Health check endpoint for liveness probes.
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "bias-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "bias-service",
                "error": e.to_string()
            })),
        ),
    }
}

/// Readiness check: the service can serve only when both the store and the
/// provider credential respond.
///
/// GET /ready
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    if state.db.health_check().await.is_err() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    match state.text_provider.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Suggest improvements to a scenario before analysis. Persists nothing.
///
/// POST /preview
pub async fn preview(
    State(state): State<AppState>,
    Json(req): Json<ScenarioRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let text = state
        .text_provider
        .generate(PREVIEW_SYSTEM_PROMPT, &req.text)
        .await?;

    Ok(Json(PreviewResponse { text }))
}

/// Generate clarifying questions for a scenario. Persists nothing.
///
/// POST /generate-questions
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(req): Json<ScenarioRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let raw = state
        .text_provider
        .generate(QUESTIONS_SYSTEM_PROMPT, &req.text)
        .await?;

    let questions = parse_questions_response(&raw)?;

    Ok(Json(QuestionsResponse { questions }))
}

/// Analyse a scenario for cognitive biases and persist the result.
///
/// POST /analyse
pub async fn analyse(
    State(state): State<AppState>,
    Json(req): Json<ScenarioRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let raw_findings = state
        .text_provider
        .generate(ANALYSE_SYSTEM_PROMPT, &req.text)
        .await?;

    let findings = parse_bias_response(&raw_findings)?;

    let summary_input = format!(
        "Scenario: {}\n\nIdentified biases: {}",
        req.text, raw_findings
    );
    let summary = state
        .text_provider
        .generate(SUMMARY_SYSTEM_PROMPT, &summary_input)
        .await?;

    let input = NewAnalysis {
        id: Uuid::new_v4().to_string(),
        text: req.text,
        results: findings,
        summary,
    };

    let record = state.db.insert_analysis(&input).await?;

    Ok(Json(AnalysisResponse::from(record)))
}

/// List all past analyses, newest first.
///
/// GET /history
pub async fn history(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisResponse>>, AppError> {
    let records = state.db.list_analyses().await?;

    Ok(Json(
        records.into_iter().map(AnalysisResponse::from).collect(),
    ))
}

// ============================================================================
// Model output parsing
// ============================================================================

/// Shape the model is instructed to return for bias analysis.
#[derive(Debug, Deserialize)]
struct BiasModelOutput {
    biases: Vec<BiasFinding>,
}

/// Shape the model is instructed to return for clarifying questions.
#[derive(Debug, Deserialize)]
struct QuestionsModelOutput {
    questions: Vec<ClarifyingQuestion>,
}

/// Strictly parse and validate the model's bias analysis output.
///
/// The model is told to return `{"biases": [{"id", "percentage"}]}` with ids
/// drawn from the fixed category set. Anything else is rejected outright;
/// malformed output is never repaired or partially accepted.
fn parse_bias_response(raw: &str) -> Result<Vec<BiasFinding>, AppError> {
    let output: BiasModelOutput = serde_json::from_str(raw).map_err(|e| {
        AppError::UnparseableModelOutput(format!("expected JSON with a 'biases' array: {}", e))
    })?;

    let mut seen = HashSet::new();
    for finding in &output.biases {
        if let Err(e) = finding.validate() {
            return Err(AppError::UnparseableModelOutput(format!(
                "invalid finding for '{}': {}",
                finding.id, e
            )));
        }
        if !seen.insert(finding.id) {
            return Err(AppError::UnparseableModelOutput(format!(
                "duplicate bias category '{}'",
                finding.id
            )));
        }
    }

    // The sum-to-100 invariant is only ever requested via the prompt. Deviation
    // is logged rather than rejected, matching what callers already tolerate.
    let sum: f64 = output.biases.iter().map(|f| f.percentage).sum();
    if !output.biases.is_empty() && (sum - 100.0).abs() > PERCENTAGE_SUM_TOLERANCE {
        tracing::warn!(sum, "Bias percentages do not sum to 100");
    }

    Ok(output.biases)
}

/// Strictly parse and validate the model's clarifying questions output.
fn parse_questions_response(raw: &str) -> Result<Vec<ClarifyingQuestion>, AppError> {
    let output: QuestionsModelOutput = serde_json::from_str(raw).map_err(|e| {
        AppError::UnparseableModelOutput(format!("expected JSON with a 'questions' array: {}", e))
    })?;

    if !(6..=10).contains(&output.questions.len()) {
        return Err(AppError::UnparseableModelOutput(format!(
            "expected between 6 and 10 questions, got {}",
            output.questions.len()
        )));
    }

    for question in &output.questions {
        if question.question.is_empty() {
            return Err(AppError::UnparseableModelOutput(
                "empty question text".to_string(),
            ));
        }
        if question.options.is_empty() {
            return Err(AppError::UnparseableModelOutput(format!(
                "question '{}' has no options",
                question.question
            )));
        }
    }

    Ok(output.questions)
}

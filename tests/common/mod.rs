//! Test helpers for bias-service integration tests.
//!
//! Each test spawns the real application on a random port, backed by a
//! SQLite file in a temp directory and a wiremock server standing in for
//! the Gemini API.

#![allow(dead_code)]

use bias_service::config::{
    AppConfig, ApplicationConfig, DatabaseConfig, GoogleConfig, ModelConfig,
};
use bias_service::startup::Application;
use tempfile::TempDir;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub mock_server: MockServer,
    _data_dir: TempDir,
}

impl TestApp {
    /// Spawn the application with a fresh database and a mock Gemini API.
    pub async fn spawn() -> Self {
        let mock_server = MockServer::start().await;
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = data_dir.path().join("bias_analysis.db");

        let config = AppConfig {
            application: ApplicationConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: format!("sqlite://{}", db_path.display()),
            },
            google: GoogleConfig {
                api_key: "test-api-key".to_string(),
                base_url: mock_server.uri(),
                request_timeout_secs: 5,
            },
            models: ModelConfig {
                text_model: "gemini-2.0-flash".to_string(),
            },
        };

        // The provider's readiness probe lists models; keep it answered.
        Mock::given(method("GET"))
            .and(path_regex(r"^/models$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": []
            })))
            .mount(&mock_server)
            .await;

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let port = app.port();

        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        Self {
            address: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            mock_server,
            _data_dir: data_dir,
        }
    }

    /// Mount a one-shot Gemini response whose candidate text is `text`.
    ///
    /// Mocks are consumed in mount order, so mounting the bias JSON first and
    /// the summary second scripts the two calls `/analyse` makes.
    pub async fn mock_generation(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/.+:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(text)))
            .up_to_n_times(1)
            .mount(&self.mock_server)
            .await;
    }

    /// Mount a one-shot Gemini error with the given status code.
    pub async fn mock_generation_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/.+:generateContent$"))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(1)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn post_scenario(&self, route: &str, text: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, route))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, route: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, route))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Fetch `/history` and parse it as a JSON array.
    pub async fn history(&self) -> Vec<serde_json::Value> {
        let response = self.get("/history").await;
        assert!(response.status().is_success());
        response.json().await.expect("Failed to parse history JSON")
    }
}

/// A well-formed Gemini `generateContent` response wrapping `text`.
pub fn gemini_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 10,
            "candidatesTokenCount": 20
        }
    })
}

/// Bias findings JSON the mock model returns for the happy path.
pub fn confirmation_findings() -> String {
    serde_json::json!({
        "biases": [
            { "id": "confirmation", "percentage": 70.0 },
            { "id": "negativity", "percentage": 30.0 }
        ]
    })
    .to_string()
}

/// A scripted questions payload with `count` questions.
pub fn questions_payload(count: usize) -> String {
    let questions: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "question": format!("Clarifying question {}?", i),
                "options": ["Yes", "No", "Not sure"]
            })
        })
        .collect();
    serde_json::json!({ "questions": questions }).to_string()
}

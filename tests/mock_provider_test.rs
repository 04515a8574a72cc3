//! Handler behavior tests using the scripted mock provider instead of a
//! wiremock-backed Gemini API.

use bias_service::config::{
    AppConfig, ApplicationConfig, DatabaseConfig, GEMINI_API_BASE, GoogleConfig, ModelConfig,
};
use bias_service::services::providers::ProviderError;
use bias_service::services::providers::mock::MockTextProvider;
use bias_service::startup::Application;
use std::sync::Arc;
use tempfile::TempDir;

struct MockApp {
    address: String,
    client: reqwest::Client,
    provider: Arc<MockTextProvider>,
    _data_dir: TempDir,
}

async fn spawn_with_mock() -> MockApp {
    let provider = Arc::new(MockTextProvider::new());
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
            base_url: GEMINI_API_BASE.to_string(),
            request_timeout_secs: 5,
        },
        models: ModelConfig {
            text_model: "gemini-2.0-flash".to_string(),
        },
    };

    let app = Application::with_provider(config, provider.clone())
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    MockApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        provider,
        _data_dir: data_dir,
    }
}

impl MockApp {
    async fn post_scenario(&self, route: &str, text: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, route))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .expect("Failed to send request")
    }
}

#[tokio::test]
async fn preview_echoes_unscripted_mock() {
    let app = spawn_with_mock().await;

    let response = app.post_scenario("/preview", "my scenario").await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["text"], "Mock response for: my scenario");
}

#[tokio::test]
async fn content_filtered_error_surfaces_as_detail() {
    let app = spawn_with_mock().await;
    app.provider.push_error(ProviderError::ContentFiltered);

    let response = app.post_scenario("/preview", "my scenario").await;
    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Content filtered"));
}

#[tokio::test]
async fn analyse_uses_scripted_responses_in_order() {
    let app = spawn_with_mock().await;
    app.provider.push_response(
        r#"{"biases":[{"id":"sunk_cost","percentage":80.0},{"id":"anchoring","percentage":20.0}]}"#,
    );
    app.provider
        .push_response("The sunk cost fallacy dominates this decision.");

    let response = app
        .post_scenario("/analyse", "I kept paying because I had already paid so much.")
        .await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["results"][0]["id"], "sunk_cost");
    assert_eq!(
        body["summary"],
        "The sunk cost fallacy dominates this decision."
    );
}

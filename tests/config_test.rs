//! Configuration tests.
//!
//! Kept in their own binary: these tests mutate process environment
//! variables, which would race integration tests sharing the binary.

use bias_service::config::AppConfig;

#[test]
fn startup_requires_google_api_key() {
    std::env::remove_var("GOOGLE_API_KEY");
    let result = AppConfig::load();
    assert!(result.is_err(), "config must fail without a credential");

    std::env::set_var("GOOGLE_API_KEY", "test-api-key");
    let config = AppConfig::load().expect("config should load with credential");
    assert_eq!(config.google.api_key, "test-api-key");
    assert_eq!(config.database.url, "sqlite://bias_analysis.db");
    assert_eq!(config.models.text_model, "gemini-2.0-flash");
    assert_eq!(config.google.request_timeout_secs, 120);

    std::env::remove_var("GOOGLE_API_KEY");
}

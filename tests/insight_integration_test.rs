use httpmock::prelude::*;
use popuviz::adapters::insight::{fallback_insight, GeminiSettings};
use popuviz::domain::ports::{InsightClient, InsightProvider};
use popuviz::{CountryArchetype, FallbackInsightProvider, GeminiInsightClient, PopuvizError};
use serde_json::json;

const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

fn settings(endpoint: String, api_key: Option<&str>) -> GeminiSettings {
    GeminiSettings {
        endpoint,
        model: "test-model".to_string(),
        api_key: api_key.map(str::to_string),
        timeout_seconds: 5,
    }
}

fn candidate_with_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn test_generated_insight_is_returned() {
    let server = MockServer::start_async().await;
    let payload = r#"{"title":"The Graying Nation","content":"Retirees outnumber children.","keyStats":["Median Age: 51","Fertility: 1.3","65+: 31%"]}"#;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .header("x-goog-api-key", "test-key")
                .body_contains("year 2075");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(candidate_with_text(payload));
        })
        .await;

    let client = GeminiInsightClient::new(settings(server.base_url(), Some("test-key"))).unwrap();
    let provider = FallbackInsightProvider::new(client);
    let outcome = provider.fetch_insight(2075, CountryArchetype::Developed).await;

    api_mock.assert_async().await;
    assert!(!outcome.is_fallback());
    let insight = outcome.into_insight();
    assert_eq!(insight.title, "The Graying Nation");
    assert_eq!(insight.key_stats.len(), 3);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(500).body("internal error");
        })
        .await;

    let client = GeminiInsightClient::new(settings(server.base_url(), Some("test-key"))).unwrap();

    let err = client
        .request_insight(2024, CountryArchetype::Developing)
        .await
        .unwrap_err();
    assert!(matches!(err, PopuvizError::InsightProviderError { status: 500, .. }));

    let provider = FallbackInsightProvider::new(client);
    let outcome = provider.fetch_insight(2024, CountryArchetype::Developing).await;
    assert!(outcome.is_fallback());
    assert_eq!(outcome.into_insight(), fallback_insight());
    assert_eq!(api_mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_malformed_text_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200)
                .json_body(candidate_with_text("Sorry, I cannot answer in JSON today."));
        })
        .await;

    let client = GeminiInsightClient::new(settings(server.base_url(), Some("test-key"))).unwrap();
    let provider = FallbackInsightProvider::new(client);
    let outcome = provider.fetch_insight(1990, CountryArchetype::Developing).await;
    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn test_wrong_number_of_stats_falls_back() {
    let server = MockServer::start_async().await;
    let payload = r#"{"title":"Youth Bulge","content":"Many children.","keyStats":["Median Age: 19"]}"#;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(candidate_with_text(payload));
        })
        .await;

    let client = GeminiInsightClient::new(settings(server.base_url(), Some("test-key"))).unwrap();
    let err = client
        .request_insight(1990, CountryArchetype::Developing)
        .await
        .unwrap_err();
    assert!(matches!(err, PopuvizError::InsightResponseError { .. }));
}

#[tokio::test]
async fn test_empty_candidates_fall_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let client = GeminiInsightClient::new(settings(server.base_url(), Some("test-key"))).unwrap();
    let provider = FallbackInsightProvider::new(client);
    assert!(provider
        .fetch_insight(2000, CountryArchetype::Developed)
        .await
        .is_fallback());
}

#[tokio::test]
async fn test_missing_api_key_never_calls_provider() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200);
        })
        .await;

    let client = GeminiInsightClient::new(settings(server.base_url(), None)).unwrap();
    let err = client
        .request_insight(2024, CountryArchetype::Developed)
        .await
        .unwrap_err();
    assert!(matches!(err, PopuvizError::MissingConfigError { .. }));

    let provider = FallbackInsightProvider::new(client);
    assert!(provider
        .fetch_insight(2024, CountryArchetype::Developed)
        .await
        .is_fallback());
    assert_eq!(api_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back() {
    // Port 9 (discard) is not expected to accept HTTP connections.
    let client =
        GeminiInsightClient::new(settings("http://127.0.0.1:9".to_string(), Some("test-key")))
            .unwrap();
    let provider = FallbackInsightProvider::new(client);
    let outcome = provider.fetch_insight(2024, CountryArchetype::Developed).await;
    assert!(outcome.is_fallback());
}

use httpmock::prelude::*;
use popuviz::domain::ports::InsightProvider;
use popuviz::utils::validation::Validate;
use popuviz::{
    CountryArchetype, Explorer, FallbackInsightProvider, GeminiInsightClient, LocalStorage,
    StaticInsightProvider, TomlConfig,
};
use serde_json::json;
use tempfile::TempDir;

fn write_config(temp_dir: &TempDir, endpoint: &str, extra: &str) -> String {
    let output_path = temp_dir.path().join("out");
    let normalized_path = output_path.to_string_lossy().replace('\\', "/");
    let config_content = format!(
        r#"
[explorer]
year = 2100
archetype = "developed"

[insight]
endpoint = "{endpoint}"
model = "test-model"
api_key = "test-key"
timeout_seconds = 5

[output]
path = "{normalized_path}"
formats = ["csv", "json", "svg"]
{extra}
"#
    );

    let config_path = temp_dir.path().join("popuviz.toml");
    std::fs::write(&config_path, config_content).unwrap();
    config_path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_end_to_end_with_generated_insight() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let insight_text = r#"{"title":"An Inverted Pyramid","content":"Few children, many elders.","keyStats":["Median Age: 55","Fertility: 1.2","65+: 35%"]}"#;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/models/test-model:generateContent");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "parts": [{ "text": insight_text }] } }]
            }));
        })
        .await;

    let config_path = write_config(&temp_dir, &server.base_url(), "");
    let config = TomlConfig::from_file(&config_path).unwrap();
    config.validate().unwrap();

    let storage = LocalStorage::new(config.output.path.clone());
    let provider = FallbackInsightProvider::new(GeminiInsightClient::new(config.gemini_settings()).unwrap());
    let explorer = Explorer::new(storage, provider, config.explorer_settings().unwrap());

    let run = explorer
        .run(config.explorer.year, config.explorer.archetype)
        .await
        .unwrap();

    api_mock.assert_async().await;
    assert!(!run.report.insight.is_fallback());
    assert_eq!(run.written.len(), 3);

    let out_dir = temp_dir.path().join("out");
    let csv = std::fs::read_to_string(out_dir.join("pyramid_developed_2100.csv")).unwrap();
    assert_eq!(csv.lines().count(), 22);

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out_dir.join("pyramid_developed_2100.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["insight"]["source"], "generated");
    assert_eq!(json["insight"]["insight"]["title"], "An Inverted Pyramid");
    assert!(json["summary"]["elderly"].as_f64().unwrap() > json["summary"]["youth"].as_f64().unwrap());

    let svg = std::fs::read_to_string(out_dir.join("pyramid_developed_2100.svg")).unwrap();
    assert_eq!(svg.matches("<rect").count(), 42);
}

#[tokio::test]
async fn test_end_to_end_with_api_failure_still_exports() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/models/test-model:generateContent");
            then.status(503);
        })
        .await;

    let config_path = write_config(&temp_dir, &server.base_url(), "");
    let config = TomlConfig::from_file(&config_path).unwrap();

    let storage = LocalStorage::new(config.output.path.clone());
    let provider: Box<dyn InsightProvider> = Box::new(FallbackInsightProvider::new(
        GeminiInsightClient::new(config.gemini_settings()).unwrap(),
    ));
    let explorer = Explorer::new(storage, provider, config.explorer_settings().unwrap());

    let run = explorer.run(2024, CountryArchetype::Developing).await.unwrap();

    api_mock.assert_async().await;
    assert!(run.report.insight.is_fallback());
    assert_eq!(run.report.insight.insight().title, "Demographic Trends");
    assert!(temp_dir
        .path()
        .join("out")
        .join("pyramid_developing_2024.json")
        .exists());
}

#[tokio::test]
async fn test_end_to_end_zip_bundle_offline() {
    let temp_dir = TempDir::new().unwrap();
    let extra = r#"
[output.compression]
enabled = true
filename = "pyramid.zip"
"#;
    let config_path = write_config(&temp_dir, "https://unused.example.com", extra);
    let config = TomlConfig::from_file(&config_path).unwrap();

    let storage = LocalStorage::new(config.output.path.clone());
    let explorer = Explorer::new(storage, StaticInsightProvider, config.explorer_settings().unwrap());
    let run = explorer.run(1950, CountryArchetype::Developed).await.unwrap();

    assert_eq!(run.written.len(), 1);
    let zip_data = std::fs::read(temp_dir.path().join("out").join("pyramid.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 3);

    let file_names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(file_names.contains(&"pyramid_developed_1950.csv".to_string()));
    assert!(file_names.contains(&"pyramid_developed_1950.json".to_string()));
    assert!(file_names.contains(&"pyramid_developed_1950.svg".to_string()));
}

use std::time::Duration;

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};
use zelda::services::{FeedSource, NewsClient, ServiceError, WeatherClient};

// ============================================================================
// Helper Functions
// ============================================================================

fn weather_client(server: &MockServer) -> WeatherClient {
    WeatherClient::new(
        Some("test-key".to_string()),
        server.uri(),
        "Kakariko".to_string(),
        Duration::from_secs(2),
    )
}

fn news_client(server: &MockServer) -> NewsClient {
    NewsClient::new(
        Some("test-key".to_string()),
        server.uri(),
        "us".to_string(),
        Duration::from_secs(2),
    )
}

// ============================================================================
// Weather Tests
// ============================================================================

#[tokio::test]
async fn test_weather_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Kakariko"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"name":"Kakariko","main":{"temp":18.6},"weather":[{"description":"light rain"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let line = weather_client(&mock_server).fetch().await.unwrap();
    assert_eq!(line, "🌤️ Weather: 19°C, Light rain (Kakariko)");
}

#[tokio::test]
async fn test_weather_api_error_keeps_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&mock_server)
        .await;

    let client = weather_client(&mock_server);
    match client.fetch().await {
        Err(ServiceError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    // The dashboard gets the fallback with the reason attached
    let summary = client.summary().await;
    assert!(summary.starts_with("🌤️ Weather: N/A ("));
    assert!(summary.contains("401"));
}

#[tokio::test]
async fn test_weather_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"cod":"200"}"#))
        .mount(&mock_server)
        .await;

    let result = weather_client(&mock_server).fetch().await;
    assert!(matches!(result, Err(ServiceError::Parse(_))));
}

#[tokio::test]
async fn test_weather_network_error() {
    // Nothing listens on port 1
    let client = WeatherClient::new(
        Some("test-key".to_string()),
        "http://127.0.0.1:1".to_string(),
        "Kakariko".to_string(),
        Duration::from_millis(500),
    );
    assert!(matches!(client.fetch().await, Err(ServiceError::Network(_))));
}

#[tokio::test]
async fn test_network_errors_do_not_leak_api_keys() {
    let weather = WeatherClient::new(
        Some("SECRETKEY123".to_string()),
        "http://127.0.0.1:1".to_string(),
        "Kakariko".to_string(),
        Duration::from_millis(500),
    );
    let summary = weather.summary().await;
    assert!(summary.starts_with("🌤️ Weather: N/A ("));
    assert!(!summary.contains("SECRETKEY123"));

    let news = NewsClient::new(
        Some("NEWSKEY456".to_string()),
        "http://127.0.0.1:1".to_string(),
        "us".to_string(),
        Duration::from_millis(500),
    );
    let summary = news.summary().await;
    assert!(summary.starts_with("📰 News: N/A ("));
    assert!(!summary.contains("NEWSKEY456"));
}

// ============================================================================
// News Tests
// ============================================================================

#[tokio::test]
async fn test_news_first_headline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("country", "us"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"ok","articles":[{"title":"  Ganon sighted near the castle "},{"title":"Second story"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = news_client(&mock_server);
    assert_eq!(
        client.fetch().await.unwrap(),
        "📰 News: Ganon sighted near the castle"
    );
    assert_eq!(client.headlines().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_news_skips_untitled_articles() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"articles":[{"title":null},{"title":"   "},{"title":"Zora river floods"}]}"#,
        ))
        .mount(&mock_server)
        .await;

    let line = news_client(&mock_server).fetch().await.unwrap();
    assert_eq!(line, "📰 News: Zora river floods");
}

#[tokio::test]
async fn test_news_without_articles_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"articles":[]}"#))
        .mount(&mock_server)
        .await;

    let client = news_client(&mock_server);
    assert!(matches!(client.fetch().await, Err(ServiceError::Parse(_))));
    assert!(client.summary().await.starts_with("📰 News: N/A"));
}

#[tokio::test]
async fn test_news_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let result = news_client(&mock_server).fetch().await;
    assert!(matches!(result, Err(ServiceError::Api { status: 500, .. })));
}

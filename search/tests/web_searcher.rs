use asione_search::{format_search_results, SearchError, WebSearcher, NO_RESULTS};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn searcher_for(server: &MockServer) -> WebSearcher {
    WebSearcher::new(Some("serp-key".to_string()), "google")
        .with_endpoint(format!("{}/search", server.uri()))
}

#[tokio::test]
async fn search_sends_expected_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "la météo à Paris"))
        .and(query_param("api_key", "serp-key"))
        .and(query_param("engine", "google"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchInformation": {"searchTime": 0.31, "formattedTotalResults": "12"},
            "items": [
                {"title": "Météo Paris", "link": "https://meteo.example/paris", "snippet": "Ensoleillé"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = searcher_for(&server).search("la météo à Paris").await.unwrap();
    assert_eq!(results.items.len(), 1);
    let text = format_search_results(&results);
    assert!(text.contains("1. Météo Paris"));
    assert!(text.contains("[https://meteo.example/paris]"));
}

#[tokio::test]
async fn missing_key_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let searcher =
        WebSearcher::new(None, "google").with_endpoint(format!("{}/search", server.uri()));
    let err = searcher.search("rust").await.unwrap_err();
    assert!(matches!(err, SearchError::MissingApiKey));
    assert!(err.is_config());
}

#[tokio::test]
async fn error_status_is_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = searcher_for(&server).search("rust").await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("429"));
    assert!(text.contains("quota exceeded"));
}

#[tokio::test]
async fn empty_result_set_formats_to_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "customsearch#search"})))
        .mount(&server)
        .await;

    let results = searcher_for(&server).search("zzzz").await.unwrap();
    assert_eq!(format_search_results(&results), NO_RESULTS);
}

//! Integration tests for the Tavily and Gemini clients using wiremock HTTP mocks.

use std::sync::Arc;

use supplyalert_core::OutputMode;
use supplyalert_risk::{
    GeminiClient, GenerationRequest, GenerationSettings, NewsSearch, PipelineConfig, RiskError,
    RiskPipeline, TavilyClient, TextGenerator,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn tavily(base_url: &str) -> TavilyClient {
    TavilyClient::with_base_url("tvly-test", 5, base_url)
        .expect("client construction should not fail")
}

fn gemini(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("google-test", "gemini-1.5-flash", 5, base_url)
        .expect("client construction should not fail")
}

fn gemini_answer(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn text_request(prompt: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: prompt.to_string(),
        settings: GenerationSettings::default(),
        structured: false,
    }
}

#[tokio::test]
async fn tavily_sends_news_parameters_and_parses_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(serde_json::json!({
            "api_key": "tvly-test",
            "query": "maritime shipping risk news Shanghai to Le Havre",
            "topic": "news",
            "days": 30,
            "max_results": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "query": "maritime shipping risk news Shanghai to Le Havre",
            "results": [
                {
                    "title": "Storm in the Gulf of Aden",
                    "url": "https://news.example.com/1",
                    "content": "A storm is delaying container ships.",
                    "published_date": "Mon, 12 Oct 2026 08:00:00 GMT",
                    "score": 0.91
                },
                {
                    "title": "No body",
                    "url": "https://news.example.com/2",
                    "content": "   ",
                    "published_date": "Tue, 13 Oct 2026 08:00:00 GMT"
                },
                {
                    "title": "Undated",
                    "url": "https://news.example.com/3",
                    "content": "Port congestion eases in Rotterdam."
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snippets = tavily(&server.uri())
        .search("maritime shipping risk news Shanghai to Le Havre")
        .await
        .expect("should parse search results");

    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0].published_date, "Mon, 12 Oct 2026 08:00:00 GMT");
    assert_eq!(snippets[0].content, "A storm is delaying container ships.");
    assert_eq!(snippets[1].published_date, "unknown date");
}

#[tokio::test]
async fn tavily_missing_results_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let snippets = tavily(&server.uri()).search("q").await.expect("ok");
    assert!(snippets.is_empty());
}

#[tokio::test]
async fn tavily_error_status_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = tavily(&server.uri()).search("q").await.unwrap_err();
    assert!(matches!(err, RiskError::Upstream { service: "news search", .. }));
}

#[tokio::test]
async fn gemini_sends_prompt_and_generation_config() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "google-test"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": "rate this route" }] }],
            "generationConfig": { "maxOutputTokens": 1000 }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_answer("12|Calm|VERDICT: go")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini(&server.uri())
        .generate(&text_request("rate this route"))
        .await
        .expect("should return text");

    assert_eq!(text, "12|Calm|VERDICT: go");
}

#[tokio::test]
async fn gemini_structured_request_asks_for_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "required": ["score", "explanation", "verdict"] }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(
            r#"{"score": 40, "explanation": "Strikes.", "verdict": "VERDICT: buffer"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest {
        structured: true,
        ..text_request("rate this route")
    };
    let text = gemini(&server.uri())
        .generate(&request)
        .await
        .expect("should return text");

    assert!(text.contains("\"score\": 40"));
}

#[tokio::test]
async fn gemini_server_error_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })))
        .mount(&server)
        .await;

    let err = gemini(&server.uri())
        .generate(&text_request("rate this route"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, RiskError::Upstream { service: "model", ref message } if message.contains("503"))
    );
}

#[tokio::test]
async fn gemini_blocked_answer_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gemini(&server.uri())
        .generate(&text_request("rate this route"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, RiskError::Upstream { service: "model", ref message } if message.contains("SAFETY"))
    );
}

#[tokio::test]
async fn pipeline_runs_against_both_http_clients() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "content": "Severe storm warning for the Suez approach.",
                "published_date": "2026-10-15"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(
            "30|Storm near Suez causing delays|VERDICT: monitor closely",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = RiskPipeline::new(
        Arc::new(tavily(&server.uri())),
        Arc::new(gemini(&server.uri())),
        PipelineConfig::default(),
    );
    let result = pipeline
        .assess("Shanghai", "Le Havre", None)
        .await
        .expect("pipeline succeeds");

    assert_eq!(result.score, 75);
    assert_eq!(
        result.report_text,
        "Storm near Suez causing delays\n\nVERDICT: monitor closely"
    );
}

#[tokio::test]
async fn pipeline_survives_search_outage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(
            r#"{"score": 22, "explanation": "Quiet lanes.", "verdict": "VERDICT: proceed"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = PipelineConfig {
        output_mode: OutputMode::Structured,
        ..PipelineConfig::default()
    };
    let pipeline = RiskPipeline::new(
        Arc::new(tavily(&server.uri())),
        Arc::new(gemini(&server.uri())),
        config,
    );
    let result = pipeline
        .assess("Valencia", "Genoa", Some("ceramic tiles"))
        .await
        .expect("search outage is not fatal");

    assert_eq!(result.score, 22);
    assert_eq!(result.report_text, "Quiet lanes.\n\nVERDICT: proceed");
}

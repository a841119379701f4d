//! Morphology Client Integration Tests
//!
//! Drives `MorphologyClient` against a local wiremock server:
//! - Retry on 429/5xx with exponential backoff
//! - Immediate failure on 403 and other client errors
//! - Envelope and payload parsing errors carry the raw response
//! - No request for an empty word list

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::MorphologyConfig;
use crate::core::language::Language;
use crate::core::morphology::{
    Gender, Mood, MorphologyClient, MorphologyError, Number, Person, Tense,
};

// =============================================================================
// Fixtures
// =============================================================================

const API_PATH: &str = "/v1beta/models/test:generateContent";
const API_KEY: &str = "test-key";
const BACKOFF_MS: u64 = 10;

fn config_for(endpoint: String) -> MorphologyConfig {
    MorphologyConfig {
        endpoint: Some(endpoint),
        api_key: Some(API_KEY.to_string()),
        max_attempts: 3,
        initial_backoff_ms: BACKOFF_MS,
        request_timeout_secs: 5,
    }
}

fn client_for(server: &MockServer) -> MorphologyClient {
    MorphologyClient::new(&config_for(format!("{}{}", server.uri(), API_PATH)))
        .expect("client builds with endpoint and key")
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// Wrap a record array the way the API does.
fn envelope(records: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": records.to_string() }]
            },
            "finishReason": "STOP"
        }]
    })
}

fn casas_records() -> serde_json::Value {
    json!([
        {
            "word": "casas",
            "lemma": "casa",
            "part_of_speech": "noun",
            "features": {
                "gender": "feminine",
                "number": "plural",
                "tense": "indeterminate",
                "person": "indeterminate",
                "mood": "indeterminate"
            }
        }
    ])
}

fn api_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "code": status, "message": message, "status": "ERROR" }
    }))
}

// =============================================================================
// Success Paths
// =============================================================================

#[tokio::test]
async fn test_annotate_sends_key_and_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(casas_records())))
        .expect(1)
        .mount(&server)
        .await;

    let records = client_for(&server)
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .expect("annotation succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].lemma, "casa");
    assert_eq!(records[0].features.gender, Gender::Feminine);
    assert_eq!(records[0].features.number, Number::Plural);
    assert_eq!(records[0].features.tense, Tense::Indeterminate);
}

#[tokio::test]
async fn test_prompt_names_language_and_words() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .annotate(&words(&["λόγος", "λόγου"]), Language::Greek)
        .await
        .expect("annotation succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("greek words: λόγος, λόγου."));
}

#[tokio::test]
async fn test_unknown_and_omitted_features_become_indeterminate() {
    let server = MockServer::start().await;
    let records = json!([
        { "word": "amaba", "lemma": "amar", "part_of_speech": "verb",
          "features": { "tense": "imperfect", "mood": "jussive", "person": "third" } }
    ]);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(records)))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .annotate(&words(&["amaba"]), Language::Spanish)
        .await
        .expect("annotation succeeds");

    let features = &records[0].features;
    assert_eq!(features.tense, Tense::Imperfect);
    assert_eq!(features.person, Person::Third);
    assert_eq!(features.mood, Mood::Indeterminate);
    assert_eq!(features.gender, Gender::Indeterminate);
}

#[tokio::test]
async fn test_null_features_do_not_fail_the_batch() {
    let server = MockServer::start().await;
    let records = json!([
        { "word": "casa", "lemma": "casa", "part_of_speech": "noun",
          "features": { "gender": null, "number": "singular", "tense": null } },
        { "word": "casas", "lemma": "casa", "part_of_speech": "noun", "features": null }
    ]);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(records)))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .annotate(&words(&["casa", "casas"]), Language::Spanish)
        .await
        .expect("null values are tolerated");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].features.gender, Gender::Indeterminate);
    assert_eq!(records[0].features.number, Number::Singular);
    assert_eq!(records[1].features.tense, Tense::Indeterminate);
}

#[tokio::test]
async fn test_zero_timeout_config_still_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(casas_records())))
        .expect(1)
        .mount(&server)
        .await;

    let config = MorphologyConfig {
        request_timeout_secs: 0,
        ..config_for(format!("{}{}", server.uri(), API_PATH))
    };
    let records = MorphologyClient::new(&config)
        .unwrap()
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .expect("timeout is clamped to a usable value");
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_empty_word_list_skips_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let records = client_for(&server)
        .annotate(&[], Language::Spanish)
        .await
        .expect("empty list never fails");
    assert!(records.is_empty());
}

// =============================================================================
// Retry Behavior
// =============================================================================

#[tokio::test]
async fn test_rate_limit_then_success_retries_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(api_error(429, "Resource has been exhausted"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(casas_records())))
        .expect(1)
        .mount(&server)
        .await;

    let started = Instant::now();
    let records = client_for(&server)
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .expect("second attempt succeeds");

    assert_eq!(records.len(), 1);
    assert!(started.elapsed() >= Duration::from_millis(BACKOFF_MS));
}

#[tokio::test]
async fn test_server_errors_exhaust_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(api_error(503, "The model is overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let started = Instant::now();
    let err = client_for(&server)
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .unwrap_err();

    match &err {
        MorphologyError::RetriesExhausted {
            attempts,
            last_status,
            message,
        } => {
            assert_eq!(*attempts, 3);
            assert_eq!(*last_status, Some(503));
            assert_eq!(message, "The model is overloaded");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert!(err.is_transient());
    // 10ms + 20ms of backoff between three attempts, none after the last.
    assert!(started.elapsed() >= Duration::from_millis(3 * BACKOFF_MS));
}

#[tokio::test]
async fn test_forbidden_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(api_error(403, "API key not valid"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .unwrap_err();

    assert!(err.is_credential_error());
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn test_bad_request_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(api_error(400, "Invalid JSON payload"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .unwrap_err();

    assert!(matches!(err, MorphologyError::Api { status: 400, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_is_retried_then_exhausted() {
    let config = config_for(format!("http://127.0.0.1:1{API_PATH}"));
    let client = MorphologyClient::new(&config).unwrap();

    let err = client
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .unwrap_err();

    match err {
        MorphologyError::RetriesExhausted {
            attempts,
            last_status,
            ..
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(last_status, None);
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

// =============================================================================
// Response Format Errors
// =============================================================================

#[tokio::test]
async fn test_missing_candidates_keeps_raw_body() {
    let server = MockServer::start().await;
    let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .unwrap_err();

    assert!(matches!(err, MorphologyError::ResponseFormat { .. }));
    assert!(err.raw_response().unwrap().contains("blockReason"));
}

#[tokio::test]
async fn test_embedded_text_not_an_array() {
    let server = MockServer::start().await;
    let body = json!({
        "candidates": [{ "content": { "parts": [{ "text": "I cannot help with that." }] } }]
    });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .annotate(&words(&["casas"]), Language::Spanish)
        .await
        .unwrap_err();

    assert_eq!(err.raw_response(), Some("I cannot help with that."));
}

#[tokio::test]
async fn test_annotate_map_keys_by_word() {
    let server = MockServer::start().await;
    let records = json!([
        { "word": "casa", "lemma": "casa", "part_of_speech": "noun" },
        { "word": "casas", "lemma": "casa", "part_of_speech": "noun" },
        { "word": "casero", "lemma": "casero", "part_of_speech": "adjective" }
    ]);
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(records)))
        .mount(&server)
        .await;

    let map = client_for(&server)
        .annotate_map(&words(&["casa", "casas"]), Language::Spanish)
        .await
        .unwrap();

    assert_eq!(map.len(), 3);
    assert_eq!(map["casas"].lemma, "casa");
    assert_eq!(map["casero"].part_of_speech, "adjective");
}

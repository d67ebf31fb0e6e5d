use aivan_gemini::types::Role;
use assert_matches::assert_matches;
use futures::TryStreamExt as _;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;

use super::*;

const MODEL: &str = "gemini-2.5-flash";

fn payload() -> RequestPayload {
    RequestPayload {
        parts: vec![
            ContentPart::Text("Use this logo.".to_owned()),
            ContentPart::InlineData {
                mime_type: "image/png".to_owned(),
                data: "iVBORw0K".to_owned(),
            },
        ],
        system_instruction: "You are Aivan.".to_owned(),
    }
}

fn backend(server: &MockServer) -> GeminiBackend {
    GeminiBackend::new(Client::new("test-key").with_base_url(server.url("/v1beta")))
}

#[test]
fn test_create_request() {
    let request = create_request(&payload());

    assert_eq!(request.contents.len(), 1);
    assert_eq!(request.contents[0].role, Some(Role::User));
    assert_eq!(request.contents[0].parts, vec![
        Part::text("Use this logo."),
        Part::inline_data("image/png", "iVBORw0K"),
    ]);
    assert_eq!(
        request.system_instruction,
        Some(Content::text("You are Aivan."))
    );
}

#[test]
fn test_missing_api_key_env() {
    let config = GeminiConfig {
        api_key_env: "AIVAN_TEST_KEY_THAT_IS_NEVER_SET".to_owned(),
        base_url: "http://localhost".to_owned(),
    };

    let error = GeminiBackend::try_from(&config).unwrap_err();
    assert_matches!(error, Error::MissingEnv(name) if name == "AIVAN_TEST_KEY_THAT_IS_NEVER_SET");
}

#[test]
fn test_backend_error_from_api_error() {
    let error = BackendError::from(aivan_gemini::Error::Api {
        code: 429,
        message: "Resource has been exhausted.".to_owned(),
    });

    assert_eq!(
        error,
        BackendError::new(Some(429), "Resource has been exhausted.")
    );
    assert!(error.is_rate_limited());

    let error = BackendError::from(aivan_gemini::Error::Stream("connection reset".to_owned()));
    assert_eq!(error.status, None);
    assert!(!error.is_rate_limited());
}

#[test(tokio::test)]
async fn test_generate_stream_skips_chunks_without_text() {
    let server = MockServer::start_async().await;
    let body = [
        r#"data: {"candidates":[{"content":{"role":"model","parts":[{"text":"<html>"}]}}]}"#,
        "",
        r#"data: {"candidates":[{"content":{"role":"model","parts":[{"text":"thinking","thought":true}]}}]}"#,
        "",
        r#"data: {"candidates":[{"content":{"role":"model","parts":[{"text":"</html>"}]}}]}"#,
        "",
        r#"data: {"candidates":[{"finishReason":"STOP"}]}"#,
        "",
    ]
    .join("\n");

    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/v1beta/models/{MODEL}:streamGenerateContent"));
            then.status(200).body(body);
        })
        .await;

    let fragments = backend(&server)
        .generate_stream(MODEL, &payload())
        .await
        .unwrap()
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    assert_eq!(fragments, vec!["<html>".to_owned(), "</html>".to_owned()]);
}

#[test(tokio::test)]
async fn test_generate_rate_limited() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/v1beta/models/{MODEL}:generateContent"));
            then.status(429).json_body(json!({
                "error": { "code": 429, "message": "Quota exceeded.", "status": "RESOURCE_EXHAUSTED" }
            }));
        })
        .await;

    let error = backend(&server)
        .generate(MODEL, &payload())
        .await
        .unwrap_err();

    assert_eq!(error, BackendError::new(Some(429), "Quota exceeded."));
}

#[test(tokio::test)]
async fn test_generate_empty_response_is_empty_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/v1beta/models/{MODEL}:generateContent"));
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let text = backend(&server).generate(MODEL, &payload()).await.unwrap();
    assert_eq!(text, "");
}

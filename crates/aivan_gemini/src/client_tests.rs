use pretty_assertions::assert_eq;

use super::*;

#[test]
fn url_strips_models_prefix() {
    let client = Client::new("key").with_base_url("http://localhost/v1beta/");

    assert_eq!(
        client.url("models/gemini-2.5-flash", "generateContent"),
        "http://localhost/v1beta/models/gemini-2.5-flash:generateContent"
    );
    assert_eq!(
        client.url("gemini-2.5-flash", "streamGenerateContent"),
        "http://localhost/v1beta/models/gemini-2.5-flash:streamGenerateContent"
    );
}

#[test]
fn parse_chunk_response() {
    let chunk = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi"}]}}]}"#;

    assert_eq!(parse_chunk(chunk).unwrap().text().as_deref(), Some("Hi"));
}

#[test]
fn parse_chunk_error_envelope() {
    let chunk = r#"{"error":{"code":429,"message":"Resource exhausted","status":"RESOURCE_EXHAUSTED"}}"#;

    assert_eq!(parse_chunk(chunk).unwrap_err(), Error::Api {
        code: 429,
        message: "Resource exhausted".to_owned(),
    });
}

#[test]
fn parse_chunk_invalid_json() {
    assert!(matches!(parse_chunk("{nope"), Err(Error::Json(_))));
}

#[test]
fn api_error_prefers_envelope_message() {
    let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;

    assert_eq!(api_error(400, body), Error::Api {
        code: 400,
        message: "API key not valid".to_owned(),
    });
    assert_eq!(api_error(502, "Bad Gateway"), Error::Api {
        code: 502,
        message: "Bad Gateway".to_owned(),
    });
}

#[test]
fn error_status() {
    assert_eq!(
        Error::Api {
            code: 429,
            message: String::new()
        }
        .status(),
        Some(429)
    );
    assert_eq!(Error::Stream("boom".to_owned()).status(), None);
}

#[test]
fn headers_mark_api_key_sensitive() {
    let headers = Client::new("secret").headers().unwrap();

    assert!(headers[API_KEY_HEADER].is_sensitive());
    assert_eq!(headers[CONTENT_TYPE], "application/json");
}

#[test]
fn headers_reject_invalid_api_key() {
    let error = Client::new("bad\nkey").headers().unwrap_err();

    assert!(matches!(error, Error::InvalidApiKey(_)));
    assert_eq!(error.status(), None);
}

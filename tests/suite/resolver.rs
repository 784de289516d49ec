//! Suggestion resolution tests against a mock Gemini endpoint.

use std::net::TcpListener;

use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use askcmd_providers::{SuggestError, SuggestionResolver};
use askcmd_types::ApiKey;

use crate::common::{
    TEST_KEY, command_response, mount_generate, mount_generate_json, mount_generate_status,
    start_gemini_mock,
};

const PRIMARY: &str = "gemini-2.0-flash-exp";
const FALLBACK: &str = "gemini-1.5-flash";

fn resolver_for(server: &MockServer) -> SuggestionResolver {
    SuggestionResolver::with_client(
        reqwest::Client::new(),
        server.uri(),
        Some(ApiKey::new(TEST_KEY)),
    )
}

#[tokio::test]
async fn first_model_success_returns_its_command() {
    let server = start_gemini_mock().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{PRIMARY}:generateContent")))
        .and(query_param("key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(command_response("ls -la")))
        .expect(1)
        .mount(&server)
        .await;
    // The fallback model must never be consulted on success.
    Mock::given(method("POST"))
        .and(path(format!("/models/{FALLBACK}:generateContent")))
        .respond_with(ResponseTemplate::new(200).set_body_json(command_response("wrong")))
        .expect(0)
        .mount(&server)
        .await;

    let command = resolver_for(&server).resolve("list all files").await.unwrap();

    assert_eq!(command, "ls -la");
}

#[tokio::test]
async fn unknown_model_falls_through_to_the_next() {
    let server = start_gemini_mock().await;

    mount_generate_status(&server, PRIMARY, 404, "model not found").await;
    mount_generate(&server, FALLBACK, "git log --oneline").await;

    let command = resolver_for(&server)
        .resolve("show recent commits")
        .await
        .unwrap();

    assert_eq!(command, "git log --oneline");
}

#[tokio::test]
async fn all_models_unknown_reports_no_models_available() {
    let server = start_gemini_mock().await;

    mount_generate_status(&server, PRIMARY, 404, "nope").await;
    mount_generate_status(&server, FALLBACK, 404, "nope").await;

    let err = resolver_for(&server)
        .resolve("anything")
        .await
        .unwrap_err();

    assert!(matches!(err, SuggestError::ModelUnavailable));
    assert_eq!(err.to_string(), "no models available");
}

#[tokio::test]
async fn server_error_on_first_model_still_tries_the_second() {
    let server = start_gemini_mock().await;

    mount_generate_status(&server, PRIMARY, 500, "internal error").await;
    mount_generate(&server, FALLBACK, "du -sh .").await;

    let command = resolver_for(&server)
        .resolve("how big is this directory")
        .await
        .unwrap();

    assert_eq!(command, "du -sh .");
}

#[tokio::test]
async fn last_failure_surfaces_when_every_model_fails() {
    let server = start_gemini_mock().await;

    mount_generate_status(&server, PRIMARY, 500, "first down").await;
    mount_generate_status(&server, FALLBACK, 503, "quota exceeded").await;

    let err = resolver_for(&server)
        .resolve("anything")
        .await
        .unwrap_err();

    match err {
        SuggestError::Transport { model, detail } => {
            assert_eq!(model.as_str(), FALLBACK);
            assert!(detail.contains("503"), "detail: {detail}");
            assert!(detail.contains("quota exceeded"), "detail: {detail}");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

/// A refused connection is recorded like any other non-404 failure, and the
/// surfaced error never carries the credential from the request URL.
#[tokio::test]
async fn connect_failure_surfaces_transport_without_the_credential() {
    // Bind to reserve a free port, then drop the listener so connecting
    // to it is refused.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let resolver = SuggestionResolver::with_client(
        reqwest::Client::new(),
        format!("http://127.0.0.1:{port}"),
        Some(ApiKey::new(TEST_KEY)),
    );

    let err = resolver.resolve("anything").await.unwrap_err();

    let rendered = err.to_string();
    assert!(
        !rendered.contains(TEST_KEY),
        "error leaks the credential: {rendered}"
    );
    match err {
        SuggestError::Transport { model, .. } => assert_eq!(model.as_str(), FALLBACK),
        other => panic!("expected Transport, got {other:?}"),
    }
}

/// A 404 on a later model must not mask an earlier real failure.
#[tokio::test]
async fn not_found_does_not_overwrite_an_earlier_failure() {
    let server = start_gemini_mock().await;

    mount_generate_json(&server, PRIMARY, serde_json::json!("no objects here")).await;
    mount_generate_status(&server, FALLBACK, 404, "gone").await;

    let err = resolver_for(&server)
        .resolve("anything")
        .await
        .unwrap_err();

    match err {
        SuggestError::MalformedResponse { model } => assert_eq!(model.as_str(), PRIMARY),
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_credential_fails_before_any_request() {
    let server = start_gemini_mock().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(command_response("never")))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = SuggestionResolver::with_client(reqwest::Client::new(), server.uri(), None);
    let err = resolver.resolve("anything").await.unwrap_err();

    assert!(matches!(err, SuggestError::MissingCredential));
    assert_eq!(
        err.to_string(),
        "GEMINI_API_KEY environment variable is not set"
    );
}

#[tokio::test]
async fn fenced_reply_is_unwrapped_before_delivery() {
    let server = start_gemini_mock().await;

    mount_generate(&server, PRIMARY, "```bash\nfind . -name '*.rs'\n```").await;

    let command = resolver_for(&server)
        .resolve("find rust files")
        .await
        .unwrap();

    assert_eq!(command, "find . -name '*.rs'");
}

#[tokio::test]
async fn reply_without_candidates_falls_through_to_the_next_model() {
    let server = start_gemini_mock().await;

    mount_generate_json(&server, PRIMARY, serde_json::json!({ "candidates": [] })).await;
    mount_generate(&server, FALLBACK, "uptime").await;

    let command = resolver_for(&server)
        .resolve("how long has this machine been up")
        .await
        .unwrap();

    assert_eq!(command, "uptime");
}

#[tokio::test]
async fn empty_replies_from_every_model_surface_the_last() {
    let server = start_gemini_mock().await;

    mount_generate_json(&server, PRIMARY, serde_json::json!({ "candidates": [] })).await;
    mount_generate_json(&server, FALLBACK, serde_json::json!({ "candidates": [] })).await;

    let err = resolver_for(&server)
        .resolve("anything")
        .await
        .unwrap_err();

    match err {
        SuggestError::EmptyResponse { model } => assert_eq!(model.as_str(), FALLBACK),
        other => panic!("expected EmptyResponse, got {other:?}"),
    }
}

/// The description must reach the wire wrapped in the instruction prompt.
#[tokio::test]
async fn request_body_carries_the_description_inside_the_prompt() {
    let server = start_gemini_mock().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{PRIMARY}:generateContent")))
        .and(query_param("key", TEST_KEY))
        .and(body_string_contains("list open network ports"))
        .and(body_string_contains("Provide ONLY the command"))
        .respond_with(ResponseTemplate::new(200).set_body_json(command_response("ss -tlnp")))
        .expect(1)
        .mount(&server)
        .await;

    let command = resolver_for(&server)
        .resolve("list open network ports")
        .await
        .unwrap();

    assert_eq!(command, "ss -tlnp");
}

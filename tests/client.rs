//! End-to-end tests for `ChatClient` against a local mock HTTP server.

use httpmock::prelude::*;
use std::sync::{Arc, Mutex};

use chatstream::{ChatClient, ChatMessage, ClientConfig, Error, MalformedKind, DEFAULT_MODEL};

fn client_for(server: &MockServer) -> ChatClient {
    ChatClient::new(ClientConfig::new("test-key").with_base_url(server.base_url()))
}

#[tokio::test]
async fn streaming_scenario_hello() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-key")
            .json_body_partial(r#"{"stream": true}"#);
        then.status(200)
            .header("content-type", "text/event-stream")
            .body(concat!(
                "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
                "data: [DONE]\n\n",
            ));
    });

    let calls: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_calls = Arc::clone(&calls);

    let completion = client_for(&server)
        .complete_stream_with(vec![ChatMessage::user("hi")], move |delta, acc| {
            sink_calls
                .lock()
                .unwrap()
                .push((delta.to_string(), acc.to_string()));
        })
        .await
        .unwrap();

    assert_eq!(completion.content, "Hello");
    assert_eq!(serde_json::to_value(&completion.usage).unwrap(), serde_json::json!({}));
    assert_eq!(completion.model, DEFAULT_MODEL);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            ("Hel".to_string(), "Hel".to_string()),
            ("lo".to_string(), "Hello".to_string()),
        ]
    );
    mock.assert();
}

#[tokio::test]
async fn streaming_tolerates_garbage_frame_and_tracks_usage() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .header("content-type", "text/event-stream")
            .body(concat!(
                "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n",
                "data: {garbage not json\n\n",
                ": keep-alive comment\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}],\"usage\":{\"total_tokens\":7}}\n\n",
                "data: [DONE]\n\n",
            ));
    });

    let completion = client_for(&server)
        .complete_stream(vec![ChatMessage::user("hi")])
        .await
        .unwrap();

    assert_eq!(completion.content, "ab");
    assert_eq!(completion.usage.total_tokens, Some(7));
}

#[tokio::test]
async fn auth_failure_is_classified_with_remediation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401)
            .json_body(serde_json::json!({"error": {"message": "invalid key"}}));
    });

    let err = client_for(&server)
        .complete_stream(vec![ChatMessage::user("hi")])
        .await
        .unwrap_err();

    assert_eq!(err.code(), "AUTH");
    assert!(err.solution().contains("API key"));
    let details = err.details();
    assert_eq!(details.status, Some(401));
    assert!(details.body.unwrap().contains("invalid key"));
}

#[tokio::test]
async fn rate_limit_and_server_fault_classification() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).body("Too Many Requests");
    });
    let err = client_for(&server)
        .complete(vec![ChatMessage::user("hi")])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "RATE_LIMIT");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(503).body("upstream overloaded");
    });
    let err = client_for(&server)
        .complete(vec![ChatMessage::user("hi")])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "SERVER_FAULT");
}

#[tokio::test]
async fn network_failure_is_classified() {
    // Nothing listens on this port.
    let client = ChatClient::new(
        ClientConfig::new("test-key").with_base_url("http://127.0.0.1:9".to_string()),
    );
    let err = client
        .complete(vec![ChatMessage::user("hi")])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NETWORK");
    assert_eq!(err.details().location, "transport");
}

#[tokio::test]
async fn non_streaming_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .json_body_partial(r#"{"messages": [{"role": "user", "content": "hi"}]}"#);
        then.status(200).json_body(serde_json::json!({
            "choices": [{"message": {"content": "Hello there"}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8},
            "model": "gpt-4o"
        }));
    });

    let completion = client_for(&server)
        .complete(vec![ChatMessage::user("hi")])
        .await
        .unwrap();

    assert_eq!(completion.content, "Hello there");
    assert_eq!(completion.usage.total_tokens, Some(8));
    assert_eq!(completion.model, "gpt-4o");
    mock.assert();
}

#[tokio::test]
async fn empty_choices_on_success_status_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(serde_json::json!({"choices": []}));
    });

    let err = client_for(&server)
        .complete(vec![ChatMessage::user("hi")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::MalformedResponse(MalformedKind::NoChoices)
    ));
    assert_eq!(err.code(), "MALFORMED_RESPONSE");
}

#[tokio::test]
async fn missing_content_on_success_status_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(serde_json::json!({"choices": [{"message": {"role": "assistant"}}]}));
    });

    let err = client_for(&server)
        .complete(vec![ChatMessage::user("hi")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::MalformedResponse(MalformedKind::NoContent)
    ));
}

#[tokio::test]
async fn retry_policy_retries_server_fault_until_exhausted() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("boom");
    });

    let policy = chatstream::RetryPolicy {
        max_attempts: 2,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(2),
    };
    let client = client_for(&server);
    let err = policy
        .run(|| client.complete(vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "SERVER_FAULT");
    // Both attempts hit the endpoint before the policy gave up.
    assert_eq!(mock.hits(), 2);
}

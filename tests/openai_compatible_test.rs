//! OpenAI-compatible adapter against a mock HTTP server
#![cfg(feature = "openai")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chatguard::prelude::*;
use chatguard::providers::openai_compatible::{HttpFailure, create_chat_model};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_test::traced_test;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ModelConfig {
    ModelConfig::new("sk-test", "gpt-test").with_base_url(format!("{}/v1", server.uri()))
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "gpt-test",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn fast_retries() -> RetryPolicy {
    RetryPolicy::new()
        .with_max_attempts(2)
        .with_base_delay(Duration::from_millis(5))
}

#[tokio::test]
async fn generate_posts_the_conversation_and_parses_the_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "stream": false,
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi there!")))
        .expect(1)
        .mount(&server)
        .await;

    let model = create_chat_model(&config_for(&server)).await.unwrap();
    let reply = generate(&model, &[ChatMessage::user("hello")]).await.unwrap();

    assert_eq!(reply, ChatMessage::assistant("Hi there!"));
}

#[tokio::test]
async fn stream_decodes_sse_until_done() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"\"}}]}\n\n",
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let model = create_chat_model(&config_for(&server)).await.unwrap();
    let reader = stream(&model, &create_messages_from_template()).await.unwrap();

    let mut out = Vec::new();
    report_stream(reader, &mut out, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(out, b"Hello");
}

#[tokio::test]
async fn server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"message": "upstream overloaded", "type": "server_error"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let model = create_chat_model(&config_for(&server)).await.unwrap();
    let err = generate_with_retry(
        &model,
        &[ChatMessage::user("hello")],
        &fast_retries(),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.attempts(), Some(2));
    let failure = err.find_source::<HttpFailure>().expect("http failure in chain");
    assert_eq!(failure.status(), Some(500));
    assert!(failure.to_string().contains("upstream overloaded"));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let model = create_chat_model(&config_for(&server)).await.unwrap();
    let err = generate_with_retry(
        &model,
        &[ChatMessage::user("hello")],
        &fast_retries(),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.attempts(), Some(1));
    let failure = err.find_source::<HttpFailure>().expect("http failure in chain");
    assert_eq!(failure.status(), Some(401));
    assert!(!is_retryable(failure));
}

#[tokio::test]
async fn dropped_connections_are_retried() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    {
        let accepted = accepted.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                accepted.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });
    }

    let config = ModelConfig::new("sk-test", "gpt-test").with_base_url(format!("http://{addr}/v1"));
    let model = create_chat_model(&config).await.unwrap();
    let policy = RetryPolicy::new()
        .with_max_attempts(3)
        .with_base_delay(Duration::from_millis(5));

    let err = generate_with_retry(
        &model,
        &[ChatMessage::user("hello")],
        &policy,
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.attempts(), Some(3));
    assert!(accepted.load(Ordering::SeqCst) >= 3);
    let failure = err.find_source::<HttpFailure>().expect("http failure in chain");
    assert!(matches!(failure, HttpFailure::Transport(_)));
    assert!(is_retryable(failure));
}

#[tokio::test]
#[traced_test]
async fn truncated_error_body_keeps_the_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !request.ends_with(b"}") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .unwrap();
    });

    let config = ModelConfig::new("sk-test", "gpt-test").with_base_url(format!("http://{addr}/v1"));
    let model = create_chat_model(&config).await.unwrap();
    let err = generate(&model, &[ChatMessage::user("hello")]).await.unwrap_err();

    assert_eq!(err.inner().status(), Some(503));
    assert!(logs_contain("failed to read error body"));
}

#[tokio::test]
async fn reply_without_choices_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let model = create_chat_model(&config_for(&server)).await.unwrap();
    let err = generate(&model, &[ChatMessage::user("hello")]).await.unwrap_err();

    assert!(matches!(err.inner(), HttpFailure::Parse(_)));
}

#[tokio::test]
async fn invalid_base_url_is_rejected_before_connecting() {
    let config = ModelConfig::new("sk-test", "gpt-test").with_base_url("ftp://example.com");

    let err = create_chat_model(&config).await.unwrap_err();

    assert!(err.is_config());
    assert!(err.to_string().contains("OPENAI_BASE_URL"));
}

//! Wiremock integration tests for ChatCompletionClient.

use eldhrimnir::EldhrimnirError;
use eldhrimnir::providers::ChatCompletionClient;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test_key"))
        .and(body_partial_json(serde_json::json!({
            "model": "deepseek-chat",
            "stream": false,
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi there")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("test_key", mock_server.uri()).unwrap();
    let text = client.complete("hello").await.expect("complete should succeed");
    assert_eq!(text, "Hi there");
}

#[tokio::test]
async fn test_custom_model_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"model": "deepseek-reasoner"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("k", mock_server.uri())
        .unwrap()
        .model("deepseek-reasoner");
    assert_eq!(client.complete("x").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_no_choices_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("k", mock_server.uri()).unwrap();
    let err = client.complete("x").await.unwrap_err();
    assert!(matches!(err, EldhrimnirError::EmptyResponse));
}

#[tokio::test]
async fn test_blank_content_is_empty_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  \n")))
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("k", mock_server.uri()).unwrap();
    let err = client.complete("x").await.unwrap_err();
    assert!(matches!(err, EldhrimnirError::EmptyResponse));
}

#[tokio::test]
async fn test_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("bad", mock_server.uri()).unwrap();
    let err = client.complete("x").await.unwrap_err();
    assert!(matches!(err, EldhrimnirError::AuthenticationFailed));
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("k", mock_server.uri()).unwrap();
    match client.complete("x").await.unwrap_err() {
        EldhrimnirError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(std::time::Duration::from_secs(7)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("k", mock_server.uri()).unwrap();
    match client.complete("x").await.unwrap_err() {
        EldhrimnirError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = ChatCompletionClient::with_base_url("k", mock_server.uri()).unwrap();
    let err = client.complete("x").await.unwrap_err();
    assert!(err.is_upstream());
}

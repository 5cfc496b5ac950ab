use std::time::Duration;

use serde_json::{json, Value};
use transcript_digest::{
    analyze, AnthropicClient, AnthropicConfig, DigestError, DigestOutcome, ErrorKind,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, api_key: Option<&str>) -> AnthropicClient {
    AnthropicClient::new(AnthropicConfig {
        api_key: api_key.map(str::to_string),
        endpoint: format!("{}/v1/messages", server.uri()),
        timeout: Duration::from_secs(2),
        ..Default::default()
    })
}

fn message_payload(text: &str) -> Value {
    json!({
        "id": "msg_01XFDUDYJgAACzvnptvVoYEL",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-haiku-20240307",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 812, "output_tokens": 240}
    })
}

#[tokio::test]
async fn test_analyze_sends_expected_request_and_ranks_reply() {
    let server = MockServer::start().await;
    let reply = "Here is the digest:\n```json\n{\n  \"insights\": [\n    {\"description\": \"Focus on one vertical\", \"confidence_score\": 6},\n    {\"description\": \"Raise prices\", \"confidence_score\": 9}\n  ],\n  \"quotes\": [\n    {\"timestamp\": \"04:10\", \"quote\": \"Nobody buys a platform\", \"relevance_score\": 4},\n    {\"timestamp\": \"21:45\", \"quote\": \"Charge from day one\", \"relevance_score\": 8}\n  ]\n}\n```";

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "model": "claude-3-haiku-20240307",
            "max_tokens": 4096,
            "temperature": 0.3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_payload(reply)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let outcome = analyze(&client, "SME: raise your prices.").await.unwrap();

    let result = match outcome {
        DigestOutcome::Digest(result) => result,
        DigestOutcome::Failed(error) => panic!("unexpected failure: {:?}", error),
    };
    let insights: Vec<String> = result.insights().into_iter().map(|i| i.description).collect();
    assert_eq!(insights, vec!["Raise prices", "Focus on one vertical"]);
    let timestamps: Vec<String> = result.quotes().into_iter().map(|q| q.timestamp).collect();
    assert_eq!(timestamps, vec!["21:45", "04:10"]);
}

#[tokio::test]
async fn test_prompt_carries_transcript_as_single_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_payload("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    analyze(&client, "FOUNDER: hi\nSME: hello").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert!(messages[0]["content"]
        .as_str()
        .unwrap()
        .contains("\"\"\"\nFOUNDER: hi\nSME: hello\n\"\"\""));
}

#[tokio::test]
async fn test_missing_credential_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_payload("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    match analyze(&client, "transcript").await.unwrap() {
        DigestOutcome::Failed(error) => assert_eq!(error.kind, ErrorKind::ConfigError),
        DigestOutcome::Digest(_) => panic!("expected a config error"),
    }
}

#[tokio::test]
async fn test_provider_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_string(body))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    match analyze(&client, "transcript").await.unwrap() {
        DigestOutcome::Failed(error) => {
            assert_eq!(error.kind, ErrorKind::ProviderError);
            assert_eq!(error.status, Some(529));
            assert_eq!(error.details.as_deref(), Some(body));
        }
        DigestOutcome::Digest(_) => panic!("expected a provider error"),
    }
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(message_payload("{}"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let err = client.complete("prompt").await.unwrap_err();
    assert!(matches!(err, DigestError::Timeout { secs: 2 }));
}

#[tokio::test]
async fn test_analyze_reports_timeout_as_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(message_payload("{}"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    match analyze(&client, "transcript").await.unwrap() {
        DigestOutcome::Failed(error) => {
            assert_eq!(error.kind, ErrorKind::Timeout);
            assert!(error.error.contains("2 seconds"));
        }
        DigestOutcome::Digest(_) => panic!("expected a timeout"),
    }
}

#[tokio::test]
async fn test_unparseable_reply_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_payload("not json at all")))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    let outcome = analyze(&client, "transcript").await.unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["kind"], "JSONDecodeError");
    assert_eq!(json["raw_excerpt"], "not json at all");
    assert_eq!(json["sanitized_excerpt"], "not json at all");
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_payload_without_text_is_unexpected_error() {
    let server = MockServer::start().await;
    let payload = json!({"id": "msg_01", "content": [{"type": "tool_use", "name": "x"}]});

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sk-test"));
    match analyze(&client, "transcript").await.unwrap() {
        DigestOutcome::Failed(error) => {
            assert_eq!(error.kind, ErrorKind::UnexpectedError);
            assert_eq!(error.raw_response, Some(payload));
        }
        DigestOutcome::Digest(_) => panic!("expected an unexpected-error outcome"),
    }
}

#[tokio::test]
async fn test_connection_failure_propagates() {
    // Reserve a port, then free it so nothing is listening there
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = AnthropicClient::new(AnthropicConfig {
        api_key: Some("sk-test".to_string()),
        endpoint: format!("http://127.0.0.1:{}/v1/messages", port),
        timeout: Duration::from_secs(2),
        ..Default::default()
    });

    assert!(analyze(&client, "transcript").await.is_err());
}

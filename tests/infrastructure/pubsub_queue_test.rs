use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use sonus::application::ports::{MessageQueue, QueueError};
use sonus::infrastructure::queue::PubSubQueue;

use super::mock_server::start_mock_server;

type Calls = Arc<Mutex<Vec<(String, Value, Option<String>)>>>;

/// Answers pull, acknowledge and publish calls and records every request.
fn pubsub_app(calls: Calls, pull_body: Value) -> Router {
    Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: String| {
        let calls = calls.clone();
        let pull_body = pull_body.clone();
        async move {
            let path = uri.path().to_string();
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let request: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            calls.lock().await.push((path.clone(), request, auth));

            if path.ends_with(":pull") {
                (StatusCode::OK, axum::Json(pull_body)).into_response()
            } else if path.ends_with(":acknowledge") {
                (StatusCode::OK, axum::Json(json!({}))).into_response()
            } else if path.ends_with(":publish") {
                (StatusCode::OK, axum::Json(json!({"messageIds": ["m-42"]}))).into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
    })
}

#[tokio::test]
async fn given_pull_response_when_pulling_then_decodes_base64_payload() {
    let calls = Calls::default();
    let pull_body = json!({
        "receivedMessages": [{
            "ackId": "ack-1",
            "message": {"data": BASE64.encode(br#"{"file_name":"a.mp3"}"#), "messageId": "m-1"}
        }]
    });
    let (base_url, shutdown_tx) = start_mock_server(pubsub_app(calls.clone(), pull_body)).await;
    let queue = PubSubQueue::new(&base_url, "proj", "topic", "sub", Some("tok".into())).unwrap();

    let messages = queue.pull(1).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].ack_id, "ack-1");
    assert_eq!(messages[0].message_id, "m-1");
    assert_eq!(messages[0].data, br#"{"file_name":"a.mp3"}"#);

    let calls = calls.lock().await;
    let (path, body, auth) = &calls[0];
    assert_eq!(path, "/v1/projects/proj/subscriptions/sub:pull");
    assert_eq!(body, &json!({"maxMessages": 1, "returnImmediately": true}));
    assert_eq!(auth.as_deref(), Some("Bearer tok"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_pull_response_when_pulling_then_returns_no_messages() {
    let (base_url, shutdown_tx) = start_mock_server(pubsub_app(Calls::default(), json!({}))).await;
    let queue = PubSubQueue::new(&base_url, "proj", "topic", "sub", None).unwrap();

    let messages = queue.pull(1).await.unwrap();

    assert!(messages.is_empty());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_ack_id_when_acknowledging_then_posts_it_to_subscription() {
    let calls = Calls::default();
    let (base_url, shutdown_tx) = start_mock_server(pubsub_app(calls.clone(), json!({}))).await;
    let queue = PubSubQueue::new(&base_url, "proj", "topic", "sub", None).unwrap();

    queue.acknowledge("ack-7").await.unwrap();

    let calls = calls.lock().await;
    assert_eq!(calls[0].0, "/v1/projects/proj/subscriptions/sub:acknowledge");
    assert_eq!(calls[0].1, json!({"ackIds": ["ack-7"]}));
    assert_eq!(calls[0].2, None);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_payload_when_publishing_then_sends_base64_and_returns_message_id() {
    let calls = Calls::default();
    let (base_url, shutdown_tx) = start_mock_server(pubsub_app(calls.clone(), json!({}))).await;
    let queue = PubSubQueue::new(&base_url, "proj", "topic", "sub", None).unwrap();

    let message_id = queue.publish(b"hello").await.unwrap();

    assert_eq!(message_id, "m-42");
    let calls = calls.lock().await;
    assert_eq!(calls[0].0, "/v1/projects/proj/topics/topic:publish");
    assert_eq!(calls[0].1, json!({"messages": [{"data": BASE64.encode(b"hello")}]}));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_pulling_then_returns_request_failed() {
    let app = Router::new().fallback(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") });
    let (base_url, shutdown_tx) = start_mock_server(app).await;
    let queue = PubSubQueue::new(&base_url, "proj", "topic", "sub", None).unwrap();

    let result = queue.pull(1).await;

    assert!(matches!(result, Err(QueueError::RequestFailed(msg)) if msg.contains("503")));
    shutdown_tx.send(()).ok();
}

#[test]
fn given_empty_project_when_creating_queue_then_config_error() {
    let result = PubSubQueue::new("http://localhost", "", "topic", "sub", None);

    assert!(matches!(result, Err(QueueError::Config(_))));
}

#[test]
fn given_names_when_creating_queue_then_builds_resource_paths() {
    let queue = PubSubQueue::new("http://localhost/", "proj", "topic", "sub", None).unwrap();

    assert_eq!(queue.subscription_path(), "projects/proj/subscriptions/sub");
    assert_eq!(queue.topic_path(), "projects/proj/topics/topic");
}

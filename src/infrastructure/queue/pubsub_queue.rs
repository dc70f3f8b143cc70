use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::application::ports::{MessageQueue, QueueError, ReceivedMessage};

/// Google Cloud Pub/Sub over its REST API. Works against the emulator when no token is set.
pub struct PubSubQueue {
    client: reqwest::Client,
    endpoint: String,
    subscription_path: String,
    topic_path: String,
    access_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PullRequest {
    max_messages: usize,
    return_immediately: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullResponse {
    #[serde(default)]
    received_messages: Vec<WireReceivedMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReceivedMessage {
    ack_id: String,
    message: WireMessage,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(default)]
    data: String,
    #[serde(default)]
    message_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcknowledgeRequest<'a> {
    ack_ids: [&'a str; 1],
}

#[derive(Serialize)]
struct PublishRequest {
    messages: [OutgoingMessage; 1],
}

#[derive(Serialize)]
struct OutgoingMessage {
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

impl PubSubQueue {
    pub fn new(
        endpoint: &str,
        project_id: &str,
        topic: &str,
        subscription: &str,
        access_token: Option<String>,
    ) -> Result<Self, QueueError> {
        if project_id.is_empty() {
            return Err(QueueError::Config("queue.project_id required".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_path: format!("projects/{}/subscriptions/{}", project_id, subscription),
            topic_path: format!("projects/{}/topics/{}", project_id, topic),
            access_token,
        })
    }

    pub fn subscription_path(&self) -> &str {
        &self.subscription_path
    }

    pub fn topic_path(&self) -> &str {
        &self.topic_path
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: String,
        body: &B,
    ) -> Result<reqwest::Response, QueueError> {
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QueueError::RequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(QueueError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl MessageQueue for PubSubQueue {
    async fn pull(&self, max_messages: usize) -> Result<Vec<ReceivedMessage>, QueueError> {
        let url = format!("{}/v1/{}:pull", self.endpoint, self.subscription_path);
        let body = PullRequest {
            max_messages,
            return_immediately: true,
        };
        let response: PullResponse = self
            .post(url, &body)
            .await?
            .json()
            .await
            .map_err(|e| QueueError::InvalidResponse(format!("pull: {}", e)))?;

        response
            .received_messages
            .into_iter()
            .map(|received| {
                let data = BASE64.decode(received.message.data.as_bytes()).map_err(|e| {
                    QueueError::InvalidResponse(format!("message data is not base64: {}", e))
                })?;
                Ok(ReceivedMessage {
                    ack_id: received.ack_id,
                    message_id: received.message.message_id,
                    data,
                })
            })
            .collect()
    }

    async fn acknowledge(&self, ack_id: &str) -> Result<(), QueueError> {
        let url = format!("{}/v1/{}:acknowledge", self.endpoint, self.subscription_path);
        self.post(url, &AcknowledgeRequest { ack_ids: [ack_id] })
            .await?;
        tracing::debug!(ack_id, "Message acknowledged");
        Ok(())
    }

    async fn publish(&self, data: &[u8]) -> Result<String, QueueError> {
        let url = format!("{}/v1/{}:publish", self.endpoint, self.topic_path);
        let body = PublishRequest {
            messages: [OutgoingMessage {
                data: BASE64.encode(data),
            }],
        };
        let response: PublishResponse = self
            .post(url, &body)
            .await?
            .json()
            .await
            .map_err(|e| QueueError::InvalidResponse(format!("publish: {}", e)))?;

        let message_id = response.message_ids.into_iter().next().ok_or_else(|| {
            QueueError::InvalidResponse("publish returned no message id".to_string())
        })?;
        tracing::debug!(topic = %self.topic_path, message_id = %message_id, "Published message");
        Ok(message_id)
    }
}

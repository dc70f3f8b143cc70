use sonus::application::ports::{MessageQueue, QueueError};
use sonus::infrastructure::queue::InMemoryQueue;

#[tokio::test]
async fn given_published_message_when_pulled_then_data_and_id_round_trip() {
    let queue = InMemoryQueue::new();
    let message_id = queue.publish(b"payload").await.unwrap();

    let messages = queue.pull(10).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_id, message_id);
    assert_eq!(messages[0].data, b"payload");
    assert_eq!(queue.outstanding_len().await, 1);
}

#[tokio::test]
async fn given_pulled_message_when_acknowledged_then_recorded_once() {
    let queue = InMemoryQueue::new();
    let message_id = queue.publish(b"payload").await.unwrap();
    let ack_id = queue.pull(1).await.unwrap().remove(0).ack_id;

    queue.acknowledge(&ack_id).await.unwrap();
    let second = queue.acknowledge(&ack_id).await;

    assert_eq!(queue.acknowledged().await, vec![message_id]);
    assert!(matches!(second, Err(QueueError::RequestFailed(_))));
}

#[tokio::test]
async fn given_empty_queue_when_pulled_then_returns_immediately_with_nothing() {
    let queue = InMemoryQueue::new();

    let messages = queue.pull(1).await.unwrap();

    assert!(messages.is_empty());
    assert_eq!(queue.pull_calls(), 1);
}

//! In-memory implementation of the manager's FIFO queue contract.
//!
//! For TEST purposes only! The queue lives in process memory: nothing is
//! persisted, nothing is deduplicated, and acknowledgments are no-ops.
//! Production deployments use a real transport plugin (SQS, Pub/Sub).

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use common::{FifoQueue, FifoQueueItem};
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

/// An in-memory FIFO queue backed by a bounded tokio channel.
///
/// `send` blocks for at most the configured write timeout when the buffer
/// is full; `receive` forwards items to the sink in arrival order and
/// returns cleanly when either side shuts down.
pub struct InMemoryFifoQueue {
    name: String,
    tx: mpsc::Sender<FifoQueueItem>,
    rx: Mutex<mpsc::Receiver<FifoQueueItem>>,
    write_timeout: Duration,
}

impl InMemoryFifoQueue {
    /// Creates a queue holding at most `buffer_size` in-flight items.
    /// `name` is used for logging purposes only.
    #[must_use]
    pub fn new(name: impl Into<String>, buffer_size: usize, write_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);

        Self {
            name: name.into(),
            tx,
            rx: Mutex::new(rx),
            write_timeout,
        }
    }
}

#[async_trait]
impl FifoQueue for InMemoryFifoQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, slack_channel_id: &str, _dedup_id: &str, body: &str) -> Result<()> {
        let item = FifoQueueItem {
            message_id: uuid::Uuid::new_v4().to_string(),
            slack_channel_id: slack_channel_id.to_string(),
            receive_timestamp: Utc::now(),
            body: body.to_string(),
            ack: Box::new(|| {}),
            nack: Box::new(|| {}),
        };

        match tokio::time::timeout(self.write_timeout, self.tx.send(item)).await {
            Ok(Ok(())) => {
                debug!(queue = %self.name, channel = slack_channel_id, "queued message");
                Ok(())
            }
            Ok(Err(_)) => Err(anyhow!("queue '{}' is closed", self.name)),
            Err(_) => Err(anyhow!("timeout while writing to queue '{}'", self.name)),
        }
    }

    async fn receive(&self, sink: mpsc::Sender<FifoQueueItem>) -> Result<()> {
        let mut rx = self.rx.lock().await;

        loop {
            tokio::select! {
                () = sink.closed() => {
                    debug!(queue = %self.name, "sink closed, stopping receive");
                    return Ok(());
                }
                item = rx.recv() => {
                    let Some(item) = item else {
                        return Ok(());
                    };

                    if sink.send(item).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = InMemoryFifoQueue::new("test", 10, Duration::from_millis(100));

        queue.send("C1", "d1", "first").await.unwrap();
        queue.send("C1", "d2", "second").await.unwrap();
        queue.send("C1", "d3", "third").await.unwrap();

        let (sink, mut received) = mpsc::channel(10);
        let queue = Arc::new(queue);
        let handle = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.receive(sink).await })
        };

        assert_eq!(received.recv().await.unwrap().body, "first");
        assert_eq!(received.recv().await.unwrap().body, "second");

        let third = received.recv().await.unwrap();
        assert_eq!(third.body, "third");
        assert_eq!(third.slack_channel_id, "C1");
        assert!(!third.message_id.is_empty());

        drop(received);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_send_times_out_when_buffer_full() {
        let queue = InMemoryFifoQueue::new("test", 1, Duration::from_millis(50));

        queue.send("C1", "d1", "fits").await.unwrap();

        let err = queue.send("C1", "d2", "does not fit").await.unwrap_err();
        assert!(err.to_string().contains("timeout while writing to queue"));
    }

    #[tokio::test]
    async fn test_receive_stops_when_sink_dropped() {
        let queue = Arc::new(InMemoryFifoQueue::new("test", 10, Duration::from_millis(100)));

        let (sink, received) = mpsc::channel(10);
        drop(received);

        queue.receive(sink).await.unwrap();
    }

    #[tokio::test]
    async fn test_queue_name() {
        let queue = InMemoryFifoQueue::new("alerts-inbound", 1, Duration::from_millis(10));
        assert_eq!(queue.name(), "alerts-inbound");
    }
}

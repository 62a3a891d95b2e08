//! The FIFO queue contract implemented by queue plugins.

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Acknowledgment callback attached to a received item.
///
/// Deliberately takes no cancellable input: acknowledgment must always be
/// attempted, even when the surrounding processing is being shut down.
/// Implementations that need async delivery should spawn it internally.
pub type AckHandler = Box<dyn Fn() + Send + Sync>;

/// One message received from a FIFO queue.
pub struct FifoQueueItem {
    /// Transport-assigned message ID.
    pub message_id: String,

    /// The group/partition key; messages for one channel are delivered in
    /// order.
    pub slack_channel_id: String,

    /// When the item was received from the transport.
    pub receive_timestamp: DateTime<Utc>,

    /// Opaque message body.
    pub body: String,

    /// Marks the item as processed.
    pub ack: AckHandler,

    /// Returns the item to the queue for redelivery.
    pub nack: AckHandler,
}

impl fmt::Debug for FifoQueueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoQueueItem")
            .field("message_id", &self.message_id)
            .field("slack_channel_id", &self.slack_channel_id)
            .field("receive_timestamp", &self.receive_timestamp)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Transport contract for the manager's work queue.
///
/// Messages are partitioned by Slack channel ID and delivered in FIFO
/// order within one channel. Sending is subject to a bounded buffer and a
/// write timeout; `dedup_id` lets transports drop duplicate submissions.
#[async_trait]
pub trait FifoQueue: Send + Sync {
    /// The queue name, for logging purposes only.
    fn name(&self) -> &str;

    /// Sends a message to the queue. Returns an error when the buffer
    /// stays full past the transport's write timeout.
    async fn send(&self, slack_channel_id: &str, dedup_id: &str, body: &str) -> Result<()>;

    /// Receives messages into `sink` until the queue shuts down or the
    /// sink is closed. Dropping the sink's receiver is the cancellation
    /// signal; `receive` then returns cleanly.
    async fn receive(&self, sink: mpsc::Sender<FifoQueueItem>) -> Result<()>;
}

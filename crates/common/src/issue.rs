//! Capability contracts for issue-store owned types.
//!
//! The manager's issue representation is internal to the store and reaches
//! this layer only through these traits plus opaque JSON. No base
//! implementation is shipped.

use serde_json::Value;

/// One grouped, trackable problem: the persisted representation of one or
/// more alerts sharing a correlation ID in one channel, backing exactly
/// one evolving Slack post.
///
/// Lifecycle: created on the first alert with a new correlation ID in a
/// channel with no existing open issue; updated on subsequent alerts with
/// the same correlation ID while open; archived after the archiving delay
/// past resolution, at which point it is immutable and a new alert with
/// the same correlation ID starts a fresh issue. An issue may be moved
/// between channels, changing its `channel_id` but not its identity.
pub trait Issue: Send + Sync {
    /// The Slack channel this issue currently belongs to.
    fn channel_id(&self) -> &str;

    /// A unique, deterministic, store-defined ID, stable for the issue's
    /// lifetime and safe for use in URLs and as a database key.
    fn unique_id(&self) -> String;

    /// The correlation ID grouping this issue's alerts. Not guaranteed to
    /// be unique across issues (even in the same channel) and not URL
    /// safe; never use it as a store key by itself.
    fn correlation_id(&self) -> &str;

    /// False only once the issue is archived. A resolved issue is still
    /// open until archived.
    fn is_open(&self) -> bool;

    /// The current Slack post ID, which changes over the issue's life as
    /// posts are updated. Empty until a post exists.
    fn current_post_id(&self) -> &str;

    /// The JSON-serializability capability: the store persists issues as
    /// opaque JSON.
    fn to_json(&self) -> serde_json::Result<Value>;
}

/// A redirect record: alerts carrying `correlation_id` that originate in
/// `channel_id` must be redirected to the channel an issue was moved to.
///
/// Created by an escalation's move-to-channel action and looked up before
/// issue creation, so late-arriving alerts for an already-moved
/// correlation land in the new channel.
pub trait MoveMapping: Send + Sync {
    /// The channel where the move was initiated.
    fn channel_id(&self) -> &str;

    /// A unique, deterministic ID based on the original channel and the
    /// correlation ID. URL safe.
    fn unique_id(&self) -> String;

    /// The correlation ID this mapping redirects. Unique within a single
    /// channel, but not across channels, and not URL safe.
    fn correlation_id(&self) -> &str;

    /// The JSON-serializability capability.
    fn to_json(&self) -> serde_json::Result<Value>;
}

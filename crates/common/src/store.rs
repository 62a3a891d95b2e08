//! The persistence contract implemented by database plugins.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::alert::Alert;
use crate::channel_state::ChannelProcessingState;
use crate::issue::{Issue, MoveMapping};

/// Storage contract for alerts, issues, move mappings and channel
/// processing state.
///
/// Implementations must uphold the single-open-issue invariant: at most
/// one open issue per (channel, correlation ID) pair at any time. Multiple
/// producers may race to create or update an issue for the same pair; the
/// store must resolve such races itself (e.g. with a unique constraint or
/// a conditional write), not rely on locking in this layer.
///
/// Lookup methods return `Ok(None)` when nothing matches and must return
/// an error when a query matches more than one row, rather than silently
/// picking one.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Initializes the store, for example by creating tables or
    /// collections. Set `skip_schema_validation` to skip schema checks.
    async fn init(&self, skip_schema_validation: bool) -> Result<()>;

    /// Saves an alert for auditing purposes. The same alert may be saved
    /// multiple times in case of errors and retries; use
    /// [`Alert::unique_id`] for deduplication.
    ///
    /// Implementations may skip persisting alerts entirely, since the
    /// manager never reads them back.
    async fn save_alert(&self, alert: &Alert) -> Result<()>;

    /// Creates or updates a single issue, keyed by its
    /// [`unique_id`](Issue::unique_id).
    async fn save_issue(&self, issue: &dyn Issue) -> Result<()>;

    /// Creates or updates multiple issues.
    async fn save_issues(&self, issues: &[&dyn Issue]) -> Result<()>;

    /// Moves an issue from `source_channel_id` to `target_channel_id`.
    /// The issue's own channel ID must already match the target.
    ///
    /// Must be a no-op (not an error) when the issue does not exist in the
    /// source channel, and must reject moves where source equals target.
    async fn move_issue(
        &self,
        issue: &dyn Issue,
        source_channel_id: &str,
        target_channel_id: &str,
    ) -> Result<()>;

    /// Finds the single open issue for (channel, correlation ID),
    /// returning its unique ID and opaque JSON representation.
    async fn find_open_issue_by_correlation_id(
        &self,
        channel_id: &str,
        correlation_id: &str,
    ) -> Result<Option<(String, Value)>>;

    /// Finds the single issue whose *current* post ID matches, returning
    /// its unique ID and opaque JSON representation. The post ID changes
    /// over an issue's life as posts are updated.
    async fn find_issue_by_slack_post_id(
        &self,
        channel_id: &str,
        post_id: &str,
    ) -> Result<Option<(String, Value)>>;

    /// Lists all channels with at least one open issue. May be empty.
    async fn find_active_channels(&self) -> Result<Vec<String>>;

    /// Loads all open (non-archived) issues in the channel, keyed by their
    /// unique IDs. May be empty.
    async fn load_open_issues_in_channel(
        &self,
        channel_id: &str,
    ) -> Result<HashMap<String, Value>>;

    /// Creates or updates a move mapping.
    async fn save_move_mapping(&self, mapping: &dyn MoveMapping) -> Result<()>;

    /// Finds the move mapping for (channel, correlation ID), as opaque
    /// JSON.
    async fn find_move_mapping(
        &self,
        channel_id: &str,
        correlation_id: &str,
    ) -> Result<Option<Value>>;

    /// Deletes the move mapping for (channel, correlation ID). A no-op
    /// when none exists.
    async fn delete_move_mapping(&self, channel_id: &str, correlation_id: &str) -> Result<()>;

    /// Creates or updates the processing state for a channel.
    async fn save_channel_processing_state(&self, state: &ChannelProcessingState) -> Result<()>;

    /// Finds the processing state for a channel.
    async fn find_channel_processing_state(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelProcessingState>>;

    /// Drops *all* data: alerts, issues, move mappings and processing
    /// states. For test/reset use only.
    async fn drop_all_data(&self) -> Result<()>;
}

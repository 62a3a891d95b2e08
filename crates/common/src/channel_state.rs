//! Per-channel processing bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state for one Slack channel, used by the manager's scheduler
/// to pace per-channel work and to keep multiple manager instances from
/// processing the same channel at the same time.
///
/// Created once per channel on first processing; `last_processed` is
/// updated by the orchestrator on every processing pass. This layer only
/// defines the shape, not the pacing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProcessingState {
    pub channel_id: String,
    pub created: DateTime<Utc>,
    pub last_processed: Option<DateTime<Utc>>,
}

impl ChannelProcessingState {
    /// State for a channel that has never been processed.
    #[must_use]
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            created: Utc::now(),
            last_processed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = ChannelProcessingState::new("C12345678");
        assert_eq!(state.channel_id, "C12345678");
        assert!(state.last_processed.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = ChannelProcessingState::new("C12345678");
        state.last_processed = Some(Utc::now());

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("channelId").is_some());
        assert!(json.get("lastProcessed").is_some());

        let parsed: ChannelProcessingState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, state);
    }
}

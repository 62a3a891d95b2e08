//! Data delivered when a webhook button is pressed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The event delivered to a webhook handler when a user presses the
/// button.
///
/// All maps default to empty when absent from the JSON, and every accessor
/// returns a typed default when a key is missing or holds a value of the
/// wrong type, so handlers never need to guard against partial callbacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookCallback {
    /// The webhook ID the callback belongs to.
    pub id: String,

    /// Slack ID of the user who pressed the button.
    pub user_id: String,

    /// Real name of the user who pressed the button.
    pub user_real_name: String,

    /// Channel the issue post lives in.
    pub channel_id: String,

    /// Slack post the button was pressed on.
    pub message_id: String,

    pub timestamp: DateTime<Utc>,

    /// Plain-text input answers, keyed by input ID.
    pub input: HashMap<String, String>,

    /// Selected checkbox values, keyed by input ID.
    pub checkbox_input: HashMap<String, Vec<String>>,

    /// The webhook's original payload, plus any callback metadata added by
    /// the manager.
    pub payload: Map<String, Value>,
}

impl WebhookCallback {
    /// Returns the raw payload value for `key`, if present.
    #[must_use]
    pub fn payload_value(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Returns the payload string for `key`, or `""` when the key is
    /// absent or not a string.
    #[must_use]
    pub fn payload_string(&self, key: &str) -> &str {
        self.payload
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns the payload integer for `key`, or `default` when the key is
    /// absent or not an integer.
    #[must_use]
    pub fn payload_int(&self, key: &str, default: i64) -> i64 {
        self.payload
            .get(key)
            .and_then(Value::as_i64)
            .unwrap_or(default)
    }

    /// Returns the payload boolean for `key`, or `default` when the key is
    /// absent or not a boolean.
    #[must_use]
    pub fn payload_bool(&self, key: &str, default: bool) -> bool {
        self.payload
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Returns the plain-text input answer for `key`, or `""`.
    #[must_use]
    pub fn input_value(&self, key: &str) -> &str {
        self.input.get(key).map(String::as_str).unwrap_or_default()
    }

    /// Returns the selected checkbox values for `key`, or an empty slice.
    #[must_use]
    pub fn checkbox_selected_values(&self, key: &str) -> &[String] {
        self.checkbox_input
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_value() {
        let callback = WebhookCallback::default();
        assert!(callback.payload_value("key").is_none());

        let mut callback = WebhookCallback::default();
        callback.payload.insert("key".to_string(), json!("value"));
        assert_eq!(callback.payload_value("key"), Some(&json!("value")));
        assert!(callback.payload_value("invalid").is_none());
    }

    #[test]
    fn test_payload_string() {
        let callback = WebhookCallback::default();
        assert_eq!(callback.payload_string("key"), "");

        let mut callback = WebhookCallback::default();
        callback.payload.insert("key".to_string(), json!("value"));
        assert_eq!(callback.payload_string("key"), "value");
        assert_eq!(callback.payload_string("invalid"), "");

        // Wrong type falls back to the default rather than failing
        callback.payload.insert("number".to_string(), json!(7));
        assert_eq!(callback.payload_string("number"), "");
    }

    #[test]
    fn test_payload_int() {
        let callback = WebhookCallback::default();
        assert_eq!(callback.payload_int("key", 42), 42);

        let mut callback = WebhookCallback::default();
        callback.payload.insert("key".to_string(), json!(123));
        assert_eq!(callback.payload_int("key", 42), 123);
        assert_eq!(callback.payload_int("invalid", 42), 42);

        callback.payload.insert("text".to_string(), json!("nope"));
        assert_eq!(callback.payload_int("text", 42), 42);
    }

    #[test]
    fn test_payload_bool() {
        let callback = WebhookCallback::default();
        assert!(callback.payload_bool("key", true));

        let mut callback = WebhookCallback::default();
        callback.payload.insert("key".to_string(), json!(true));
        assert!(callback.payload_bool("key", false));
        assert!(!callback.payload_bool("invalid", false));
    }

    #[test]
    fn test_input_value() {
        let callback = WebhookCallback::default();
        assert_eq!(callback.input_value("key"), "");

        let mut callback = WebhookCallback::default();
        callback
            .input
            .insert("key".to_string(), "value".to_string());
        assert_eq!(callback.input_value("key"), "value");
        assert_eq!(callback.input_value("invalid"), "");
    }

    #[test]
    fn test_checkbox_selected_values() {
        let callback = WebhookCallback::default();
        assert!(callback.checkbox_selected_values("key").is_empty());

        let mut callback = WebhookCallback::default();
        callback.checkbox_input.insert(
            "key".to_string(),
            vec!["value1".to_string(), "value2".to_string()],
        );
        assert_eq!(
            callback.checkbox_selected_values("key"),
            ["value1".to_string(), "value2".to_string()]
        );
        assert!(callback.checkbox_selected_values("invalid").is_empty());
    }

    #[test]
    fn test_deserialize_with_missing_maps() {
        let callback: WebhookCallback =
            serde_json::from_str(r#"{"id": "restart", "userId": "U123"}"#).unwrap();
        assert_eq!(callback.id, "restart");
        assert_eq!(callback.user_id, "U123");
        assert_eq!(callback.input_value("anything"), "");
        assert!(callback.checkbox_selected_values("anything").is_empty());
        assert_eq!(callback.payload_string("anything"), "");
    }
}

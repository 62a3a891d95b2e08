//! Alert severity levels.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of valid severity values.
pub const VALID_SEVERITIES: [&str; 5] = ["panic", "error", "warning", "resolved", "info"];

/// Severity of an alert, determining the emoji used in the Slack post (for
/// the `:status:` placeholder in header or text).
///
/// This is a string-backed type rather than a closed enum: normalization
/// ([`crate::Alert::clean`]) and validation ([`crate::Alert::validate`]) are
/// separate passes, so the type must be able to carry values that are not
/// (yet) valid. `clean` lowercases the value, defaults an empty severity to
/// `error` and rewrites the legacy value `critical` to `error`; `validate`
/// then rejects anything outside [`VALID_SEVERITIES`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertSeverity(Cow<'static, str>);

impl AlertSeverity {
    /// Panic situations (panic icon in Slack).
    pub const PANIC: Self = Self(Cow::Borrowed("panic"));

    /// Error situations (red error icon in Slack).
    pub const ERROR: Self = Self(Cow::Borrowed("error"));

    /// Warning situations (yellow warning icon in Slack).
    pub const WARNING: Self = Self(Cow::Borrowed("warning"));

    /// A previous panic/error/warning situation has been resolved (green OK
    /// icon). Not to be confused with an info alert.
    pub const RESOLVED: Self = Self(Cow::Borrowed("resolved"));

    /// Pure info situations (blue info icon), typically fire-and-forget
    /// status messages with issue follow-up disabled. Not to be confused
    /// with a resolved alert.
    pub const INFO: Self = Self(Cow::Borrowed("info"));

    /// Wraps an arbitrary severity string. The value is not checked; run
    /// [`is_valid`](Self::is_valid) or the alert-level validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the value is one of [`VALID_SEVERITIES`]. Membership
    /// is exact: case variants are not valid (normalization happens in
    /// `clean`, not here).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        VALID_SEVERITIES.contains(&self.0.as_ref())
    }

    /// Priority ordering used when comparing severities: panic=3, error=2,
    /// warning=1, resolved=0, info=0. Invalid values return -1.
    #[must_use]
    pub fn priority(&self) -> i32 {
        match self.0.as_ref() {
            "panic" => 3,
            "error" => 2,
            "warning" => 1,
            "resolved" | "info" => 0,
            _ => -1,
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlertSeverity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_severities() {
        for s in VALID_SEVERITIES {
            assert!(AlertSeverity::new(s).is_valid(), "{s} should be valid");
        }
    }

    #[test]
    fn test_invalid_severities() {
        for s in ["", "critical", "Panic", "ERROR", " error", "fatal"] {
            assert!(!AlertSeverity::new(s).is_valid(), "{s:?} should be invalid");
        }
    }

    #[test]
    fn test_priority() {
        assert_eq!(AlertSeverity::PANIC.priority(), 3);
        assert_eq!(AlertSeverity::ERROR.priority(), 2);
        assert_eq!(AlertSeverity::WARNING.priority(), 1);
        assert_eq!(AlertSeverity::RESOLVED.priority(), 0);
        assert_eq!(AlertSeverity::INFO.priority(), 0);
        assert_eq!(AlertSeverity::new("bogus").priority(), -1);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&AlertSeverity::WARNING).unwrap();
        assert_eq!(json, "\"warning\"");

        let parsed: AlertSeverity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed.as_str(), "critical");
        assert!(!parsed.is_valid());
    }
}

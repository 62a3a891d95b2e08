//! The alert aggregate: normalization (`clean`) and validation (`validate`).

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ValidationError;
use crate::fingerprint::fingerprint;
use crate::severity::{AlertSeverity, VALID_SEVERITIES};
use crate::webhook::{Webhook, MAX_WEBHOOK_COUNT};

/// Maximum age of an alert timestamp. Older (or absent) timestamps are
/// replaced with the current time by [`Alert::clean`].
pub const MAX_TIMESTAMP_AGE_DAYS: i64 = 7;

pub const MAX_SLACK_CHANNEL_ID_LENGTH: usize = 80;
pub const MAX_ROUTE_KEY_LENGTH: usize = 1000;
pub const MAX_HEADER_LENGTH: usize = 130;
pub const MAX_FALLBACK_TEXT_LENGTH: usize = 150;
pub const MAX_TEXT_LENGTH: usize = 10_000;
pub const MAX_AUTHOR_LENGTH: usize = 100;
pub const MAX_HOST_LENGTH: usize = 100;
pub const MAX_FOOTER_LENGTH: usize = 300;
pub const MAX_USERNAME_LENGTH: usize = 100;
pub const MAX_FIELD_TITLE_LENGTH: usize = 30;
pub const MAX_FIELD_VALUE_LENGTH: usize = 200;
pub const MAX_ICON_EMOJI_LENGTH: usize = 50;
pub const MAX_MENTION_LENGTH: usize = 20;
pub const MAX_CORRELATION_ID_LENGTH: usize = 500;
pub const MIN_AUTO_RESOLVE_SECONDS: i64 = 30;
pub const MAX_AUTO_RESOLVE_SECONDS: i64 = 63_113_851; // 2 years
pub const MAX_IGNORE_IF_TEXT_CONTAINS_LENGTH: usize = 1000;
pub const MAX_IGNORE_IF_TEXT_CONTAINS_COUNT: usize = 20;
pub const MAX_FIELD_COUNT: usize = 20;

pub const MAX_ESCALATION_COUNT: usize = 3;
pub const MIN_ESCALATION_DELAY_SECONDS: i64 = 30;
pub const MIN_ESCALATION_DELAY_DIFF_SECONDS: i64 = 30;
pub const MAX_ESCALATION_SLACK_MENTION_COUNT: usize = 10;

/// Matches valid Slack channel IDs and channel names. Channel names are
/// mapped to channel IDs by the API.
static SLACK_CHANNEL_ID_OR_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[0-9a-zA-Z_-]{{1,{MAX_SLACK_CHANNEL_ID_LENGTH}}}$"))
        .expect("channel regex must compile")
});

/// Matches valid Slack icon emojis, on the format `:emoji:`.
static ICON_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^:[^:]{{1,{MAX_ICON_EMOJI_LENGTH}}}:$")).expect("icon regex must compile")
});

/// Matches valid Slack mentions, such as `<!here>`, `<!channel>` and
/// `<@U12345678>`.
static SLACK_MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^((<!here>)|(<!channel>)|(<@[^>\\s]{{1,{MAX_MENTION_LENGTH}}}>))$"
    ))
    .expect("mention regex must compile")
});

/// A single alert submitted to the manager. Alerts with the same
/// correlation ID are grouped together into issues, each backing one
/// evolving Slack post.
///
/// Producers should run [`clean`](Self::clean) and then
/// [`validate`](Self::validate) before submitting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    /// When the alert was created. If absent or older than
    /// [`MAX_TIMESTAMP_AGE_DAYS`], it is replaced with the current time
    /// during normalization.
    pub timestamp: DateTime<Utc>,

    /// Groups related alerts together into one issue. If empty, the
    /// manager falls back to [`default_correlation_id`](Self::default_correlation_id).
    /// Setting an explicit value is strongly recommended: it allows header
    /// and text to change without opening a new issue.
    pub correlation_id: String,

    /// Alert type such as `compliance`, `security` or `metrics`, used for
    /// routing when [`route_key`](Self::route_key) is used. Optional,
    /// case-insensitive.
    #[serde(rename = "type")]
    pub alert_type: String,

    /// Main header (title) of the alert. Truncated at
    /// [`MAX_HEADER_LENGTH`] runes. Include `:status:` in the header or
    /// text to have it replaced with the severity emoji. Header and text
    /// cannot both be empty.
    pub header: String,

    /// Header used once the issue is resolved. Optional; falls back to
    /// [`header`](Self::header).
    pub header_when_resolved: String,

    /// Main text (body) of the alert. Truncated at [`MAX_TEXT_LENGTH`]
    /// runes. Header and text cannot both be empty.
    pub text: String,

    /// Text used once the issue is resolved. Optional; falls back to
    /// [`text`](Self::text).
    pub text_when_resolved: String,

    /// Short summary shown in Slack notifications, without markdown or
    /// line breaks. Optional; if unset, Slack decides what to display.
    pub fallback_text: String,

    /// 'Author' of the alert, shown as a context block. Optional.
    pub author: String,

    /// Host the alert originated on, shown as a context block. Optional.
    pub host: String,

    /// Footer context block at the bottom of the Slack post. Optional.
    pub footer: String,

    /// Link to more information. Optional, but must be a valid absolute
    /// URL when set.
    pub link: String,

    /// Enables issue follow-up: the issue is automatically resolved after
    /// [`auto_resolve_seconds`](Self::auto_resolve_seconds). Set to false
    /// for fire-and-forget alerts.
    pub issue_follow_up_enabled: bool,

    /// Seconds after which the issue is automatically resolved, when
    /// follow-up is enabled. Must be within
    /// [`MIN_AUTO_RESOLVE_SECONDS`]..=[`MAX_AUTO_RESOLVE_SECONDS`].
    pub auto_resolve_seconds: i64,

    /// Resolve the issue as 'inconclusive' instead of 'resolved',
    /// affecting the emoji used in the Slack post.
    pub auto_resolve_as_inconclusive: bool,

    /// Severity of the alert. Defaults to `error` when unset.
    pub severity: AlertSeverity,

    /// Slack channel ID (or name, converted by the API) to post to.
    /// Takes precedence over [`route_key`](Self::route_key). Both may be
    /// empty if the API has a fallback mapping.
    pub slack_channel_id: String,

    /// Case-insensitive route key, resolved to a channel by the API.
    pub route_key: String,

    /// Username to post as. Optional; defaults to the bot user.
    pub username: String,

    /// Emoji to post with, on the format `:emoji:`. Optional.
    pub icon_emoji: String,

    /// Rendered in a compact two-column format.
    pub fields: Vec<Field>,

    /// Seconds to wait before creating the actual Slack post. If the issue
    /// resolves within the delay, no post is created at all.
    pub notification_delay_seconds: i64,

    /// Seconds to wait before archiving a resolved issue. A non-archived
    /// issue is re-opened by a new alert with the same correlation ID; an
    /// archived issue never is.
    pub archiving_delay_seconds: i64,

    /// Timed severity-increase rules, anchored to issue creation.
    pub escalation: Vec<Escalation>,

    /// Noise suppression: the alert is dropped when its text contains any
    /// of these substrings.
    pub ignore_if_text_contains: Vec<String>,

    pub fail_on_rate_limit_error: bool,

    /// Interactive buttons attached to the Slack post.
    pub webhooks: Vec<Webhook>,

    /// Free-form key/value data, opaque to the manager.
    pub metadata: Map<String, Value>,
}

/// An alert field, rendered side by side in two columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    /// Truncated at [`MAX_FIELD_TITLE_LENGTH`] runes.
    pub title: String,

    /// Truncated at [`MAX_FIELD_VALUE_LENGTH`] runes.
    pub value: String,
}

/// An escalation point for an issue: when the issue has been open for
/// `delay_seconds`, its severity changes and the listed mentions are added
/// to the next post update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Escalation {
    /// New severity when the escalation triggers. Restricted to panic,
    /// error or warning.
    pub severity: AlertSeverity,

    /// Seconds since the issue was created (first alert received) before
    /// the escalation triggers.
    pub delay_seconds: i64,

    /// Slack mentions added to the post when the escalation triggers.
    pub slack_mentions: Vec<String>,

    /// Channel ID or name the issue is moved to when the escalation
    /// triggers. Optional.
    pub move_to_channel: String,
}

impl Alert {
    /// Returns an alert with the given severity, a current timestamp and
    /// empty metadata.
    #[must_use]
    pub fn new(severity: AlertSeverity) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            ..Self::default()
        }
    }

    /// Returns an alert with the severity set to `panic`.
    #[must_use]
    pub fn new_panic() -> Self {
        Self::new(AlertSeverity::PANIC)
    }

    /// Returns an alert with the severity set to `error`.
    #[must_use]
    pub fn new_error() -> Self {
        Self::new(AlertSeverity::ERROR)
    }

    /// Returns an alert with the severity set to `warning`.
    #[must_use]
    pub fn new_warning() -> Self {
        Self::new(AlertSeverity::WARNING)
    }

    /// Returns an alert with the severity set to `resolved`.
    #[must_use]
    pub fn new_resolved() -> Self {
        Self::new(AlertSeverity::RESOLVED)
    }

    /// Returns an alert with the severity set to `info`.
    #[must_use]
    pub fn new_info() -> Self {
        Self::new(AlertSeverity::INFO)
    }

    /// Returns a unique, deterministic ID for this alert, for
    /// database/storage purposes. URL-safe.
    ///
    /// Distinct from the correlation ID (which groups alerts into issues)
    /// and from an issue's own unique ID (store-defined).
    #[must_use]
    pub fn unique_id(&self) -> String {
        let timestamp = self
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Nanos, true);

        fingerprint([
            "alert",
            self.slack_channel_id.as_str(),
            self.route_key.as_str(),
            self.correlation_id.as_str(),
            timestamp.as_str(),
            self.header.as_str(),
            self.text.as_str(),
        ])
    }

    /// The grouping key used when [`correlation_id`](Self::correlation_id)
    /// is empty: a fingerprint of header, text, author, host and channel.
    #[must_use]
    pub fn default_correlation_id(&self) -> String {
        fingerprint([
            self.header.as_str(),
            self.text.as_str(),
            self.author.as_str(),
            self.host.as_str(),
            self.slack_channel_id.as_str(),
        ])
    }

    /// Normalizes the alert in place. Idempotent and total: trims and
    /// case-normalizes strings, truncates over-long fields by rune count
    /// (appending `...`), clamps negative delays, defaults the severity
    /// (rewriting the legacy value `critical` to `error`), and sorts
    /// escalations by delay.
    pub fn clean(&mut self) {
        let now = Utc::now();

        if now.signed_duration_since(self.timestamp) > Duration::days(MAX_TIMESTAMP_AGE_DAYS) {
            tracing::debug!(
                timestamp = %self.timestamp,
                "alert timestamp is absent or stale, replacing with current time"
            );
            self.timestamp = now;
        }

        self.alert_type = self.alert_type.trim().to_lowercase();
        self.slack_channel_id = self.slack_channel_id.trim().to_uppercase();
        self.route_key = self.route_key.trim().to_lowercase();
        self.header = self.header.trim().replace('\n', " ");
        self.header_when_resolved = self.header_when_resolved.trim().replace('\n', " ");
        self.text = self.text.trim().to_string();
        self.text_when_resolved = self.text_when_resolved.trim().to_string();
        self.fallback_text = self.fallback_text.replace(":status:", "").trim().replace('\n', " ");
        self.correlation_id = self.correlation_id.trim().to_string();
        self.username = self.username.trim().to_string();
        self.author = self.author.trim().to_string();
        self.host = self.host.trim().to_string();
        self.link = self.link.trim().to_string();
        self.footer = self.footer.trim().to_string();
        self.icon_emoji = self.icon_emoji.trim().to_lowercase();
        self.severity = AlertSeverity::new(self.severity.as_str().trim().to_lowercase());

        if self.fallback_text.chars().count() > MAX_FALLBACK_TEXT_LENGTH {
            self.fallback_text = format!(
                "{}...",
                truncate_runes(&self.fallback_text, MAX_FALLBACK_TEXT_LENGTH - 3)
            );
        }

        if self.severity.is_empty() || self.severity.as_str() == "critical" {
            self.severity = AlertSeverity::ERROR;
        }

        if self.archiving_delay_seconds < 0 {
            self.archiving_delay_seconds = 0;
        }

        if self.notification_delay_seconds < 0 {
            self.notification_delay_seconds = 0;
        }

        // The Slack block-kit header limit is 150; we stay below it to
        // leave room for the :status: placeholder expansion.
        if self.header.chars().count() > MAX_HEADER_LENGTH {
            self.header = format!(
                "{}...",
                truncate_runes(&self.header, MAX_HEADER_LENGTH - 3).trim()
            );
        }

        if self.header_when_resolved.chars().count() > MAX_HEADER_LENGTH {
            self.header_when_resolved = format!(
                "{}...",
                truncate_runes(&self.header_when_resolved, MAX_HEADER_LENGTH - 3).trim()
            );
        }

        shorten_alert_text_if_needed(&mut self.text);
        shorten_alert_text_if_needed(&mut self.text_when_resolved);

        if self.author.chars().count() > MAX_AUTHOR_LENGTH {
            self.author = format!(
                "{}...",
                truncate_runes(&self.author, MAX_AUTHOR_LENGTH - 3).trim()
            );
        }

        if self.host.chars().count() > MAX_HOST_LENGTH {
            self.host = format!(
                "{}...",
                truncate_runes(&self.host, MAX_HOST_LENGTH - 3).trim()
            );
        }

        if self.username.chars().count() > MAX_USERNAME_LENGTH {
            self.username = format!(
                "{}...",
                truncate_runes(&self.username, MAX_USERNAME_LENGTH - 3).trim()
            );
        }

        if self.footer.chars().count() > MAX_FOOTER_LENGTH {
            self.footer = format!(
                "{}...",
                truncate_runes(&self.footer, MAX_FOOTER_LENGTH - 3).trim()
            );
        }

        for field in &mut self.fields {
            field.title = field.title.trim().to_string();
            field.value = field.value.trim().to_string();

            if field.title.chars().count() > MAX_FIELD_TITLE_LENGTH {
                field.title = format!(
                    "{}...",
                    truncate_runes(&field.title, MAX_FIELD_TITLE_LENGTH - 3).trim()
                );
            }

            if field.value.chars().count() > MAX_FIELD_VALUE_LENGTH {
                field.value = format!(
                    "{}...",
                    truncate_runes(&field.value, MAX_FIELD_VALUE_LENGTH - 3).trim()
                );
            }
        }

        for hook in &mut self.webhooks {
            hook.clean();
        }

        self.escalation.sort_by_key(|e| e.delay_seconds);

        for escalation in &mut self.escalation {
            escalation.severity =
                AlertSeverity::new(escalation.severity.as_str().trim().to_lowercase());
            escalation.move_to_channel = escalation.move_to_channel.trim().to_uppercase();

            for mention in &mut escalation.slack_mentions {
                *mention = mention.trim().to_string();
            }
        }
    }

    /// Validates the alert, returning the first failing check in a fixed
    /// order: channel/route key, header/text presence, icon format, link
    /// format, severity membership, correlation ID length, auto-resolve
    /// range, field count, webhooks, escalation, ignore list.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_slack_channel_id_and_route_key()?;
        self.validate_header_and_text()?;
        self.validate_icon()?;
        self.validate_link()?;
        self.validate_severity()?;
        self.validate_correlation_id()?;
        self.validate_auto_resolve()?;
        self.validate_fields()?;
        self.validate_webhooks()?;
        self.validate_escalation()?;
        self.validate_ignore_if_text_contains()
    }

    /// Validates the channel ID and route key, if set. Both are allowed to
    /// be empty, in which case a fallback mapping must exist in the API.
    pub fn validate_slack_channel_id_and_route_key(&self) -> Result<(), ValidationError> {
        if !self.slack_channel_id.is_empty() {
            if !SLACK_CHANNEL_ID_OR_NAME_REGEX.is_match(&self.slack_channel_id) {
                return Err(ValidationError::new(format!(
                    "slackChannelId '{}' is not valid",
                    self.slack_channel_id
                )));
            }

            return Ok(());
        }

        if self.route_key.chars().count() > MAX_ROUTE_KEY_LENGTH {
            return Err(ValidationError::new(format!(
                "routeKey is too long, expected length <={MAX_ROUTE_KEY_LENGTH}"
            )));
        }

        Ok(())
    }

    pub fn validate_header_and_text(&self) -> Result<(), ValidationError> {
        if self.header.is_empty() && self.text.is_empty() {
            return Err(ValidationError::new("header and text cannot both be empty"));
        }

        Ok(())
    }

    pub fn validate_icon(&self) -> Result<(), ValidationError> {
        if self.icon_emoji.is_empty() {
            return Ok(());
        }

        if !ICON_REGEX.is_match(&self.icon_emoji) {
            return Err(ValidationError::new(format!(
                "iconEmoji '{}' is not valid",
                self.icon_emoji
            )));
        }

        Ok(())
    }

    pub fn validate_link(&self) -> Result<(), ValidationError> {
        if self.link.is_empty() {
            return Ok(());
        }

        match Url::parse(&self.link) {
            Ok(url) if !url.scheme().is_empty() => Ok(()),
            _ => Err(ValidationError::new("link is not a valid absolute URL")),
        }
    }

    pub fn validate_severity(&self) -> Result<(), ValidationError> {
        if !self.severity.is_valid() {
            return Err(ValidationError::new(format!(
                "severity '{}' is not valid, expected one of [{}]",
                self.severity,
                VALID_SEVERITIES.join(", ")
            )));
        }

        Ok(())
    }

    pub fn validate_correlation_id(&self) -> Result<(), ValidationError> {
        if self.correlation_id.chars().count() > MAX_CORRELATION_ID_LENGTH {
            return Err(ValidationError::new(format!(
                "correlationId is too long, expected length <={MAX_CORRELATION_ID_LENGTH}"
            )));
        }

        Ok(())
    }

    /// Validates the auto-resolve range. Only enforced when issue
    /// follow-up is enabled.
    pub fn validate_auto_resolve(&self) -> Result<(), ValidationError> {
        if !self.issue_follow_up_enabled {
            return Ok(());
        }

        if self.auto_resolve_seconds < MIN_AUTO_RESOLVE_SECONDS {
            return Err(ValidationError::new(format!(
                "autoResolveSeconds {} is too low, expected value >={MIN_AUTO_RESOLVE_SECONDS}",
                self.auto_resolve_seconds
            )));
        }

        if self.auto_resolve_seconds > MAX_AUTO_RESOLVE_SECONDS {
            return Err(ValidationError::new(format!(
                "autoResolveSeconds {} is too high, expected value <={MAX_AUTO_RESOLVE_SECONDS}",
                self.auto_resolve_seconds
            )));
        }

        Ok(())
    }

    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        if self.fields.len() > MAX_FIELD_COUNT {
            return Err(ValidationError::new(format!(
                "too many fields, expected <={MAX_FIELD_COUNT}"
            )));
        }

        Ok(())
    }

    pub fn validate_webhooks(&self) -> Result<(), ValidationError> {
        if self.webhooks.len() > MAX_WEBHOOK_COUNT {
            return Err(ValidationError::new(format!(
                "too many webhooks, expected <={MAX_WEBHOOK_COUNT}"
            )));
        }

        let mut webhook_ids = HashSet::new();

        for (index, hook) in self.webhooks.iter().enumerate() {
            hook.validate_id(index)?;

            if !webhook_ids.insert(hook.id.clone()) {
                return Err(ValidationError::new(format!(
                    "webhook[{index}].id must be unique"
                )));
            }

            hook.validate(index)?;
        }

        Ok(())
    }

    pub fn validate_escalation(&self) -> Result<(), ValidationError> {
        if self.escalation.len() > MAX_ESCALATION_COUNT {
            return Err(ValidationError::new(format!(
                "too many escalation points, expected <={MAX_ESCALATION_COUNT}"
            )));
        }

        let mut previous_delay = 0;

        for (index, escalation) in self.escalation.iter().enumerate() {
            if escalation.delay_seconds < MIN_ESCALATION_DELAY_SECONDS {
                return Err(ValidationError::new(format!(
                    "escalation[{index}].delaySeconds '{}' is too low, expected value >={MIN_ESCALATION_DELAY_SECONDS}",
                    escalation.delay_seconds
                )));
            }

            if previous_delay > 0
                && escalation.delay_seconds - previous_delay < MIN_ESCALATION_DELAY_DIFF_SECONDS
            {
                return Err(ValidationError::new(format!(
                    "escalation[{index}].delaySeconds '{}' is too small compared to previous escalation, expected diff >={MIN_ESCALATION_DELAY_DIFF_SECONDS}",
                    escalation.delay_seconds
                )));
            }

            previous_delay = escalation.delay_seconds;

            if escalation.severity != AlertSeverity::PANIC
                && escalation.severity != AlertSeverity::ERROR
                && escalation.severity != AlertSeverity::WARNING
            {
                return Err(ValidationError::new(format!(
                    "escalation[{index}].severity '{}' is not valid, expected one of [panic, error, warning]",
                    escalation.severity
                )));
            }

            if escalation.slack_mentions.len() > MAX_ESCALATION_SLACK_MENTION_COUNT {
                return Err(ValidationError::new(format!(
                    "escalation[{index}].slackMentions item count is too large, expected <={MAX_ESCALATION_SLACK_MENTION_COUNT}"
                )));
            }

            for (mention_index, mention) in escalation.slack_mentions.iter().enumerate() {
                if !SLACK_MENTION_REGEX.is_match(mention) {
                    return Err(ValidationError::new(format!(
                        "escalation[{index}].slackMentions[{mention_index}] is not valid"
                    )));
                }
            }

            if !escalation.move_to_channel.is_empty()
                && !SLACK_CHANNEL_ID_OR_NAME_REGEX.is_match(&escalation.move_to_channel)
            {
                return Err(ValidationError::new(format!(
                    "escalation[{index}].moveToChannel is not valid"
                )));
            }
        }

        Ok(())
    }

    pub fn validate_ignore_if_text_contains(&self) -> Result<(), ValidationError> {
        if self.ignore_if_text_contains.len() > MAX_IGNORE_IF_TEXT_CONTAINS_COUNT {
            return Err(ValidationError::new(format!(
                "too many ignoreIfTextContains items, expected <={MAX_IGNORE_IF_TEXT_CONTAINS_COUNT}"
            )));
        }

        for (index, substring) in self.ignore_if_text_contains.iter().enumerate() {
            if substring.chars().count() > MAX_IGNORE_IF_TEXT_CONTAINS_LENGTH {
                return Err(ValidationError::new(format!(
                    "ignoreIfTextContains[{index}] is too long, expected length <={MAX_IGNORE_IF_TEXT_CONTAINS_LENGTH}"
                )));
            }
        }

        Ok(())
    }
}

/// Truncates to at most `max_runes` characters, never splitting a
/// multi-byte character.
fn truncate_runes(s: &str, max_runes: usize) -> &str {
    match s.char_indices().nth(max_runes) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

/// Truncates an alert text body, leaving room to re-append a trailing code
/// fence after the ellipsis when the text ends in one.
fn shorten_alert_text_if_needed(text: &mut String) {
    if text.chars().count() <= MAX_TEXT_LENGTH {
        return;
    }

    *text = if text.ends_with("```") {
        format!("{}...```", truncate_runes(text, MAX_TEXT_LENGTH - 6).trim())
    } else {
        format!("{}...", truncate_runes(text, MAX_TEXT_LENGTH - 3).trim())
    };
}

//! Interactive webhook buttons attached to an issue's Slack post.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::crypto;
use crate::error::{CryptoError, ValidationError};

pub const MAX_WEBHOOK_COUNT: usize = 5;
pub const MAX_WEBHOOK_ID_LENGTH: usize = 100;
pub const MAX_WEBHOOK_URL_LENGTH: usize = 1000;
pub const MAX_WEBHOOK_BUTTON_TEXT_LENGTH: usize = 25;
pub const MAX_WEBHOOK_CONFIRMATION_TEXT_LENGTH: usize = 1000;
pub const MAX_WEBHOOK_PAYLOAD_COUNT: usize = 50;
pub const MAX_WEBHOOK_PLAIN_TEXT_INPUT_COUNT: usize = 10;
pub const MAX_WEBHOOK_CHECKBOX_INPUT_COUNT: usize = 10;
pub const MAX_WEBHOOK_INPUT_ID_LENGTH: usize = 200;
pub const MAX_WEBHOOK_INPUT_DESCRIPTION_LENGTH: usize = 200;
pub const MAX_WEBHOOK_INPUT_LABEL_LENGTH: usize = 200;
pub const MAX_WEBHOOK_INPUT_TEXT_LENGTH: i64 = 3000;
pub const MAX_WEBHOOK_CHECKBOX_OPTION_COUNT: usize = 5;
pub const MAX_WEBHOOK_CHECKBOX_OPTION_TEXT_LENGTH: usize = 50;
pub const MAX_CHECKBOX_OPTION_VALUE_LENGTH: usize = 100;

/// Reserved payload key holding the encrypted payload blob.
pub const ENCRYPTED_PAYLOAD_KEY: &str = "__encrypted_data";

/// Maximum serialized payload size accepted for encryption, in bytes.
pub const MAX_ENCRYPTED_PAYLOAD_BYTES: usize = 2048;

/// The closed set of valid button styles.
pub const VALID_WEBHOOK_BUTTON_STYLES: [&str; 2] = ["primary", "danger"];

/// The closed set of valid access levels.
pub const VALID_WEBHOOK_ACCESS_LEVELS: [&str; 3] =
    ["global_admins", "channel_admins", "channel_members"];

/// The closed set of valid display modes.
pub const VALID_WEBHOOK_DISPLAY_MODES: [&str; 3] = ["always", "open_issue", "resolved_issue"];

/// Visual style of a webhook button. Empty means the Slack default style;
/// the literal `default` is normalized to empty by [`crate::Alert::clean`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookButtonStyle(Cow<'static, str>);

impl WebhookButtonStyle {
    /// Slack button style `primary`.
    pub const PRIMARY: Self = Self(Cow::Borrowed("primary"));

    /// Slack button style `danger`.
    pub const DANGER: Self = Self(Cow::Borrowed("danger"));

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

    #[must_use]
    pub fn is_valid(&self) -> bool {
        VALID_WEBHOOK_BUTTON_STYLES.contains(&self.0.as_ref())
    }
}

impl fmt::Display for WebhookButtonStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is allowed to press a webhook button. Empty means no restriction
/// beyond channel membership as enforced by Slack itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookAccessLevel(Cow<'static, str>);

impl WebhookAccessLevel {
    /// Available only to manager global admins.
    pub const GLOBAL_ADMINS: Self = Self(Cow::Borrowed("global_admins"));

    /// Available to channel admins (and global admins).
    pub const CHANNEL_ADMINS: Self = Self(Cow::Borrowed("channel_admins"));

    /// Available to all members of the channel.
    pub const CHANNEL_MEMBERS: Self = Self(Cow::Borrowed("channel_members"));

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

    #[must_use]
    pub fn is_valid(&self) -> bool {
        VALID_WEBHOOK_ACCESS_LEVELS.contains(&self.0.as_ref())
    }
}

impl fmt::Display for WebhookAccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In which issue states the button is rendered. Empty behaves like
/// `always`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookDisplayMode(Cow<'static, str>);

impl WebhookDisplayMode {
    /// Displayed regardless of issue state.
    pub const ALWAYS: Self = Self(Cow::Borrowed("always"));

    /// Displayed for open issues only.
    pub const OPEN_ISSUE: Self = Self(Cow::Borrowed("open_issue"));

    /// Displayed for resolved issues only.
    pub const RESOLVED_ISSUE: Self = Self(Cow::Borrowed("resolved_issue"));

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

    #[must_use]
    pub fn is_valid(&self) -> bool {
        VALID_WEBHOOK_DISPLAY_MODES.contains(&self.0.as_ref())
    }
}

impl fmt::Display for WebhookDisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An interactive button on an issue's Slack post.
///
/// The URL is either an absolute HTTP(S) endpoint that is called when the
/// button is pressed, or any other ASCII token naming a custom in-process
/// handler registered with the manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Webhook {
    /// Identifier for the button, unique within the alert.
    pub id: String,

    /// HTTP(S) callback URL, or a custom handler token.
    pub url: String,

    /// Optional confirmation dialog text shown before the webhook fires.
    pub confirmation_text: String,

    /// Button label. Required.
    pub button_text: String,

    pub button_style: WebhookButtonStyle,
    pub access_level: WebhookAccessLevel,
    pub display_mode: WebhookDisplayMode,

    /// Opaque payload delivered back in the webhook callback. Consumers
    /// define their own schema. Encrypted before storage via
    /// [`encrypt_payload`](Self::encrypt_payload).
    pub payload: Map<String, Value>,

    pub plain_text_input: Vec<WebhookPlainTextInput>,
    pub checkbox_input: Vec<WebhookCheckboxInput>,
}

/// A free-text input rendered in the webhook confirmation dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookPlainTextInput {
    /// Identifier, unique across all inputs (plain-text and checkbox) of
    /// one webhook.
    pub id: String,
    pub description: String,
    pub min_length: i64,
    pub max_length: i64,
    pub multiline: bool,
    pub initial_value: String,
}

/// A checkbox group rendered in the webhook confirmation dialog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookCheckboxInput {
    /// Identifier, unique across all inputs (plain-text and checkbox) of
    /// one webhook.
    pub id: String,
    pub label: String,
    pub options: Vec<WebhookCheckboxOption>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookCheckboxOption {
    /// Option value, unique within the checkbox input. Required.
    pub value: String,
    pub text: String,
    pub selected: bool,
}

impl Webhook {
    /// Normalizes the webhook in place: trims strings, maps the button
    /// style literal `default` to empty. Called by [`crate::Alert::clean`].
    pub fn clean(&mut self) {
        self.id = self.id.trim().to_string();
        self.button_text = self.button_text.trim().to_string();
        self.url = self.url.trim().to_string();
        self.confirmation_text = self.confirmation_text.trim().to_string();

        if self.button_style.as_str() == "default" {
            self.button_style = WebhookButtonStyle::default();
        }

        for input in &mut self.plain_text_input {
            input.id = input.id.trim().to_string();
            input.description = input.description.trim().to_string();
            input.initial_value = input.initial_value.trim().to_string();
        }

        for input in &mut self.checkbox_input {
            input.id = input.id.trim().to_string();
            input.label = input.label.trim().to_string();
        }
    }

    /// Validates the webhook. `index` is the position of this webhook in
    /// the alert, used to qualify error messages. ID uniqueness across
    /// webhooks is checked at the alert level.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        self.validate_id(index)?;
        self.validate_url(index)?;

        if self.button_text.is_empty() {
            return Err(ValidationError::new(format!(
                "webhook[{index}].buttonText is required"
            )));
        }

        if self.button_text.chars().count() > MAX_WEBHOOK_BUTTON_TEXT_LENGTH {
            return Err(ValidationError::new(format!(
                "webhook[{index}].buttonText is too long, expected length <={MAX_WEBHOOK_BUTTON_TEXT_LENGTH}"
            )));
        }

        if self.confirmation_text.chars().count() > MAX_WEBHOOK_CONFIRMATION_TEXT_LENGTH {
            return Err(ValidationError::new(format!(
                "webhook[{index}].confirmationText is too long, expected length <={MAX_WEBHOOK_CONFIRMATION_TEXT_LENGTH}"
            )));
        }

        if !self.button_style.is_empty() && !self.button_style.is_valid() {
            return Err(ValidationError::new(format!(
                "webhook[{index}].buttonStyle '{}' is not valid, expected empty or one of [{}]",
                self.button_style,
                VALID_WEBHOOK_BUTTON_STYLES.join(", ")
            )));
        }

        if !self.access_level.is_empty() && !self.access_level.is_valid() {
            return Err(ValidationError::new(format!(
                "webhook[{index}].accessLevel '{}' is not valid, expected empty or one of [{}]",
                self.access_level,
                VALID_WEBHOOK_ACCESS_LEVELS.join(", ")
            )));
        }

        if !self.display_mode.is_empty() && !self.display_mode.is_valid() {
            return Err(ValidationError::new(format!(
                "webhook[{index}].displayMode '{}' is not valid, expected empty or one of [{}]",
                self.display_mode,
                VALID_WEBHOOK_DISPLAY_MODES.join(", ")
            )));
        }

        if self.payload.len() > MAX_WEBHOOK_PAYLOAD_COUNT {
            return Err(ValidationError::new(format!(
                "webhook[{index}].payload item count is too large, expected <={MAX_WEBHOOK_PAYLOAD_COUNT}"
            )));
        }

        if self.plain_text_input.len() > MAX_WEBHOOK_PLAIN_TEXT_INPUT_COUNT {
            return Err(ValidationError::new(format!(
                "webhook[{index}].plainTextInput item count is too large, expected <={MAX_WEBHOOK_PLAIN_TEXT_INPUT_COUNT}"
            )));
        }

        if self.checkbox_input.len() > MAX_WEBHOOK_CHECKBOX_INPUT_COUNT {
            return Err(ValidationError::new(format!(
                "webhook[{index}].checkboxInput item count is too large, expected <={MAX_WEBHOOK_CHECKBOX_INPUT_COUNT}"
            )));
        }

        // Input IDs must be unique across the plain-text and checkbox
        // collections combined.
        let mut input_ids = HashSet::new();

        for (input_index, input) in self.plain_text_input.iter().enumerate() {
            input.validate(index, input_index, &mut input_ids)?;
        }

        for (input_index, input) in self.checkbox_input.iter().enumerate() {
            input.validate(index, input_index, &mut input_ids)?;
        }

        Ok(())
    }

    pub(crate) fn validate_id(&self, index: usize) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::new(format!(
                "webhook[{index}].id is required"
            )));
        }

        if self.id.chars().count() > MAX_WEBHOOK_ID_LENGTH {
            return Err(ValidationError::new(format!(
                "webhook[{index}].id is too long, expected length <={MAX_WEBHOOK_ID_LENGTH}"
            )));
        }

        Ok(())
    }

    /// A well-formed absolute HTTP(S) URL is accepted as a remote callback;
    /// anything else is treated as a custom-handler token and must be pure
    /// ASCII with no control bytes.
    fn validate_url(&self, index: usize) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::new(format!(
                "webhook[{index}].url is required"
            )));
        }

        if self.url.chars().count() > MAX_WEBHOOK_URL_LENGTH {
            return Err(ValidationError::new(format!(
                "webhook[{index}].url is too long, expected length <={MAX_WEBHOOK_URL_LENGTH}"
            )));
        }

        if let Ok(parsed) = Url::parse(&self.url) {
            if matches!(parsed.scheme(), "http" | "https") {
                return Ok(());
            }
        }

        if self
            .url
            .chars()
            .any(|c| !c.is_ascii() || c.is_ascii_control())
        {
            return Err(ValidationError::new(format!(
                "webhook[{index}].url contains invalid characters"
            )));
        }

        Ok(())
    }

    /// Encrypts the payload in place, replacing it with a single
    /// [`ENCRYPTED_PAYLOAD_KEY`] entry holding the base64 encoded blob.
    ///
    /// A no-op on an empty payload. The serialized payload must not exceed
    /// [`MAX_ENCRYPTED_PAYLOAD_BYTES`].
    pub fn encrypt_payload(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        if self.payload.is_empty() {
            return Ok(());
        }

        let serialized = serde_json::to_vec(&self.payload)?;

        if serialized.len() > MAX_ENCRYPTED_PAYLOAD_BYTES {
            return Err(CryptoError::PayloadTooLarge {
                actual: serialized.len(),
                max: MAX_ENCRYPTED_PAYLOAD_BYTES,
            });
        }

        let encrypted = crypto::encrypt(key, &serialized)?;

        let mut payload = Map::new();
        payload.insert(
            ENCRYPTED_PAYLOAD_KEY.to_string(),
            Value::String(STANDARD.encode(encrypted)),
        );
        self.payload = payload;

        Ok(())
    }

    /// Decrypts a payload previously stored by
    /// [`encrypt_payload`](Self::encrypt_payload) without mutating the
    /// webhook.
    ///
    /// Returns `Ok(None)` when the payload is empty or carries no
    /// [`ENCRYPTED_PAYLOAD_KEY`] entry, so plaintext-payload webhooks can
    /// coexist with encrypted ones.
    pub fn decrypt_payload(&self, key: &[u8]) -> Result<Option<Map<String, Value>>, CryptoError> {
        let Some(blob) = self
            .payload
            .get(ENCRYPTED_PAYLOAD_KEY)
            .and_then(Value::as_str)
        else {
            return Ok(None);
        };

        let encrypted = STANDARD.decode(blob)?;
        let plaintext = crypto::decrypt(key, &encrypted)?;

        Ok(Some(serde_json::from_slice(&plaintext)?))
    }
}

impl WebhookPlainTextInput {
    fn validate(
        &self,
        webhook_index: usize,
        input_index: usize,
        input_ids: &mut HashSet<String>,
    ) -> Result<(), ValidationError> {
        let path = format!("webhook[{webhook_index}].plainTextInput[{input_index}]");

        if self.id.is_empty() {
            return Err(ValidationError::new(format!("{path}.id is required")));
        }

        if !input_ids.insert(self.id.clone()) {
            return Err(ValidationError::new(format!(
                "{path}.id must be unique among all inputs"
            )));
        }

        if self.id.chars().count() > MAX_WEBHOOK_INPUT_ID_LENGTH {
            return Err(ValidationError::new(format!(
                "{path}.id is too long, expected <={MAX_WEBHOOK_INPUT_ID_LENGTH}"
            )));
        }

        if self.description.chars().count() > MAX_WEBHOOK_INPUT_DESCRIPTION_LENGTH {
            return Err(ValidationError::new(format!(
                "{path}.description is too long, expected <={MAX_WEBHOOK_INPUT_DESCRIPTION_LENGTH}"
            )));
        }

        if self.min_length < 0 {
            return Err(ValidationError::new(format!(
                "{path}.minLength must be >=0"
            )));
        }

        if self.min_length > MAX_WEBHOOK_INPUT_TEXT_LENGTH {
            return Err(ValidationError::new(format!(
                "{path}.minLength must be <={MAX_WEBHOOK_INPUT_TEXT_LENGTH}"
            )));
        }

        if self.max_length < 0 {
            return Err(ValidationError::new(format!(
                "{path}.maxLength must be >=0"
            )));
        }

        if self.max_length > MAX_WEBHOOK_INPUT_TEXT_LENGTH {
            return Err(ValidationError::new(format!(
                "{path}.maxLength must be <={MAX_WEBHOOK_INPUT_TEXT_LENGTH}"
            )));
        }

        if self.max_length < self.min_length {
            return Err(ValidationError::new(format!(
                "{path}.maxLength cannot be smaller than minLength"
            )));
        }

        let initial_len = i64::try_from(self.initial_value.chars().count()).unwrap_or(i64::MAX);

        if initial_len > self.max_length {
            return Err(ValidationError::new(format!(
                "{path}.initialValue cannot be longer than maxLength"
            )));
        }

        if initial_len < self.min_length {
            return Err(ValidationError::new(format!(
                "{path}.initialValue cannot be shorter than minLength"
            )));
        }

        Ok(())
    }
}

impl WebhookCheckboxInput {
    fn validate(
        &self,
        webhook_index: usize,
        input_index: usize,
        input_ids: &mut HashSet<String>,
    ) -> Result<(), ValidationError> {
        let path = format!("webhook[{webhook_index}].checkboxInput[{input_index}]");

        if self.id.is_empty() {
            return Err(ValidationError::new(format!("{path}.id is required")));
        }

        if !input_ids.insert(self.id.clone()) {
            return Err(ValidationError::new(format!(
                "{path}.id must be unique among all inputs"
            )));
        }

        if self.id.chars().count() > MAX_WEBHOOK_INPUT_ID_LENGTH {
            return Err(ValidationError::new(format!(
                "{path}.id is too long, expected <={MAX_WEBHOOK_INPUT_ID_LENGTH}"
            )));
        }

        if self.label.chars().count() > MAX_WEBHOOK_INPUT_LABEL_LENGTH {
            return Err(ValidationError::new(format!(
                "{path}.label is too long, expected <={MAX_WEBHOOK_INPUT_LABEL_LENGTH}"
            )));
        }

        if self.options.len() > MAX_WEBHOOK_CHECKBOX_OPTION_COUNT {
            return Err(ValidationError::new(format!(
                "{path}.options item count is too large, expected <={MAX_WEBHOOK_CHECKBOX_OPTION_COUNT}"
            )));
        }

        let mut values = HashSet::new();

        for (option_index, option) in self.options.iter().enumerate() {
            if option.value.is_empty() {
                return Err(ValidationError::new(format!(
                    "{path}.options[{option_index}].value is required"
                )));
            }

            if option.value.chars().count() > MAX_CHECKBOX_OPTION_VALUE_LENGTH {
                return Err(ValidationError::new(format!(
                    "{path}.options[{option_index}].value is too long, expected <={MAX_CHECKBOX_OPTION_VALUE_LENGTH}"
                )));
            }

            if !values.insert(option.value.clone()) {
                return Err(ValidationError::new(format!(
                    "{path}.options[{option_index}].value must be unique"
                )));
            }

            if option.text.chars().count() > MAX_WEBHOOK_CHECKBOX_OPTION_TEXT_LENGTH {
                return Err(ValidationError::new(format!(
                    "{path}.options[{option_index}].text is too long, expected <={MAX_WEBHOOK_CHECKBOX_OPTION_TEXT_LENGTH}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &[u8] = b"passphrasewhichneedstobe32bytes!";

    fn valid_webhook() -> Webhook {
        Webhook {
            id: "restart".to_string(),
            url: "https://example.com/webhook/restart".to_string(),
            button_text: "Restart".to_string(),
            ..Webhook::default()
        }
    }

    #[test]
    fn test_valid_webhook() {
        assert!(valid_webhook().validate(0).is_ok());
    }

    #[test]
    fn test_custom_handler_token_url() {
        let mut hook = valid_webhook();
        hook.url = "my-handler:action".to_string();
        assert!(hook.validate(0).is_ok());
    }

    #[test]
    fn test_url_with_nul_byte() {
        let mut hook = valid_webhook();
        hook.url = "my-handler\0action".to_string();
        let err = hook.validate(0).unwrap_err();
        assert!(err.message().contains("invalid characters"), "{err}");
    }

    #[test]
    fn test_url_with_non_ascii() {
        let mut hook = valid_webhook();
        hook.url = "håndtering".to_string();
        let err = hook.validate(0).unwrap_err();
        assert!(err.message().contains("invalid characters"), "{err}");
    }

    #[test]
    fn test_url_required() {
        let mut hook = valid_webhook();
        hook.url = String::new();
        let err = hook.validate(0).unwrap_err();
        assert!(err.message().contains("webhook[0].url is required"), "{err}");
    }

    #[test]
    fn test_button_style_default_cleaned() {
        let mut hook = valid_webhook();
        hook.button_style = WebhookButtonStyle::new("default");
        hook.clean();
        assert!(hook.button_style.is_empty());
        assert!(hook.validate(0).is_ok());
    }

    #[test]
    fn test_invalid_button_style() {
        let mut hook = valid_webhook();
        hook.button_style = WebhookButtonStyle::new("fancy");
        let err = hook.validate(0).unwrap_err();
        assert!(err.message().contains("buttonStyle 'fancy' is not valid"), "{err}");
    }

    #[test]
    fn test_input_ids_unique_across_collections() {
        let mut hook = valid_webhook();
        hook.plain_text_input = vec![WebhookPlainTextInput {
            id: "reason".to_string(),
            max_length: 100,
            ..WebhookPlainTextInput::default()
        }];
        hook.checkbox_input = vec![WebhookCheckboxInput {
            id: "reason".to_string(),
            options: vec![WebhookCheckboxOption {
                value: "a".to_string(),
                ..WebhookCheckboxOption::default()
            }],
            ..WebhookCheckboxInput::default()
        }];

        let err = hook.validate(0).unwrap_err();
        assert!(
            err.message()
                .contains("webhook[0].checkboxInput[0].id must be unique among all inputs"),
            "{err}"
        );
    }

    #[test]
    fn test_plain_text_input_bounds() {
        let mut hook = valid_webhook();
        hook.plain_text_input = vec![WebhookPlainTextInput {
            id: "reason".to_string(),
            min_length: 10,
            max_length: 5,
            ..WebhookPlainTextInput::default()
        }];
        let err = hook.validate(0).unwrap_err();
        assert!(
            err.message().contains("maxLength cannot be smaller than minLength"),
            "{err}"
        );

        hook.plain_text_input = vec![WebhookPlainTextInput {
            id: "reason".to_string(),
            min_length: 3,
            max_length: 5,
            initial_value: "x".to_string(),
            ..WebhookPlainTextInput::default()
        }];
        let err = hook.validate(0).unwrap_err();
        assert!(
            err.message().contains("initialValue cannot be shorter than minLength"),
            "{err}"
        );
    }

    #[test]
    fn test_checkbox_option_values_unique() {
        let mut hook = valid_webhook();
        hook.checkbox_input = vec![WebhookCheckboxInput {
            id: "opts".to_string(),
            options: vec![
                WebhookCheckboxOption {
                    value: "a".to_string(),
                    ..WebhookCheckboxOption::default()
                },
                WebhookCheckboxOption {
                    value: "a".to_string(),
                    ..WebhookCheckboxOption::default()
                },
            ],
            ..WebhookCheckboxInput::default()
        }];
        let err = hook.validate(0).unwrap_err();
        assert!(
            err.message()
                .contains("webhook[0].checkboxInput[0].options[1].value must be unique"),
            "{err}"
        );
    }

    #[test]
    fn test_payload_round_trip() {
        let mut hook = Webhook::default();
        hook.payload.insert("foo".to_string(), json!("bar"));
        hook.payload.insert("val".to_string(), json!(1));
        hook.payload.insert("something".to_string(), json!(true));
        hook.payload.insert("else".to_string(), json!(["a", "b"]));

        hook.encrypt_payload(KEY).unwrap();

        assert_eq!(hook.payload.len(), 1);
        let blob = hook.payload[ENCRYPTED_PAYLOAD_KEY].as_str().unwrap();
        assert!(!blob.is_empty());

        let payload = hook.decrypt_payload(KEY).unwrap().unwrap();
        assert_eq!(payload["foo"], json!("bar"));
        assert_eq!(payload["val"], json!(1));
        assert_eq!(payload["something"], json!(true));
        assert_eq!(payload["else"], json!(["a", "b"]));
    }

    #[test]
    fn test_encrypt_empty_payload_is_noop() {
        let mut hook = Webhook::default();
        hook.encrypt_payload(KEY).unwrap();
        assert!(hook.payload.is_empty());
    }

    #[test]
    fn test_decrypt_plaintext_payload_returns_none() {
        let mut hook = Webhook::default();
        hook.payload.insert("foo".to_string(), json!("bar"));
        assert!(hook.decrypt_payload(KEY).unwrap().is_none());
    }

    #[test]
    fn test_encrypt_oversized_payload() {
        let mut hook = Webhook::default();
        hook.payload
            .insert("big".to_string(), json!("x".repeat(3000)));

        assert!(matches!(
            hook.encrypt_payload(KEY),
            Err(CryptoError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_decrypt_with_wrong_key_length() {
        let mut hook = Webhook::default();
        hook.payload.insert("foo".to_string(), json!("bar"));
        hook.encrypt_payload(KEY).unwrap();

        assert!(matches!(
            hook.decrypt_payload(b"short"),
            Err(CryptoError::InvalidKeyLength { .. })
        ));
    }

    #[test]
    fn test_enum_closure() {
        for s in VALID_WEBHOOK_BUTTON_STYLES {
            assert!(WebhookButtonStyle::new(s).is_valid());
        }
        assert!(!WebhookButtonStyle::new("Primary").is_valid());
        assert!(!WebhookButtonStyle::new("default").is_valid());
        assert!(!WebhookButtonStyle::new("").is_valid());

        for s in VALID_WEBHOOK_ACCESS_LEVELS {
            assert!(WebhookAccessLevel::new(s).is_valid());
        }
        assert!(!WebhookAccessLevel::new("admins").is_valid());
        assert!(!WebhookAccessLevel::new("GLOBAL_ADMINS").is_valid());

        for s in VALID_WEBHOOK_DISPLAY_MODES {
            assert!(WebhookDisplayMode::new(s).is_valid());
        }
        assert!(!WebhookDisplayMode::new("never").is_valid());
        assert!(!WebhookDisplayMode::new("Always").is_valid());
    }
}

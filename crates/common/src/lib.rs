//! Shared contracts and domain types for the Slack alert manager.
//!
//! This crate is the boundary between alert producers, the manager process
//! and its storage/queue plugins. It defines the data shapes, the
//! normalization and validation rules that guarantee well-formed data
//! reaches storage and the Slack API, and the lifecycle semantics that
//! storage implementations must honor. It performs no I/O itself.
//!
//! # Core domain types
//!
//! [`Alert`] is the central type: one reported event, with severity, header,
//! text, fields, webhooks, escalations and routing information. Use the
//! constructors ([`Alert::new_error`], [`Alert::new_warning`], ...) and
//! always run [`Alert::clean`] followed by [`Alert::validate`] before
//! handing an alert to storage or the Slack API:
//!
//! ```
//! use common::Alert;
//!
//! let mut alert = Alert::new_error();
//! alert.header = "Database connection failed".to_string();
//! alert.text = "Unable to connect to the production database".to_string();
//! alert.slack_channel_id = "C12345678".to_string();
//! alert.issue_follow_up_enabled = true;
//! alert.auto_resolve_seconds = 300;
//!
//! alert.clean();
//! alert.validate().expect("alert is valid");
//! ```
//!
//! Alerts with the same correlation ID are grouped into a single issue by
//! the manager, backing one evolving Slack post per logical problem.
//!
//! # Contracts
//!
//! [`Issue`] and [`MoveMapping`] are capability traits owned by the issue
//! store; [`IssueStore`] is the async persistence contract that database
//! plugins implement, and [`FifoQueue`] the transport contract for queue
//! plugins. The invariants each implementation must uphold are documented
//! on the traits themselves.
//!
//! # Webhooks
//!
//! [`Webhook`] describes an interactive button attached to an issue's Slack
//! post (not an inbound HTTP notification). Button payloads are encrypted
//! before storage with [`Webhook::encrypt_payload`] and surface back to the
//! handler through [`WebhookCallback`] when a user presses the button.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alert;
pub mod callback;
pub mod channel_state;
pub mod crypto;
pub mod error;
pub mod fingerprint;
pub mod issue;
pub mod queue;
pub mod severity;
pub mod store;
pub mod webhook;

pub use alert::{Alert, Escalation, Field};
pub use callback::WebhookCallback;
pub use channel_state::ChannelProcessingState;
pub use error::{CryptoError, ValidationError};
pub use issue::{Issue, MoveMapping};
pub use queue::{FifoQueue, FifoQueueItem};
pub use severity::AlertSeverity;
pub use store::IssueStore;
pub use webhook::{
    Webhook, WebhookAccessLevel, WebhookButtonStyle, WebhookCheckboxInput, WebhookCheckboxOption,
    WebhookDisplayMode, WebhookPlainTextInput,
};

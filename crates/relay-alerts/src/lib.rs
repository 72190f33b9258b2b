//! Relay of AWS SNS notifications to a Slack-compatible chat webhook.
//!
//! `relay-alerts` takes the records of an SNS delivery, works out what kind
//! of AWS notification each one carries and posts a formatted chat message
//! for it.
//!
//! # Features
//!
//! - **Classification**: CloudWatch alarms, GuardDuty findings, EC2 state
//!   changes and budget alerts are recognized by shape; anything else is
//!   relayed as a generic notification
//! - **Rendering**: Slack attachment payloads with severity colors
//! - **Delivery**: Blocking webhook POSTs with a bounded timeout
//! - **Structured results**: Per-record outcomes folded into a
//!   `{statusCode, body}` response
//!
//! # Example
//!
//! ```rust
//! use relay_alerts::{AlertFormatter, AlertKind, Color, FixedClock};
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//!
//! let formatter = AlertFormatter::new(FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
//!
//! let payload = json!({
//!     "source": "aws.guardduty",
//!     "detail": {"type": "Recon:EC2/PortProbeUnprotectedPort", "severity": 5},
//!     "region": "eu-west-1"
//! });
//!
//! let message = formatter.classify_and_render(&payload, Some("GuardDuty"));
//! assert_eq!(message.text, "🚨 AWS Alert: GuardDuty");
//! assert_eq!(message.attachments[0].color, Color::Warning);
//! assert_eq!(relay_alerts::classify(&payload, "GuardDuty"), AlertKind::GuardDutyFinding);
//! ```
//!
//! # Relaying a batch
//!
//! ```rust,no_run
//! use relay_alerts::{Dispatcher, RelayConfig, WebhookNotifier};
//!
//! let config = RelayConfig::from_env()?;
//! let notifier = WebhookNotifier::new(&config)?;
//! let dispatcher = Dispatcher::new(config, notifier);
//!
//! let event = std::fs::read_to_string("event.json").unwrap_or_default();
//! let response = dispatcher.handle_event_json(&event);
//! println!("{} {}", response.status_code, response.body);
//! # Ok::<(), relay_alerts::RelayError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channels;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod formatter;
pub mod samples;
pub mod types;

// Re-export main types at crate root
pub use channels::{LogNotifier, OutboundNotifier, WebhookNotifier, WebhookResponse};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::RelayConfig;
pub use dispatcher::{BatchOutcome, DeliveryOutcome, Dispatcher, HandlerResponse};
pub use error::{RelayError, Result};
pub use event::{NotificationBatch, NotificationRecord, SnsEvent};
pub use formatter::{AlertFormatter, RenderedAlert, classify};
pub use types::{AlertKind, Attachment, Color, Field, RenderedMessage, SeverityBand};

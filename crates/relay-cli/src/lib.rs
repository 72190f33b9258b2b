//! # relay-cli
//!
//! Command-line front end for `relay-alerts`.
//!
//! Provides commands for:
//! - Relaying an SNS event to the configured webhook
//! - Previewing how an event renders, with no network activity
//! - Printing sample events for each notification kind
//! - Posting a connection-test message to a webhook
//!
//! The webhook URL and timeout come from the environment
//! (`SLACK_WEBHOOK_URL`, `WEBHOOK_URL`, `WEBHOOK_TIMEOUT_SECS`) and can be
//! overridden per invocation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, EventArgs, Format, HandleArgs, SampleKind, WebhookArgs};
pub use error::CliError;
pub use output::OutputFormat;

//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`handle`] - Relay an SNS event to the webhook
//! - [`render`] - Preview rendering without network activity
//! - [`sample`] - Print sample SNS events
//! - [`test_webhook`] - Post a connection-test message

pub mod handle;
pub mod render;
pub mod sample;
pub mod test_webhook;

pub use handle::HandleCommand;
pub use render::RenderCommand;
pub use sample::SampleCommand;
pub use test_webhook::TestWebhookCommand;

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use relay_alerts::RelayConfig;

use crate::cli::{EventArgs, WebhookArgs};
use crate::error::CliError;

/// Reads the raw event text from the file named in `args`, or from `stdin`.
///
/// # Errors
///
/// Returns an IO error if the source cannot be read.
pub fn read_event<R: Read>(args: &EventArgs, stdin: &mut R) -> Result<String, CliError> {
    match args.event.as_deref() {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut raw = String::new();
            stdin.read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

/// Loads the relay configuration from the environment and applies flag overrides.
///
/// # Errors
///
/// Returns a configuration error if a URL or timeout is invalid.
pub fn relay_config(args: &WebhookArgs) -> Result<RelayConfig, CliError> {
    let mut config = RelayConfig::from_env()?;
    if let Some(url) = &args.webhook_url {
        config = config.with_webhook_url(url)?;
    }
    if let Some(secs) = args.timeout_secs.filter(|s| *s > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

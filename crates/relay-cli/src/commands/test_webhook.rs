//! Test-webhook command implementation.
//!
//! Posts a fixed connection-test message so an operator can confirm the
//! endpoint and channel before wiring up SNS.

use std::io::Write;

use relay_alerts::{
    OutboundNotifier, RelayError, SystemClock, WebhookNotifier, samples::connection_test_message,
};
use tracing::info;

use super::relay_config;
use crate::cli::WebhookArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, WebhookCheck};

/// Test-webhook command executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestWebhookCommand;

impl TestWebhookCommand {
    /// Execute the test-webhook command.
    ///
    /// # Errors
    ///
    /// Returns an error if no webhook URL is configured or output fails.
    /// An endpoint that rejects the message is reported in the output.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &WebhookArgs,
    ) -> Result<WebhookCheck, CliError> {
        let config = relay_config(args)?;
        let url = config.require_webhook_url()?;
        let notifier = WebhookNotifier::new(&config)?;

        info!(notifier = %notifier.name(), "sending connection test");
        let check = match notifier.send(url, &connection_test_message(&SystemClock)) {
            Ok(response) => WebhookCheck {
                delivered: response.is_success(),
                status_code: Some(response.status_code),
                detail: response.body,
            },
            Err(err) => WebhookCheck {
                delivered: false,
                status_code: match &err {
                    RelayError::Delivery { status_code, .. } => *status_code,
                    _ => None,
                },
                detail: err.to_string(),
            },
        };
        format.write(writer, &check)?;
        Ok(check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;

    #[test]
    fn unreachable_endpoint_is_reported() {
        let args = WebhookArgs {
            webhook_url: Some("http://127.0.0.1:1/hook".into()),
            timeout_secs: Some(2),
        };
        let mut out = Vec::new();

        let check = TestWebhookCommand
            .execute(&mut out, &OutputFormat::new(Format::Text), &args)
            .unwrap();

        assert!(!check.delivered);
        assert_eq!(check.status_code, None);
        assert!(String::from_utf8(out).unwrap().starts_with("FAILED (no response)"));
    }
}

//! Handle command implementation.
//!
//! Reads an SNS event, relays every record and prints the handler response.

use std::io::{Read, Write};

use relay_alerts::{
    BatchOutcome, Dispatcher, HandlerResponse, LogNotifier, RelayConfig, WebhookNotifier,
};
use tracing::debug;

use super::{read_event, relay_config};
use crate::cli::HandleArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handle command executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandleCommand {
    dry_run: bool,
}

impl HandleCommand {
    /// Create a new handle command.
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Execute the handle command.
    ///
    /// Configuration and delivery problems are reported in the returned
    /// response, not as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be read or output fails.
    pub fn execute<W: Write, R: Read>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &HandleArgs,
        stdin: &mut R,
    ) -> Result<HandlerResponse, CliError> {
        let raw = read_event(&args.event, stdin)?;
        let response = match relay_config(&args.webhook) {
            Ok(config) => self.dispatch(config, &raw),
            Err(CliError::Relay(err)) => BatchOutcome::aborted(err).to_response(),
            Err(other) => return Err(other),
        };
        format.write(writer, &response)?;
        Ok(response)
    }

    fn dispatch(&self, config: RelayConfig, raw: &str) -> HandlerResponse {
        if self.dry_run {
            debug!("dry run, messages are logged instead of posted");
            return Dispatcher::new(config, LogNotifier::new("dry-run")).handle_event_json(raw);
        }
        match WebhookNotifier::new(&config) {
            Ok(notifier) => Dispatcher::new(config, notifier).handle_event_json(raw),
            Err(err) => BatchOutcome::aborted(err).to_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{EventArgs, Format, WebhookArgs};
    use relay_alerts::{AlertKind, samples};

    fn args() -> HandleArgs {
        HandleArgs {
            event: EventArgs { event: None },
            webhook: WebhookArgs {
                webhook_url: Some("https://hooks.example.com/services/x".into()),
                timeout_secs: None,
            },
            dry_run: true,
        }
    }

    #[test]
    fn dry_run_reports_success() {
        let event = serde_json::to_string(&samples::sample_event(AlertKind::BudgetAlert)).unwrap();
        let mut out = Vec::new();
        let format = OutputFormat::new(Format::Text);

        let response = HandleCommand::new(true)
            .execute(&mut out, &format, &args(), &mut event.as_bytes())
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "200 Messages sent to webhook successfully\n"
        );
    }

    #[test]
    fn malformed_event_is_a_500_response() {
        let mut out = Vec::new();
        let format = OutputFormat::new(Format::Json);

        let response = HandleCommand::new(true)
            .execute(&mut out, &format, &args(), &mut "not json".as_bytes())
            .unwrap();

        assert_eq!(response.status_code, 500);
        assert!(response.body.starts_with("Error: "));
        assert!(String::from_utf8(out).unwrap().contains("\"statusCode\": 500"));
    }

    #[test]
    fn invalid_url_flag_is_a_500_response() {
        let mut handle_args = args();
        handle_args.webhook.webhook_url = Some("ftp://example.com".into());
        let mut out = Vec::new();

        let response = HandleCommand::new(true)
            .execute(
                &mut out,
                &OutputFormat::default(),
                &handle_args,
                &mut "{\"Records\": []}".as_bytes(),
            )
            .unwrap();

        assert_eq!(response.status_code, 500);
    }
}

//! Render command implementation.
//!
//! Shows what would be posted for each record of an event.

use std::io::{Read, Write};

use relay_alerts::{AlertFormatter, SnsEvent};

use super::read_event;
use crate::cli::EventArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, RenderFailure, RenderReport};

/// Render command executor.
#[derive(Debug, Default)]
pub struct RenderCommand {
    formatter: AlertFormatter,
}

impl RenderCommand {
    /// Create a new render command.
    #[must_use]
    pub fn new() -> Self {
        Self {
            formatter: AlertFormatter::system(),
        }
    }

    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be read, is not an SNS event, or
    /// output fails. Records with undecodable bodies are listed in the report.
    pub fn execute<W: Write, R: Read>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &EventArgs,
        stdin: &mut R,
    ) -> Result<(), CliError> {
        let raw = read_event(args, stdin)?;
        let report = self.report(&raw)?;
        format.write(writer, &report)?;
        Ok(())
    }

    /// Render `raw` into a report.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not an SNS event.
    pub fn report(&self, raw: &str) -> Result<RenderReport, CliError> {
        let batch = SnsEvent::from_json(raw)?.into_batch();
        let mut report = RenderReport::default();
        for (index, result) in self.formatter.render_batch(&batch).into_iter().enumerate() {
            match result {
                Ok(alert) => report.rendered.push(alert),
                Err(err) => report.failed.push(RenderFailure {
                    index,
                    error: err.to_string(),
                }),
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use relay_alerts::{AlertKind, Color, samples};

    #[test]
    fn renders_every_record() {
        let mut event = samples::sample_event(AlertKind::CloudWatchAlarm);
        event
            .records
            .extend(samples::sample_event(AlertKind::GuardDutyFinding).records);
        let raw = serde_json::to_string(&event).unwrap();

        let report = RenderCommand::new().report(&raw).unwrap();

        assert!(report.failed.is_empty());
        assert_eq!(report.rendered.len(), 2);
        assert_eq!(report.rendered[0].kind, AlertKind::CloudWatchAlarm);
        assert_eq!(report.rendered[1].kind, AlertKind::GuardDutyFinding);
        assert_eq!(report.rendered[1].message.attachments[0].color, Color::Danger);
    }

    #[test]
    fn json_and_text_use_the_same_kind_name() {
        let event = samples::sample_event(AlertKind::GuardDutyFinding);
        let raw = serde_json::to_string(&event).unwrap();
        let cmd = RenderCommand::new();

        let stdin_args = EventArgs { event: None };

        let mut json = Vec::new();
        let format = OutputFormat::new(Format::Json);
        cmd.execute(&mut json, &format, &stdin_args, &mut raw.as_bytes())
            .unwrap();
        let mut text = Vec::new();
        let format = OutputFormat::new(Format::Text);
        cmd.execute(&mut text, &format, &stdin_args, &mut raw.as_bytes())
            .unwrap();

        assert!(String::from_utf8(json).unwrap().contains("\"kind\": \"guardduty_finding\""));
        assert!(String::from_utf8(text).unwrap().contains("#0 guardduty_finding"));
    }

    #[test]
    fn undecodable_record_is_reported() {
        let raw = r#"{"Records": [{"Sns": {"Subject": "x", "Message": "plain text"}}]}"#;

        let report = RenderCommand::new().report(raw).unwrap();

        assert!(report.rendered.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].index, 0);
        assert!(report.failed[0].error.contains("not valid JSON"));
    }

    #[test]
    fn non_event_is_an_error() {
        assert!(matches!(
            RenderCommand::new().report("[1, 2"),
            Err(CliError::Relay(_))
        ));
    }
}

//! Output formatting for CLI commands.
//!
//! Supports JSON (for scripting) and plain text output formats.

use std::io::Write;

use relay_alerts::{HandlerResponse, RenderedAlert, SnsEvent};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both text and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TextDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)?;
                writeln!(writer)?;
            }
            Format::Text => value.write_text(writer)?,
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TextDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Json)
    }
}

/// Trait for types that have a human-readable rendering.
pub trait TextDisplay {
    /// Write the value as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TextDisplay for HandlerResponse {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{} {}", self.status_code, self.body)?;
        Ok(())
    }
}

impl TextDisplay for SnsEvent {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        // An event is only useful as JSON; text mode prints it the same way.
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// A record that could not be rendered.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFailure {
    /// Position of the record in its batch.
    pub index: usize,
    /// Why rendering failed.
    pub error: String,
}

/// Result of a dry-run render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    /// Rendered records.
    pub rendered: Vec<RenderedAlert>,
    /// Records that could not be decoded.
    pub failed: Vec<RenderFailure>,
}

impl TextDisplay for RenderReport {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.rendered.is_empty() && self.failed.is_empty() {
            writeln!(writer, "No records in event")?;
            return Ok(());
        }

        for alert in &self.rendered {
            writeln!(writer, "#{} {}", alert.index, alert.kind)?;
            writeln!(writer, "{}", alert.message.text)?;
            for attachment in &alert.message.attachments {
                writeln!(writer, "  [{}] {}", attachment.color, attachment.title)?;
                for field in &attachment.fields {
                    writeln!(writer, "    {}: {}", field.title, truncate(&field.value, 120))?;
                }
                if let Some(text) = &attachment.text {
                    for line in text.lines() {
                        writeln!(writer, "    {line}")?;
                    }
                }
            }
            writeln!(writer)?;
        }

        for failure in &self.failed {
            writeln!(writer, "#{} failed: {}", failure.index, failure.error)?;
        }
        Ok(())
    }
}

/// Result of a connection test.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookCheck {
    /// Whether the endpoint answered 2xx.
    pub delivered: bool,
    /// Status returned by the endpoint, if any.
    pub status_code: Option<u16>,
    /// Response body or error description.
    pub detail: String,
}

impl TextDisplay for WebhookCheck {
    fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let status = self
            .status_code
            .map_or_else(|| "no response".to_string(), |c| c.to_string());
        if self.delivered {
            writeln!(writer, "OK ({status}): check the channel for the test message")?;
        } else {
            writeln!(writer, "FAILED ({status}): {}", self.detail)?;
        }
        Ok(())
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars > 3 {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_alerts::{AlertKind, Attachment, Color, Field, RenderedMessage};

    fn report() -> RenderReport {
        RenderReport {
            rendered: vec![RenderedAlert {
                index: 0,
                kind: AlertKind::Ec2StateChange,
                message: RenderedMessage::new(
                    "🚨 AWS Alert: EC2",
                    Attachment::new(Color::Warning, "🖥️ EC2 Instance State Change")
                        .field(Field::short("State", "Stopped")),
                ),
            }],
            failed: vec![RenderFailure {
                index: 1,
                error: "decode error: bad".into(),
            }],
        }
    }

    #[test]
    fn output_format_default_is_json() {
        let fmt = OutputFormat::default();
        assert_eq!(fmt.format(), Format::Json);
    }

    #[test]
    fn handler_response_json_output() {
        let fmt = OutputFormat::new(Format::Json);
        let output = fmt.to_string(&HandlerResponse::ok("done")).expect("should format");

        assert!(output.contains("\"statusCode\": 200"));
        assert!(output.contains("\"body\": \"done\""));
    }

    #[test]
    fn handler_response_text_output() {
        let fmt = OutputFormat::new(Format::Text);
        let output = fmt.to_string(&HandlerResponse::error("Error: x")).expect("should format");
        assert_eq!(output, "500 Error: x\n");
    }

    #[test]
    fn render_report_text_output() {
        let fmt = OutputFormat::new(Format::Text);
        let output = fmt.to_string(&report()).expect("should format");

        assert!(output.contains("#0 ec2_state_change"));
        assert!(output.contains("[warning] 🖥️ EC2 Instance State Change"));
        assert!(output.contains("    State: Stopped"));
        assert!(output.contains("#1 failed: decode error: bad"));
    }

    #[test]
    fn render_report_json_output() {
        let fmt = OutputFormat::new(Format::Json);
        let output = fmt.to_string(&report()).expect("should format");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");

        assert_eq!(value["rendered"][0]["kind"], "ec2_state_change");
        assert_eq!(value["rendered"][0]["message"]["attachments"][0]["color"], "warning");
        assert_eq!(value["failed"][0]["index"], 1);
    }

    #[test]
    fn empty_report_text() {
        let fmt = OutputFormat::new(Format::Text);
        let output = fmt.to_string(&RenderReport::default()).expect("should format");
        assert_eq!(output, "No records in event\n");
    }

    #[test]
    fn webhook_check_text() {
        let fmt = OutputFormat::new(Format::Text);
        let check = WebhookCheck {
            delivered: false,
            status_code: None,
            detail: "connection refused".into(),
        };
        let output = fmt.to_string(&check).expect("should format");
        assert_eq!(output, "FAILED (no response): connection refused\n");
    }

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("🚨🚨🚨🚨🚨", 4), "🚨...");
    }
}

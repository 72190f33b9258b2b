//! Classification and rendering of AWS notification payloads.
//!
//! [`AlertFormatter`] inspects the shape of a decoded payload, decides which
//! [`AlertKind`] it represents and renders a [`RenderedMessage`] for a
//! Slack-compatible webhook. It never fails: payloads it does not recognize
//! render as [`AlertKind::Generic`], and missing keys only change which
//! default is shown.
//!
//! Classification rules are checked in a fixed order and the first match wins:
//!
//! 1. `AlarmName` key present: CloudWatch alarm
//! 2. `source == "aws.guardduty"`: GuardDuty finding
//! 3. `source == "aws.ec2"`: EC2 state change
//! 4. `budgetName` key present, or the subject contains `"Budget"`: budget alert
//! 5. anything else: generic
//!
//! The budget subject check is a loose substring match, so it has to stay
//! behind the three source-specific checks.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::event::{NotificationBatch, NotificationRecord};
use crate::types::{AlertKind, Attachment, Color, Field, RenderedMessage, SeverityBand};

/// Subject used when a record carries none.
pub const DEFAULT_SUBJECT: &str = "AWS Alert";

/// Prefix of every rendered summary line.
pub const TEXT_PREFIX: &str = "🚨 AWS Alert: ";

const UNKNOWN: &str = "Unknown";

/// A record after classification and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedAlert {
    /// Position of the record in its batch.
    pub index: usize,
    /// The detected kind.
    pub kind: AlertKind,
    /// The message that would be posted.
    pub message: RenderedMessage,
}

/// Renders AWS notification payloads into chat messages.
#[derive(Debug, Clone, Default)]
pub struct AlertFormatter<C = SystemClock> {
    clock: C,
}

impl AlertFormatter<SystemClock> {
    /// Creates a formatter backed by the wall clock.
    #[must_use]
    pub const fn system() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> AlertFormatter<C> {
    /// Creates a formatter with the given clock.
    #[must_use]
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Classifies `payload` and renders it.
    ///
    /// `subject` falls back to [`DEFAULT_SUBJECT`] when absent or empty.
    #[must_use]
    pub fn classify_and_render(&self, payload: &Value, subject: Option<&str>) -> RenderedMessage {
        let subject = effective_subject(subject);
        let kind = classify(payload, subject);
        self.render(kind, payload, subject)
    }

    /// Decodes and renders one record.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Decode` if the record payload is not valid JSON.
    pub fn render_record(&self, index: usize, record: &NotificationRecord) -> Result<RenderedAlert> {
        let payload = record.decode_payload()?;
        let subject = effective_subject(record.subject.as_deref());
        let kind = classify(&payload, subject);
        Ok(RenderedAlert {
            index,
            kind,
            message: self.render(kind, &payload, subject),
        })
    }

    /// Renders every record of `batch`, keeping per-record failures.
    pub fn render_batch(&self, batch: &NotificationBatch) -> Vec<Result<RenderedAlert>> {
        batch
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| self.render_record(index, record))
            .collect()
    }

    /// Renders `payload` as the given kind.
    #[must_use]
    pub fn render(&self, kind: AlertKind, payload: &Value, subject: &str) -> RenderedMessage {
        let fields = payload.as_object();
        let attachment = match kind {
            AlertKind::CloudWatchAlarm => self.render_cloudwatch(fields),
            AlertKind::GuardDutyFinding => render_guardduty(fields),
            AlertKind::Ec2StateChange => render_ec2(fields),
            AlertKind::BudgetAlert => render_budget(payload),
            AlertKind::Generic => render_generic(payload),
        };
        RenderedMessage::new(format!("{TEXT_PREFIX}{subject}"), attachment)
    }

    fn render_cloudwatch(&self, msg: Option<&Map<String, Value>>) -> Attachment {
        let state = lookup(msg, "NewStateValue");
        let color = if state.and_then(Value::as_str) == Some("ALARM") {
            Color::Danger
        } else {
            Color::Good
        };
        let timestamp = lookup(msg, "StateChangeTime")
            .map_or_else(|| self.clock.now_iso8601(), display_value);

        Attachment::new(
            color,
            format!("CloudWatch Alarm: {}", text_or(msg, "AlarmName", UNKNOWN)),
        )
        .field(Field::short("State", text_or(msg, "NewStateValue", UNKNOWN)))
        .field(Field::long(
            "Reason",
            text_or(msg, "NewStateReason", "No reason provided"),
        ))
        .field(Field::short("Region", text_or(msg, "Region", UNKNOWN)))
        .field(Field::short("Timestamp", timestamp))
    }
}

/// Returns the subject that should be shown for a record.
#[must_use]
pub fn effective_subject(subject: Option<&str>) -> &str {
    match subject {
        Some(s) if !s.is_empty() => s,
        _ => DEFAULT_SUBJECT,
    }
}

/// Decides which kind of alert `payload` represents.
///
/// Non-object payloads have no keys, so they can only be budget alerts (by
/// subject) or generic.
#[must_use]
pub fn classify(payload: &Value, subject: &str) -> AlertKind {
    let msg = payload.as_object();
    let source = lookup(msg, "source").and_then(Value::as_str);

    if msg.is_some_and(|m| m.contains_key("AlarmName")) {
        AlertKind::CloudWatchAlarm
    } else if source == Some("aws.guardduty") {
        AlertKind::GuardDutyFinding
    } else if source == Some("aws.ec2") {
        AlertKind::Ec2StateChange
    } else if msg.is_some_and(|m| m.contains_key("budgetName")) || subject.contains("Budget") {
        AlertKind::BudgetAlert
    } else {
        AlertKind::Generic
    }
}

fn render_guardduty(msg: Option<&Map<String, Value>>) -> Attachment {
    let detail = detail(msg);
    let (score, shown) = severity(detail);
    let band = SeverityBand::from_score(score);

    Attachment::new(
        band.color(),
        format!("🛡️ GuardDuty Finding: {}", text_or(detail, "type", UNKNOWN)),
    )
    .field(Field::short("Severity", format!("{band} ({shown})")))
    .field(Field::long(
        "Description",
        text_or(detail, "description", "No description available"),
    ))
    .field(Field::short("Region", text_or(msg, "region", UNKNOWN)))
}

fn render_ec2(msg: Option<&Map<String, Value>>) -> Attachment {
    let detail = detail(msg);
    let state = text_or(detail, "state", "unknown");
    let color = match state.as_str() {
        "running" => Color::Good,
        "stopping" | "stopped" => Color::Warning,
        _ => Color::Danger,
    };

    Attachment::new(color, "🖥️ EC2 Instance State Change")
        .field(Field::short(
            "Instance ID",
            text_or(detail, "instance-id", UNKNOWN),
        ))
        .field(Field::short("State", title_case(&state)))
        .field(Field::short("Region", text_or(msg, "region", UNKNOWN)))
}

fn render_budget(payload: &Value) -> Attachment {
    Attachment::new(Color::Warning, "💰 AWS Budget Alert")
        .field(Field::short("Alert Type", "Budget Threshold Exceeded"))
        .field(Field::long("Details", payload.to_string()))
}

fn render_generic(payload: &Value) -> Attachment {
    let body = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    Attachment::new(Color::Warning, "AWS Notification").with_text(body)
}

/// Reads a key, treating JSON `null` as absent.
fn lookup<'a>(msg: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    msg.and_then(|m| m.get(key)).filter(|v| !v.is_null())
}

fn text_or(msg: Option<&Map<String, Value>>, key: &str, default: &str) -> String {
    lookup(msg, key).map_or_else(|| default.to_string(), display_value)
}

fn detail(msg: Option<&Map<String, Value>>) -> Option<&Map<String, Value>> {
    lookup(msg, "detail").and_then(Value::as_object)
}

/// Strings render bare; every other value renders as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Returns the numeric severity and the text to show for it.
///
/// Anything that is not a finite number (or a string holding one) counts as 0.
fn severity(detail: Option<&Map<String, Value>>) -> (f64, String) {
    let parsed = match lookup(detail, "severity") {
        Some(Value::Number(n)) => n.as_f64().map(|v| (v, n.to_string())),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<f64>().ok().map(|v| (v, s.to_string()))
        }
        _ => None,
    };

    match parsed {
        Some((score, shown)) if score.is_finite() => (score, shown),
        _ => (0.0, "0".to_string()),
    }
}

/// Capitalizes the first letter of every alphabetic run and lowercases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

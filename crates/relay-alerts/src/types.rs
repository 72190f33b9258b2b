//! Core types for the relay.
//!
//! This module provides the fundamental types used throughout the relay-alerts crate:
//! - [`AlertKind`]: The recognized shape of an inbound notification
//! - [`Color`]: The color tag of a chat attachment
//! - [`SeverityBand`]: The banding of a GuardDuty severity score
//! - [`Field`], [`Attachment`], [`RenderedMessage`]: The chat wire payload

use serde::{Deserialize, Serialize};

/// The kind of alert a notification payload represents.
///
/// Variants are listed in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// A CloudWatch alarm state change.
    #[serde(rename = "cloudwatch_alarm")]
    CloudWatchAlarm,
    /// A GuardDuty finding.
    #[serde(rename = "guardduty_finding")]
    GuardDutyFinding,
    /// An EC2 instance state-change event.
    Ec2StateChange,
    /// An AWS Budgets notification.
    BudgetAlert,
    /// Anything not recognized.
    Generic,
}

impl AlertKind {
    /// All kinds, in classification priority order.
    pub const ALL: [Self; 5] = [
        Self::CloudWatchAlarm,
        Self::GuardDutyFinding,
        Self::Ec2StateChange,
        Self::BudgetAlert,
        Self::Generic,
    ];

    /// Returns the kind as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CloudWatchAlarm => "cloudwatch_alarm",
            Self::GuardDutyFinding => "guardduty_finding",
            Self::Ec2StateChange => "ec2_state_change",
            Self::BudgetAlert => "budget_alert",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The color tag of an attachment, as understood by Slack-compatible webhooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Green.
    Good,
    /// Yellow.
    #[default]
    Warning,
    /// Red.
    Danger,
}

impl Color {
    /// Returns the color as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity band of a GuardDuty finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityBand {
    /// Severity below 4.
    Low,
    /// Severity in `[4, 7)`.
    Medium,
    /// Severity of 7 or more.
    High,
}

impl SeverityBand {
    /// Bands a numeric severity score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            Self::High
        } else if score >= 4.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns the band as displayed in messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    /// Returns the attachment color for this band.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self {
            Self::Low => Color::Good,
            Self::Medium => Color::Warning,
            Self::High => Color::Danger,
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A titled value inside an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// The field label.
    pub title: String,
    /// The field value.
    pub value: String,
    /// Whether the field is narrow enough to sit beside another one.
    pub short: bool,
}

impl Field {
    /// Creates a short (side-by-side) field.
    #[must_use]
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }

    /// Creates a long (full-width) field.
    #[must_use]
    pub fn long(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: false,
        }
    }
}

/// A styled block inside a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Color tag shown beside the block.
    pub color: Color,
    /// Bold heading.
    pub title: String,
    /// Ordered fields; omitted from the wire when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    /// Free-text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Small text under the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Unix timestamp shown beside the footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl Attachment {
    /// Creates an attachment with no fields or body.
    #[must_use]
    pub fn new(color: Color, title: impl Into<String>) -> Self {
        Self {
            color,
            title: title.into(),
            fields: Vec::new(),
            text: None,
            footer: None,
            ts: None,
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the free-text body.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the footer and its timestamp.
    #[must_use]
    pub fn with_footer(mut self, footer: impl Into<String>, ts: i64) -> Self {
        self.footer = Some(footer.into());
        self.ts = Some(ts);
        self
    }

    /// Looks up a field by title.
    #[must_use]
    pub fn find_field(&self, title: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.title == title)
    }
}

/// The chat payload posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    /// One-line summary shown above the attachments.
    pub text: String,
    /// Styled blocks; never empty for a rendered alert.
    pub attachments: Vec<Attachment>,
}

impl RenderedMessage {
    /// Creates a message with a single attachment.
    #[must_use]
    pub fn new(text: impl Into<String>, attachment: Attachment) -> Self {
        Self {
            text: text.into(),
            attachments: vec![attachment],
        }
    }

    /// Returns the first attachment.
    #[must_use]
    pub fn primary(&self) -> Option<&Attachment> {
        self.attachments.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod alert_kind_tests {
        use super::*;

        #[test]
        fn kind_as_str() {
            assert_eq!(AlertKind::CloudWatchAlarm.as_str(), "cloudwatch_alarm");
            assert_eq!(AlertKind::GuardDutyFinding.as_str(), "guardduty_finding");
            assert_eq!(AlertKind::Ec2StateChange.as_str(), "ec2_state_change");
            assert_eq!(AlertKind::BudgetAlert.as_str(), "budget_alert");
            assert_eq!(AlertKind::Generic.as_str(), "generic");
        }

        #[test]
        fn kind_display_matches_serde() {
            for kind in AlertKind::ALL {
                let json = serde_json::to_string(&kind).unwrap();
                assert_eq!(json, format!("\"{kind}\""));
            }
        }

        #[test]
        fn kind_round_trips_through_its_name() {
            for kind in AlertKind::ALL {
                let parsed: AlertKind =
                    serde_json::from_str(&format!("\"{}\"", kind.as_str())).unwrap();
                assert_eq!(parsed, kind);
            }
        }

        #[test]
        fn generic_is_last_in_priority() {
            assert_eq!(AlertKind::ALL.last(), Some(&AlertKind::Generic));
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn color_serializes_lowercase() {
            assert_eq!(serde_json::to_string(&Color::Danger).unwrap(), "\"danger\"");
            assert_eq!(serde_json::to_string(&Color::Good).unwrap(), "\"good\"");
            assert_eq!(
                serde_json::to_string(&Color::Warning).unwrap(),
                "\"warning\""
            );
        }

        #[test]
        fn color_default_is_warning() {
            assert_eq!(Color::default(), Color::Warning);
        }
    }

    mod severity_tests {
        use super::*;
        use test_case::test_case;

        #[test_case(10.0, SeverityBand::High ; "max")]
        #[test_case(7.0, SeverityBand::High ; "high boundary")]
        #[test_case(6.99, SeverityBand::Medium ; "just below high")]
        #[test_case(4.0, SeverityBand::Medium ; "medium boundary")]
        #[test_case(3.99, SeverityBand::Low ; "just below medium")]
        #[test_case(0.0, SeverityBand::Low ; "zero")]
        #[test_case(-1.0, SeverityBand::Low ; "negative")]
        fn band_from_score(score: f64, expected: SeverityBand) {
            assert_eq!(SeverityBand::from_score(score), expected);
        }

        #[test]
        fn band_colors() {
            assert_eq!(SeverityBand::High.color(), Color::Danger);
            assert_eq!(SeverityBand::Medium.color(), Color::Warning);
            assert_eq!(SeverityBand::Low.color(), Color::Good);
        }
    }

    mod attachment_tests {
        use super::*;

        #[test]
        fn empty_fields_are_omitted_on_the_wire() {
            let attachment = Attachment::new(Color::Warning, "AWS Notification").with_text("{}");
            let json = serde_json::to_value(&attachment).unwrap();

            assert!(json.get("fields").is_none());
            assert!(json.get("footer").is_none());
            assert_eq!(json["text"], "{}");
            assert_eq!(json["color"], "warning");
        }

        #[test]
        fn fields_keep_insertion_order() {
            let attachment = Attachment::new(Color::Good, "t")
                .field(Field::short("A", "1"))
                .field(Field::long("B", "2"))
                .field(Field::short("C", "3"));

            let titles: Vec<_> = attachment.fields.iter().map(|f| f.title.as_str()).collect();
            assert_eq!(titles, ["A", "B", "C"]);
            assert!(!attachment.fields[1].short);
        }

        #[test]
        fn find_field_by_title() {
            let attachment = Attachment::new(Color::Good, "t").field(Field::short("Region", "eu-west-1"));
            assert_eq!(
                attachment.find_field("Region").map(|f| f.value.as_str()),
                Some("eu-west-1")
            );
            assert!(attachment.find_field("Missing").is_none());
        }

        #[test]
        fn footer_sets_timestamp() {
            let attachment = Attachment::new(Color::Good, "t").with_footer("footer", 1_704_844_800);
            assert_eq!(attachment.footer.as_deref(), Some("footer"));
            assert_eq!(attachment.ts, Some(1_704_844_800));
        }
    }

    mod message_tests {
        use super::*;

        #[test]
        fn message_has_one_attachment() {
            let msg = RenderedMessage::new("hello", Attachment::new(Color::Good, "t"));
            assert_eq!(msg.attachments.len(), 1);
            assert_eq!(msg.primary().map(|a| a.title.as_str()), Some("t"));
        }

        #[test]
        fn message_serialization_roundtrip() {
            let msg = RenderedMessage::new(
                "🚨 AWS Alert: x",
                Attachment::new(Color::Danger, "title").field(Field::short("State", "ALARM")),
            );
            let json = serde_json::to_string(&msg).unwrap();
            let parsed: RenderedMessage = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, msg);
        }
    }
}

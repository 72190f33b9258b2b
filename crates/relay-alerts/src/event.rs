//! SNS delivery envelope and the batch model derived from it.
//!
//! SNS invokes the relay with a `Records` array; every record wraps one
//! published message whose body is a JSON document encoded as a string.
//! The envelope is parsed leniently so that one broken record does not hide
//! its siblings: a record without a message body becomes a
//! [`NotificationRecord`] with no payload and fails on its own at dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, Result};

/// An SNS event as delivered to a subscriber function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsEvent {
    /// Records in delivery order.
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

/// One record in an SNS event.
///
/// Envelope fields the relay has no use for (`EventSource`, `Timestamp`,
/// signatures) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsRecord {
    /// The published message.
    #[serde(rename = "Sns", default, skip_serializing_if = "Option::is_none")]
    pub sns: Option<SnsMessage>,
}

/// The message part of an SNS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsMessage {
    /// SNS message id.
    #[serde(rename = "MessageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Topic the message was published to.
    #[serde(rename = "TopicArn", default, skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,
    /// Optional subject line.
    #[serde(rename = "Subject", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Message body; a JSON document for the alerts this relay understands.
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SnsEvent {
    /// Parses an SNS event from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Decode` if the text is not a valid SNS event.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| RelayError::decode(format!("invalid SNS event: {e}")))
    }

    /// Wraps one message in a single-record event.
    #[must_use]
    pub fn single(subject: Option<&str>, payload: &Value) -> Self {
        Self {
            records: vec![SnsRecord {
                sns: Some(SnsMessage {
                    subject: subject.map(str::to_string),
                    message: Some(payload.to_string()),
                    ..SnsMessage::default()
                }),
            }],
        }
    }

    /// Converts the envelope into a batch.
    #[must_use]
    pub fn into_batch(self) -> NotificationBatch {
        NotificationBatch {
            records: self
                .records
                .into_iter()
                .map(NotificationRecord::from)
                .collect(),
        }
    }
}

/// An ordered batch of notification records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationBatch {
    /// Records in the order they were received.
    pub records: Vec<NotificationRecord>,
}

impl NotificationBatch {
    /// Creates a batch from records.
    #[must_use]
    pub const fn new(records: Vec<NotificationRecord>) -> Self {
        Self { records }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the batch has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One notification awaiting classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Subject line, if the publisher set one.
    pub subject: Option<String>,
    /// Transport-encoded payload. `None` if the record carried no body.
    pub raw_payload: Option<String>,
    /// SNS message id, used for log context.
    pub message_id: Option<String>,
    /// Topic the record was published to, used for log context.
    pub topic_arn: Option<String>,
}

impl NotificationRecord {
    /// Creates a record from a subject and an encoded payload.
    #[must_use]
    pub fn new(subject: Option<&str>, raw_payload: impl Into<String>) -> Self {
        Self {
            subject: subject.map(str::to_string),
            raw_payload: Some(raw_payload.into()),
            message_id: None,
            topic_arn: None,
        }
    }

    /// Sets the message id.
    #[must_use]
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Decodes the payload.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Decode` if the record has no body or the body is
    /// not valid JSON.
    pub fn decode_payload(&self) -> Result<Value> {
        let raw = self
            .raw_payload
            .as_deref()
            .ok_or_else(|| RelayError::decode("record has no message body"))?;
        serde_json::from_str(raw)
            .map_err(|e| RelayError::decode(format!("message is not valid JSON: {e}")))
    }
}

impl From<SnsRecord> for NotificationRecord {
    fn from(record: SnsRecord) -> Self {
        let sns = record.sns.unwrap_or_default();
        Self {
            subject: sns.subject,
            raw_payload: sns.message,
            message_id: sns.message_id,
            topic_arn: sns.topic_arn,
        }
    }
}

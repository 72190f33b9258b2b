//! Batch dispatch: decode, render and deliver every record.
//!
//! This module provides the [`Dispatcher`] which is the main entry point
//! for the relay. It walks a [`NotificationBatch`] in order, renders each
//! record with the [`AlertFormatter`] and hands the result to an
//! [`OutboundNotifier`]. Failures are collected per record; every record is
//! attempted even after an earlier one failed, and the batch reports the
//! first failure it saw.

use serde::Serialize;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::channels::OutboundNotifier;
use crate::clock::{Clock, SystemClock};
use crate::config::{MISSING_WEBHOOK_URL, RelayConfig, redact};
use crate::error::RelayError;
use crate::event::{NotificationBatch, NotificationRecord, SnsEvent};
use crate::formatter::AlertFormatter;
use crate::types::AlertKind;

/// Response body on full success.
pub const SUCCESS_BODY: &str = "Messages sent to webhook successfully";

/// The result of delivering one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Position of the record in its batch.
    pub index: usize,
    /// SNS message id, if known.
    pub message_id: Option<String>,
    /// The detected kind; `None` if the record could not be decoded.
    pub kind: Option<AlertKind>,
    /// HTTP status returned by the endpoint, if one was received.
    pub status_code: Option<u16>,
    /// Why the record was not delivered.
    pub error: Option<RelayError>,
}

impl DeliveryOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn delivered(record: &NotificationRecord, index: usize, kind: AlertKind, status: u16) -> Self {
        Self {
            index,
            message_id: record.message_id.clone(),
            kind: Some(kind),
            status_code: Some(status),
            error: None,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failed(
        record: &NotificationRecord,
        index: usize,
        kind: Option<AlertKind>,
        error: RelayError,
    ) -> Self {
        let status_code = match &error {
            RelayError::Delivery { status_code, .. } => *status_code,
            _ => None,
        };
        Self {
            index,
            message_id: record.message_id.clone(),
            kind,
            status_code,
            error: Some(error),
        }
    }

    /// Returns true if the record reached the endpoint with a 2xx answer.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        self.error.is_none()
    }
}

/// The result of handling a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// One outcome per record, in batch order.
    pub outcomes: Vec<DeliveryOutcome>,
    /// An error that stopped the batch before any record was attempted.
    pub fatal: Option<RelayError>,
}

impl BatchOutcome {
    /// Creates an outcome for a batch that was never attempted.
    #[must_use]
    pub const fn aborted(error: RelayError) -> Self {
        Self {
            outcomes: Vec::new(),
            fatal: Some(error),
        }
    }

    /// Returns true if every record was delivered.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.fatal.is_none() && self.outcomes.iter().all(DeliveryOutcome::is_delivered)
    }

    /// Returns the error to report for the batch, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&RelayError> {
        self.fatal
            .as_ref()
            .or_else(|| self.outcomes.iter().find_map(|o| o.error.as_ref()))
    }

    /// Returns the number of delivered records.
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    /// Returns the number of failed records.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.delivered_count()
    }

    /// Converts the outcome into a handler response.
    #[must_use]
    pub fn to_response(&self) -> HandlerResponse {
        match self.first_error() {
            None => HandlerResponse::ok(SUCCESS_BODY),
            Some(RelayError::Configuration { reason }) if reason == MISSING_WEBHOOK_URL => {
                HandlerResponse::error(reason.clone())
            }
            Some(err) => HandlerResponse::error(format!("Error: {err}")),
        }
    }
}

/// Structured return value of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    /// 200 on full success, 500 otherwise.
    pub status_code: u16,
    /// Human-readable summary.
    pub body: String,
}

impl HandlerResponse {
    /// Creates a 200 response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    /// Creates a 500 response.
    #[must_use]
    pub fn error(body: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: body.into(),
        }
    }

    /// Returns true for a 200 response.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Relays batches of notifications to the configured webhook.
#[derive(Debug)]
pub struct Dispatcher<N, C = SystemClock> {
    config: RelayConfig,
    notifier: N,
    formatter: AlertFormatter<C>,
}

impl<N: OutboundNotifier> Dispatcher<N, SystemClock> {
    /// Creates a dispatcher that stamps missing timestamps with the wall clock.
    #[must_use]
    pub fn new(config: RelayConfig, notifier: N) -> Self {
        Self::with_formatter(config, notifier, AlertFormatter::system())
    }
}

impl<N: OutboundNotifier, C: Clock> Dispatcher<N, C> {
    /// Creates a dispatcher with a custom formatter.
    #[must_use]
    pub fn with_formatter(config: RelayConfig, notifier: N, formatter: AlertFormatter<C>) -> Self {
        Self {
            config,
            notifier,
            formatter,
        }
    }

    /// Returns the notifier.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Parses an SNS event and handles it.
    ///
    /// Never fails: a missing webhook URL or a malformed envelope becomes a
    /// 500 response. The URL is checked first.
    pub fn handle_event_json(&self, raw: &str) -> HandlerResponse {
        if let Err(err) = self.config.require_webhook_url() {
            error!(error = %err, error_kind = err.kind(), "no webhook configured, rejecting event");
            return BatchOutcome::aborted(err).to_response();
        }

        let outcome = match SnsEvent::from_json(raw) {
            Ok(event) => self.handle(&event.into_batch()),
            Err(err) => {
                error!(error = %err, error_kind = err.kind(), "rejecting SNS event");
                BatchOutcome::aborted(err)
            }
        };
        outcome.to_response()
    }

    /// Delivers every record of `batch`, in order.
    pub fn handle(&self, batch: &NotificationBatch) -> BatchOutcome {
        let url = match self.config.require_webhook_url() {
            Ok(url) => url,
            Err(err) => {
                error!(
                    error = %err,
                    error_kind = err.kind(),
                    records = batch.len(),
                    "no webhook configured, dropping batch"
                );
                return BatchOutcome::aborted(err);
            }
        };

        info!(
            records = batch.len(),
            notifier = %self.notifier.name(),
            host = %redact(url),
            "handling notification batch"
        );

        let outcomes: Vec<DeliveryOutcome> = batch
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| self.deliver(url, index, record))
            .collect();

        let outcome = BatchOutcome {
            outcomes,
            fatal: None,
        };
        if outcome.is_success() {
            info!(delivered = outcome.delivered_count(), "batch delivered");
        } else {
            warn!(
                delivered = outcome.delivered_count(),
                failed = outcome.failed_count(),
                "batch finished with failures"
            );
        }
        outcome
    }

    fn deliver(&self, url: &Url, index: usize, record: &NotificationRecord) -> DeliveryOutcome {
        let message_id = record.message_id.as_deref().unwrap_or("-");
        let topic = record.topic_arn.as_deref().unwrap_or("-");

        let rendered = match self.formatter.render_record(index, record) {
            Ok(rendered) => rendered,
            Err(err) => {
                error!(index, message_id, topic, error = %err, error_kind = err.kind(), "failed to decode record");
                return DeliveryOutcome::failed(record, index, None, err);
            }
        };
        let kind = rendered.kind;
        debug!(index, message_id, topic, kind = %kind, "rendered record");

        match self.notifier.send(url, &rendered.message) {
            Ok(response) if response.is_success() => {
                info!(index, message_id, kind = %kind, status = response.status_code, "delivered alert");
                DeliveryOutcome::delivered(record, index, kind, response.status_code)
            }
            Ok(response) => {
                let mut reason = format!("endpoint returned {}", response.status_code);
                if !response.body.is_empty() {
                    reason = format!("{reason}: {}", response.body);
                }
                let err = RelayError::Delivery {
                    reason,
                    status_code: Some(response.status_code),
                };
                error!(index, message_id, kind = %kind, error = %err, "delivery rejected");
                DeliveryOutcome::failed(record, index, Some(kind), err)
            }
            Err(err) => {
                error!(index, message_id, kind = %kind, error = %err, error_kind = err.kind(), "delivery failed");
                DeliveryOutcome::failed(record, index, Some(kind), err)
            }
        }
    }
}

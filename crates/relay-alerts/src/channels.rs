//! Outbound delivery of rendered messages.
//!
//! This module provides the [`OutboundNotifier`] trait and implementations
//! for posting rendered messages to a chat webhook.

use std::fmt;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{RelayConfig, redact};
use crate::error::{RelayError, Result};
use crate::types::RenderedMessage;

/// Longest response body kept from an endpoint, in characters.
pub const MAX_RESPONSE_BODY_CHARS: usize = 200;

/// What the endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body, possibly empty.
    pub body: String,
}

impl WebhookResponse {
    /// Creates a response with an empty body.
    #[must_use]
    pub const fn status(status_code: u16) -> Self {
        Self {
            status_code,
            body: String::new(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

/// Capability to post a rendered message to a URL.
///
/// Implementations report transport failures as errors and return every
/// HTTP answer, successful or not, as a [`WebhookResponse`]. Deciding what
/// counts as delivered is left to the caller.
pub trait OutboundNotifier: fmt::Debug {
    /// Returns the name of this notifier.
    fn name(&self) -> &str;

    /// Posts `message` as JSON to `url`.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Delivery` if no HTTP response was received.
    fn send(&self, url: &Url, message: &RenderedMessage) -> Result<WebhookResponse>;
}

/// Posts messages to a Slack-compatible incoming webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Creates a notifier using the timeout and user agent from `config`.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RelayError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl OutboundNotifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    fn send(&self, url: &Url, message: &RenderedMessage) -> Result<WebhookResponse> {
        let body = serde_json::to_vec(message)?;
        debug!(host = %redact(url), bytes = body.len(), "posting webhook message");

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request to {} timed out", redact(url))
                } else {
                    format!("request to {} failed: {e}", redact(url))
                };
                RelayError::delivery(reason)
            })?;

        let response = WebhookResponse {
            status_code: response.status().as_u16(),
            body: clip_body(&response.text().unwrap_or_default()),
        };
        if !response.is_success() {
            warn!(
                host = %redact(url),
                status = response.status_code,
                body = %response.body,
                "webhook rejected message"
            );
        }

        Ok(response)
    }
}

/// A notifier that logs messages instead of sending them.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    name: String,
}

impl LogNotifier {
    /// Creates a new log notifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new("log")
    }
}

impl OutboundNotifier for LogNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, url: &Url, message: &RenderedMessage) -> Result<WebhookResponse> {
        let title = message.primary().map_or("", |a| a.title.as_str());
        info!(
            notifier = %self.name,
            host = %redact(url),
            text = %message.text,
            title = %title,
            "would send webhook message"
        );
        Ok(WebhookResponse::status(200))
    }
}

/// Keeps at most [`MAX_RESPONSE_BODY_CHARS`] characters of a response body.
fn clip_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_RESPONSE_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

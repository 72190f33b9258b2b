//! Relay configuration.
//!
//! The only required setting is the outbound webhook URL. It is read from
//! `SLACK_WEBHOOK_URL`, falling back to `WEBHOOK_URL`. A missing URL is not
//! an error here: the dispatcher reports it when a batch arrives, so that
//! the invocation still returns a structured response.

use std::time::Duration;

use url::Url;

use crate::error::{RelayError, Result};

/// Primary environment variable holding the webhook URL.
pub const WEBHOOK_URL_ENV: &str = "SLACK_WEBHOOK_URL";

/// Fallback environment variable holding the webhook URL.
pub const WEBHOOK_URL_FALLBACK_ENV: &str = "WEBHOOK_URL";

/// Environment variable holding the per-request timeout in seconds.
pub const TIMEOUT_ENV: &str = "WEBHOOK_TIMEOUT_SECS";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Reason reported when no webhook URL is configured.
pub const MISSING_WEBHOOK_URL: &str = "Webhook URL not configured";

/// Configuration for relaying alerts to a webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Where rendered messages are posted.
    pub webhook_url: Option<Url>,
    /// Upper bound for a single outbound request.
    pub timeout: Duration,
    /// User-Agent sent with outbound requests.
    pub user_agent: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("alert-relay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RelayConfig {
    /// Creates a configuration for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the URL is not a valid http(s) URL.
    pub fn new(webhook_url: &str) -> Result<Self> {
        Ok(Self {
            webhook_url: parse_webhook_url(webhook_url)?,
            ..Self::default()
        })
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if a variable is set but invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if a variable is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webhook_url = match non_empty(WEBHOOK_URL_ENV).or_else(|| non_empty(WEBHOOK_URL_FALLBACK_ENV)) {
            Some(raw) => parse_webhook_url(&raw)?,
            None => None,
        };

        let timeout = match non_empty(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            webhook_url,
            timeout,
            ..Self::default()
        })
    }

    /// Replaces the webhook URL.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if the URL is not a valid http(s) URL.
    pub fn with_webhook_url(mut self, url: &str) -> Result<Self> {
        self.webhook_url = parse_webhook_url(url)?;
        Ok(self)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the webhook URL or a configuration error.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Configuration` if no URL is configured.
    pub fn require_webhook_url(&self) -> Result<&Url> {
        self.webhook_url
            .as_ref()
            .ok_or_else(|| RelayError::configuration(MISSING_WEBHOOK_URL))
    }
}

/// Parses a webhook URL; blank input means "not configured".
fn parse_webhook_url(raw: &str) -> Result<Option<Url>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(raw)
        .map_err(|e| RelayError::configuration(format!("invalid webhook URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        other => Err(RelayError::configuration(format!(
            "webhook URL must use http or https, got {other}"
        ))),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(RelayError::configuration(format!(
            "{TIMEOUT_ENV} must be a positive integer, got {raw:?}"
        ))),
    }
}

/// Returns the host of a URL, for logging without leaking the path token.
#[must_use]
pub fn redact(url: &Url) -> String {
    url.host_str().map_or_else(|| "<no host>".to_string(), str::to_string)
}

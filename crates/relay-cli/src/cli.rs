//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use relay_alerts::AlertKind;

/// alert-relay - forward AWS SNS notifications to a chat webhook.
#[derive(Parser, Debug, Clone)]
#[command(name = "alert-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Json, global = true)]
    pub format: Format,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// JSON output for scripting.
    #[default]
    Json,
    /// Human-readable text.
    Text,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Relay an SNS event to the webhook and print the handler response.
    Handle(HandleArgs),

    /// Render an SNS event without sending anything.
    Render(EventArgs),

    /// Print a sample SNS event.
    Sample {
        /// Kind of notification to generate.
        #[arg(value_enum)]
        kind: SampleKind,
    },

    /// Post a connection-test message to the webhook.
    TestWebhook(WebhookArgs),
}

/// Where to read an SNS event from.
#[derive(Args, Debug, Clone)]
pub struct EventArgs {
    /// Path to the SNS event JSON; reads stdin when omitted or `-`.
    #[arg(short, long)]
    pub event: Option<PathBuf>,
}

/// Webhook overrides; both fall back to the environment.
#[derive(Args, Debug, Clone)]
pub struct WebhookArgs {
    /// Webhook URL (overrides SLACK_WEBHOOK_URL / WEBHOOK_URL).
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// Per-request timeout in seconds (overrides WEBHOOK_TIMEOUT_SECS).
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the handle command.
#[derive(Args, Debug, Clone)]
pub struct HandleArgs {
    /// Event source.
    #[command(flatten)]
    pub event: EventArgs,

    /// Webhook settings.
    #[command(flatten)]
    pub webhook: WebhookArgs,

    /// Log messages instead of posting them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Notification kinds available as samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleKind {
    /// CloudWatch alarm.
    Cloudwatch,
    /// GuardDuty finding.
    Guardduty,
    /// EC2 instance state change.
    Ec2,
    /// AWS Budgets alert.
    Budget,
    /// Unrecognized notification.
    Generic,
}

impl From<SampleKind> for AlertKind {
    fn from(kind: SampleKind) -> Self {
        match kind {
            SampleKind::Cloudwatch => Self::CloudWatchAlarm,
            SampleKind::Guardduty => Self::GuardDutyFinding,
            SampleKind::Ec2 => Self::Ec2StateChange,
            SampleKind::Budget => Self::BudgetAlert,
            SampleKind::Generic => Self::Generic,
        }
    }
}

//! Canned notifications for smoke-testing a deployment.

use serde_json::{Value, json};

use crate::clock::Clock;
use crate::event::SnsEvent;
use crate::types::{AlertKind, Attachment, Color, Field, RenderedMessage};

/// Returns a representative subject and payload for `kind`.
#[must_use]
pub fn sample_payload(kind: AlertKind) -> (&'static str, Value) {
    match kind {
        AlertKind::CloudWatchAlarm => (
            "CloudWatch Alarm",
            json!({
                "AlarmName": "HighCPUAlarm",
                "AlarmDescription": "CPU utilization above 80% for 10 minutes",
                "NewStateValue": "ALARM",
                "NewStateReason": "Threshold Crossed: 2 datapoints [85.2, 91.0] were greater than the threshold (80.0).",
                "StateChangeTime": "2025-01-01T12:00:00.000+0000",
                "Region": "US East (N. Virginia)",
                "OldStateValue": "OK"
            }),
        ),
        AlertKind::GuardDutyFinding => (
            "GuardDuty Finding",
            json!({
                "version": "0",
                "source": "aws.guardduty",
                "detail-type": "GuardDuty Finding",
                "region": "us-east-1",
                "detail": {
                    "type": "Trojan:EC2/DNSDataExfiltration",
                    "severity": 8.5,
                    "description": "EC2 instance i-99999999 is querying algorithmically generated domains."
                }
            }),
        ),
        AlertKind::Ec2StateChange => (
            "EC2 State Change",
            json!({
                "version": "0",
                "source": "aws.ec2",
                "detail-type": "EC2 Instance State-change Notification",
                "region": "us-east-1",
                "detail": {
                    "instance-id": "i-1234567890abcdef0",
                    "state": "stopped"
                }
            }),
        ),
        AlertKind::BudgetAlert => (
            "AWS Budget Alert",
            json!({
                "budgetName": "monthly-budget",
                "thresholdType": "PERCENTAGE",
                "threshold": 80,
                "actualAmount": 412.75,
                "budgetLimit": 500
            }),
        ),
        AlertKind::Generic => (
            "Health Event",
            json!({
                "source": "aws.health",
                "detail-type": "AWS Health Event",
                "detail": {"service": "EC2", "eventTypeCategory": "scheduledChange"}
            }),
        ),
    }
}

/// Returns a single-record SNS event carrying the sample for `kind`.
#[must_use]
pub fn sample_event(kind: AlertKind) -> SnsEvent {
    let (subject, payload) = sample_payload(kind);
    SnsEvent::single(Some(subject), &payload)
}

/// Builds the message posted by a connection test.
#[must_use]
pub fn connection_test_message<C: Clock>(clock: &C) -> RenderedMessage {
    RenderedMessage::new(
        "🎉 Hello from AWS Slack Alerts!",
        Attachment::new(Color::Good, "✅ Connection Test Successful")
            .with_text("Your Slack integration is working perfectly!")
            .field(Field::short("Project", "alert-relay"))
            .field(Field::short("Sent", clock.now_iso8601()))
            .with_footer("alert-relay connection test", clock.now().timestamp()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::formatter::classify;
    use chrono::{TimeZone, Utc};

    #[test]
    fn every_sample_classifies_as_its_kind() {
        for kind in AlertKind::ALL {
            let (subject, payload) = sample_payload(kind);
            assert_eq!(classify(&payload, subject), kind, "sample for {kind}");
        }
    }

    #[test]
    fn sample_event_decodes() {
        let batch = sample_event(AlertKind::GuardDutyFinding).into_batch();
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.records[0].decode_payload().unwrap()["source"],
            "aws.guardduty"
        );
    }

    #[test]
    fn connection_test_uses_clock() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        let msg = connection_test_message(&clock);

        let attachment = &msg.attachments[0];
        assert_eq!(attachment.color, Color::Good);
        assert_eq!(attachment.ts, Some(1_704_844_800));
        assert_eq!(
            attachment.find_field("Sent").map(|f| f.value.as_str()),
            Some("2024-01-10T00:00:00Z")
        );
    }
}

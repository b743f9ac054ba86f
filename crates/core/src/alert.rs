//! Alert domain types: severity tiers, alert kinds, and the acknowledgment
//! state machine.
//!
//! All three enums map to TEXT columns; `as_str`/`parse` are the single
//! source of truth for the stored spellings.

use serde::Serialize;

/// Clinical severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    /// The value stored in the `alerts.severity` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Parse a stored column value back into a severity.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// What kind of condition raised the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowSpo2,
    HighHeartRate,
    LowHeartRate,
    /// Trend-based verdict from the sliding-window rules.
    Anomaly,
    /// Raised by the lifecycle monitor, never by the detector.
    DeviceOffline,
}

impl AlertType {
    /// The value stored in the `alerts.alert_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::LowSpo2 => "low_spo2",
            AlertType::HighHeartRate => "high_heart_rate",
            AlertType::LowHeartRate => "low_heart_rate",
            AlertType::Anomaly => "anomaly",
            AlertType::DeviceOffline => "device_offline",
        }
    }
}

/// Acknowledgment state of an alert.
///
/// Alerts are created `New` and the only legal transition is
/// `New -> Acknowledged`, fired by an explicit operator action. The
/// transition is terminal; re-acknowledging is a successful no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EscalationStatus {
    New,
    Acknowledged,
}

impl EscalationStatus {
    /// The value stored in the `alerts.escalation_status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            EscalationStatus::New => "new",
            EscalationStatus::Acknowledged => "acknowledged",
        }
    }
}

/// A detector or monitor verdict that has not been persisted yet.
///
/// The caller turns a draft into an `alerts` row and a live-feed event; the
/// draft itself carries no identity or timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_round_trips_through_column_values() {
        for sev in [Severity::Medium, Severity::High, Severity::Critical] {
            assert_eq!(Severity::parse(sev.as_str()), Some(sev));
        }
        assert_eq!(Severity::parse("catastrophic"), None);
    }

    #[test]
    fn alert_type_spellings_match_wire_format() {
        assert_eq!(AlertType::LowSpo2.as_str(), "low_spo2");
        assert_eq!(AlertType::HighHeartRate.as_str(), "high_heart_rate");
        assert_eq!(AlertType::LowHeartRate.as_str(), "low_heart_rate");
        assert_eq!(AlertType::Anomaly.as_str(), "anomaly");
        assert_eq!(AlertType::DeviceOffline.as_str(), "device_offline");
    }
}

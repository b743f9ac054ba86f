//! The live-feed wire format.

use serde::{Deserialize, Serialize};
use wardsight_core::alert::AlertDraft;
use wardsight_core::device::DeviceStatus;
use wardsight_core::types::Timestamp;

/// One message pushed to live subscribers.
///
/// Serializes as `{"type": "...", "timestamp": "...", ...}` with the
/// variant's fields inlined. Constructed through the helpers below, which
/// stamp the current UTC time; events exist only on the wire and are never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A raw vitals reading as it was ingested.
    SensorData {
        device_id: String,
        heart_rate: f64,
        spo2: f64,
        bed_status: i16,
        timestamp: Timestamp,
    },
    /// A newly created alert.
    Alert {
        device_id: String,
        alert_type: String,
        severity: String,
        message: String,
        timestamp: Timestamp,
    },
    /// A device reachability transition.
    DeviceStatus {
        device_id: String,
        status: String,
        timestamp: Timestamp,
    },
    /// Reply to a client `ping`.
    Pong { timestamp: Timestamp },
}

impl LiveEvent {
    pub fn sensor_data(device_id: &str, heart_rate: f64, spo2: f64, bed_status: i16) -> Self {
        LiveEvent::SensorData {
            device_id: device_id.to_string(),
            heart_rate,
            spo2,
            bed_status,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn alert(device_id: &str, draft: &AlertDraft) -> Self {
        LiveEvent::Alert {
            device_id: device_id.to_string(),
            alert_type: draft.alert_type.as_str().to_string(),
            severity: draft.severity.as_str().to_string(),
            message: draft.message.clone(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn device_status(device_id: &str, status: DeviceStatus) -> Self {
        LiveEvent::DeviceStatus {
            device_id: device_id.to_string(),
            status: status.as_str().to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn pong() -> Self {
        LiveEvent::Pong {
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wardsight_core::alert::{AlertType, Severity};

    #[test]
    fn sensor_data_serializes_with_type_tag_and_fields() {
        let event = LiveEvent::sensor_data("BED_A_01", 72.0, 98.0, 1);
        let json = serde_json::to_value(&event).expect("serializable");
        assert_eq!(json["type"], "sensor_data");
        assert_eq!(json["device_id"], "BED_A_01");
        assert_eq!(json["heart_rate"], 72.0);
        assert_eq!(json["spo2"], 98.0);
        assert_eq!(json["bed_status"], 1);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn alert_serializes_with_draft_fields() {
        let draft = AlertDraft {
            alert_type: AlertType::LowSpo2,
            severity: Severity::Critical,
            message: "CRITICAL: SpO2 at 88% (below 90%)".to_string(),
        };
        let json = serde_json::to_value(LiveEvent::alert("BED_A_01", &draft)).expect("serializable");
        assert_eq!(json["type"], "alert");
        assert_eq!(json["alert_type"], "low_spo2");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["message"], "CRITICAL: SpO2 at 88% (below 90%)");
    }

    #[test]
    fn device_status_serializes_status_text() {
        let json = serde_json::to_value(LiveEvent::device_status(
            "BED_A_01",
            wardsight_core::device::DeviceStatus::Offline,
        ))
        .expect("serializable");
        assert_eq!(json["type"], "device_status");
        assert_eq!(json["status"], "offline");
    }

    #[test]
    fn pong_carries_only_type_and_timestamp() {
        let json = serde_json::to_value(LiveEvent::pong()).expect("serializable");
        assert_eq!(json["type"], "pong");
        assert_eq!(json.as_object().expect("object").len(), 2);
    }
}

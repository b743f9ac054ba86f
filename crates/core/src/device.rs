//! Device reachability state.

use serde::Serialize;

/// Reachability of a bedside unit.
///
/// Devices register as `Offline`. A successfully authenticated contact
/// (heartbeat or data submission) flips them `Online`; only the lifecycle
/// monitor's staleness scan ever flips them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Offline,
    Online,
}

impl DeviceStatus {
    /// The value stored in the `devices.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Offline => "offline",
            DeviceStatus::Online => "online",
        }
    }

    /// Parse a stored column value back into a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offline" => Some(DeviceStatus::Offline),
            "online" => Some(DeviceStatus::Online),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_column_values() {
        for status in [DeviceStatus::Offline, DeviceStatus::Online] {
            assert_eq!(DeviceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DeviceStatus::parse("rebooting"), None);
    }
}

//! Per-device sliding windows of recent vitals readings.
//!
//! Each device gets a bounded FIFO of its most recent samples, created
//! lazily on first contact and kept for the process lifetime. The windows
//! feed the trend rules in [`crate::detector`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Maximum samples retained per device.
pub const WINDOW_CAPACITY: usize = 20;

/// One vitals sample as seen by the window and the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalsSample {
    pub heart_rate: f64,
    pub spo2: f64,
}

type Window = Arc<Mutex<VecDeque<VitalsSample>>>;

/// Registry of per-device sliding windows.
///
/// The outer mutex only guards the device -> window map; each window has its
/// own lock, so appends for different devices proceed concurrently while
/// appends for the same device are serialized. The critical sections never
/// block on I/O, so std-lib mutexes are safe to take from async code.
#[derive(Debug)]
pub struct SlidingWindows {
    devices: Mutex<HashMap<String, Window>>,
    capacity: usize,
}

impl SlidingWindows {
    /// Create a registry with the default per-device capacity.
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    /// Create a registry with an explicit per-device capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Get or lazily create the window for a device.
    fn window(&self, device_id: &str) -> Window {
        let mut devices = self.devices.lock().expect("window registry poisoned");
        devices
            .entry(device_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(VecDeque::with_capacity(self.capacity))))
            .clone()
    }

    /// Append a sample, trimming the oldest entry once past capacity.
    ///
    /// Returns a snapshot of the window contents after the append, in
    /// arrival order, which is the exact input the detector evaluates.
    pub fn append(&self, device_id: &str, sample: VitalsSample) -> Vec<VitalsSample> {
        let window = self.window(device_id);
        let mut window = window.lock().expect("device window poisoned");
        window.push_back(sample);
        if window.len() > self.capacity {
            window.pop_front();
        }
        window.iter().copied().collect()
    }

    /// The last `k` samples for a device in arrival order (fewer if the
    /// history is shorter; empty for an unknown device).
    pub fn recent(&self, device_id: &str, k: usize) -> Vec<VitalsSample> {
        let devices = self.devices.lock().expect("window registry poisoned");
        let Some(window) = devices.get(device_id) else {
            return Vec::new();
        };
        let window = window.lock().expect("device window poisoned");
        let skip = window.len().saturating_sub(k);
        window.iter().skip(skip).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hr: f64, spo2: f64) -> VitalsSample {
        VitalsSample {
            heart_rate: hr,
            spo2,
        }
    }

    #[test]
    fn window_never_exceeds_capacity() {
        let windows = SlidingWindows::with_capacity(3);
        for i in 0..10 {
            let snapshot = windows.append("BED_A_01", sample(60.0 + i as f64, 98.0));
            assert!(snapshot.len() <= 3);
        }
        assert_eq!(windows.recent("BED_A_01", 10).len(), 3);
    }

    #[test]
    fn oldest_samples_are_dropped_first() {
        let windows = SlidingWindows::with_capacity(3);
        for hr in [1.0, 2.0, 3.0, 4.0, 5.0] {
            windows.append("BED_A_01", sample(hr, 98.0));
        }
        let recent = windows.recent("BED_A_01", 3);
        let rates: Vec<f64> = recent.iter().map(|s| s.heart_rate).collect();
        assert_eq!(rates, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn recent_returns_fewer_when_history_is_short() {
        let windows = SlidingWindows::new();
        windows.append("BED_A_01", sample(70.0, 97.0));
        windows.append("BED_A_01", sample(71.0, 97.0));
        assert_eq!(windows.recent("BED_A_01", 5).len(), 2);
        assert!(windows.recent("BED_B_01", 5).is_empty());
    }

    #[test]
    fn devices_have_independent_windows() {
        let windows = SlidingWindows::with_capacity(2);
        windows.append("BED_A_01", sample(60.0, 98.0));
        windows.append("BED_B_01", sample(90.0, 95.0));
        assert_eq!(windows.recent("BED_A_01", 2).len(), 1);
        assert_eq!(windows.recent("BED_B_01", 2)[0].heart_rate, 90.0);
    }

    #[test]
    fn append_returns_the_post_append_snapshot() {
        let windows = SlidingWindows::with_capacity(2);
        windows.append("BED_A_01", sample(60.0, 98.0));
        let snapshot = windows.append("BED_A_01", sample(61.0, 97.0));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].heart_rate, 61.0);
    }
}

//! Rule-based vitals anomaly detection.
//!
//! A cheap, explainable rule engine stands in for a trained sequence model.
//! The seam is the window contents: [`AnomalyDetector`] sees the full
//! post-append window, so a history-aware model can replace the trend rules
//! without touching the absolute-threshold rules or any caller.

use crate::alert::{AlertDraft, AlertType, Severity};
use crate::window::{SlidingWindows, VitalsSample};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// SpO2 below this is a critical desaturation.
pub const SPO2_CRITICAL: f64 = 90.0;
/// SpO2 below this (but not critical) is a warning-tier desaturation.
pub const SPO2_WARNING: f64 = 94.0;
/// Heart rate below this is bradycardia.
pub const HEART_RATE_LOW: f64 = 50.0;
/// Heart rate above this is tachycardia.
pub const HEART_RATE_HIGH: f64 = 120.0;
/// Number of trailing samples the trend rules evaluate.
pub const TREND_WINDOW: usize = 5;
/// SpO2 point drop across the trend window that counts as a sudden drop.
pub const SPO2_DROP_THRESHOLD: f64 = 8.0;
/// Heart-rate standard deviation across the trend window that counts as erratic.
pub const HEART_RATE_STD_THRESHOLD: f64 = 25.0;

// ---------------------------------------------------------------------------
// Detector capability
// ---------------------------------------------------------------------------

/// Classifies one reading given its device's recent history.
///
/// `window` is the device's sliding window *after* the new reading was
/// appended, in arrival order; the last element is the reading under
/// evaluation. Implementations must be deterministic in the window contents.
pub trait AnomalyDetector: Send + Sync {
    fn evaluate(&self, window: &[VitalsSample]) -> Option<AlertDraft>;
}

/// The fixed-threshold rule engine.
///
/// Evaluation order, first match wins. Every comparison is a strict
/// inequality: a value exactly on a threshold does not trigger the rule, so
/// spo2 = 90 lands in the warning tier rather than critical.
#[derive(Debug, Default)]
pub struct ThresholdDetector;

impl AnomalyDetector for ThresholdDetector {
    fn evaluate(&self, window: &[VitalsSample]) -> Option<AlertDraft> {
        let current = window.last()?;
        let spo2 = current.spo2;
        let heart_rate = current.heart_rate;

        if spo2 < SPO2_CRITICAL {
            return Some(AlertDraft {
                alert_type: AlertType::LowSpo2,
                severity: Severity::Critical,
                message: format!("CRITICAL: SpO2 at {spo2}% (below {SPO2_CRITICAL}%)"),
            });
        }
        if spo2 < SPO2_WARNING {
            return Some(AlertDraft {
                alert_type: AlertType::LowSpo2,
                severity: Severity::High,
                message: format!("WARNING: SpO2 at {spo2}% (below {SPO2_WARNING}%)"),
            });
        }
        if heart_rate > HEART_RATE_HIGH {
            return Some(AlertDraft {
                alert_type: AlertType::HighHeartRate,
                severity: Severity::High,
                message: format!("Heart rate elevated: {heart_rate} BPM (above {HEART_RATE_HIGH})"),
            });
        }
        if heart_rate < HEART_RATE_LOW {
            return Some(AlertDraft {
                alert_type: AlertType::LowHeartRate,
                severity: Severity::High,
                message: format!("Heart rate low: {heart_rate} BPM (below {HEART_RATE_LOW})"),
            });
        }

        // Trend rules need a full trend window of history.
        if window.len() >= TREND_WINDOW {
            let tail = &window[window.len() - TREND_WINDOW..];

            let drop = tail[0].spo2 - tail[TREND_WINDOW - 1].spo2;
            if drop > SPO2_DROP_THRESHOLD {
                return Some(AlertDraft {
                    alert_type: AlertType::Anomaly,
                    severity: Severity::Critical,
                    message: format!(
                        "Sudden SpO2 drop detected: {drop:.1}% decrease in last {TREND_WINDOW} readings"
                    ),
                });
            }

            let rates: Vec<f64> = tail.iter().map(|s| s.heart_rate).collect();
            let std = population_std_dev(&rates);
            if std > HEART_RATE_STD_THRESHOLD {
                return Some(AlertDraft {
                    alert_type: AlertType::Anomaly,
                    severity: Severity::High,
                    message: format!("Erratic heart rate detected: std dev = {std:.1}"),
                });
            }
        }

        None
    }
}

/// Population standard deviation (divisor n, not n-1).
fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

// ---------------------------------------------------------------------------
// Engine: window + detector
// ---------------------------------------------------------------------------

/// Couples the sliding-window store with a detector.
///
/// `observe` is the single entry point of the classification pipeline: the
/// sample is appended to the device window and the detector evaluates the
/// post-append contents. Designed to be shared as `Arc<VitalsEngine>`.
pub struct VitalsEngine {
    windows: SlidingWindows,
    detector: Box<dyn AnomalyDetector>,
}

impl VitalsEngine {
    /// Engine with the default window capacity and the rule-based detector.
    pub fn new() -> Self {
        Self::with_detector(Box::new(ThresholdDetector))
    }

    /// Engine with a custom detector implementation.
    pub fn with_detector(detector: Box<dyn AnomalyDetector>) -> Self {
        Self {
            windows: SlidingWindows::new(),
            detector,
        }
    }

    /// Record a reading and classify it against the device's history.
    pub fn observe(&self, device_id: &str, sample: VitalsSample) -> Option<AlertDraft> {
        let window = self.windows.append(device_id, sample);
        self.detector.evaluate(&window)
    }

    /// Read-only access to the window store.
    pub fn windows(&self) -> &SlidingWindows {
        &self.windows
    }
}

impl Default for VitalsEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hr: f64, spo2: f64) -> VitalsSample {
        VitalsSample {
            heart_rate: hr,
            spo2,
        }
    }

    fn evaluate(window: &[VitalsSample]) -> Option<AlertDraft> {
        ThresholdDetector.evaluate(window)
    }

    #[test]
    fn critical_spo2_wins_over_abnormal_heart_rate() {
        // spo2 rule 1 short-circuits even though hr=200 would match rule 3.
        let verdict = evaluate(&[sample(200.0, 89.0)]).expect("should alert");
        assert_eq!(verdict.alert_type, AlertType::LowSpo2);
        assert_eq!(verdict.severity, Severity::Critical);
    }

    #[test]
    fn warning_spo2_between_thresholds() {
        let verdict = evaluate(&[sample(70.0, 92.0)]).expect("should alert");
        assert_eq!(verdict.alert_type, AlertType::LowSpo2);
        assert_eq!(verdict.severity, Severity::High);
    }

    #[test]
    fn spo2_exactly_90_is_warning_not_critical() {
        // Boundary is exclusive: exactly 90 falls into the warning tier.
        // Clinically arguable (90 is often treated as critical), but this is
        // the documented behavior of the thresholds as configured.
        let verdict = evaluate(&[sample(70.0, 90.0)]).expect("should alert");
        assert_eq!(verdict.alert_type, AlertType::LowSpo2);
        assert_eq!(verdict.severity, Severity::High);
    }

    #[test]
    fn spo2_exactly_94_is_normal() {
        assert_eq!(evaluate(&[sample(70.0, 94.0)]), None);
    }

    #[test]
    fn high_heart_rate_alerts() {
        let verdict = evaluate(&[sample(121.0, 98.0)]).expect("should alert");
        assert_eq!(verdict.alert_type, AlertType::HighHeartRate);
        assert_eq!(verdict.severity, Severity::High);
    }

    #[test]
    fn low_heart_rate_alerts() {
        let verdict = evaluate(&[sample(49.0, 98.0)]).expect("should alert");
        assert_eq!(verdict.alert_type, AlertType::LowHeartRate);
        assert_eq!(verdict.severity, Severity::High);
    }

    #[test]
    fn heart_rate_boundaries_are_exclusive() {
        assert_eq!(evaluate(&[sample(120.0, 98.0)]), None);
        assert_eq!(evaluate(&[sample(50.0, 98.0)]), None);
    }

    #[test]
    fn sudden_spo2_drop_is_critical_anomaly() {
        // Every individual reading passes rules 1-4 (spo2 >= 94, hr in
        // range), but the 104 -> 95 slide across the window is a 9-point
        // drop, past the 8-point threshold.
        let window = [
            sample(70.0, 104.0),
            sample(70.0, 101.0),
            sample(70.0, 99.0),
            sample(70.0, 97.0),
            sample(70.0, 95.0),
        ];
        let verdict = evaluate(&window).expect("should alert");
        assert_eq!(verdict.alert_type, AlertType::Anomaly);
        assert_eq!(verdict.severity, Severity::Critical);
        assert!(verdict.message.contains("Sudden SpO2 drop"));
    }

    #[test]
    fn erratic_heart_rate_is_high_anomaly() {
        // Each rate is inside [50, 120], spo2 is normal; the spread gives a
        // population std dev above 25.
        let window = [
            sample(60.0, 98.0),
            sample(110.0, 98.0),
            sample(55.0, 98.0),
            sample(120.0, 98.0),
            sample(58.0, 98.0),
        ];
        let verdict = evaluate(&window).expect("should alert");
        assert_eq!(verdict.alert_type, AlertType::Anomaly);
        assert_eq!(verdict.severity, Severity::High);
        assert!(verdict.message.contains("Erratic heart rate"));
    }

    #[test]
    fn trend_rules_need_a_full_window() {
        // Same drop shape but only four samples: no trend evaluation.
        let window = [
            sample(70.0, 104.0),
            sample(70.0, 99.0),
            sample(70.0, 97.0),
            sample(70.0, 95.0),
        ];
        assert_eq!(evaluate(&window), None);
    }

    #[test]
    fn normal_vitals_yield_no_alert() {
        let window = [
            sample(72.0, 98.0),
            sample(74.0, 98.0),
            sample(71.0, 97.0),
            sample(73.0, 98.0),
            sample(72.0, 98.0),
        ];
        assert_eq!(evaluate(&window), None);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let window = [
            sample(60.0, 98.0),
            sample(110.0, 98.0),
            sample(55.0, 98.0),
            sample(120.0, 98.0),
            sample(58.0, 98.0),
        ];
        assert_eq!(evaluate(&window), evaluate(&window));
    }

    #[test]
    fn population_std_dev_matches_hand_computation() {
        // [2, 4, 4, 4, 5, 5, 7, 9] has mean 5 and population std dev 2.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-9);
        assert_eq!(population_std_dev(&[]), 0.0);
    }

    #[test]
    fn engine_appends_then_evaluates() {
        let engine = VitalsEngine::new();
        // Build four normal readings, then one that completes a 9-point drop.
        for spo2 in [104.0, 101.0, 99.0, 97.0] {
            assert_eq!(engine.observe("BED_A_01", sample(70.0, spo2)), None);
        }
        let verdict = engine
            .observe("BED_A_01", sample(70.0, 95.0))
            .expect("drop should alert");
        assert_eq!(verdict.alert_type, AlertType::Anomaly);
        assert_eq!(engine.windows().recent("BED_A_01", 10).len(), 5);
    }
}

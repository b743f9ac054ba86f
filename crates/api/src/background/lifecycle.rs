//! Device lifecycle monitor: the periodic reconciliation scan that flips
//! stale devices offline.
//!
//! Runs as exactly one tokio task. Each tick queries for devices that are
//! marked online but have not been heard from within the heartbeat timeout,
//! transitions them offline, persists a `device_offline` alert, and
//! broadcasts the status change followed by the alert as an adjacent pair.
//!
//! The scan is level-triggered: the offline transition re-checks staleness
//! at write time, so a fresh contact racing the scan simply wins. Because
//! ticks are processed serially on one task (missed ticks delay rather than
//! burst), two scans can never overlap.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use wardsight_core::alert::{AlertDraft, AlertType, Severity};
use wardsight_core::device::DeviceStatus;
use wardsight_db::models::alert::CreateAlert;
use wardsight_db::models::device::Device;
use wardsight_db::repositories::{AlertRepo, DeviceRepo};
use wardsight_events::{FeedHub, LiveEvent};

/// Run the reconciliation loop until `cancel` is triggered.
///
/// A failing scan is logged and the next tick proceeds; the monitor itself
/// never terminates the process.
pub async fn run(
    pool: PgPool,
    hub: Arc<FeedHub>,
    heartbeat_timeout_secs: u64,
    check_interval_secs: u64,
    cancel: CancellationToken,
) {
    tracing::info!(
        heartbeat_timeout_secs,
        check_interval_secs,
        "Device lifecycle monitor started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Device lifecycle monitor stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = scan(&pool, &hub, heartbeat_timeout_secs).await {
                    tracing::error!(error = %e, "Lifecycle scan failed");
                }
            }
        }
    }
}

/// One reconciliation pass over the device registry.
///
/// An error transitioning one device is logged and must not abort the scan
/// for the others; only the staleness query itself can fail the whole pass.
async fn scan(pool: &PgPool, hub: &FeedHub, heartbeat_timeout_secs: u64) -> Result<(), sqlx::Error> {
    let cutoff = Utc::now() - chrono::Duration::seconds(heartbeat_timeout_secs as i64);
    let stale = DeviceRepo::find_stale(pool, cutoff).await?;

    for device in stale {
        if let Err(e) = transition_offline(pool, hub, &device, cutoff).await {
            tracing::error!(
                device_id = %device.device_id,
                error = %e,
                "Failed to transition stale device offline"
            );
        }
    }

    Ok(())
}

/// Flip one stale device offline and publish the paired events.
async fn transition_offline(
    pool: &PgPool,
    hub: &FeedHub,
    device: &Device,
    cutoff: chrono::DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    // The guarded update re-checks status and staleness, so a device that
    // reported in since the scan read it is left alone and a device already
    // transitioned by an earlier pass is never re-alerted.
    let transitioned =
        DeviceRepo::mark_offline_if_stale(pool, &device.device_id, cutoff).await?;
    if !transitioned {
        return Ok(());
    }

    let message = match &device.bed_number {
        Some(bed) => format!("Device {} (bed {bed}) went offline", device.device_id),
        None => format!("Device {} went offline", device.device_id),
    };
    let draft = AlertDraft {
        alert_type: AlertType::DeviceOffline,
        severity: Severity::High,
        message,
    };

    AlertRepo::insert(pool, &CreateAlert::from_draft(&device.device_id, &draft)).await?;

    // Status first, then its alert; the pair stays adjacent per subscriber.
    hub.broadcast_pair(
        LiveEvent::device_status(&device.device_id, DeviceStatus::Offline),
        LiveEvent::alert(&device.device_id, &draft),
    )
    .await;

    tracing::warn!(device_id = %device.device_id, "Device marked offline");
    Ok(())
}

//! Wardsight domain logic.
//!
//! Pure types and algorithms with no I/O: the vitals sliding window and
//! anomaly detector, alert and device state enums, device credential
//! generation, and bed placement. Everything here is callable from both the
//! API layer and tests without a database or runtime.

pub mod alert;
pub mod detector;
pub mod device;
pub mod device_keys;
pub mod error;
pub mod placement;
pub mod roles;
pub mod types;
pub mod window;

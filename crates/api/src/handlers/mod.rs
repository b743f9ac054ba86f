pub mod alerts;
pub mod auth;
pub mod dashboard;
pub mod device;
pub mod ingest;

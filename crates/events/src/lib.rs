//! Live-feed events and the fan-out broadcast hub.
//!
//! [`LiveEvent`] is the wire format pushed to connected dashboard viewers;
//! [`FeedHub`] is the subscriber registry that delivers them. Events are
//! transient: nothing here is persisted or replayed.

pub mod feed;
pub mod hub;

pub use feed::LiveEvent;
pub use hub::FeedHub;

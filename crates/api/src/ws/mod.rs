pub mod handler;

pub use handler::live_feed_handler;

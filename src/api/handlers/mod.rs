//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod process_url;

pub use health::health_handler;
pub use process_url::process_url_handler;

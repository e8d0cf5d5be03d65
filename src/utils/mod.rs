//! Utility functions for URL handling and cache keys.
//!
//! - [`url_normalizer`] - Query stripping and host normalization
//! - [`cache_key`] - Sanitized cache keys derived from URLs

pub mod cache_key;
pub mod url_normalizer;

//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the gateways defined in
//! [`crate::domain::gateways`], plus the chat transport.
//!
//! # Modules
//!
//! - [`http`] - Redirect resolution over HTTP
//! - [`extractor`] - `yt-dlp` media extraction
//! - [`store`] - Filesystem media cache
//! - [`telegram`] - Telegram Bot API long-polling transport

pub mod extractor;
pub mod http;
pub mod store;
pub mod telegram;

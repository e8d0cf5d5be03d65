//! # URL Fairy
//!
//! A chat-driven relay that turns social-media links into something a chat
//! client can preview: embed-friendly rewrites, or a locally hosted copy of
//! the media downloaded with `yt-dlp`.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Pipeline entities, errors and collaborator traits
//! - **Application Layer** ([`application`]) - Domain policy, rewriting, fetching and orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - HTTP, `yt-dlp`, filesystem cache and Telegram
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Pipeline
//!
//! 1. Follow redirects and strip tracking query strings
//! 2. Check the host against the download allow-list
//! 3. Rewrite to an embed-friendly alternate, or download and host the media
//! 4. Fall back to the rewritten link (or silence in group chats)
//!
//! ## Quick Start
//!
//! ```bash
//! export BOT_TOKEN="123456:ABC..."
//! export BASE_URL="media.example.org"
//! export DOWNLOAD_ALLOWED_DOMAINS="vk.com,tiktok.com"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        DomainPolicy, LinkRewriter, MediaFetcher, MessageService, OrchestratorSettings,
        RequestOrchestrator,
    };
    pub use crate::domain::entities::{ChatKind, ChatMessage, ProcessingOutcome, ResolvedUrl};
    pub use crate::domain::errors::{ExtractionError, FetchError, ResolveError};
    pub use crate::domain::gateways::{ContentStore, MediaExtractor, RedirectResolver};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}

//! Core data structures flowing through the relay pipeline.
//!
//! # Entity Types
//!
//! - [`UrlCandidate`] - A URL found in an inbound message
//! - [`ResolvedUrl`] - The canonical URL after redirect following
//! - [`DomainDecision`] - Allow-list verdict for a resolved URL
//! - [`ProcessingOutcome`] - The tagged result handed back to transports
//! - [`ChatMessage`] - Transport-neutral view of an inbound chat message

pub mod chat_message;
pub mod domain_decision;
pub mod outcome;
pub mod resolved_url;
pub mod url_candidate;

pub use chat_message::{ChatKind, ChatMessage};
pub use domain_decision::DomainDecision;
pub use outcome::ProcessingOutcome;
pub use resolved_url::{Resolution, ResolvedUrl};
pub use url_candidate::{UrlCandidate, UrlValidationError, extract_candidates};

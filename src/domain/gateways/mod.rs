//! Contracts for the collaborators the pipeline depends on.
//!
//! Each trait hides an external capability (HTTP, a subprocess, the
//! filesystem) behind an async interface so services can be tested without
//! it. Mock implementations are generated via `mockall` for unit tests.
//!
//! # Available Gateways
//!
//! - [`RedirectResolver`] - Follows redirects to a canonical URL
//! - [`MediaExtractor`] - Downloads media for a URL into a local file
//! - [`ContentStore`] - Content-addressed media cache

pub mod content_store;
pub mod media_extractor;
pub mod redirect_resolver;

pub use content_store::ContentStore;
pub use media_extractor::MediaExtractor;
pub use redirect_resolver::RedirectResolver;

#[cfg(test)]
pub use content_store::MockContentStore;
#[cfg(test)]
pub use media_extractor::MockMediaExtractor;
#[cfg(test)]
pub use redirect_resolver::MockRedirectResolver;

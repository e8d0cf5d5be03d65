//! Outbound HTTP integrations.
//!
//! - [`HttpRedirectResolver`] - Redirect following with reqwest

mod redirect_resolver;

pub use redirect_resolver::HttpRedirectResolver;

//! Application layer services implementing the relay pipeline.
//!
//! Services consume the gateway traits from [`crate::domain::gateways`] and
//! expose a small API to the HTTP handlers and the chat transport.
//!
//! # Available Services
//!
//! - [`services::domain_policy::DomainPolicy`] - Download allow-list
//! - [`services::link_rewriter::LinkRewriter`] - Embed-friendly link rewriting
//! - [`services::media_fetcher::MediaFetcher`] - Cached, coalesced media downloads
//! - [`services::orchestrator::RequestOrchestrator`] - End-to-end URL pipeline
//! - [`services::message_service::MessageService`] - Chat message handling

pub mod services;

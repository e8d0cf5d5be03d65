//! Business logic services for the application layer.

pub mod domain_policy;
pub mod link_rewriter;
pub mod media_fetcher;
pub mod message_service;
pub mod orchestrator;

pub use domain_policy::DomainPolicy;
pub use link_rewriter::{LinkRewriter, RewriteRule};
pub use media_fetcher::MediaFetcher;
pub use message_service::MessageService;
pub use orchestrator::{OrchestratorSettings, RequestOrchestrator};

//! Domain layer containing the relay's data model and collaborator contracts.
//!
//! Nothing in here touches the network or the filesystem. The concrete
//! collaborators live in [`crate::infrastructure`] and are injected into the
//! services in [`crate::application::services`].
//!
//! # Modules
//!
//! - [`entities`] - URL candidates, resolved URLs, policy decisions, outcomes
//! - [`errors`] - Typed failures raised by collaborators
//! - [`gateways`] - Traits for redirect resolution, media extraction and storage
//!
//! # Processing Flow
//!
//! 1. A chat message or HTTP request yields [`entities::UrlCandidate`]s
//! 2. Each candidate is resolved to a [`entities::ResolvedUrl`]
//! 3. The allow-list produces a [`entities::DomainDecision`]
//! 4. The orchestrator settles on a [`entities::ProcessingOutcome`]

pub mod entities;
pub mod errors;
pub mod gateways;

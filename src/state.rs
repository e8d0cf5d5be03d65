//! Shared state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::RequestOrchestrator;
use crate::domain::gateways::{ContentStore, MediaExtractor};

/// Application state shared across handlers.
///
/// Holds the single orchestrator built at startup, plus direct handles to
/// the collaborators checked by the health endpoint.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RequestOrchestrator>,
    pub extractor: Arc<dyn MediaExtractor>,
    pub store: Arc<dyn ContentStore>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<RequestOrchestrator>,
        extractor: Arc<dyn MediaExtractor>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        Self {
            orchestrator,
            extractor,
            store,
        }
    }
}

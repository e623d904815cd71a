//! Shared state for the HTTP and WebSocket handlers.

use std::sync::Arc;

use crate::application::BroadcastHub;

/// State required by every route.
///
/// Extracted from the application state.
#[derive(Clone)]
pub struct HubState {
    /// The hub every connection feeds into.
    pub hub: Arc<BroadcastHub>,
}

impl HubState {
    /// Create a new hub state.
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }
}

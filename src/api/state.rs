//! Application state for the API server.

use crate::dispatch::Dispatcher;

/// Shared application state.
///
/// Cloned per request; the dispatcher only holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

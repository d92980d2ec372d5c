use crate::dispatcher::Dispatcher;
use crate::metrics::Metrics;
use crate::store::RecordStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub store: Arc<dyn RecordStore>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire one long-lived store handle into the dispatcher and health check
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let metrics = Arc::new(Metrics::new());
        Self {
            dispatcher: Dispatcher::new(store.clone(), metrics.clone()),
            store,
            metrics,
        }
    }
}

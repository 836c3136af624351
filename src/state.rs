use crate::config::Config;
use crate::storage::TemplateStore;
use plated_core::DocumentGenerator;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state accessible to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Per-recipe and default templates
    pub store: Arc<dyn TemplateStore>,

    /// Binds recipes to templates and renders them
    pub generator: Arc<DocumentGenerator>,

    /// Limits concurrent renders; each one holds a blocking thread
    pub render_semaphore: Arc<Semaphore>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn TemplateStore>, generator: DocumentGenerator, config: Config) -> Self {
        let permits = config.concurrency.max_render_requests.max(1);
        Self {
            store,
            generator: Arc::new(generator),
            render_semaphore: Arc::new(Semaphore::new(permits)),
            config: Arc::new(config),
        }
    }
}

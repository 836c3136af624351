use async_trait::async_trait;
use plated_template::{OwnerKey, Template};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template '{key}' could not be encoded: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored template '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store task failed: {0}")]
    Task(String),
}

/// Durable templates keyed by owner.
///
/// A save replaces the whole template under its key; concurrent saves to the
/// same key resolve as last writer wins and never touch other keys.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Exact key lookup. `Ok(None)` means no template was ever saved there.
    async fn get_template(&self, key: &OwnerKey) -> Result<Option<Template>, StoreError>;

    async fn save_template(&self, key: &OwnerKey, template: Template) -> Result<(), StoreError>;
}

//! ResourceProvider trait for abstracting asset loading.
//!
//! Templates and recipes refer to binary assets (recipe photos, static
//! images, background PDFs) by string reference. The renderer never touches
//! the network or the filesystem itself; it asks a provider for the bytes.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Error type for asset loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Timed out loading resource '{0}'")]
    Timeout(String),

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// Loads asset bytes for a reference.
///
/// Implementations must be safe to share between concurrent renders. Every
/// failure is reported as a [`ResourceError`]; callers in the render path
/// degrade to placeholders instead of aborting.
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its reference (path, URL or URI).
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check if a resource exists without loading it.
    fn exists(&self, path: &str) -> bool;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for Arc<P> {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        (**self).load(path)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Serves a fixed set of assets registered up front.
///
/// Used for compiled-in assets and in tests; lookups are exact matches on
/// the reference string.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: HashMap<String, SharedResourceData>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `data` under `path`, replacing any previous entry.
    pub fn with(mut self, path: impl Into<String>, data: Vec<u8>) -> Self {
        self.resources.insert(path.into(), Arc::new(data));
        self
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources.contains_key(path)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}

//! Filesystem-backed asset provider for uploaded recipe images.
//!
//! Recipe image references are site-relative (`/uploads/tart.jpg`) or bare
//! file names. Both resolve inside the upload directory; nothing outside it
//! is ever read.

use plated_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Loads assets from a directory on the local filesystem.
///
/// Paths are canonicalized and verified to remain within the base directory,
/// so `../` sequences cannot escape it.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized base path for containment checks
    canonical_base: Option<PathBuf>,
    /// Public URL prefix stripped from references before resolution
    url_prefix: Option<String>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        // May fail if the directory doesn't exist yet
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
            url_prefix: None,
        }
    }

    /// Strips `prefix` (e.g. `/uploads/`) from references before joining them
    /// onto the base directory.
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(prefix.into());
        self
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    fn relative_reference<'a>(&self, reference: &'a str) -> &'a str {
        let reference = match &self.url_prefix {
            Some(prefix) => reference.strip_prefix(prefix.as_str()).unwrap_or(reference),
            None => reference,
        };
        reference.trim_start_matches('/')
    }

    /// Returns `None` if the path would escape the base directory.
    fn resolve_path_safe(&self, reference: &str) -> Option<PathBuf> {
        let relative = self.relative_reference(reference);
        if relative.is_empty() || Path::new(relative).is_absolute() {
            return None;
        }

        if Path::new(relative)
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full_path = self.base_path.join(relative);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            // Symlinks may still point outside
            return canonical.starts_with(base).then_some(canonical);
        }

        Some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full_path = self
            .resolve_path_safe(path)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (outside upload directory)", path)))?;

        log::debug!("Loading asset '{}' from {}", path, full_path.display());
        std::fs::read(&full_path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve_path_safe(path)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}

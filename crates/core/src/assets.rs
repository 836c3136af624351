//! Routes asset references to the provider that can load them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use plated_resource::{FilesystemResourceProvider, HttpResourceProvider};
use plated_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Loads `data:` URIs itself, sends `http(s)` URLs to the HTTP provider and
/// everything else to the upload directory.
///
/// URLs under the service's own public base URL are read from the upload
/// directory directly instead of being fetched back over the network.
#[derive(Debug, Default)]
pub struct AssetResolver {
    http: Option<HttpResourceProvider>,
    files: Option<FilesystemResourceProvider>,
    public_base_url: Option<String>,
}

impl AssetResolver {
    /// A resolver that only understands data URIs.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http(mut self, http: HttpResourceProvider) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_files(mut self, files: FilesystemResourceProvider) -> Self {
        self.files = Some(files);
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.public_base_url = (!url.trim().is_empty()).then(|| url.trim_end_matches('/').to_string());
        self
    }

    fn local_path<'r>(&self, reference: &'r str) -> Option<&'r str> {
        let base = self.public_base_url.as_deref()?;
        reference
            .strip_prefix(base)
            .filter(|rest| rest.starts_with('/'))
    }

    fn from_files(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        match &self.files {
            Some(files) => files.load(path),
            None => Err(ResourceError::NotFound(path.to_string())),
        }
    }
}

impl ResourceProvider for AssetResolver {
    fn load(&self, reference: &str) -> Result<SharedResourceData, ResourceError> {
        if reference.starts_with("data:") {
            return decode_data_uri(reference).map(Arc::new);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            if let Some(path) = self.local_path(reference)
                && self.files.is_some()
            {
                return self.from_files(path);
            }
            return match &self.http {
                Some(http) => http.load(reference),
                None => Err(ResourceError::NotFound(reference.to_string())),
            };
        }
        self.from_files(reference)
    }

    fn exists(&self, reference: &str) -> bool {
        if reference.starts_with("data:") {
            return decode_data_uri(reference).is_ok();
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return match (self.local_path(reference), &self.files, &self.http) {
                (Some(path), Some(files), _) => files.exists(path),
                (_, _, Some(http)) => http.exists(reference),
                _ => false,
            };
        }
        self.files.as_ref().is_some_and(|files| files.exists(reference))
    }

    fn name(&self) -> &'static str {
        "AssetResolver"
    }
}

/// Decodes a base64 `data:` URI. Only base64 payloads are accepted.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ResourceError> {
    let invalid = |message: &str| ResourceError::InvalidFormat(format!("data URI: {}", message));
    let rest = uri.strip_prefix("data:").ok_or_else(|| invalid("missing 'data:' scheme"))?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| invalid("missing ','"))?;
    if !header.ends_with(";base64") {
        return Err(invalid("payload is not base64"));
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| invalid(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_decode_data_uri() {
        let bytes = decode_data_uri("data:application/pdf;base64,JVBERi0=").unwrap();
        assert_eq!(bytes, b"%PDF-");
        let wrapped = decode_data_uri("data:image/png;base64,JVBE\nRi0=").unwrap();
        assert_eq!(wrapped, b"%PDF-");
    }

    #[test]
    fn test_decode_data_uri_rejects_non_base64() {
        assert!(matches!(
            decode_data_uri("data:text/plain,hello"),
            Err(ResourceError::InvalidFormat(_))
        ));
        assert!(decode_data_uri("data:image/png;base64,%%%").is_err());
    }

    #[test]
    fn test_routes_local_urls_to_upload_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("uploads")).unwrap();
        fs::write(dir.path().join("uploads/tart.png"), b"png-bytes").unwrap();

        let resolver = AssetResolver::new()
            .with_files(FilesystemResourceProvider::new(dir.path()))
            .with_public_base_url("https://recipes.example.com/")
            .with_http(HttpResourceProvider::new(Duration::from_millis(10)));

        let data = resolver
            .load("https://recipes.example.com/uploads/tart.png")
            .unwrap();
        assert_eq!(data.as_slice(), b"png-bytes");
        assert!(resolver.exists("/uploads/tart.png"));
        assert!(!resolver.exists("/uploads/missing.png"));
    }

    #[test]
    fn test_without_providers_only_data_uris_resolve() {
        let resolver = AssetResolver::new();
        assert!(resolver.load("data:image/png;base64,AAAA").is_ok());
        assert!(matches!(
            resolver.load("https://example.com/a.png"),
            Err(ResourceError::NotFound(_))
        ));
        assert!(matches!(
            resolver.load("/uploads/a.png"),
            Err(ResourceError::NotFound(_))
        ));
    }
}

//! HTTP asset provider for remotely hosted recipe photos.

use plated_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches `http://` and `https://` references with a hard per-request timeout.
///
/// A timeout surfaces as [`ResourceError::Timeout`], which the renderer treats
/// exactly like an unreachable asset.
#[derive(Debug, Clone)]
pub struct HttpResourceProvider {
    timeout: Duration,
    max_bytes: usize,
}

impl Default for HttpResourceProvider {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

impl HttpResourceProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            max_bytes: 20 * 1024 * 1024,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn is_remote(path: &str) -> bool {
        path.starts_with("http://") || path.starts_with("https://")
    }

    fn client(&self, path: &str) -> Result<reqwest::blocking::Client, ResourceError> {
        // Built per fetch: a blocking client must not be created or dropped on an async worker.
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ResourceError::LoadFailed {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    fn map_error(path: &str, err: reqwest::Error) -> ResourceError {
        if err.is_timeout() {
            ResourceError::Timeout(path.to_string())
        } else {
            ResourceError::LoadFailed {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl ResourceProvider for HttpResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        if !Self::is_remote(path) {
            return Err(ResourceError::NotFound(path.to_string()));
        }

        log::info!("Fetching remote asset {}", path);
        let response = self
            .client(path)?
            .get(path)
            .send()
            .map_err(|e| Self::map_error(path, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(ResourceError::LoadFailed {
                path: path.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        let too_large = || {
            ResourceError::InvalidFormat(format!("{} exceeds {} bytes", path, self.max_bytes))
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(too_large());
        }

        // Bodies without a declared length are read one byte past the cap.
        let mut bytes = Vec::new();
        response
            .take(self.max_bytes as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::TimedOut => ResourceError::Timeout(path.to_string()),
                _ => ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                },
            })?;
        if bytes.len() > self.max_bytes {
            return Err(too_large());
        }
        Ok(Arc::new(bytes))
    }

    fn exists(&self, path: &str) -> bool {
        Self::is_remote(path)
    }

    fn name(&self) -> &'static str {
        "HttpResourceProvider"
    }
}

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Service configuration.
///
/// Every key has a default, so the service starts without a config file.
/// Values are layered: defaults, then the TOML file, then `PLATED__*`
/// environment variables, then command line flags (applied in `main`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub concurrency: ConcurrencyConfig,
    pub storage: StorageConfig,
    pub assets: AssetsConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_request_size_mb: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Renders allowed to run at once; further requests wait for a permit.
    pub max_render_requests: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_render_requests: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Filesystem,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Filesystem,
            path: PathBuf::from("data/templates"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Public URL the recipe service serves uploads from. Relative image
    /// paths are joined onto it; URLs below it are read from `upload_dir`.
    pub public_base_url: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub fetch_timeout_ms: u64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_base_url: None,
            upload_dir: None,
            fetch_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Stamp each generated document with a "Generated ..." footer.
    pub generation_footer: bool,
}

const DEFAULT_CONFIG: &str = "config/default";

impl Config {
    /// Loads `path`, or `config/default.toml` when none is given, and
    /// overlays `PLATED__SECTION__KEY` environment variables.
    ///
    /// An explicitly named file must exist; the default one is optional.
    /// `main` fills `path` from `--config` or `PLATED_CONFIG`.
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix("PLATED")
                .prefix_separator("__")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }

    pub fn max_request_bytes(&self) -> usize {
        self.server.max_request_size_mb.saturating_mul(1024 * 1024)
    }
}

//! # plated
//!
//! HTTP service around the recipe template engine:
//! - **storage**: durable per-recipe and default templates
//! - **resolver**: recipe → default → built-in template fallback
//! - **api**: template CRUD, document generation and editor preview
//!
//! Rendering itself lives in `plated-core` and `plated-render-lopdf`.

pub mod api;
pub mod config;
pub mod error;
pub mod resolver;
pub mod state;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use config::{Config, StorageBackend};
use plated_core::{AssetResolver, DocumentGenerator, RecipeBinder};
use plated_resource::{FilesystemResourceProvider, HttpResourceProvider};
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use storage::{FilesystemTemplateStore, InMemoryTemplateStore, StoreError, TemplateStore};
use tower_http::trace::TraceLayer;

pub use resolver::{resolve_template, ResolvedTemplate, TemplateOrigin};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_bytes();

    Router::new()
        .route("/health", get(api::health_check))
        .route("/templates/default/save", post(api::save_default_template))
        .route("/templates/preview", post(api::preview_document))
        .route(
            "/templates/:recipe_id",
            get(api::get_template).post(api::save_template),
        )
        .route("/recipes/:recipe_id/document", post(api::generate_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the template store selected by `storage.backend`.
pub async fn build_store(config: &Config) -> Result<Arc<dyn TemplateStore>, StoreError> {
    Ok(match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryTemplateStore::new()),
        StorageBackend::Filesystem => {
            Arc::new(FilesystemTemplateStore::new(config.storage.path.clone()).await?)
        }
    })
}

/// Wires the asset providers and binder from the `assets` section.
pub fn build_generator(config: &Config) -> DocumentGenerator {
    let timeout = Duration::from_millis(config.assets.fetch_timeout_ms);
    let mut assets = AssetResolver::new().with_http(HttpResourceProvider::new(timeout));
    let mut binder = RecipeBinder::new();

    if let Some(dir) = &config.assets.upload_dir {
        assets = assets.with_files(FilesystemResourceProvider::new(dir));
    }
    if let Some(url) = &config.assets.public_base_url {
        assets = assets.with_public_base_url(url.clone());
        binder = binder.with_public_base_url(url.clone());
    }

    DocumentGenerator::new(binder, Arc::new(assets))
}

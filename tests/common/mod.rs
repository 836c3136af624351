pub mod pdf_assertions;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use plated::{build_generator, build_router, config::Config, state::AppState, storage::InMemoryTemplateStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub use pdf_assertions::GeneratedPdf;

/// A router over a fresh in-memory store, plus a handle on that store.
pub struct TestApp {
    pub store: Arc<InMemoryTemplateStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(InMemoryTemplateStore::new());
        let generator = build_generator(&config);
        let state = AppState::new(store.clone(), generator, config);
        Self {
            store,
            router: build_router(state),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn pdf(&self) -> GeneratedPdf {
        assert_eq!(self.header("content-type"), Some("application/pdf"));
        GeneratedPdf::from_bytes(self.body.clone()).unwrap()
    }
}

/// The Tart recipe as the recipe service sends it.
pub fn tart_recipe() -> Value {
    serde_json::json!({
        "_id": "r1",
        "name": "Tart",
        "ingredients": [
            { "ingredient": { "name": "Flour" }, "quantity": 200, "measure": "g" }
        ],
        "steps": "Mix\nBake"
    })
}

/// A one-page template with a text field per name, stacked down the page.
pub fn text_template(names: &[&str]) -> Value {
    let fields: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            serde_json::json!({
                "name": name,
                "type": "text",
                "position": { "x": 10, "y": 10 + 40 * i },
                "width": 150,
                "height": 30
            })
        })
        .collect();
    serde_json::json!({
        "basePdf": { "width": 210, "height": 297, "padding": [0, 0, 0, 0] },
        "schemas": [fields]
    })
}

mod common;

use axum::http::StatusCode;
use common::{tart_recipe, text_template, TestApp};
use plated::config::{Config, StorageBackend};
use plated::storage::TemplateStore;
use plated::{build_store, resolve_template, TemplateOrigin};
use plated_template::{builtin_template, OwnerKey, Template};
use serde_json::json;

async fn origin_for(app: &TestApp, recipe_id: &str) -> String {
    let response = app
        .post_json(
            &format!("/recipes/{}/document", recipe_id),
            &json!({ "recipe": tart_recipe() }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.header("x-template-origin").unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_fallback_order() {
    let app = TestApp::new();
    assert_eq!(origin_for(&app, "r1").await, "built-in");

    app.post_json(
        "/templates/default/save",
        &json!({ "template": text_template(&["title"]) }),
    )
    .await;
    assert_eq!(origin_for(&app, "r1").await, "default");

    app.post_json(
        "/templates/r1",
        &json!({ "template": text_template(&["title", "steps"]) }),
    )
    .await;
    assert_eq!(origin_for(&app, "r1").await, "recipe");
    // Other recipes still see the default
    assert_eq!(origin_for(&app, "r2").await, "default");
}

#[tokio::test]
async fn test_builtin_document_shows_recipe() {
    let app = TestApp::new();
    let response = app
        .post_json("/recipes/r1/document", &json!({ "recipe": tart_recipe() }))
        .await;

    let pdf = response.pdf();
    assert_eq!(pdf.page_count(), 1);
    for expected in ["Tart", "Ingredients", "200 g Flour", "Mix", "Bake"] {
        assert!(pdf.contains_text(expected), "missing {}", expected);
    }
}

#[tokio::test]
async fn test_empty_recipe_template_falls_through_to_default() {
    let app = TestApp::new();
    app.post_json(
        "/templates/default/save",
        &json!({ "template": text_template(&["title"]) }),
    )
    .await;
    app.post_json(
        "/templates/r1",
        &json!({ "template": { "basePdf": null, "schemas": [[]] } }),
    )
    .await;

    assert_eq!(origin_for(&app, "r1").await, "default");
}

#[tokio::test]
async fn test_builtin_template_returned_unchanged() {
    let app = TestApp::new();
    let resolved = resolve_template(&*app.store, "r1").await;
    assert_eq!(resolved.origin, TemplateOrigin::BuiltIn);
    assert_eq!(resolved.template, builtin_template());
}

#[tokio::test]
async fn test_filesystem_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Filesystem;
    config.storage.path = dir.path().join("templates");

    let template: Template = serde_json::from_value(text_template(&["title"])).unwrap();
    let key = OwnerKey::recipe("r1").unwrap();
    {
        let store = build_store(&config).await.unwrap();
        store.save_template(&key, template.clone()).await.unwrap();
    }

    let reopened = build_store(&config).await.unwrap();
    let resolved = resolve_template(&*reopened, "r1").await;
    assert_eq!(resolved.origin, TemplateOrigin::Recipe);
    assert_eq!(resolved.template, template);
}

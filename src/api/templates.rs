use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use plated_template::{OwnerKey, Template};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub template: Template,
}

/// `GET /templates/:recipe_id`. `default` reads the default template.
pub async fn get_template(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
) -> Result<Json<TemplatePayload>> {
    let key: OwnerKey = recipe_id.parse()?;
    let template = state
        .store
        .get_template(&key)
        .await?
        .ok_or_else(|| ServiceError::TemplateNotFound(key.to_string()))?;

    Ok(Json(TemplatePayload { template }))
}

/// `POST /templates/:recipe_id`
pub async fn save_template(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    body: Bytes,
) -> Result<Json<TemplatePayload>> {
    let key: OwnerKey = recipe_id.parse()?;
    store_payload(&state, key, &body).await
}

/// `POST /templates/default/save`
pub async fn save_default_template(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TemplatePayload>> {
    store_payload(&state, OwnerKey::Default, &body).await
}

async fn store_payload(state: &AppState, key: OwnerKey, body: &[u8]) -> Result<Json<TemplatePayload>> {
    let template = parse_template(body)?;
    state
        .store
        .save_template(&key, template.clone())
        .await
        .map_err(ServiceError::Persist)?;

    tracing::info!(
        "Saved template '{}' ({} fields on {} pages)",
        key,
        template.field_count(),
        template.page_count()
    );
    Ok(Json(TemplatePayload { template }))
}

/// Decodes `{ "template": ... }` and validates it. Nothing is stored on error.
pub(crate) fn parse_template(body: &[u8]) -> Result<Template> {
    let payload: TemplatePayload = serde_json::from_slice(body)
        .map_err(|e| ServiceError::MalformedTemplatePayload(e.to_string()))?;
    payload.template.validate()?;
    Ok(payload.template)
}

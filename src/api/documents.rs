use crate::error::{Result, ServiceError};
use crate::resolver::resolve_template;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    response::IntoResponse,
};
use plated_core::{Recipe, RenderOptions, RenderedDocument};
use plated_template::Template;
use serde::Deserialize;

pub const TEMPLATE_ORIGIN_HEADER: &str = "x-template-origin";
pub const RENDER_WARNINGS_HEADER: &str = "x-render-warnings";

/// Origin reported for editor previews, which never touch the store.
pub const PREVIEW_ORIGIN: &str = "preview";

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub recipe: Recipe,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub template: Template,
    #[serde(default)]
    pub recipe: Recipe,
}

/// `POST /recipes/:recipe_id/document`: render a recipe with its resolved
/// template. Always produces a document; missing templates fall back.
pub async fn generate_document(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let request: DocumentRequest = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

    let resolved = resolve_template(state.store.as_ref(), &recipe_id).await;
    tracing::info!(
        "Rendering recipe '{}' with the {} template",
        recipe_id,
        resolved.origin
    );

    let document = render(&state, resolved.template, request.recipe).await?;
    Ok(pdf_response(
        document,
        resolved.origin.as_str(),
        &format!("recipe-{}.pdf", file_stem(&recipe_id)),
    ))
}

/// `POST /templates/preview`: render an unsaved template from the editor.
pub async fn preview_document(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let request: PreviewRequest = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::MalformedTemplatePayload(e.to_string()))?;
    request.template.validate()?;

    let document = render(&state, request.template, request.recipe).await?;
    Ok(pdf_response(document, PREVIEW_ORIGIN, "preview.pdf"))
}

async fn render(state: &AppState, template: Template, recipe: Recipe) -> Result<RenderedDocument> {
    let _permit = state
        .render_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let generator = state.generator.clone();
    let options = RenderOptions {
        footer: state.config.render.generation_footer.then(generation_footer),
    };

    let document = tokio::task::spawn_blocking(move || {
        generator.generate_with(&template, &recipe, options)
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("render task failed: {}", e)))?
    .map_err(|e| ServiceError::GenerationFailed(e.to_string()))?;

    for warning in &document.warnings {
        tracing::warn!("{}", warning);
    }
    Ok(document)
}

fn generation_footer() -> String {
    format!(
        "Generated {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
    )
}

fn pdf_response(
    document: RenderedDocument,
    origin: &str,
    filename: &str,
) -> impl IntoResponse + use<> {
    tracing::debug!(
        "Rendered {} pages ({} bytes, {} warnings)",
        document.page_count,
        document.bytes.len(),
        document.warnings.len()
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", filename),
            ),
            (
                HeaderName::from_static(TEMPLATE_ORIGIN_HEADER),
                origin.to_string(),
            ),
            (
                HeaderName::from_static(RENDER_WARNINGS_HEADER),
                document.warnings.len().to_string(),
            ),
        ],
        document.bytes,
    )
}

fn file_stem(recipe_id: &str) -> String {
    let stem: String = recipe_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(64)
        .collect();
    if stem.is_empty() { "document".to_string() } else { stem }
}

use crate::assets::AssetResolver;
use crate::binder::RecipeBinder;
use crate::recipe::Recipe;
use plated_render_lopdf::{RenderError, RenderOptions, RenderedDocument, TemplateRenderer};
use plated_template::Template;
use plated_traits::ResourceProvider;
use std::sync::Arc;

/// Binds a recipe to a template and renders the result.
///
/// Holds no per-document state; one generator is shared by every request.
#[derive(Debug, Clone)]
pub struct DocumentGenerator {
    binder: Arc<RecipeBinder>,
    renderer: TemplateRenderer,
    assets: Arc<dyn ResourceProvider>,
}

impl Default for DocumentGenerator {
    fn default() -> Self {
        Self::new(RecipeBinder::new(), Arc::new(AssetResolver::new()))
    }
}

impl DocumentGenerator {
    pub fn new(binder: RecipeBinder, assets: Arc<dyn ResourceProvider>) -> Self {
        Self {
            binder: Arc::new(binder),
            renderer: TemplateRenderer::new(),
            assets,
        }
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.renderer = TemplateRenderer::with_options(options);
        self
    }

    pub fn binder(&self) -> &RecipeBinder {
        &self.binder
    }

    pub fn generate(
        &self,
        template: &Template,
        recipe: &Recipe,
    ) -> Result<RenderedDocument, RenderError> {
        let values = self.binder.bind(recipe, template);
        log::debug!(
            "Bound {} of {} fields for recipe '{}'",
            values.len(),
            template.field_count(),
            recipe.name
        );
        self.renderer.render(template, &values, self.assets.as_ref())
    }

    /// Renders with per-call options, e.g. a footer carrying the request time.
    pub fn generate_with(
        &self,
        template: &Template,
        recipe: &Recipe,
        options: RenderOptions,
    ) -> Result<RenderedDocument, RenderError> {
        let values = self.binder.bind(recipe, template);
        TemplateRenderer::with_options(options).render(template, &values, self.assets.as_ref())
    }
}

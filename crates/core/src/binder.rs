//! Maps recipe data onto template fields by field name.

use crate::recipe::Recipe;
use handlebars::{no_escape, Handlebars};
use plated_template::{FieldType, FieldValue, Template, ValueMapping, PLACEHOLDER_IMAGE};
use serde_json::{json, Value};

/// Which recipe attribute a field name binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Title,
    Ingredients,
    Steps,
    PlatingGuide,
    Allergens,
    ServiceTypes,
    Photo,
}

impl Binding {
    /// Recognised field names, including the legacy display-name spellings.
    pub fn for_field(name: &str) -> Option<Self> {
        match name {
            "title" | "Recipe Name" | "name" | "recipeName" => Some(Binding::Title),
            "ingredients" => Some(Binding::Ingredients),
            "steps" => Some(Binding::Steps),
            "platingGuide" | "Plating Guide" => Some(Binding::PlatingGuide),
            "allergens" => Some(Binding::Allergens),
            "serviceTypes" | "Service Types" => Some(Binding::ServiceTypes),
            "photo" | "image" | "Recipe Image" => Some(Binding::Photo),
            _ => None,
        }
    }
}

/// Builds the per-render [`ValueMapping`] for a recipe and a template.
///
/// Binding never fails: every text field gets a string and every image field
/// a reference, falling back to static content, `""` or the placeholder.
pub struct RecipeBinder {
    public_base_url: Option<String>,
    handlebars: Handlebars<'static>,
}

impl Default for RecipeBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecipeBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeBinder")
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

impl RecipeBinder {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Output goes into a PDF, not HTML.
        handlebars.register_escape_fn(no_escape);
        Self {
            public_base_url: None,
            handlebars,
        }
    }

    /// Relative image paths are made absolute against this URL.
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.public_base_url = (!url.trim().is_empty()).then_some(url);
        self
    }

    pub fn bind(&self, recipe: &Recipe, template: &Template) -> ValueMapping {
        let context = self.context(recipe);
        let mut mapping = ValueMapping::new();

        for (_, field) in template.fields() {
            let binding = Binding::for_field(&field.name);
            let value = match &field.field_type {
                FieldType::Text => {
                    let text = match binding {
                        Some(Binding::Photo) | None => field
                            .content
                            .as_deref()
                            .map(|content| self.render_static(&field.name, content, &context))
                            .unwrap_or_default(),
                        Some(binding) => self.text_value(recipe, binding),
                    };
                    FieldValue::Text(text)
                }
                FieldType::Image => {
                    let reference = match binding {
                        Some(Binding::Photo) => recipe.image.as_deref(),
                        _ => field.content.as_deref(),
                    };
                    FieldValue::Image(self.resolve_image(reference))
                }
                FieldType::Other(kind) => {
                    log::debug!("Not binding field '{}' of type '{}'", field.name, kind);
                    continue;
                }
            };
            if mapping.insert(field.name.clone(), value).is_some() {
                log::warn!("Template has more than one field named '{}'", field.name);
            }
        }
        mapping
    }

    pub fn text_value(&self, recipe: &Recipe, binding: Binding) -> String {
        match binding {
            Binding::Title => recipe.name.clone(),
            Binding::Ingredients => recipe
                .ingredients
                .iter()
                .map(|i| i.line())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Binding::Steps => recipe.step_lines().collect::<Vec<_>>().join("\n"),
            Binding::PlatingGuide => recipe.plating_lines().collect::<Vec<_>>().join("\n"),
            Binding::Allergens => recipe.allergens.join(", "),
            Binding::ServiceTypes => recipe.service_types.join(", "),
            Binding::Photo => self.resolve_image(recipe.image.as_deref()),
        }
    }

    /// Absolute reference for an image, or the placeholder when there is none.
    pub fn resolve_image(&self, reference: Option<&str>) -> String {
        let Some(reference) = reference.map(str::trim).filter(|r| !r.is_empty()) else {
            return PLACEHOLDER_IMAGE.to_string();
        };
        let is_absolute = ["data:", "http://", "https://", "builtin:"]
            .iter()
            .any(|scheme| reference.starts_with(scheme));
        match &self.public_base_url {
            Some(base) if !is_absolute => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                reference.trim_start_matches('/')
            ),
            _ => reference.to_string(),
        }
    }

    /// The values static label content can refer to, e.g. `{{title}}`.
    fn context(&self, recipe: &Recipe) -> Value {
        json!({
            "title": recipe.name,
            "name": recipe.name,
            "ingredients": self.text_value(recipe, Binding::Ingredients),
            "steps": self.text_value(recipe, Binding::Steps),
            "platingGuide": self.text_value(recipe, Binding::PlatingGuide),
            "allergens": self.text_value(recipe, Binding::Allergens),
            "serviceTypes": self.text_value(recipe, Binding::ServiceTypes),
            "image": recipe.image,
        })
    }

    fn render_static(&self, field: &str, content: &str, context: &Value) -> String {
        if !content.contains("{{") {
            return content.to_string();
        }
        self.handlebars
            .render_template(content, context)
            .unwrap_or_else(|err| {
                log::debug!("Static content of field '{}' is not a valid template: {}", field, err);
                content.to_string()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeIngredient;
    use plated_template::{builtin_template, Field};
    use plated_types::Rect;

    fn tart() -> Recipe {
        Recipe::new("Tart")
            .with_ingredient(RecipeIngredient::new(200.0, "g", "Flour"))
            .with_steps("Mix\nBake")
    }

    fn text(name: &str) -> Field {
        Field::text(name, Rect::new(0.0, 0.0, 50.0, 10.0))
    }

    #[test]
    fn test_tart_scenario() {
        let template = Template::single_page(vec![text("title"), text("ingredients"), text("steps")]);
        let mapping = RecipeBinder::new().bind(&tart(), &template);

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.text("title"), Some("Tart"));
        assert_eq!(mapping.text("ingredients"), Some("200 g Flour"));
        assert_eq!(mapping.text("steps"), Some("Mix\nBake"));
    }

    #[test]
    fn test_steps_keep_paragraph_breaks() {
        let recipe = tart().with_steps("Mix\r\n\r\nBake\n");
        let binder = RecipeBinder::new();
        assert_eq!(binder.text_value(&recipe, Binding::Steps), "Mix\n\nBake");
    }

    #[test]
    fn test_legacy_field_names() {
        let template = Template::single_page(vec![
            text("Recipe Name"),
            text("Plating Guide"),
            text("Service Types"),
        ]);
        let recipe = Recipe {
            service_types: vec!["Lunch".into(), "Dinner".into()],
            ..tart().with_plating_guide("Slice\nServe warm")
        };
        let mapping = RecipeBinder::new().bind(&recipe, &template);

        assert_eq!(mapping.text("Recipe Name"), Some("Tart"));
        assert_eq!(mapping.text("Plating Guide"), Some("Slice\nServe warm"));
        assert_eq!(mapping.text("Service Types"), Some("Lunch, Dinner"));
    }

    #[test]
    fn test_unbound_fields_use_static_content_or_empty() {
        let template = Template::single_page(vec![
            text("ingredientsLabel").with_content("Ingredients"),
            text("subtitle").with_content("{{title}} serves {{serviceTypes}}"),
            text("broken").with_content("{{#if}}"),
            text("notes"),
        ]);
        let recipe = Recipe {
            service_types: vec!["Dinner".into()],
            ..tart()
        };
        let mapping = RecipeBinder::new().bind(&recipe, &template);

        assert_eq!(mapping.text("ingredientsLabel"), Some("Ingredients"));
        assert_eq!(mapping.text("subtitle"), Some("Tart serves Dinner"));
        assert_eq!(mapping.text("broken"), Some("{{#if}}"));
        assert_eq!(mapping.text("notes"), Some(""));
    }

    #[test]
    fn test_static_content_is_not_html_escaped() {
        let template = Template::single_page(vec![text("t").with_content("{{title}}")]);
        let recipe = Recipe::new("Fish & Chips <3");
        let mapping = RecipeBinder::new().bind(&recipe, &template);
        assert_eq!(mapping.text("t"), Some("Fish & Chips <3"));
    }

    #[test]
    fn test_photo_binding() {
        let template = Template::single_page(vec![Field::image("photo", Rect::default())]);
        let binder = RecipeBinder::new().with_public_base_url("https://cdn.example.com/");

        let without = binder.bind(&tart(), &template);
        assert_eq!(without.get("photo"), Some(&FieldValue::placeholder_image()));

        let with = binder.bind(&tart().with_image("/uploads/tart.jpg"), &template);
        assert_eq!(
            with.get("photo").and_then(FieldValue::as_image_ref),
            Some("https://cdn.example.com/uploads/tart.jpg")
        );

        let remote = binder.bind(&tart().with_image("https://img.example.org/t.png"), &template);
        assert_eq!(
            remote.get("photo").and_then(FieldValue::as_image_ref),
            Some("https://img.example.org/t.png")
        );
    }

    #[test]
    fn test_relative_image_kept_without_base_url() {
        let binder = RecipeBinder::new();
        assert_eq!(binder.resolve_image(Some("/uploads/a.png")), "/uploads/a.png");
        assert_eq!(binder.resolve_image(Some("  ")), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_polymorphic_over_field_type() {
        let template = Template::single_page(vec![
            Field::image("title", Rect::default()),
            text("photo").with_content("Photo:"),
            Field::new("qr", FieldType::Other("qrcode".into()), Rect::default()),
        ]);
        let mapping = RecipeBinder::new().bind(&tart().with_image("a.png"), &template);

        assert_eq!(mapping.get("title"), Some(&FieldValue::placeholder_image()));
        assert_eq!(mapping.text("photo"), Some("Photo:"));
        assert!(!mapping.contains("qr"));
    }

    #[test]
    fn test_builtin_template_binds_every_field() {
        let template = builtin_template();
        let mapping = RecipeBinder::new().bind(&tart(), &template);
        assert_eq!(mapping.len(), template.field_count());
        assert_eq!(mapping.text("stepsLabel"), Some("Method"));
    }
}

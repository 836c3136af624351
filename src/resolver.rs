//! Picks the template a recipe renders with: its own, else the default,
//! else the compiled-in one.

use crate::storage::TemplateStore;
use plated_template::{builtin_template, OwnerKey, Template};
use serde::Serialize;
use std::fmt;

/// Which tier a resolved template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateOrigin {
    Recipe,
    Default,
    BuiltIn,
}

impl TemplateOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateOrigin::Recipe => "recipe",
            TemplateOrigin::Default => "default",
            TemplateOrigin::BuiltIn => "built-in",
        }
    }
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTemplate {
    pub template: Template,
    pub origin: TemplateOrigin,
}

/// Never fails. Store errors and unusable recipe ids are logged and treated
/// as "no template here"; templates without any field fall through too.
pub async fn resolve_template(store: &dyn TemplateStore, recipe_id: &str) -> ResolvedTemplate {
    match OwnerKey::recipe(recipe_id) {
        Ok(key) => {
            if let Some(template) = lookup(store, &key).await {
                return ResolvedTemplate {
                    template,
                    origin: TemplateOrigin::Recipe,
                };
            }
        }
        Err(e) => tracing::debug!("Skipping recipe tier for '{}': {}", recipe_id, e),
    }

    if let Some(template) = lookup(store, &OwnerKey::Default).await {
        return ResolvedTemplate {
            template,
            origin: TemplateOrigin::Default,
        };
    }

    tracing::debug!("Recipe '{}' renders with the built-in template", recipe_id);
    ResolvedTemplate {
        template: builtin_template(),
        origin: TemplateOrigin::BuiltIn,
    }
}

async fn lookup(store: &dyn TemplateStore, key: &OwnerKey) -> Option<Template> {
    match store.get_template(key).await {
        Ok(Some(template)) if !template.is_empty() => Some(template),
        Ok(Some(_)) => {
            tracing::debug!("Template '{}' has no fields, falling through", key);
            None
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Reading template '{}' failed, falling through: {}", key, e);
            None
        }
    }
}

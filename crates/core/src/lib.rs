//! # plated-core
//!
//! Turns a recipe plus a template into a PDF:
//! - **recipe**: the read-only recipe model, lenient about client shapes
//! - **binder**: field-name bindings from recipe data to template fields
//! - **assets**: resolves data URIs, remote URLs and uploaded files
//! - **generator**: bind, then render
//!
//! Storage and template fallback live in the service; this crate has no
//! async runtime and no knowledge of where templates come from.

pub use plated_render_lopdf as render;
pub use plated_template as template;
pub use plated_traits as traits;

pub mod assets;
pub mod binder;
pub mod generator;
pub mod recipe;

pub use assets::{decode_data_uri, AssetResolver};
pub use binder::{Binding, RecipeBinder};
pub use generator::DocumentGenerator;
pub use recipe::{format_quantity, Recipe, RecipeIngredient};

pub use plated_render_lopdf::{RenderError, RenderOptions, RenderWarning, RenderedDocument};
pub use plated_template::{Template, ValueMapping};

//! PDF renderer for recipe templates, built on lopdf.
//!
//! Fields are drawn onto either blank pages or the pages of a background
//! PDF. Every field type gets a [`Renderable`]; failures that only affect a
//! single asset or field become [`RenderWarning`]s instead of errors.

mod canvas;
mod error;
pub mod fields;
pub mod fonts;
mod renderer;
mod warning;
mod xobject;

pub use error::RenderError;
pub use fields::{renderable_for, wrap_text, ImageField, PageContext, Renderable, TextField};
pub use renderer::{RenderOptions, RenderedDocument, TemplateRenderer};
pub use warning::RenderWarning;

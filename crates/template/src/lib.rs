//! Template schema for recipe documents.
//!
//! A [`Template`] is a page background plus pages of positioned, typed
//! [`Field`]s. This crate owns the data model and its contracts:
//!
//! - **schema**: the wire format (`basePdf` + `schemas`), tolerant loading
//! - **validation**: the save-time contract ([`ValidationError`])
//! - **owner**: store keys ([`OwnerKey`]), a recipe id or `"default"`
//! - **mapping**: the per-render [`ValueMapping`] fed to the renderer
//! - **builtin**: the compiled-in fallback template
//! - **session**: [`EditorSession`], explicit editor state

pub mod builtin;
pub mod mapping;
pub mod owner;
pub mod schema;
pub mod session;
pub mod validation;

pub use builtin::builtin_template;
pub use mapping::{FieldValue, ValueMapping, PLACEHOLDER_IMAGE};
pub use owner::{OwnerKey, OwnerKeyError, DEFAULT_OWNER};
pub use schema::{
    Alignment, BasePdf, BlankPdf, Field, FieldType, Template, TextStyle, VerticalAlignment,
    DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT,
};
pub use session::{EditorSession, SessionError};
pub use validation::ValidationError;

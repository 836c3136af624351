use crate::schema::{Field, Template};
use std::collections::HashSet;
use thiserror::Error;

/// Why a template was refused on save. Every variant pins the offending
/// field so the editor can highlight it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field #{index} on page {page} has no name")]
    MissingName { page: usize, index: usize },

    #[error("field '{name}' (page {page}, #{index}) duplicates an earlier field name")]
    DuplicateName {
        name: String,
        page: usize,
        index: usize,
    },

    #[error("field '{name}' has unsupported type '{field_type}'")]
    UnsupportedType { name: String, field_type: String },

    #[error("field '{name}' has a negative size ({width} x {height})")]
    NegativeSize { name: String, width: f32, height: f32 },

    #[error("field '{name}' has a non-finite position or size")]
    NonFiniteGeometry { name: String },
}

impl ValidationError {
    /// Name of the offending field, when it has one.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            ValidationError::MissingName { .. } => None,
            ValidationError::DuplicateName { name, .. }
            | ValidationError::UnsupportedType { name, .. }
            | ValidationError::NegativeSize { name, .. }
            | ValidationError::NonFiniteGeometry { name } => Some(name),
        }
    }
}

impl Template {
    /// Checks the save-time contract: unique non-empty names, recognized
    /// types, finite geometry and non-negative sizes.
    ///
    /// Page bounds are deliberately not checked here; the renderer clamps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for (page, fields) in self.schemas.iter().enumerate() {
            for (index, field) in fields.iter().enumerate() {
                validate_field(field, page, index)?;
                if !seen.insert(field.name.as_str()) {
                    return Err(ValidationError::DuplicateName {
                        name: field.name.clone(),
                        page,
                        index,
                    });
                }
            }
        }
        Ok(())
    }
}

fn validate_field(field: &Field, page: usize, index: usize) -> Result<(), ValidationError> {
    if field.name.trim().is_empty() {
        return Err(ValidationError::MissingName { page, index });
    }
    if !field.field_type.is_recognized() {
        return Err(ValidationError::UnsupportedType {
            name: field.name.clone(),
            field_type: field.field_type.to_string(),
        });
    }
    let geometry = [field.position.x, field.position.y, field.width, field.height];
    if geometry.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFiniteGeometry {
            name: field.name.clone(),
        });
    }
    if field.width < 0.0 || field.height < 0.0 {
        return Err(ValidationError::NegativeSize {
            name: field.name.clone(),
            width: field.width,
            height: field.height,
        });
    }
    Ok(())
}

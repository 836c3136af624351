//! Editing state for one template, owned by whoever drives the editor.
//!
//! The session is passed explicitly to editor operations; there is no global
//! "current designer" instance.

use crate::owner::OwnerKey;
use crate::schema::{BasePdf, Field, Template};
use crate::validation::ValidationError;
use plated_types::Point;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("field name must not be empty")]
    EmptyName,

    #[error("a field named '{0}' already exists")]
    DuplicateName(String),

    #[error("no field named '{0}'")]
    UnknownField(String),

    #[error("page {page} does not exist (template has {pages} pages)")]
    PageOutOfRange { page: usize, pages: usize },

    #[error("template is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

/// An in-progress template for one owner key.
#[derive(Debug, Clone)]
pub struct EditorSession {
    owner: OwnerKey,
    template: Template,
    dirty: bool,
}

impl EditorSession {
    /// Starts editing `template`. An empty template gets one blank page.
    pub fn open(owner: OwnerKey, mut template: Template) -> Self {
        if template.schemas.is_empty() {
            template.schemas.push(Vec::new());
        }
        Self {
            owner,
            template,
            dirty: false,
        }
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add_page(&mut self) -> usize {
        self.template.schemas.push(Vec::new());
        self.dirty = true;
        self.template.schemas.len() - 1
    }

    pub fn add_field(&mut self, page: usize, field: Field) -> Result<(), SessionError> {
        if field.name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }
        if self.template.field(&field.name).is_some() {
            return Err(SessionError::DuplicateName(field.name));
        }
        let pages = self.template.schemas.len();
        let fields = self
            .template
            .schemas
            .get_mut(page)
            .ok_or(SessionError::PageOutOfRange { page, pages })?;
        fields.push(field);
        self.dirty = true;
        Ok(())
    }

    /// Applies `edit` to the named field. Renames must go through
    /// [`rename_field`](Self::rename_field) so uniqueness is kept.
    pub fn update_field<F>(&mut self, name: &str, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut Field),
    {
        let field = self.field_mut(name)?;
        edit(field);
        field.name = name.to_string();
        self.dirty = true;
        Ok(())
    }

    pub fn move_field(&mut self, name: &str, position: Point) -> Result<(), SessionError> {
        self.update_field(name, |f| f.position = position)
    }

    pub fn resize_field(&mut self, name: &str, width: f32, height: f32) -> Result<(), SessionError> {
        self.update_field(name, |f| {
            f.width = width.max(0.0);
            f.height = height.max(0.0);
        })
    }

    pub fn rename_field(&mut self, name: &str, new_name: &str) -> Result<(), SessionError> {
        if new_name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }
        if name != new_name && self.template.field(new_name).is_some() {
            return Err(SessionError::DuplicateName(new_name.to_string()));
        }
        self.field_mut(name)?.name = new_name.to_string();
        self.dirty = true;
        Ok(())
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        for fields in &mut self.template.schemas {
            if let Some(index) = fields.iter().position(|f| f.name == name) {
                self.dirty = true;
                return Some(fields.remove(index));
            }
        }
        None
    }

    pub fn set_base_pdf(&mut self, base_pdf: Option<BasePdf>) {
        self.template.base_pdf = base_pdf;
        self.dirty = true;
    }

    /// Validates the current state and returns the template to persist.
    /// The session stays dirty until [`mark_saved`](Self::mark_saved).
    pub fn prepare_save(&self) -> Result<Template, SessionError> {
        self.template.validate()?;
        Ok(self.template.clone())
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut Field, SessionError> {
        self.template
            .schemas
            .iter_mut()
            .flat_map(|fields| fields.iter_mut())
            .find(|f| f.name == name)
            .ok_or_else(|| SessionError::UnknownField(name.to_string()))
    }
}

//! Field drawing, one [`Renderable`] per field type.

mod image;
mod text;

pub use self::image::ImageField;
pub use self::text::{wrap_text, TextField};

use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::warning::{abbreviate, RenderWarning};
use crate::xobject::encode_image;
use lopdf::content::Operation;
use lopdf::ObjectId;
use plated_template::{Field, FieldType, FieldValue, PLACEHOLDER_IMAGE};
use plated_traits::ResourceProvider;
use plated_types::{Color, Rect};
use std::collections::{BTreeMap, HashMap};

/// Something that can draw itself into a box on a page.
pub trait Renderable {
    /// `area` is in points with the PDF's bottom-left origin.
    fn render(&self, area: Rect, page: &mut PageContext<'_>) -> Result<(), RenderError>;
}

/// Picks the drawing strategy for `field`. Text fields fall back to their
/// static content, image fields to their content reference or the
/// placeholder. Unsupported types draw nothing.
pub fn renderable_for<'a>(
    field: &'a Field,
    value: Option<&'a FieldValue>,
) -> Option<Box<dyn Renderable + 'a>> {
    match &field.field_type {
        FieldType::Text => {
            let text = value
                .and_then(FieldValue::as_text)
                .or(field.content.as_deref())
                .unwrap_or("");
            Some(Box::new(TextField::new(field, text)))
        }
        FieldType::Image => {
            let reference = value
                .and_then(FieldValue::as_image_ref)
                .or(field.content.as_deref())
                .filter(|r| !r.trim().is_empty())
                .unwrap_or(PLACEHOLDER_IMAGE);
            Some(Box::new(ImageField::new(field, reference)))
        }
        FieldType::Other(kind) => {
            log::debug!(
                "Skipping field '{}' with unsupported type '{}'",
                field.name,
                kind
            );
            None
        }
    }
}

/// An image embedded in the document, ready to be placed.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub name: String,
    pub id: ObjectId,
    pub width: u32,
    pub height: u32,
}

/// Images embedded during one render, keyed by reference. Failures are
/// remembered too so a broken reference is fetched once.
#[derive(Default)]
pub(crate) struct ImageCache {
    entries: HashMap<String, Result<PlacedImage, String>>,
    embedded: usize,
}

/// Drawing state for one page: the operations emitted so far plus access to
/// the shared canvas for image embedding.
pub struct PageContext<'a> {
    index: usize,
    height: f32,
    operations: Vec<Operation>,
    xobjects: BTreeMap<String, ObjectId>,
    canvas: &'a mut Canvas,
    images: &'a mut ImageCache,
    warnings: &'a mut Vec<RenderWarning>,
    resources: &'a dyn ResourceProvider,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(
        index: usize,
        canvas: &'a mut Canvas,
        images: &'a mut ImageCache,
        warnings: &'a mut Vec<RenderWarning>,
        resources: &'a dyn ResourceProvider,
    ) -> Self {
        let height = canvas.page_height_pt(index);
        Self {
            index,
            height,
            operations: Vec::new(),
            xobjects: BTreeMap::new(),
            canvas,
            images,
            warnings,
            resources,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Page height in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn warn(&mut self, warning: RenderWarning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn fill_rect(&mut self, area: Rect, color: Color) {
        let [r, g, b] = color.components();
        self.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        self.push(Operation::new(
            "re",
            vec![area.x.into(), area.y.into(), area.width.into(), area.height.into()],
        ));
        self.push(Operation::new("f", vec![]));
    }

    /// Embeds the image behind `reference` (once per render) and makes it
    /// available on this page.
    pub fn image(&mut self, field: &str, reference: &str) -> Option<PlacedImage> {
        if !self.images.entries.contains_key(reference) {
            let loaded = self
                .resources
                .load(reference)
                .map_err(|e| e.to_string())
                .and_then(|bytes| encode_image(&bytes).map_err(|e| e.to_string()));
            let entry = loaded.map(|xobject| {
                self.images.embedded += 1;
                let (width, height) = (xobject.width, xobject.height);
                PlacedImage {
                    name: format!("PlIm{}", self.images.embedded),
                    id: self.canvas.add_image(xobject),
                    width,
                    height,
                }
            });
            self.images.entries.insert(reference.to_string(), entry);
        }

        match self.images.entries.get(reference).cloned() {
            Some(Ok(image)) => {
                self.xobjects.insert(image.name.clone(), image.id);
                Some(image)
            }
            Some(Err(reason)) => {
                self.warn(RenderWarning::AssetUnavailable {
                    field: field.to_string(),
                    reference: abbreviate(reference),
                    reason,
                });
                None
            }
            None => None,
        }
    }

    /// Hands back the page's operations and the XObjects they use.
    pub(crate) fn finish(self) -> (Vec<Operation>, Vec<(String, ObjectId)>) {
        (self.operations, self.xobjects.into_iter().collect())
    }
}

//! The layout document: a page background plus positioned, typed fields.
//!
//! Geometry is in millimetres with a top-left origin; font sizes are in
//! points. Loading is tolerant: unknown attributes are ignored and missing
//! optional attributes fall back to defaults. Strictness lives in
//! [`Template::validate`](crate::validation), which only runs on save.

use plated_types::{Color, PageSize, Point, Rect, A4};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_FONT_SIZE: f32 = 13.0;
pub const DEFAULT_LINE_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "basePdf", default)]
    pub base_pdf: Option<BasePdf>,
    #[serde(default, deserialize_with = "deserialize_pages")]
    pub schemas: Vec<Vec<Field>>,
}

impl Template {
    pub fn new(base_pdf: Option<BasePdf>, schemas: Vec<Vec<Field>>) -> Self {
        Self { base_pdf, schemas }
    }

    /// A template with a single page on the default canvas.
    pub fn single_page(fields: Vec<Field>) -> Self {
        Self {
            base_pdf: None,
            schemas: vec![fields],
        }
    }

    /// All fields with the index of the page they sit on.
    pub fn fields(&self) -> impl Iterator<Item = (usize, &Field)> {
        self.schemas
            .iter()
            .enumerate()
            .flat_map(|(page, fields)| fields.iter().map(move |f| (page, f)))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().map(|(_, f)| f).find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields().map(|(_, f)| f.name.as_str()).collect()
    }

    pub fn field_count(&self) -> usize {
        self.schemas.iter().map(Vec::len).sum()
    }

    /// True when no page holds any field.
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    pub fn page_count(&self) -> usize {
        self.schemas.len()
    }

    /// Page size declared by the template itself, if it is a blank canvas.
    /// Referenced PDFs only know their size once loaded.
    pub fn declared_page_size(&self) -> Option<PageSize> {
        match &self.base_pdf {
            None => Some(A4),
            Some(BasePdf::Blank(blank)) => Some(blank.size()),
            Some(BasePdf::Reference(_)) => None,
        }
    }
}

/// The page canvas a template is drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasePdf {
    /// An empty page of the given size.
    Blank(BlankPdf),
    /// A data URI, URL or asset path of an existing PDF.
    Reference(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankPdf {
    pub width: f32,
    pub height: f32,
    /// `[top, right, bottom, left]` in millimetres.
    #[serde(default)]
    pub padding: [f32; 4],
}

impl BlankPdf {
    pub fn a4() -> Self {
        Self {
            width: A4.width,
            height: A4.height,
            padding: [0.0; 4],
        }
    }

    pub fn size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldType {
    #[default]
    Text,
    Image,
    /// A type this build doesn't know how to render. Preserved on round-trip.
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Image => "image",
            FieldType::Other(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, FieldType::Other(_))
    }
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        match s {
            "text" => FieldType::Text,
            "image" => FieldType::Image,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FieldType::from(s.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Center,
    Right,
    #[default]
    #[serde(other)]
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Middle,
    Bottom,
    #[default]
    #[serde(other)]
    Top,
}

/// Optional typography attributes. Only text fields read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_spacing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_alignment: Option<VerticalAlignment>,
    #[serde(default, deserialize_with = "lenient_color", skip_serializing_if = "Option::is_none")]
    pub font_color: Option<Color>,
    #[serde(default, deserialize_with = "lenient_color", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
}

/// Editors write `""` for "no color" and sometimes `#RRGGBBAA`. The alpha
/// channel is dropped; anything else unparsable reads as unset.
fn lenient_color<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawColor {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let text = match Option::<RawColor>::deserialize(deserializer)? {
        Some(RawColor::Text(text)) => text,
        Some(RawColor::Other(_)) => {
            log::debug!("Ignoring non-string color value");
            return Ok(None);
        }
        None => return Ok(None),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let opaque = match trimmed.len() {
        9 if trimmed.starts_with('#') && trimmed.is_ascii() => &trimmed[..7],
        _ => trimmed,
    };
    match opaque.parse::<Color>() {
        Ok(color) => Ok(Some(color)),
        Err(e) => {
            log::debug!("Ignoring color '{}': {}", text, e);
            Ok(None)
        }
    }
}

impl TextStyle {
    pub fn font_size(&self) -> f32 {
        self.font_size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(DEFAULT_LINE_HEIGHT)
    }

    pub fn character_spacing(&self) -> f32 {
        self.character_spacing.filter(|s| s.is_finite()).unwrap_or(0.0)
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment.unwrap_or_default()
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment.unwrap_or_default()
    }

    pub fn font_color(&self) -> Color {
        self.font_color.unwrap_or(Color::BLACK)
    }
}

/// One named, typed, positioned region of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Static content for labels, or a fixed image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(flatten)]
    pub style: TextStyle,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, rect: Rect) -> Self {
        Self {
            name: name.into(),
            field_type,
            content: None,
            position: Point::new(rect.x, rect.y),
            width: rect.width,
            height: rect.height,
            style: TextStyle::default(),
        }
    }

    pub fn text(name: impl Into<String>, rect: Rect) -> Self {
        Self::new(name, FieldType::Text, rect)
    }

    pub fn image(name: impl Into<String>, rect: Rect) -> Self {
        Self::new(name, FieldType::Image, rect)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.style.font_size = Some(size);
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }
}

/// Accepts both the current page shape (`[[field, ...], ...]`) and the older
/// keyed shape (`[{ "title": { ... } }, ...]`), where the key is the name.
fn deserialize_pages<'de, D>(deserializer: D) -> Result<Vec<Vec<Field>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageDef {
        List(Vec<Field>),
        Keyed(BTreeMap<String, Field>),
    }

    let pages = Option::<Vec<PageDef>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(pages
        .into_iter()
        .map(|page| match page {
            PageDef::List(fields) => fields,
            PageDef::Keyed(map) => map
                .into_iter()
                .map(|(key, mut field)| {
                    if field.name.is_empty() {
                        field.name = key;
                    }
                    field
                })
                .collect(),
        })
        .collect())
}

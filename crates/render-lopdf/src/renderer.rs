use crate::canvas::Canvas;
use crate::error::RenderError;
use crate::fields::{renderable_for, ImageCache, PageContext, Renderable, TextField};
use crate::warning::{abbreviate, RenderWarning};
use lopdf::content::Content;
use plated_template::{BasePdf, Field, Template, TextStyle, ValueMapping};
use plated_traits::ResourceProvider;
use plated_types::{Color, Rect, Size, A4};

const FOOTER_FONT_SIZE: f32 = 7.0;
const FOOTER_MARGIN_MM: f32 = 10.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Text drawn at the bottom of every page, e.g. a generation timestamp.
    /// Leave unset for byte-identical output across runs.
    pub footer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<RenderWarning>,
}

/// Merges a template with a value mapping into a PDF.
///
/// Stateless between calls: the same template, values and assets always
/// produce the same bytes.
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    options: RenderOptions,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render(
        &self,
        template: &Template,
        values: &ValueMapping,
        resources: &dyn ResourceProvider,
    ) -> Result<RenderedDocument, RenderError> {
        let mut warnings = Vec::new();
        let page_count = template.page_count().max(1);
        let mut canvas = open_canvas(template, resources, page_count, &mut warnings);
        canvas.ensure_pages(page_count)?;

        let mut images = ImageCache::default();
        for index in 0..canvas.page_count() {
            let page_size = canvas.page_size_mm(index);
            let mut page =
                PageContext::new(index, &mut canvas, &mut images, &mut warnings, resources);

            if let Some(fields) = template.schemas.get(index) {
                for field in fields {
                    draw_field(field, values, page_size, &mut page)?;
                }
            }
            if let Some(footer) = &self.options.footer {
                draw_footer(footer, page_size, &mut page)?;
            }

            let (operations, xobjects) = page.finish();
            if operations.is_empty() {
                continue;
            }
            let content = Content { operations }.encode()?;
            canvas.overlay(index, content, &xobjects)?;
        }

        let page_count = canvas.page_count();
        let bytes = canvas.finish()?;
        log::debug!(
            "Rendered {} fields onto {} pages ({} bytes, {} warnings)",
            template.field_count(),
            page_count,
            bytes.len(),
            warnings.len()
        );
        Ok(RenderedDocument {
            bytes,
            page_count,
            warnings,
        })
    }
}

fn open_canvas(
    template: &Template,
    resources: &dyn ResourceProvider,
    page_count: usize,
    warnings: &mut Vec<RenderWarning>,
) -> Canvas {
    let mut unavailable = |reason: String| {
        log::warn!("Falling back to blank A4 pages: {}", reason);
        warnings.push(RenderWarning::BasePdfUnavailable { reason });
        Canvas::blank(A4, page_count)
    };

    match &template.base_pdf {
        None => Canvas::blank(A4, page_count),
        Some(BasePdf::Blank(blank)) => {
            let size = blank.size();
            if usable_page_size(size) {
                Canvas::blank(size, page_count)
            } else {
                unavailable(format!(
                    "invalid page size {} x {} mm",
                    blank.width, blank.height
                ))
            }
        }
        Some(BasePdf::Reference(reference)) => {
            let loaded = resources
                .load(reference)
                .map_err(|e| e.to_string())
                .and_then(|bytes| Canvas::load(&bytes).map_err(|e| e.to_string()));
            match loaded {
                Ok(canvas) => canvas,
                Err(reason) => unavailable(format!("{} ({})", reason, abbreviate(reference))),
            }
        }
    }
}

fn usable_page_size(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

fn draw_field(
    field: &Field,
    values: &ValueMapping,
    page_size: Size,
    page: &mut PageContext<'_>,
) -> Result<(), RenderError> {
    let (rect, clamped) = field.rect().clamp_to(page_size);
    if clamped {
        page.warn(RenderWarning::GeometryClamped {
            field: field.name.clone(),
            page: page.index(),
        });
    }
    if rect.is_empty() {
        return Ok(());
    }
    let Some(renderable) = renderable_for(field, values.get(&field.name)) else {
        return Ok(());
    };
    renderable.render(to_page_area(rect, page.height()), page)
}

/// Millimetres from the top-left corner to points from the bottom-left.
fn to_page_area(rect: Rect, page_height_pt: f32) -> Rect {
    let pt = rect.to_pt();
    Rect::new(pt.x, page_height_pt - pt.y - pt.height, pt.width, pt.height)
}

fn draw_footer(text: &str, page_size: Size, page: &mut PageContext<'_>) -> Result<(), RenderError> {
    let height = 5.0;
    let rect = Rect::new(
        FOOTER_MARGIN_MM,
        page_size.height - FOOTER_MARGIN_MM / 2.0 - height,
        (page_size.width - 2.0 * FOOTER_MARGIN_MM).max(0.0),
        height,
    );
    let (rect, _) = rect.clamp_to(page_size);
    if rect.is_empty() {
        return Ok(());
    }
    let field = Field::text("generationFooter", rect).with_style(TextStyle {
        font_size: Some(FOOTER_FONT_SIZE),
        font_color: Some(Color::gray(120)),
        ..Default::default()
    });
    TextField::new(&field, text).render(to_page_area(rect, page.height()), page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xobject::tests::{jpeg_bytes, png_bytes};
    use lopdf::{Document, Object};
    use plated_template::{
        Alignment, BlankPdf, FieldType, VerticalAlignment, PLACEHOLDER_IMAGE,
    };
    use plated_traits::InMemoryResourceProvider;

    fn render(template: &Template, values: &ValueMapping) -> RenderedDocument {
        TemplateRenderer::new()
            .render(template, values, &InMemoryResourceProvider::new())
            .unwrap()
    }

    /// Strings shown on a page, in drawing order.
    fn page_strings(bytes: &[u8], page: u32) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page];
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.iter().map(|&b| b as char).collect()),
                _ => None,
            })
            .collect()
    }

    /// Baselines of each `Tm` operation on a page.
    fn baselines(bytes: &[u8], page: u32) -> Vec<f32> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page];
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tm")
            .map(|op| op.operands[5].as_float().unwrap())
            .collect()
    }

    fn tart_template() -> Template {
        Template::single_page(vec![
            Field::text("title", Rect::new(10.0, 10.0, 190.0, 12.0)).with_font_size(20.0),
            Field::text("ingredients", Rect::new(10.0, 30.0, 90.0, 40.0)),
            Field::text("steps", Rect::new(110.0, 30.0, 90.0, 40.0)),
        ])
    }

    fn tart_values() -> ValueMapping {
        ValueMapping::new()
            .with_text("title", "Tart")
            .with_text("ingredients", "200 g Flour")
            .with_text("steps", "Mix\nBake")
    }

    #[test]
    fn test_tart_document_contains_values() {
        let doc = render(&tart_template(), &tart_values());
        assert_eq!(doc.page_count, 1);
        assert!(doc.warnings.is_empty());
        assert_eq!(page_strings(&doc.bytes, 1), vec!["Tart", "200 g Flour", "Mix", "Bake"]);

        let ys = baselines(&doc.bytes, 1);
        // Steps lines sit one leading (13pt at the default size) apart.
        assert!((ys[2] - ys[3] - 13.0).abs() < 0.01);
    }

    #[test]
    fn test_identical_inputs_render_identical_bytes() {
        let first = render(&tart_template(), &tart_values());
        let second = render(&tart_template(), &tart_values());
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_missing_value_renders_empty() {
        let template = Template::single_page(vec![Field::text(
            "notes",
            Rect::new(10.0, 10.0, 50.0, 10.0),
        )]);
        let doc = render(&template, &ValueMapping::new());
        assert!(page_strings(&doc.bytes, 1).is_empty());
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_static_content_for_unbound_text() {
        let template = Template::single_page(vec![
            Field::text("label", Rect::new(10.0, 10.0, 50.0, 10.0)).with_content("Ingredients"),
        ]);
        let doc = render(&template, &ValueMapping::new());
        assert_eq!(page_strings(&doc.bytes, 1), vec!["Ingredients"]);
    }

    #[test]
    fn test_unfetchable_image_draws_placeholder() {
        let template =
            Template::single_page(vec![Field::image("photo", Rect::new(10.0, 10.0, 80.0, 60.0))]);
        let values = ValueMapping::new().with_image("photo", "https://example.invalid/x.png");
        let doc = render(&template, &values);

        assert_eq!(doc.warnings.len(), 1);
        assert!(matches!(
            &doc.warnings[0],
            RenderWarning::AssetUnavailable { field, .. } if field == "photo"
        ));
        let pdf = Document::load_mem(&doc.bytes).unwrap();
        let page_id = pdf.get_pages()[&1];
        let content = String::from_utf8_lossy(&pdf.get_page_content(page_id).unwrap()).to_string();
        assert!(content.contains(" re"));
        assert!(!content.contains("Do"));
    }

    #[test]
    fn test_placeholder_reference_is_not_a_warning() {
        let template =
            Template::single_page(vec![Field::image("photo", Rect::new(10.0, 10.0, 80.0, 60.0))]);
        let values = ValueMapping::new().with_image("photo", PLACEHOLDER_IMAGE);
        let doc = render(&template, &values);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_images_are_embedded_once() {
        let template = Template::single_page(vec![
            Field::image("photo", Rect::new(10.0, 10.0, 80.0, 60.0)),
            Field::image("thumb", Rect::new(100.0, 10.0, 20.0, 20.0)),
        ]);
        let values = ValueMapping::new()
            .with_image("photo", "/uploads/tart.png")
            .with_image("thumb", "/uploads/tart.png");
        let resources = InMemoryResourceProvider::new().with("/uploads/tart.png", png_bytes(4, 3, 255));
        let doc = TemplateRenderer::new()
            .render(&template, &values, &resources)
            .unwrap();
        assert!(doc.warnings.is_empty());

        let pdf = Document::load_mem(&doc.bytes).unwrap();
        let page = pdf.get_dictionary(pdf.get_pages()[&1]).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert_eq!(xobjects.len(), 1);
        assert!(xobjects.has(b"PlIm1"));
    }

    #[test]
    fn test_jpeg_field_content_reference() {
        let template = Template::single_page(vec![
            Field::image("logo", Rect::new(10.0, 10.0, 30.0, 30.0)).with_content("logo.jpg"),
        ]);
        let resources = InMemoryResourceProvider::new().with("logo.jpg", jpeg_bytes(16, 16));
        let doc = TemplateRenderer::new()
            .render(&template, &ValueMapping::new(), &resources)
            .unwrap();
        assert!(doc.warnings.is_empty());
        assert!(doc.bytes.windows(9).any(|w| w == b"DCTDecode"));
    }

    #[test]
    fn test_out_of_page_geometry_is_clamped() {
        let template = Template::single_page(vec![
            Field::text("title", Rect::new(200.0, 10.0, 50.0, 10.0)).with_content("Wide"),
            Field::text("ghost", Rect::new(-5.0, 10.0, -3.0, 10.0)),
        ]);
        let doc = render(&template, &ValueMapping::new());
        assert_eq!(
            doc.warnings,
            vec![
                RenderWarning::GeometryClamped { field: "title".into(), page: 0 },
                RenderWarning::GeometryClamped { field: "ghost".into(), page: 0 },
            ]
        );
    }

    #[test]
    fn test_unsupported_types_are_skipped() {
        let template = Template::single_page(vec![
            Field::new("qr", FieldType::Other("qrcode".into()), Rect::new(0.0, 0.0, 20.0, 20.0))
                .with_content("https://example.com"),
            Field::text("title", Rect::new(10.0, 30.0, 50.0, 10.0)).with_content("Tart"),
        ]);
        let doc = render(&template, &ValueMapping::new());
        assert_eq!(page_strings(&doc.bytes, 1), vec!["Tart"]);
    }

    #[test]
    fn test_overflowing_lines_are_dropped() {
        let template = Template::single_page(vec![Field::text(
            "steps",
            Rect::new(10.0, 10.0, 100.0, 6.0),
        )]);
        let values = ValueMapping::new().with_text("steps", "one\ntwo\nthree");
        let doc = render(&template, &values);
        // 6mm is 17pt: room for one 13pt line.
        assert_eq!(page_strings(&doc.bytes, 1), vec!["one"]);
    }

    #[test]
    fn test_alignment_moves_text() {
        let field = |alignment| {
            Field::text("t", Rect::new(10.0, 10.0, 100.0, 20.0))
                .with_content("Tart")
                .with_style(TextStyle {
                    alignment: Some(alignment),
                    vertical_alignment: Some(VerticalAlignment::Middle),
                    ..Default::default()
                })
        };
        let x_of = |alignment| {
            let doc = render(&Template::single_page(vec![field(alignment)]), &ValueMapping::new());
            let pdf = Document::load_mem(&doc.bytes).unwrap();
            let content =
                Content::decode(&pdf.get_page_content(pdf.get_pages()[&1]).unwrap()).unwrap();
            let tm = content.operations.iter().find(|op| op.operator == "Tm").unwrap();
            tm.operands[4].as_float().unwrap()
        };
        let left = x_of(Alignment::Left);
        let center = x_of(Alignment::Center);
        let right = x_of(Alignment::Right);
        assert!(left < center && center < right);
    }

    #[test]
    fn test_one_page_per_schema_page() {
        let template = Template::new(
            Some(BasePdf::Blank(BlankPdf {
                width: 148.0,
                height: 210.0,
                padding: [0.0; 4],
            })),
            vec![
                vec![Field::text("a", Rect::new(10.0, 10.0, 50.0, 10.0)).with_content("First")],
                vec![Field::text("b", Rect::new(10.0, 10.0, 50.0, 10.0)).with_content("Second")],
            ],
        );
        let doc = render(&template, &ValueMapping::new());
        assert_eq!(doc.page_count, 2);
        assert_eq!(page_strings(&doc.bytes, 2), vec!["Second"]);
    }

    #[test]
    fn test_empty_template_still_has_a_page() {
        let doc = render(&Template::default(), &ValueMapping::new());
        assert_eq!(doc.page_count, 1);
        assert_eq!(Document::load_mem(&doc.bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn test_fields_overlay_referenced_base_pdf() {
        let base = render(
            &Template::single_page(vec![
                Field::text("bg", Rect::new(10.0, 280.0, 100.0, 10.0)).with_content("Letterhead"),
            ]),
            &ValueMapping::new(),
        );
        let resources = InMemoryResourceProvider::new().with("base.pdf", base.bytes);
        let mut template = tart_template();
        template.base_pdf = Some(BasePdf::Reference("base.pdf".into()));

        let doc = TemplateRenderer::new()
            .render(&template, &tart_values(), &resources)
            .unwrap();
        assert!(doc.warnings.is_empty());
        let strings = page_strings(&doc.bytes, 1);
        assert_eq!(strings[0], "Letterhead");
        assert!(strings.contains(&"Tart".to_string()));
    }

    #[test]
    fn test_missing_base_pdf_falls_back_to_a4() {
        let mut template = tart_template();
        template.base_pdf = Some(BasePdf::Reference("missing.pdf".into()));
        let doc = render(&template, &tart_values());
        assert!(matches!(doc.warnings[..], [RenderWarning::BasePdfUnavailable { .. }]));
        assert!(page_strings(&doc.bytes, 1).contains(&"Tart".to_string()));
    }

    #[test]
    fn test_footer_on_every_page() {
        let template = Template::new(None, vec![vec![], vec![]]);
        let renderer = TemplateRenderer::with_options(RenderOptions {
            footer: Some("Generated 2026-01-01".into()),
        });
        let doc = renderer
            .render(&template, &ValueMapping::new(), &InMemoryResourceProvider::new())
            .unwrap();
        assert_eq!(page_strings(&doc.bytes, 1), vec!["Generated 2026-01-01"]);
        assert_eq!(page_strings(&doc.bytes, 2), vec!["Generated 2026-01-01"]);
    }
}

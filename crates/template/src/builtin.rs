//! The hardcoded recipe card used when neither the recipe nor the tenant has
//! a stored template. Never persisted.

use crate::schema::{Alignment, BasePdf, BlankPdf, Field, Template, TextStyle};
use plated_types::{Color, Rect};

const MARGIN: f32 = 15.0;
const CONTENT_WIDTH: f32 = 210.0 - 2.0 * MARGIN;

fn label(name: &str, content: &str, rect: Rect) -> Field {
    Field::text(name, rect)
        .with_content(content)
        .with_style(TextStyle {
            font_size: Some(14.0),
            font_color: Some(Color::gray(60)),
            ..Default::default()
        })
}

fn caption(name: &str, content: &str, rect: Rect) -> Field {
    Field::text(name, rect)
        .with_content(content)
        .with_style(TextStyle {
            font_size: Some(9.0),
            font_color: Some(Color::gray(110)),
            ..Default::default()
        })
}

fn body(name: &str, rect: Rect) -> Field {
    Field::text(name, rect).with_style(TextStyle {
        font_size: Some(10.0),
        line_height: Some(1.4),
        ..Default::default()
    })
}

/// The built-in A4 recipe card: title, photo, service types, allergens,
/// ingredients, method and plating guide.
pub fn builtin_template() -> Template {
    let fields = vec![
        Field::text("title", Rect::new(MARGIN, MARGIN, CONTENT_WIDTH, 14.0)).with_style(
            TextStyle {
                font_size: Some(22.0),
                alignment: Some(Alignment::Left),
                ..Default::default()
            },
        ),
        Field::image("photo", Rect::new(MARGIN, 34.0, 80.0, 60.0)),
        caption("serviceTypesLabel", "Service types", Rect::new(100.0, 34.0, 95.0, 6.0)),
        body("serviceTypes", Rect::new(100.0, 40.0, 95.0, 12.0)),
        caption("allergensLabel", "Allergens", Rect::new(100.0, 56.0, 95.0, 6.0)),
        body("allergens", Rect::new(100.0, 62.0, 95.0, 16.0)),
        label("ingredientsLabel", "Ingredients", Rect::new(MARGIN, 100.0, 85.0, 8.0)),
        body("ingredients", Rect::new(MARGIN, 109.0, 85.0, 120.0)),
        label("stepsLabel", "Method", Rect::new(105.0, 100.0, 90.0, 8.0)),
        body("steps", Rect::new(105.0, 109.0, 90.0, 120.0)),
        label("platingLabel", "Plating", Rect::new(MARGIN, 235.0, CONTENT_WIDTH, 8.0)),
        body("platingGuide", Rect::new(MARGIN, 244.0, CONTENT_WIDTH, 38.0)),
    ];

    Template::new(
        Some(BasePdf::Blank(BlankPdf {
            padding: [MARGIN; 4],
            ..BlankPdf::a4()
        })),
        vec![fields],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use plated_types::A4;

    #[test]
    fn test_builtin_is_valid() {
        assert_eq!(builtin_template().validate(), Ok(()));
    }

    #[test]
    fn test_builtin_fits_on_a4() {
        let template = builtin_template();
        for (_, field) in template.fields() {
            let (_, clamped) = field.rect().clamp_to(A4);
            assert!(!clamped, "field {} leaves the page", field.name);
        }
    }

    #[test]
    fn test_builtin_binds_recipe_fields() {
        let template = builtin_template();
        for name in [
            "title",
            "photo",
            "ingredients",
            "steps",
            "platingGuide",
            "allergens",
            "serviceTypes",
        ] {
            assert!(template.field(name).is_some(), "missing {}", name);
        }
        assert_eq!(template.field("photo").unwrap().field_type, FieldType::Image);
    }

    #[test]
    fn test_builtin_is_stable() {
        assert_eq!(builtin_template(), builtin_template());
    }
}

use super::{PageContext, Renderable};
use crate::error::RenderError;
use lopdf::content::Operation;
use lopdf::Object;
use plated_template::{Field, PLACEHOLDER_IMAGE};
use plated_types::{Color, Rect};

const PLACEHOLDER_FILL: u8 = 236;
const PLACEHOLDER_STROKE: f32 = 0.7;

pub struct ImageField<'a> {
    field: &'a Field,
    reference: &'a str,
}

impl<'a> ImageField<'a> {
    pub fn new(field: &'a Field, reference: &'a str) -> Self {
        Self { field, reference }
    }
}

/// Largest box with the image's aspect ratio that fits in `area`, centred.
pub fn fit_contain(area: Rect, width_px: u32, height_px: u32) -> Rect {
    if width_px == 0 || height_px == 0 {
        return Rect::new(area.x, area.y, 0.0, 0.0);
    }
    let scale = (area.width / width_px as f32).min(area.height / height_px as f32);
    let width = width_px as f32 * scale;
    let height = height_px as f32 * scale;
    Rect::new(
        area.x + (area.width - width) / 2.0,
        area.y + (area.height - height) / 2.0,
        width,
        height,
    )
}

/// A grey box with a cross, drawn wherever an image is missing.
fn draw_placeholder(area: Rect, page: &mut PageContext<'_>) {
    page.push(Operation::new("q", vec![]));
    page.fill_rect(area, Color::gray(PLACEHOLDER_FILL));
    page.push(Operation::new("G", vec![PLACEHOLDER_STROKE.into()]));
    page.push(Operation::new("w", vec![0.75f32.into()]));
    page.push(Operation::new(
        "re",
        vec![area.x.into(), area.y.into(), area.width.into(), area.height.into()],
    ));
    let (left, bottom) = (area.x, area.y);
    let (right, top) = (area.right(), area.y + area.height);
    for (from, to) in [((left, bottom), (right, top)), ((left, top), (right, bottom))] {
        page.push(Operation::new("m", vec![from.0.into(), from.1.into()]));
        page.push(Operation::new("l", vec![to.0.into(), to.1.into()]));
    }
    page.push(Operation::new("S", vec![]));
    page.push(Operation::new("Q", vec![]));
}

impl Renderable for ImageField<'_> {
    fn render(&self, area: Rect, page: &mut PageContext<'_>) -> Result<(), RenderError> {
        if self.reference == PLACEHOLDER_IMAGE {
            draw_placeholder(area, page);
            return Ok(());
        }
        let Some(image) = page.image(&self.field.name, self.reference) else {
            draw_placeholder(area, page);
            return Ok(());
        };

        let placed = fit_contain(area, image.width, image.height);
        page.push(Operation::new("q", vec![]));
        page.push(Operation::new(
            "cm",
            vec![
                placed.width.into(),
                0.0f32.into(),
                0.0f32.into(),
                placed.height.into(),
                placed.x.into(),
                placed.y.into(),
            ],
        ));
        page.push(Operation::new(
            "Do",
            vec![Object::Name(image.name.into_bytes())],
        ));
        page.push(Operation::new("Q", vec![]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_contain_letterboxes_wide_images() {
        let placed = fit_contain(Rect::new(0.0, 0.0, 100.0, 100.0), 200, 100);
        assert_eq!(placed, Rect::new(0.0, 25.0, 100.0, 50.0));
    }

    #[test]
    fn test_fit_contain_pillarboxes_tall_images() {
        let placed = fit_contain(Rect::new(10.0, 10.0, 100.0, 50.0), 100, 100);
        assert_eq!(placed, Rect::new(35.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_fit_contain_degenerate_image() {
        let placed = fit_contain(Rect::new(5.0, 5.0, 10.0, 10.0), 0, 10);
        assert!(placed.is_empty());
    }
}

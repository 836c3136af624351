use super::{PageContext, Renderable};
use crate::error::RenderError;
use crate::fonts::{text_width, to_win_ansi, BASELINE_FACTOR, FONT_RESOURCE};
use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use plated_template::{Alignment, Field, VerticalAlignment};
use plated_types::Rect;

/// Breaks `text` into lines no wider than `max_width` points. Explicit
/// newlines are kept; words longer than a line are split between characters.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32, character_spacing: f32) -> Vec<String> {
    let fits = |s: &str| text_width(s, font_size, character_spacing) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
                continue;
            }
            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
        lines.push(current);
    }
    lines
}

pub struct TextField<'a> {
    field: &'a Field,
    text: &'a str,
}

impl<'a> TextField<'a> {
    pub fn new(field: &'a Field, text: &'a str) -> Self {
        Self { field, text }
    }
}

impl Renderable for TextField<'_> {
    fn render(&self, area: Rect, page: &mut PageContext<'_>) -> Result<(), RenderError> {
        let style = &self.field.style;
        if let Some(background) = style.background_color {
            page.fill_rect(area, background);
        }
        if self.text.trim().is_empty() {
            return Ok(());
        }

        let font_size = style.font_size();
        let leading = font_size * style.line_height();
        let spacing = style.character_spacing();

        let mut lines = wrap_text(self.text, area.width, font_size, spacing);
        let capacity = ((area.height + 0.01) / leading).floor() as usize;
        if lines.len() > capacity {
            log::debug!(
                "Field '{}' overflows its box; dropping {} of {} lines",
                self.field.name,
                lines.len() - capacity,
                lines.len()
            );
            lines.truncate(capacity);
        }
        if lines.is_empty() {
            return Ok(());
        }

        let block_height = lines.len() as f32 * leading;
        let top = area.y + area.height
            - match style.vertical_alignment() {
                VerticalAlignment::Top => 0.0,
                VerticalAlignment::Middle => (area.height - block_height) / 2.0,
                VerticalAlignment::Bottom => area.height - block_height,
            };
        let [r, g, b] = style.font_color().components();

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let width = text_width(line, font_size, spacing);
            let x = match style.alignment() {
                Alignment::Left => area.x,
                Alignment::Center => area.x + (area.width - width) / 2.0,
                Alignment::Right => area.x + area.width - width,
            };
            let baseline = top
                - i as f32 * leading
                - (leading - font_size) / 2.0
                - font_size * BASELINE_FACTOR;

            // One text object per line keeps lines separable when extracted.
            page.push(Operation::new("BT", vec![]));
            page.push(Operation::new(
                "Tf",
                vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), font_size.into()],
            ));
            page.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            if spacing != 0.0 {
                page.push(Operation::new("Tc", vec![spacing.into()]));
            }
            page.push(Operation::new(
                "Tm",
                vec![
                    1.0f32.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    1.0f32.into(),
                    x.into(),
                    baseline.into(),
                ],
            ));
            page.push(Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(line), StringFormat::Literal)],
            ));
            page.push(Operation::new("ET", vec![]));
        }
        Ok(())
    }
}

//! Score overlay

use crate::game::components::{digits, draw_digits};
use crate::rasterizer::{Color, Surface, Texture};

/// Draw the score right-aligned `padding` pixels from the top-right corner,
/// with the digit strip or plain text when the font is missing
pub fn draw_score(
    surface: &mut dyn Surface,
    font: Option<&Texture>,
    glyph: (u32, u32),
    score: u32,
    padding: f32,
    scale: f32,
) {
    match font {
        Some(font) => {
            let width = glyph.0 as f32 * scale * digits(score).len() as f32;
            let x = surface.width() - padding - width;
            draw_digits(surface, font, glyph, score, x, padding, scale);
        }
        None => {
            let text = score.to_string();
            let size = glyph.1 as f32 * scale * 2.0;
            let x = surface.width() - padding - size * 0.5 * text.len() as f32;
            surface.draw_text(&text, x, padding + size, size, Color::WHITE);
        }
    }
}

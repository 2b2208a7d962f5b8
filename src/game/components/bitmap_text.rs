//! Numeric text drawn from a fixed-width digit strip
//!
//! The font texture holds the glyphs `0`..`9` left to right, each
//! `glyph.0` texels wide. The score overlay in Mode7 and score entities in
//! 2D both render through [`draw_digits`].

use crate::game::component::Behavior;
use crate::rasterizer::{Rect, Surface, Texture};
use crate::texture::{TextureCache, TextureHandle};

/// Decimal digits of `value`, most significant first
pub fn digits(value: u32) -> Vec<u8> {
    if value == 0 {
        return vec![0];
    }
    let mut out = Vec::new();
    let mut v = value;
    while v > 0 {
        out.push((v % 10) as u8);
        v /= 10;
    }
    out.reverse();
    out
}

/// Source rect of one digit in the strip
pub fn glyph_src(digit: u8, glyph: (u32, u32)) -> Rect {
    Rect::new(
        digit as f32 * glyph.0 as f32,
        0.0,
        glyph.0 as f32,
        glyph.1 as f32,
    )
}

/// Blit `value` with its left edge at `(x, y)`. Returns the drawn width.
pub fn draw_digits(
    surface: &mut dyn Surface,
    font: &Texture,
    glyph: (u32, u32),
    value: u32,
    x: f32,
    y: f32,
    scale: f32,
) -> f32 {
    let (gw, gh) = (glyph.0 as f32 * scale, glyph.1 as f32 * scale);
    let mut cursor = x;
    for d in digits(value) {
        surface.draw_texture(font, glyph_src(d, glyph), Rect::new(cursor, y, gw, gh));
        cursor += gw;
    }
    cursor - x
}

#[derive(Debug, Clone)]
pub struct BitmapTextComponent {
    font: Option<TextureHandle>,
    glyph: (u32, u32),
    value: u32,
    position: (i32, i32),
}

impl BitmapTextComponent {
    pub fn new(font: Option<TextureHandle>, glyph: (u32, u32), value: u32) -> Self {
        Self {
            font,
            glyph,
            value,
            position: (0, 0),
        }
    }

    /// Load the font strip through the cache; failures are logged and the
    /// text simply does not draw.
    pub fn load(cache: &mut TextureCache, path: &str, glyph: (u32, u32), value: u32) -> Self {
        let font = match cache.load(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("bitmap text: {}", e);
                None
            }
        };
        Self::new(font, glyph, value)
    }

    pub fn render(&self, surface: &mut dyn Surface, view_scale: f32) {
        if let Some(font) = &self.font {
            draw_digits(
                surface,
                font,
                self.glyph,
                self.value,
                self.position.0 as f32 * view_scale,
                self.position.1 as f32 * view_scale,
                view_scale,
            );
        }
    }
}

impl Behavior for BitmapTextComponent {
    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn teardown(&mut self) {
        self.font = None;
    }
}

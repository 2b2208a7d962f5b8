//! Drawing surface abstraction
//!
//! Game code renders through [`Surface`] so the frame driver, scene tree
//! and Mode7 renderer never call the windowing backend directly. The
//! production backend is [`MacroquadSurface`]; tests use a recorder.

use std::collections::HashMap;

use macroquad::prelude as mq;

use super::rect::Rect;
use super::render::Framebuffer;
use super::types::{Color, Texture};

/// The primitive calls the engine needs from a rendering backend
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self, color: Color);
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color);
    /// Blit `src` (texel coordinates) of a texture into `dst` (screen coordinates)
    fn draw_texture(&mut self, texture: &Texture, src: Rect, dst: Rect);
    /// Upload a whole framebuffer and draw it once into `dst`
    fn blit_framebuffer(&mut self, fb: &Framebuffer, dst: Rect);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
}

fn to_mq(color: Color) -> mq::Color {
    mq::Color::from_rgba(color.r, color.g, color.b, color.a)
}

/// macroquad backend
///
/// Textures are uploaded lazily, once per texture name. The framebuffer
/// goes into a single streaming texture that is updated in place each frame.
#[derive(Default)]
pub struct MacroquadSurface {
    gpu_textures: HashMap<String, mq::Texture2D>,
    stream: Option<(mq::Texture2D, usize, usize)>,
}

impl MacroquadSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn gpu_texture(&mut self, texture: &Texture) -> &mq::Texture2D {
        self.gpu_textures.entry(texture.name.clone()).or_insert_with(|| {
            let tex = mq::Texture2D::from_rgba8(
                texture.width as u16,
                texture.height as u16,
                &texture.to_rgba_bytes(),
            );
            tex.set_filter(mq::FilterMode::Nearest);
            tex
        })
    }

    /// Drop every uploaded texture (shutdown, or after a retexture)
    pub fn release(&mut self) {
        self.gpu_textures.clear();
        self.stream = None;
    }
}

impl Surface for MacroquadSurface {
    fn width(&self) -> f32 {
        mq::screen_width()
    }

    fn height(&self) -> f32 {
        mq::screen_height()
    }

    fn clear(&mut self, color: Color) {
        mq::clear_background(to_mq(color));
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        mq::draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, thickness, to_mq(color));
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: Color) {
        mq::draw_line(x1, y1, x2, y2, thickness, to_mq(color));
    }

    fn draw_texture(&mut self, texture: &Texture, src: Rect, dst: Rect) {
        if texture.pixels.is_empty() {
            return;
        }
        let tex = self.gpu_texture(texture);
        mq::draw_texture_ex(
            tex,
            dst.x,
            dst.y,
            mq::WHITE,
            mq::DrawTextureParams {
                dest_size: Some(mq::vec2(dst.w, dst.h)),
                source: Some(mq::Rect::new(src.x, src.y, src.w, src.h)),
                ..Default::default()
            },
        );
    }

    fn blit_framebuffer(&mut self, fb: &Framebuffer, dst: Rect) {
        let reuse = matches!(&self.stream, Some((_, w, h)) if *w == fb.width && *h == fb.height);
        if reuse {
            if let Some((tex, _, _)) = &self.stream {
                tex.update_from_bytes(fb.width as u32, fb.height as u32, &fb.pixels);
            }
        } else {
            let tex = mq::Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
            tex.set_filter(mq::FilterMode::Nearest);
            self.stream = Some((tex, fb.width, fb.height));
        }

        if let Some((tex, _, _)) = &self.stream {
            mq::draw_texture_ex(
                tex,
                dst.x,
                dst.y,
                mq::WHITE,
                mq::DrawTextureParams {
                    dest_size: Some(mq::vec2(dst.w, dst.h)),
                    ..Default::default()
                },
            );
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        mq::draw_text(text, x, y, size, to_mq(color));
    }
}

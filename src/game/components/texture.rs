//! Sprite component
//!
//! Frames are laid out left to right in a single strip; an animation name
//! selects a frame index. A frame size of zero means "the whole texture".

use std::collections::BTreeMap;

use crate::game::component::Behavior;
use crate::rasterizer::{Rect, Surface};
use crate::texture::{TextureCache, TextureHandle};

#[derive(Debug, Clone)]
pub struct TextureComponent {
    path: String,
    texture: Option<TextureHandle>,
    frame_size: (u32, u32),
    animations: BTreeMap<String, u32>,
    current: Option<String>,
    frame: u32,
    scale: f32,
    position: (i32, i32),
    src: Rect,
    dst: Rect,
}

impl TextureComponent {
    /// Component with no texture loaded yet
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            texture: None,
            frame_size: (0, 0),
            animations: BTreeMap::new(),
            current: None,
            frame: 0,
            scale: 1.0,
            position: (0, 0),
            src: Rect::default(),
            dst: Rect::default(),
        }
    }

    pub fn from_handle(handle: TextureHandle) -> Self {
        let mut c = Self::new(handle.name.clone());
        c.texture = Some(handle);
        c.refresh_rects();
        c
    }

    /// Load through the cache. A failed load is logged and leaves the
    /// texture unset; the component still renders nothing rather than failing.
    pub fn load(cache: &mut TextureCache, path: &str) -> Self {
        let mut c = Self::new(path);
        match cache.load(path) {
            Ok(handle) => c.texture = Some(handle),
            Err(e) => log::warn!("texture component: {}", e),
        }
        c.refresh_rects();
        c
    }

    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_size = (width, height);
        self.refresh_rects();
        self
    }

    pub fn with_animation(mut self, name: impl Into<String>, frame: u32) -> Self {
        self.animations.insert(name.into(), frame);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.texture.is_some()
    }

    /// Select an animation by name. Unknown names are ignored.
    pub fn set_animation(&mut self, name: &str) -> bool {
        if self.current.as_deref() == Some(name) {
            return true;
        }
        let Some(&frame) = self.animations.get(name) else {
            return false;
        };
        self.current = Some(name.to_string());
        self.frame = frame;
        self.refresh_rects();
        true
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.refresh_rects();
    }

    /// Size of one frame in texels
    pub fn frame_dims(&self) -> (f32, f32) {
        match (&self.texture, self.frame_size) {
            (_, (w, h)) if w > 0 && h > 0 => (w as f32, h as f32),
            (Some(tex), _) => (tex.width as f32, tex.height as f32),
            (None, _) => (0.0, 0.0),
        }
    }

    fn refresh_rects(&mut self) {
        let (fw, fh) = self.frame_dims();
        self.src = Rect::new(self.frame as f32 * fw, 0.0, fw, fh);
        self.dst = Rect::new(
            self.position.0 as f32,
            self.position.1 as f32,
            fw * self.scale,
            fh * self.scale,
        );
    }

    /// Draw at the entity position, raised by `lift` entity units
    pub fn render(&self, surface: &mut dyn Surface, view_scale: f32, lift: f32) {
        let mut dst = self.dst;
        dst.y -= lift;
        self.render_at(surface, dst.transformed(view_scale, 0.0, 0.0));
    }

    /// Draw the current frame into an explicit screen rect
    pub fn render_at(&self, surface: &mut dyn Surface, dst: Rect) {
        if let Some(tex) = &self.texture {
            surface.draw_texture(tex, self.src, dst);
        }
    }
}

impl Behavior for TextureComponent {
    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
        self.dst.x = x as f32;
        self.dst.y = y as f32;
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn teardown(&mut self) {
        self.texture = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::surface::testing::RecordingSurface;
    use crate::rasterizer::{Color, Texture};
    use std::rc::Rc;

    fn strip() -> TextureComponent {
        let handle = Rc::new(Texture::solid(64, 16, Color::WHITE).with_name("strip"));
        TextureComponent::from_handle(handle)
            .with_frame_size(16, 16)
            .with_animation("idle", 0)
            .with_animation("left", 2)
    }

    #[test]
    fn test_animation_selects_frame_column() {
        let mut c = strip();
        assert!(c.set_animation("left"));
        assert_eq!(c.src, Rect::new(32.0, 0.0, 16.0, 16.0));
        assert!(!c.set_animation("cartwheel"));
        assert_eq!(c.current.as_deref(), Some("left"));
    }

    #[test]
    fn test_failed_load_leaves_texture_unset() {
        let mut cache = TextureCache::new();
        let c = TextureComponent::load(&mut cache, "missing/nothing.bmp");
        assert!(!c.is_loaded());
        assert_eq!(c.path(), "missing/nothing.bmp");

        let mut surface = RecordingSurface::new(320.0, 240.0);
        c.render(&mut surface, 1.0, 0.0);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_render_follows_position_and_lift() {
        let mut c = strip();
        c.set_position(10, 20);
        let mut surface = RecordingSurface::new(320.0, 240.0);
        c.render(&mut surface, 2.0, 3.0);
        let draws = surface.textures_named("strip");
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].1, Rect::new(20.0, 34.0, 32.0, 32.0));
    }

    #[test]
    fn test_teardown_releases_handle() {
        let handle = Rc::new(Texture::solid(4, 4, Color::WHITE).with_name("t"));
        let mut c = TextureComponent::from_handle(Rc::clone(&handle));
        assert_eq!(Rc::strong_count(&handle), 2);
        c.teardown();
        assert_eq!(Rc::strong_count(&handle), 1);
    }
}

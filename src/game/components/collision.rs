//! Axis-aligned collision box

use crate::game::component::Behavior;
use crate::rasterizer::{Color, Rect, Surface};

/// Overlap test shared by the 2D and Mode7 paths. Touching edges do not collide.
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

#[derive(Debug, Clone)]
pub struct CollisionComponent {
    width: f32,
    height: f32,
    /// Shift of the box below the entity origin
    offset_y: f32,
    scale: f32,
    position: (i32, i32),
}

impl CollisionComponent {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset_y: 0.0,
            scale: 1.0,
            position: (0, 0),
        }
    }

    /// Vertical shift of the box, in unscaled units
    pub fn set_offset(&mut self, offset_y: f32) {
        self.offset_y = offset_y;
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Current box in entity space
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.0 as f32,
            self.position.1 as f32 + self.offset_y * self.scale,
            self.width * self.scale,
            self.height * self.scale,
        )
    }

    pub fn render_outline(&self, surface: &mut dyn Surface, view_scale: f32) {
        surface.stroke_rect(self.bounds().transformed(view_scale, 0.0, 0.0), 1.0, Color::GREEN);
    }
}

impl Behavior for CollisionComponent {
    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }
}

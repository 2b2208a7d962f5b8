//! Software drawing primitives
//!
//! The engine never talks to the GPU directly from game code. Everything
//! goes through a [`Surface`], and the Mode7 renderer writes its floor and
//! sky into a CPU [`Framebuffer`] that is uploaded once per frame.
//!
//! # Module Organization
//!
//! - `types` - Color, Texture
//! - `math` - Vec2
//! - `rect` - Rect (screen and world axis-aligned boxes)
//! - `render` - Framebuffer
//! - `surface` - Surface trait and the macroquad backend
//! - `constants` - Resolution constants

pub mod constants;
pub mod math;
pub mod rect;
pub mod render;
pub mod surface;
pub mod types;

pub use constants::{HEIGHT, WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
pub use math::Vec2;
pub use rect::Rect;
pub use render::Framebuffer;
pub use surface::{MacroquadSurface, Surface};
pub use types::{Color, Texture, TextureError};

//! Concrete component types

mod bitmap_text;
mod collision;
mod hover;
mod script;
mod texture;

pub use bitmap_text::{digits, draw_digits, BitmapTextComponent};
pub use collision::{collides, CollisionComponent};
pub use hover::HoverComponent;
pub use script::ScriptComponent;
pub use texture::TextureComponent;

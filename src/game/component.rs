//! Components
//!
//! The component set is closed: [`Component`] is a tagged union over the
//! five behaviours an entity can carry. Every variant implements
//! [`Behavior`], the capability the entity drives without knowing the
//! concrete kind. Typed access goes through the `as_*` accessors, which
//! return `None` for the wrong kind instead of casting.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::components::{
    BitmapTextComponent, CollisionComponent, HoverComponent, ScriptComponent, TextureComponent,
};

/// Which slot a component occupies on its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Texture,
    Collision,
    Script,
    BitmapText,
    Hover,
}

impl ComponentKind {
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Texture => "texture",
            ComponentKind::Collision => "collision",
            ComponentKind::Script => "script",
            ComponentKind::BitmapText => "bitmap_text",
            ComponentKind::Hover => "hover",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What every component can do
pub trait Behavior {
    /// Receive the owning entity's position
    fn set_position(&mut self, x: i32, y: i32);

    /// Last position received
    fn position(&self) -> (i32, i32);

    /// Advance time-based state
    fn tick(&mut self, _dt: f32) {}

    /// Release anything the component holds. Called exactly once, when the
    /// component is replaced or its entity is dropped.
    fn teardown(&mut self) {}
}

#[derive(Debug)]
pub enum Component {
    Texture(TextureComponent),
    Collision(CollisionComponent),
    Script(ScriptComponent),
    BitmapText(BitmapTextComponent),
    Hover(HoverComponent),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Texture(_) => ComponentKind::Texture,
            Component::Collision(_) => ComponentKind::Collision,
            Component::Script(_) => ComponentKind::Script,
            Component::BitmapText(_) => ComponentKind::BitmapText,
            Component::Hover(_) => ComponentKind::Hover,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Component::Texture(c) => c,
            Component::Collision(c) => c,
            Component::Script(c) => c,
            Component::BitmapText(c) => c,
            Component::Hover(c) => c,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureComponent> {
        match self {
            Component::Texture(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_texture_mut(&mut self) -> Option<&mut TextureComponent> {
        match self {
            Component::Texture(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collision(&self) -> Option<&CollisionComponent> {
        match self {
            Component::Collision(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collision_mut(&mut self) -> Option<&mut CollisionComponent> {
        match self {
            Component::Collision(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&ScriptComponent> {
        match self {
            Component::Script(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_script_mut(&mut self) -> Option<&mut ScriptComponent> {
        match self {
            Component::Script(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bitmap_text(&self) -> Option<&BitmapTextComponent> {
        match self {
            Component::BitmapText(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_hover(&self) -> Option<&HoverComponent> {
        match self {
            Component::Hover(c) => Some(c),
            _ => None,
        }
    }
}

impl From<TextureComponent> for Component {
    fn from(c: TextureComponent) -> Self {
        Component::Texture(c)
    }
}

impl From<CollisionComponent> for Component {
    fn from(c: CollisionComponent) -> Self {
        Component::Collision(c)
    }
}

impl From<ScriptComponent> for Component {
    fn from(c: ScriptComponent) -> Self {
        Component::Script(c)
    }
}

impl From<BitmapTextComponent> for Component {
    fn from(c: BitmapTextComponent) -> Self {
        Component::BitmapText(c)
    }
}

impl From<HoverComponent> for Component {
    fn from(c: HoverComponent) -> Self {
        Component::Hover(c)
    }
}

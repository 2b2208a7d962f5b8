//! Entities
//!
//! An entity is a named object with an integer position and at most one
//! component per [`ComponentKind`]. The entity owns its components
//! exclusively; dropping the entity tears every component down.
//!
//! Ids come from an [`EntityIds`] allocator. Unlike a generational slot
//! allocator, ids are never reused: every entity ever created in a run has a
//! distinct id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::component::{Behavior, Component, ComponentKind};
use super::components::{
    BitmapTextComponent, CollisionComponent, HoverComponent, ScriptComponent, TextureComponent,
};
use super::event::{EventQueue, ScriptCommand};
use super::scripts::ScriptContext;
use crate::app::RenderMode;
use crate::input::InputState;
use crate::rasterizer::Surface;

/// A unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id allocator. Constructed once at start-up and passed by
/// reference to whatever creates entities.
#[derive(Debug, Default)]
pub struct EntityIds {
    next: u64,
}

impl EntityIds {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// A game object
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    x: i32,
    y: i32,
    components: BTreeMap<ComponentKind, Component>,
}

impl Entity {
    pub fn new(ids: &mut EntityIds, name: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            id: ids.allocate(),
            name: name.into(),
            x,
            y,
            components: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Move the entity. Components see the new position on the next `update()`.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Push the current position to every component that has a stale one
    pub fn update(&mut self) {
        let (x, y) = (self.x, self.y);
        for component in self.components.values_mut() {
            let behavior = component.behavior_mut();
            if behavior.position() != (x, y) {
                behavior.set_position(x, y);
            }
        }
    }

    /// Install a component, replacing (and tearing down) any of the same kind.
    /// The new component receives the current position immediately.
    pub fn add_component(&mut self, component: impl Into<Component>) {
        let mut component = component.into();
        component.behavior_mut().set_position(self.x, self.y);
        if let Some(mut old) = self.components.insert(component.kind(), component) {
            old.behavior_mut().teardown();
        }
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.get_mut(&kind)
    }

    pub fn texture(&self) -> Option<&TextureComponent> {
        self.component(ComponentKind::Texture)?.as_texture()
    }

    pub fn texture_mut(&mut self) -> Option<&mut TextureComponent> {
        self.component_mut(ComponentKind::Texture)?.as_texture_mut()
    }

    pub fn collision(&self) -> Option<&CollisionComponent> {
        self.component(ComponentKind::Collision)?.as_collision()
    }

    pub fn collision_mut(&mut self) -> Option<&mut CollisionComponent> {
        self.component_mut(ComponentKind::Collision)?.as_collision_mut()
    }

    pub fn script(&self) -> Option<&ScriptComponent> {
        self.component(ComponentKind::Script)?.as_script()
    }

    pub fn bitmap_text(&self) -> Option<&BitmapTextComponent> {
        self.component(ComponentKind::BitmapText)?.as_bitmap_text()
    }

    pub fn hover(&self) -> Option<&HoverComponent> {
        self.component(ComponentKind::Hover)?.as_hover()
    }

    /// Advance time-based component state
    pub fn tick(&mut self, dt: f32) {
        for component in self.components.values_mut() {
            component.behavior_mut().tick(dt);
        }
    }

    /// Run the attached script, if any, and apply what it asked for
    pub fn run_scripts(
        &mut self,
        input: &InputState,
        dt: f32,
        mode: RenderMode,
        commands: &mut EventQueue<ScriptCommand>,
    ) {
        let Some(script) = self
            .components
            .get_mut(&ComponentKind::Script)
            .and_then(Component::as_script_mut)
        else {
            return;
        };

        let mut ctx = ScriptContext {
            dt,
            input,
            mode,
            entity: &self.name,
            position: (self.x, self.y),
            animation: None,
            commands,
        };
        script.script_mut().update(&mut ctx);
        let (position, animation) = (ctx.position, ctx.animation);

        self.x = position.0;
        self.y = position.1;
        if let Some(name) = animation {
            if let Some(texture) = self.texture_mut() {
                texture.set_animation(name);
            }
        }
    }

    /// Draw the visible components. `view_scale` maps entity space to screen space.
    pub fn render(&self, surface: &mut dyn Surface, view_scale: f32, show_colliders: bool) {
        let lift = self.hover().map(HoverComponent::offset).unwrap_or(0.0);
        if let Some(texture) = self.texture() {
            texture.render(surface, view_scale, lift);
        }
        if let Some(text) = self.bitmap_text() {
            text.render(surface, view_scale);
        }
        if show_colliders {
            if let Some(collision) = self.collision() {
                collision.render_outline(surface, view_scale);
            }
        }
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        for component in self.components.values_mut() {
            component.behavior_mut().teardown();
        }
    }
}

//! World objects: things placed on the Mode7 ground plane

use crate::game::components::collides;
use crate::game::Entity;
use crate::rasterizer::{Rect, Vec2};

/// Score penalty for touching a hazard
pub const HAZARD_PENALTY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Collectible,
    Hazard,
}

impl ObjectKind {
    /// Score after the player touches an object of this kind
    pub fn apply(self, score: u32) -> u32 {
        match self {
            ObjectKind::Collectible => score.saturating_add(1),
            ObjectKind::Hazard => score.saturating_sub(HAZARD_PENALTY),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Collectible => "capsule",
            ObjectKind::Hazard => "hazard",
        }
    }
}

/// An object placed by hand rather than by the spawner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a> {
    pub kind: ObjectKind,
    pub name: &'a str,
    pub position: Vec2,
    /// Sprite override. The kind's own texture is used when unset or unloadable.
    pub texture: Option<&'a str>,
    /// Objects without collision are scenery and never score
    pub solid: bool,
}

impl<'a> Placement<'a> {
    pub fn new(kind: ObjectKind, name: &'a str, x: f32, y: f32) -> Self {
        Self {
            kind,
            name,
            position: Vec2::new(x, y),
            texture: None,
            solid: true,
        }
    }

    pub fn with_texture(mut self, path: &'a str) -> Self {
        self.texture = Some(path).filter(|p| !p.is_empty());
        self
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }
}

#[derive(Debug)]
pub struct WorldObject {
    pub position: Vec2,
    pub kind: ObjectKind,
    /// Carries the sprite and collision box used for drawing
    pub entity: Entity,
}

impl WorldObject {
    /// World-space bounding box
    pub fn bounds(&self, half_extent: f32) -> Rect {
        Rect::centered(self.position.x, self.position.y, half_extent)
    }
}

/// Score and remove every solid object overlapping `player`. Each object
/// counts once; survivors keep their order. Returns how many were consumed.
pub fn resolve_collisions(
    objects: &mut Vec<WorldObject>,
    player: &Rect,
    half_extent: f32,
    score: &mut u32,
) -> usize {
    let before = objects.len();
    objects.retain(|object| {
        if object.entity.collision().is_some() && collides(&object.bounds(half_extent), player) {
            *score = object.kind.apply(*score);
            log::debug!("picked up {} -> score {}", object.entity.name(), *score);
            false
        } else {
            true
        }
    });
    before - objects.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::CollisionComponent;
    use crate::game::EntityIds;

    fn object(ids: &mut EntityIds, name: &str, x: f32, y: f32, kind: ObjectKind) -> WorldObject {
        let mut entity = Entity::new(ids, name, 0, 0);
        entity.add_component(CollisionComponent::new(8.0, 8.0));
        WorldObject {
            position: Vec2::new(x, y),
            kind,
            entity,
        }
    }

    #[test]
    fn test_score_floor_at_zero() {
        assert_eq!(ObjectKind::Hazard.apply(3), 0);
        assert_eq!(ObjectKind::Hazard.apply(0), 0);
        assert_eq!(ObjectKind::Hazard.apply(12), 7);
        assert_eq!(ObjectKind::Collectible.apply(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_each_object_scores_once_and_order_is_kept() {
        let mut ids = EntityIds::new();
        let mut objects = vec![
            object(&mut ids, "far1", 0.9, 0.9, ObjectKind::Collectible),
            object(&mut ids, "hit1", 0.52, 0.5, ObjectKind::Collectible),
            object(&mut ids, "far2", 0.1, 0.1, ObjectKind::Hazard),
            object(&mut ids, "hit2", 0.5, 0.48, ObjectKind::Collectible),
        ];
        let player = Rect::centered(0.5, 0.5, 0.03);
        let mut score = 0;

        assert_eq!(resolve_collisions(&mut objects, &player, 0.03, &mut score), 2);
        assert_eq!(score, 2);
        let names: Vec<_> = objects.iter().map(|o| o.entity.name()).collect();
        assert_eq!(names, vec!["far1", "far2"]);

        assert_eq!(resolve_collisions(&mut objects, &player, 0.03, &mut score), 0);
        assert_eq!(score, 2);
    }

    #[test]
    fn test_repeated_hazards_never_go_negative() {
        let mut ids = EntityIds::new();
        let player = Rect::centered(0.5, 0.5, 0.03);
        let mut score = 3;
        for i in 0..3 {
            let mut objects = vec![object(&mut ids, &format!("h{}", i), 0.5, 0.5, ObjectKind::Hazard)];
            resolve_collisions(&mut objects, &player, 0.03, &mut score);
            assert_eq!(score, 0);
        }
    }

    #[test]
    fn test_scenery_without_collision_never_scores() {
        let mut ids = EntityIds::new();
        let mut objects = vec![WorldObject {
            position: Vec2::new(0.5, 0.5),
            kind: ObjectKind::Collectible,
            entity: Entity::new(&mut ids, "rock", 0, 0),
        }];
        let player = Rect::centered(0.5, 0.5, 0.03);
        let mut score = 0;
        assert_eq!(resolve_collisions(&mut objects, &player, 0.03, &mut score), 0);
        assert_eq!(score, 0);
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_empty_texture_override_is_ignored() {
        let placement = Placement::new(ObjectKind::Hazard, "spike", 1.0, 2.0).with_texture("");
        assert_eq!(placement.texture, None);
        assert!(placement.solid);
        assert_eq!(placement.with_texture("gem.png").texture, Some("gem.png"));
    }
}

//! Mode7 perspective renderer
//!
//! A pseudo-3D view of a tiled ground texture (and a mirrored sky) seen from
//! a camera that trails the player. World objects spawn around the player,
//! score when touched, and are drawn as scaled sprites over the floor.
//!
//! # Module Organization
//!
//! - `camera` - Pose, Frustum
//! - `projection` - scanline floor/sky mapping, sprite projection
//! - `objects` - world objects and collision scoring
//! - `spawner` - timed random placement
//! - `hud` - score overlay
//!
//! The renderer starts `Uninitialized`; [`Mode7Renderer::initialize`] loads
//! its textures and creates the player, after which `update` and `render`
//! run once per frame.

pub mod camera;
pub mod hud;
pub mod objects;
pub mod projection;
pub mod spawner;

pub use camera::{Frustum, Pose};
pub use objects::{resolve_collisions, ObjectKind, Placement, WorldObject};
pub use projection::{project_sprite, render_planes, PlaneTextures, Projected, SpriteParams};
pub use spawner::Spawner;

use thiserror::Error;

use crate::config::Mode7Config;
use crate::game::components::{CollisionComponent, HoverComponent, TextureComponent};
use crate::game::{Entity, EntityIds};
use crate::input::{Action, InputState};
use crate::rasterizer::{Framebuffer, Rect, Surface, TextureError, Vec2};
use crate::texture::{TextureCache, TextureHandle};

/// Player sprite strip order
const PLAYER_ANIMATIONS: [(&str, u32); 5] = [
    ("idle", 0),
    ("forward", 1),
    ("backward", 2),
    ("left", 3),
    ("right", 4),
];

/// Pixels between the player sprite and the bottom of the view
const PLAYER_MARGIN: f32 = 8.0;

/// Bob of collectibles: amplitude in sprite pixels, frequency in Hz
const COLLECTIBLE_HOVER: (f32, f32) = (3.0, 0.8);

#[derive(Debug, Error)]
pub enum Mode7Error {
    #[error("mode7 renderer used before initialize()")]
    NotInitialized,
    #[error(transparent)]
    Texture(#[from] TextureError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    Running,
}

#[derive(Debug, Default)]
struct Mode7Textures {
    ground: Option<TextureHandle>,
    sky: Option<TextureHandle>,
    font: Option<TextureHandle>,
    collectible: Option<TextureHandle>,
    hazard: Option<TextureHandle>,
}

fn load_logged(cache: &mut TextureCache, what: &str, path: &str) -> Option<TextureHandle> {
    match cache.load(path) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("mode7 {} texture: {}", what, e);
            None
        }
    }
}

pub struct Mode7Renderer {
    config: Mode7Config,
    state: RendererState,
    player: Pose,
    camera: Pose,
    player_entity: Option<Entity>,
    objects: Vec<WorldObject>,
    spawner: Spawner,
    score: u32,
    /// Horizontal screen shift accumulated while strafing
    x_stat: f32,
    /// Depth bias accumulated while strafing
    scale_stat: f32,
    framebuffer: Framebuffer,
    textures: Mode7Textures,
    spawned: u64,
}

impl Mode7Renderer {
    pub fn new(config: Mode7Config) -> Self {
        Self::with_seed(config, None)
    }

    /// Renderer with a deterministic spawner
    pub fn with_seed(config: Mode7Config, seed: Option<u64>) -> Self {
        let (x, y) = config.start_position;
        let player = Pose::new(x, y, config.start_angle);
        let (w, h) = config.resolution;
        Self {
            spawner: Spawner::new(&config, seed),
            camera: Self::follow(&config, &player),
            player,
            state: RendererState::Uninitialized,
            player_entity: None,
            objects: Vec::new(),
            score: 0,
            x_stat: 0.0,
            scale_stat: 0.0,
            framebuffer: Framebuffer::new(w, h),
            textures: Mode7Textures::default(),
            spawned: 0,
            config,
        }
    }

    fn follow(config: &Mode7Config, player: &Pose) -> Pose {
        Pose {
            position: player.position + Vec2::new(0.0, config.camera_offset),
            angle: player.angle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == RendererState::Running
    }

    /// Load textures and create the player. Missing textures are logged and
    /// drawn with fallbacks. Calling this again while running does nothing.
    pub fn initialize(&mut self, cache: &mut TextureCache, ids: &mut EntityIds) {
        if self.is_running() {
            return;
        }
        let c = &self.config;
        self.textures = Mode7Textures {
            ground: load_logged(cache, "ground", &c.ground_texture),
            sky: load_logged(cache, "sky", &c.sky_texture),
            font: load_logged(cache, "font", &c.font_texture),
            collectible: load_logged(cache, "collectible", &c.collectible_texture),
            hazard: load_logged(cache, "hazard", &c.hazard_texture),
        };

        let (fw, fh) = c.player_frame;
        let mut sprite = TextureComponent::load(cache, &c.player_texture).with_frame_size(fw, fh);
        for (name, frame) in PLAYER_ANIMATIONS {
            sprite = sprite.with_animation(name, frame);
        }
        sprite.set_animation("idle");
        sprite.set_scale(c.player_scale);

        let mut player = Entity::new(ids, "player", 0, 0);
        player.add_component(sprite);
        player.add_component(CollisionComponent::new(fw as f32, fh as f32));
        self.player_entity = Some(player);

        self.state = RendererState::Running;
        log::info!("mode7 renderer initialized");
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// One simulation step: movement, camera, spawning, collisions
    pub fn update(&mut self, input: &InputState, dt: f32, ids: &mut EntityIds) -> Result<(), Mode7Error> {
        if !self.is_running() {
            return Err(Mode7Error::NotInitialized);
        }

        let animation = self.apply_movement(input, dt);
        if let Some(player) = self.player_entity.as_mut() {
            if let Some(sprite) = player.texture_mut() {
                sprite.set_animation(animation);
            }
            player.tick(dt);
        }

        self.camera = Self::follow(&self.config, &self.player);

        if self.objects.is_empty() {
            if let Some((position, kind)) = self.spawner.update(dt, self.player.position) {
                self.spawn(ids, kind, None, position, None, true);
            }
        }

        let player_box = self.player_bounds();
        resolve_collisions(
            &mut self.objects,
            &player_box,
            self.config.object_half_extent,
            &mut self.score,
        );
        for object in &mut self.objects {
            object.entity.tick(dt);
        }
        Ok(())
    }

    fn apply_movement(&mut self, input: &InputState, dt: f32) -> &'static str {
        let c = &self.config;
        let step = c.move_speed * dt;
        let forward = self.player.forward();
        let right = self.player.right();

        if input.action_down(Action::TurnLeft) {
            self.player.angle -= c.turn_speed * dt;
        }
        if input.action_down(Action::TurnRight) {
            self.player.angle += c.turn_speed * dt;
        }

        let mut animation = "idle";
        if input.action_down(Action::MoveRight) {
            self.player.position = self.player.position + right * step;
            self.x_stat -= c.strafe_shift * dt;
            self.scale_stat -= c.strafe_depth * dt;
            animation = "right";
        }
        if input.action_down(Action::MoveLeft) {
            self.player.position = self.player.position - right * step;
            self.x_stat += c.strafe_shift * dt;
            self.scale_stat += c.strafe_depth * dt;
            animation = "left";
        }
        if input.action_down(Action::MoveBackward) {
            self.player.position = self.player.position - forward * step;
            animation = "backward";
        }
        if input.action_down(Action::MoveForward) {
            self.player.position = self.player.position + forward * step;
            animation = "forward";
        }
        animation
    }

    fn spawn(
        &mut self,
        ids: &mut EntityIds,
        kind: ObjectKind,
        name: Option<&str>,
        position: Vec2,
        sprite: Option<TextureHandle>,
        solid: bool,
    ) {
        self.spawned += 1;
        let name = match name {
            Some(n) => n.to_string(),
            None => format!("{}_{}", kind.label(), self.spawned),
        };
        let handle = sprite.or_else(|| match kind {
            ObjectKind::Collectible => self.textures.collectible.clone(),
            ObjectKind::Hazard => self.textures.hazard.clone(),
        });
        let mut entity = Entity::new(ids, name, 0, 0);
        let sprite = match handle {
            Some(h) => TextureComponent::from_handle(h),
            None => TextureComponent::new(match kind {
                ObjectKind::Collectible => self.config.collectible_texture.as_str(),
                ObjectKind::Hazard => self.config.hazard_texture.as_str(),
            }),
        };
        let (w, h) = sprite.frame_dims();
        entity.add_component(sprite);
        if solid {
            entity.add_component(CollisionComponent::new(w, h));
        }
        if kind == ObjectKind::Collectible {
            let (amplitude, frequency) = COLLECTIBLE_HOVER;
            entity.add_component(HoverComponent::new(amplitude, frequency));
        }

        log::debug!("spawned {} at ({:.3}, {:.3})", entity.name(), position.x, position.y);
        self.objects.push(WorldObject { position, kind, entity });
    }

    /// Place an object directly (editor spawn). A sprite override that fails
    /// to load is logged and the kind's texture is used instead.
    pub fn spawn_object_at(&mut self, ids: &mut EntityIds, cache: &mut TextureCache, placement: &Placement<'_>) {
        let sprite = placement
            .texture
            .and_then(|path| load_logged(cache, placement.kind.label(), path));
        self.spawn(
            ids,
            placement.kind,
            Some(placement.name),
            placement.position,
            sprite,
            placement.solid,
        );
        self.spawner.set_last_spawn(placement.position);
    }

    /// Swap the ground and sky textures. A texture that fails to load keeps
    /// the previous one; the first failure is returned.
    pub fn retexture(&mut self, cache: &mut TextureCache, ground: &str, sky: &str) -> Result<(), Mode7Error> {
        let ground_result = cache.load(ground);
        let sky_result = cache.load(sky);
        let mut first_error = None;

        match ground_result {
            Ok(h) => {
                self.textures.ground = Some(h);
                self.config.ground_texture = ground.to_string();
            }
            Err(e) => first_error = Some(e),
        }
        match sky_result {
            Ok(h) => {
                self.textures.sky = Some(h);
                self.config.sky_texture = sky.to_string();
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => {
                log::info!("mode7 retextured: ground={} sky={}", ground, sky);
                Ok(())
            }
        }
    }

    pub fn player_bounds(&self) -> Rect {
        let p = self.player.position;
        Rect::centered(p.x, p.y, self.config.player_half_extent)
    }

    // =========================================================================
    // Render
    // =========================================================================

    fn sprite_params(&self) -> SpriteParams {
        SpriteParams {
            width: self.framebuffer.width as f32,
            height: self.framebuffer.height as f32,
            half_fov: self.config.half_fov(),
            far: self.config.far,
            scale_stat: self.scale_stat,
            x_stat: self.x_stat,
            max_scale: self.config.max_sprite_scale,
            cull_scale: self.config.cull_scale,
        }
    }

    /// Draw floor, sky, objects, player and score. Objects that project too
    /// small are destroyed here.
    pub fn render(&mut self, surface: &mut dyn Surface, show_colliders: bool) -> Result<(), Mode7Error> {
        if !self.is_running() {
            return Err(Mode7Error::NotInitialized);
        }

        let (w, h) = self.config.resolution;
        if self.framebuffer.width != w || self.framebuffer.height != h {
            self.framebuffer.resize(w, h);
        }

        let frustum = Frustum::new(&self.camera, self.config.half_fov(), self.config.near, self.config.far);
        let planes = PlaneTextures {
            ground: self.textures.ground.as_deref(),
            sky: self.textures.sky.as_deref(),
            ground_fallback: self.config.ground_fallback,
            sky_fallback: self.config.sky_fallback,
        };
        render_planes(&mut self.framebuffer, &frustum, &planes);

        let screen = Rect::screen(surface.width(), surface.height());
        surface.blit_framebuffer(&self.framebuffer, screen);
        let horizon = screen.h * 0.5;
        surface.draw_line(0.0, horizon, screen.w, horizon, 1.0, self.config.horizon_color);

        let view_scale = if w > 0 { screen.w / w as f32 } else { 1.0 };
        let params = self.sprite_params();
        let camera = self.camera;
        self.objects.retain_mut(|object| {
            match project_sprite(&camera, object.position, &params) {
                Projected::Culled => true,
                Projected::Destroyed => {
                    log::debug!("{} faded out", object.entity.name());
                    false
                }
                Projected::Visible { x, y, scale } => {
                    draw_sprite(&mut object.entity, surface, x, y, scale, view_scale, show_colliders);
                    true
                }
            }
        });

        if let Some(player) = self.player_entity.as_mut() {
            let scale = self.config.player_scale;
            let (pw, ph) = player.texture().map(|t| t.frame_dims()).unwrap_or((0.0, 0.0));
            let x = (w as f32 - pw * scale) * 0.5;
            let y = h as f32 - ph * scale - PLAYER_MARGIN;
            player.set_position(x.round() as i32, y.round() as i32);
            player.update();
            player.render(surface, view_scale, show_colliders);
        }

        hud::draw_score(
            surface,
            self.textures.font.as_deref(),
            self.config.glyph_size,
            self.score,
            self.config.score_padding * view_scale,
            view_scale,
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }
}

/// Position and scale an object's entity so its sprite stands on `(x, y)`
/// (framebuffer pixels, bottom centre), then draw it.
fn draw_sprite(
    entity: &mut Entity,
    surface: &mut dyn Surface,
    x: f32,
    y: f32,
    scale: f32,
    view_scale: f32,
    show_colliders: bool,
) {
    let (fw, fh) = entity.texture().map(|t| t.frame_dims()).unwrap_or((0.0, 0.0));
    let (sw, sh) = (fw * scale, fh * scale);
    let hover = entity.hover().map(HoverComponent::offset).unwrap_or(0.0);
    entity.set_position((x - sw * 0.5).round() as i32, (y - sh).round() as i32);
    if let Some(sprite) = entity.texture_mut() {
        sprite.set_scale(scale);
    }
    if let Some(collider) = entity.collision_mut() {
        collider.set_scale(scale);
        collider.set_offset(-hover);
    }
    entity.update();

    let lift = hover * scale;
    if let Some(sprite) = entity.texture() {
        let dst = Rect::new(
            (x - sw * 0.5) * view_scale,
            (y - sh - lift) * view_scale,
            sw * view_scale,
            sh * view_scale,
        );
        sprite.render_at(surface, dst);
    }
    if show_colliders {
        if let Some(collider) = entity.collision() {
            collider.render_outline(surface, view_scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::surface::testing::{DrawCall, RecordingSurface};
    use crate::rasterizer::{Color, Texture};

    fn running() -> (Mode7Renderer, EntityIds, TextureCache) {
        running_with(|_| {})
    }

    fn running_with(tweak: impl FnOnce(&mut Mode7Config)) -> (Mode7Renderer, EntityIds, TextureCache) {
        let mut ids = EntityIds::new();
        let mut cache = TextureCache::new();
        let mut config = Mode7Config::default();
        config.resolution = (32, 24);
        for (path, color) in [
            ("ground", Color::GREEN),
            ("sky", Color::new(255, 0, 0)),
            ("font", Color::WHITE),
            ("player", Color::new(255, 230, 0)),
            ("capsule", Color::WHITE),
            ("hazard", Color::BLACK),
        ] {
            cache.insert(path, Texture::solid(80, 8, color));
        }
        config.ground_texture = "ground".into();
        config.sky_texture = "sky".into();
        config.font_texture = "font".into();
        config.player_texture = "player".into();
        config.collectible_texture = "capsule".into();
        config.hazard_texture = "hazard".into();
        config.player_frame = (16, 8);
        tweak(&mut config);

        let mut renderer = Mode7Renderer::with_seed(config, Some(42));
        renderer.initialize(&mut cache, &mut ids);
        (renderer, ids, cache)
    }

    fn place_player(renderer: &mut Mode7Renderer, x: f32, y: f32, angle: f32) {
        renderer.player = Pose::new(x, y, angle);
        renderer.camera = Mode7Renderer::follow(&renderer.config, &renderer.player);
    }

    /// Name of the animation whose frame the player is drawn with
    fn player_animation(renderer: &mut Mode7Renderer) -> Option<&'static str> {
        let mut surface = RecordingSurface::new(32.0, 24.0);
        renderer.render(&mut surface, false).ok()?;
        let (src, _) = *surface.textures_named("player").first()?;
        let frame = (src.x / renderer.config.player_frame.0 as f32) as u32;
        PLAYER_ANIMATIONS.iter().find(|(_, f)| *f == frame).map(|(name, _)| *name)
    }

    #[test]
    fn test_update_before_initialize_is_error() {
        let mut ids = EntityIds::new();
        let mut renderer = Mode7Renderer::new(Mode7Config::default());
        let err = renderer.update(&InputState::default(), 0.016, &mut ids).unwrap_err();
        assert!(matches!(err, Mode7Error::NotInitialized));
        assert_eq!(renderer.state, RendererState::Uninitialized);
    }

    #[test]
    fn test_initialize_with_missing_textures_still_runs() {
        let mut ids = EntityIds::new();
        let mut cache = TextureCache::new();
        let mut config = Mode7Config::default();
        config.resolution = (16, 12);
        let mut renderer = Mode7Renderer::new(config);
        renderer.initialize(&mut cache, &mut ids);
        assert!(renderer.is_running());
        assert!(renderer.textures.ground.is_none());

        let mut surface = RecordingSurface::new(32.0, 24.0);
        renderer.render(&mut surface, false).unwrap();
        assert_eq!(renderer.framebuffer.get_pixel(0, 11), Some(Mode7Config::default().ground_fallback));
    }

    #[test]
    fn test_capsule_next_to_player_scores_once() {
        let (mut renderer, mut ids, mut cache) = running();
        place_player(&mut renderer, 0.5, 0.5, 0.0);
        renderer.spawn_object_at(&mut ids, &mut cache, &Placement::new(ObjectKind::Collectible, "capsule", 0.55, 0.5));
        assert_eq!(renderer.objects().len(), 1);

        renderer.update(&InputState::default(), 1.0 / 60.0, &mut ids).unwrap();
        assert_eq!(renderer.score(), 1);
        assert!(renderer.objects().is_empty());

        renderer.update(&InputState::default(), 1.0 / 60.0, &mut ids).unwrap();
        assert_eq!(renderer.score(), 1);
    }

    #[test]
    fn test_spawns_only_when_empty() {
        let (mut renderer, mut ids, mut cache) = running();
        renderer.spawn_object_at(&mut ids, &mut cache, &Placement::new(ObjectKind::Hazard, "far", 5.0, 5.0));
        for _ in 0..10 {
            renderer.update(&InputState::default(), 1.0, &mut ids).unwrap();
        }
        assert_eq!(renderer.objects().len(), 1);
    }

    #[test]
    fn test_spawner_fills_empty_world_after_interval() {
        // far enough out that the new object cannot touch the player box
        let (mut renderer, mut ids, _cache) = running_with(|c| c.min_spawn_distance = 0.15);
        renderer.update(&InputState::default(), 1.0, &mut ids).unwrap();
        assert!(renderer.objects().is_empty());
        renderer.update(&InputState::default(), 1.0, &mut ids).unwrap();
        assert_eq!(renderer.objects().len(), 1);
        assert_eq!(renderer.score(), 0);
    }

    #[test]
    fn test_camera_trails_player() {
        let (mut renderer, mut ids, _cache) = running();
        let input = InputState::held(&[Action::MoveForward, Action::TurnRight]);
        renderer.update(&input, 0.5, &mut ids).unwrap();
        let (player, camera) = (renderer.player, renderer.camera);
        assert_eq!(camera.angle, player.angle);
        assert!((camera.position.y - player.position.y - 0.02).abs() < 1e-6);
        assert!((player.position.x - 0.5).abs() > 0.0);
    }

    #[test]
    fn test_only_strafing_moves_stats() {
        let (mut renderer, mut ids, _cache) = running();
        renderer.update(&InputState::held(&[Action::MoveForward]), 1.0, &mut ids).unwrap();
        assert_eq!((renderer.x_stat, renderer.scale_stat), (0.0, 0.0));

        renderer.update(&InputState::held(&[Action::MoveLeft]), 1.0, &mut ids).unwrap();
        let (x_stat, scale_stat) = (renderer.x_stat, renderer.scale_stat);
        assert!(x_stat > 0.0 && scale_stat > 0.0);
        assert_eq!(player_animation(&mut renderer), Some("left"));

        renderer.update(&InputState::default(), 0.1, &mut ids).unwrap();
        assert_eq!(player_animation(&mut renderer), Some("idle"));
    }

    #[test]
    fn test_render_order_framebuffer_then_objects_then_player_then_score() {
        let (mut renderer, mut ids, mut cache) = running();
        place_player(&mut renderer, 0.5, 0.5, 0.0);
        // ahead of the camera, outside the player box
        renderer.spawn_object_at(&mut ids, &mut cache, &Placement::new(ObjectKind::Collectible, "ahead", 0.56, 0.52));
        let mut surface = RecordingSurface::new(64.0, 48.0);
        renderer.render(&mut surface, false).unwrap();

        assert!(matches!(surface.calls[0], DrawCall::Framebuffer { width: 32, height: 24, .. }));
        assert!(matches!(surface.calls[1], DrawCall::Line(..)));
        let names: Vec<_> = surface
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Texture { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names.first(), Some(&"capsule"));
        let player_at = names.iter().position(|n| *n == "player").unwrap();
        assert!(names[player_at + 1..].iter().all(|n| *n == "font"));
    }

    #[test]
    fn test_faded_objects_are_destroyed_on_render() {
        let (mut renderer, mut ids, mut cache) = running();
        place_player(&mut renderer, 0.0, 0.0, 0.0);
        renderer.spawn_object_at(&mut ids, &mut cache, &Placement::new(ObjectKind::Collectible, "distant", 3.0, -0.02));
        renderer.spawn_object_at(&mut ids, &mut cache, &Placement::new(ObjectKind::Collectible, "behind", -1.0, 0.0));
        let mut surface = RecordingSurface::new(32.0, 24.0);
        renderer.render(&mut surface, false).unwrap();
        let names: Vec<_> = renderer.objects().iter().map(|o| o.entity.name().to_string()).collect();
        assert_eq!(names, vec!["behind".to_string()]);
    }

    #[test]
    fn test_retexture_keeps_old_texture_on_failure() {
        let (mut renderer, _ids, mut cache) = running();
        cache.insert("ground2", Texture::solid(4, 4, Color::BLACK));
        assert!(renderer.retexture(&mut cache, "ground2", "missing_sky.bmp").is_err());
        assert_eq!(renderer.textures.ground.as_ref().unwrap().name, "ground2");
        assert_eq!(renderer.textures.sky.as_ref().unwrap().name, "sky");
    }

    fn sprite_name(renderer: &Mode7Renderer, index: usize) -> Option<String> {
        let object = renderer.objects().get(index)?;
        Some(object.entity.texture()?.path().to_string())
    }

    #[test]
    fn test_placed_object_uses_texture_override() {
        let (mut renderer, mut ids, mut cache) = running();
        cache.insert("gem.png", Texture::solid(8, 8, Color::new(255, 0, 0)));
        let placement = Placement::new(ObjectKind::Collectible, "gem", 2.0, 2.0).with_texture("gem.png");
        renderer.spawn_object_at(&mut ids, &mut cache, &placement);
        assert_eq!(sprite_name(&renderer, 0).as_deref(), Some("gem.png"));
        assert_eq!(renderer.objects()[0].entity.collision().unwrap().size(), (8.0, 8.0));
    }

    #[test]
    fn test_unloadable_override_falls_back_to_kind_texture() {
        let (mut renderer, mut ids, mut cache) = running();
        let placement = Placement::new(ObjectKind::Hazard, "spike", 2.0, 2.0).with_texture("no/such/spike.png");
        renderer.spawn_object_at(&mut ids, &mut cache, &placement);
        assert_eq!(sprite_name(&renderer, 0).as_deref(), Some("hazard"));
    }

    #[test]
    fn test_placed_scenery_is_not_collected() {
        let (mut renderer, mut ids, mut cache) = running();
        place_player(&mut renderer, 0.5, 0.5, 0.0);
        let placement = Placement::new(ObjectKind::Collectible, "tree", 0.55, 0.5).with_solid(false);
        renderer.spawn_object_at(&mut ids, &mut cache, &placement);
        renderer.update(&InputState::default(), 1.0 / 60.0, &mut ids).unwrap();
        assert_eq!(renderer.score(), 0);
        assert_eq!(renderer.objects().len(), 1);
        assert!(renderer.objects()[0].entity.collision().is_none());
    }

    #[test]
    fn test_collider_outline_follows_hover() {
        let (mut renderer, mut ids, mut cache) = running();
        place_player(&mut renderer, 0.5, 0.5, 0.0);
        renderer.spawn_object_at(&mut ids, &mut cache, &Placement::new(ObjectKind::Collectible, "bob", 0.56, 0.52));
        // a quarter cycle puts the hover at its peak
        let (_, frequency) = COLLECTIBLE_HOVER;
        renderer.objects[0].entity.tick(0.25 / frequency);
        let hover = renderer.objects[0].entity.hover().unwrap().offset();
        assert!(hover > 0.0);

        let mut surface = RecordingSurface::new(32.0, 24.0);
        renderer.render(&mut surface, true).unwrap();
        let sprite = surface.textures_named("capsule")[0].1;
        let outline = surface
            .calls
            .iter()
            .find_map(|c| match c {
                DrawCall::StrokeRect(rect, _) => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert!((outline.y - sprite.y).abs() <= 1.0);
    }
}

//! Applying control requests to the engine

use std::path::Path;

use thiserror::Error;

use super::{App, RenderMode};
use crate::control::{BitmapTextSpawn, ControlRequest, CustomSpawn, NodeOperation, SceneOperation, SpawnRequest};
use crate::game::components::BitmapTextComponent;
use crate::game::{Entity, ScriptKind};
use crate::mode7::{Mode7Error, ObjectKind, Placement};
use crate::rasterizer::TextureError;
use crate::scene::{
    build_entity, load_scene, save_scene, ComponentRecords, LoadContext, PathRecord,
    PersistenceError, SceneError,
};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Mode7(#[from] Mode7Error),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("unknown script: {0}")]
    UnknownScript(String),
}

/// Mode7 objects named or textured as hazards are hazards; anything else
/// is collected
fn object_kind(spawn: &CustomSpawn) -> ObjectKind {
    let hazard = |s: &str| s.to_ascii_lowercase().contains(ObjectKind::Hazard.label());
    if hazard(&spawn.name) || hazard(&spawn.texture_path) {
        ObjectKind::Hazard
    } else {
        ObjectKind::Collectible
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

impl App {
    pub(super) fn apply_request(&mut self, request: ControlRequest) -> Result<(), RequestError> {
        match request {
            ControlRequest::Spawn(spawn) => self.spawn(spawn),
            ControlRequest::RequestNodes | ControlRequest::RequestScenes => {
                self.publish_requested = true;
                Ok(())
            }
            ControlRequest::Scene(op) => self.scene_operation(op),
            ControlRequest::Node(op) => self.node_operation(op),
            ControlRequest::SaveScene { path } => {
                let scene = self.scenes.active().ok_or(SceneError::NoActiveScene)?;
                save_scene(scene, Path::new(&path))?;
                Ok(())
            }
            ControlRequest::LoadScene { path } => self.load_scene_file(&path),
            ControlRequest::SwitchScene { scene } => {
                self.scenes.set_active(&scene)?;
                Ok(())
            }
            ControlRequest::SetMode7(on) => {
                self.set_mode(if on { RenderMode::Mode7 } else { RenderMode::Mode2D });
                Ok(())
            }
            ControlRequest::Retexture { ground, sky } => {
                self.mode7.retexture(&mut self.textures, &ground, &sky)?;
                Ok(())
            }
        }
    }

    /// Load a scene file, replacing any scene of the same name, and make it active
    pub(super) fn load_scene_file(&mut self, path: &str) -> Result<(), RequestError> {
        let mut ctx = LoadContext {
            ids: &mut self.ids,
            textures: &mut self.textures,
            scripts: &self.config.scripts,
        };
        let scene = load_scene(Path::new(path), &mut ctx)?;
        let name = scene.name().to_string();
        if self.scenes.insert_scene(scene).is_some() {
            log::info!("scene '{}' replaced from {}", name, path);
        }
        self.scenes.set_active(&name)?;
        Ok(())
    }

    fn spawn(&mut self, spawn: SpawnRequest) -> Result<(), RequestError> {
        match spawn {
            SpawnRequest::Custom(custom) if custom.is_mode7 => {
                let (x, y) = (custom.position.x as f32, custom.position.y as f32);
                let placement = Placement::new(object_kind(&custom), &custom.name, x, y)
                    .with_texture(&custom.texture_path)
                    .with_solid(custom.has_collision);
                self.mode7.spawn_object_at(&mut self.ids, &mut self.textures, &placement);
                log::info!(
                    "placed mode7 object '{}' at ({:.3}, {:.3}), {} in world",
                    custom.name,
                    x,
                    y,
                    self.mode7.objects().len()
                );
                Ok(())
            }
            SpawnRequest::Custom(custom) => self.spawn_custom(custom),
            SpawnRequest::BitmapText(text) => self.spawn_bitmap_text(text),
        }
    }

    fn spawn_custom(&mut self, spawn: CustomSpawn) -> Result<(), RequestError> {
        let texture = (!spawn.texture_path.is_empty()).then(|| spawn.texture_path.clone());
        if let Some(path) = &texture {
            self.textures.load(path)?;
        }
        let script = (spawn.has_script && !spawn.script_path.is_empty()).then(|| spawn.script_path.clone());
        if let Some(path) = &script {
            if ScriptKind::from_path(path).is_none() {
                return Err(RequestError::UnknownScript(path.clone()));
            }
        }

        let records = ComponentRecords {
            texture: texture.map(|path| PathRecord { path }),
            script: script.map(|path| PathRecord { path }),
            collision: spawn.has_collision,
        };
        let (x, y) = spawn.position.to_pixels();
        let mut ctx = LoadContext {
            ids: &mut self.ids,
            textures: &mut self.textures,
            scripts: &self.config.scripts,
        };
        let entity = build_entity(&mut ctx, &spawn.name, x, y, &records);
        let scene = self.scenes.require_active_mut()?;
        scene.add_entity(non_empty(spawn.parent_node.as_deref()), entity)?;
        log::info!("spawned '{}' at ({}, {})", spawn.name, x, y);
        Ok(())
    }

    fn spawn_bitmap_text(&mut self, spawn: BitmapTextSpawn) -> Result<(), RequestError> {
        let font = non_empty(spawn.texture_path.as_deref())
            .unwrap_or(&self.config.mode7.font_texture)
            .to_string();
        self.textures.load(&font)?;

        let (x, y) = spawn.position.to_pixels();
        let mut entity = Entity::new(&mut self.ids, spawn.name.as_str(), x, y);
        entity.add_component(BitmapTextComponent::load(
            &mut self.textures,
            &font,
            self.config.mode7.glyph_size,
            spawn.initial_score,
        ));
        let scene = self.scenes.require_active_mut()?;
        scene.add_entity(non_empty(spawn.parent_node.as_deref()), entity)?;
        log::info!("spawned score text '{}' at ({}, {})", spawn.name, x, y);
        Ok(())
    }

    fn scene_operation(&mut self, op: SceneOperation) -> Result<(), RequestError> {
        match op {
            SceneOperation::Create { name } => {
                self.scenes.create_scene(&name, &mut self.ids)?;
            }
            SceneOperation::Delete { name } => {
                self.scenes.remove_scene(&name)?;
            }
        }
        Ok(())
    }

    fn node_operation(&mut self, op: NodeOperation) -> Result<(), RequestError> {
        match op {
            NodeOperation::AddNode { name, parent } => {
                let entity = Entity::new(&mut self.ids, name.as_str(), 0, 0);
                let scene = self.scenes.require_active_mut()?;
                scene.add_entity(non_empty(parent.as_deref()), entity)?;
            }
            NodeOperation::RemoveNode { name, reparent } => {
                let scene = self.scenes.require_active_mut()?;
                let id = scene.node(&name)?;
                let removed = scene.tree_mut().remove_node(id, reparent)?;
                log::info!("removed '{}' ({} nodes)", name, removed);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::control::request::SpawnPosition;
    use crate::rasterizer::surface::testing::RecordingSurface;
    use crate::rasterizer::{Color, Texture};
    use tempfile::TempDir;

    fn app() -> App {
        let mut config = EngineConfig::default();
        config.editor.command = Vec::new();
        config.mode7.font_texture = "font".into();
        let mut app = App::new(config);
        app.textures.insert("crate", Texture::solid(16, 16, Color::WHITE));
        app.textures.insert("font", Texture::solid(80, 8, Color::WHITE));
        app
    }

    fn custom(name: &str, parent: Option<&str>) -> CustomSpawn {
        CustomSpawn {
            name: name.into(),
            position: SpawnPosition { x: 12.4, y: 7.6 },
            texture_path: "crate".into(),
            has_collision: true,
            has_script: false,
            script_path: String::new(),
            parent_node: parent.map(str::to_string),
            is_mode7: false,
        }
    }

    fn entity<'a>(app: &'a App, name: &str) -> Option<&'a Entity> {
        let scene = app.scenes.active()?;
        scene.tree().entity(scene.tree().find_node(name)?)
    }

    #[test]
    fn test_spawn_custom_in_2d() {
        let mut app = app();
        app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(custom("box", None))))
            .unwrap();
        let spawned = entity(&app, "box").unwrap();
        assert_eq!(spawned.position(), (12, 8));
        assert_eq!(spawned.collision().unwrap().size(), (16.0, 16.0));
    }

    #[test]
    fn test_spawn_under_parent_and_duplicate() {
        let mut app = app();
        let spawn = |name: &str, parent| ControlRequest::Spawn(SpawnRequest::Custom(custom(name, parent)));
        app.apply_request(spawn("a", Some(""))).unwrap();
        app.apply_request(spawn("b", Some("a"))).unwrap();
        let err = app.apply_request(spawn("b", None)).unwrap_err();
        assert!(matches!(err, RequestError::Scene(SceneError::DuplicateNode(_))));
        let err = app.apply_request(spawn("c", Some("missing"))).unwrap_err();
        assert!(matches!(err, RequestError::Scene(SceneError::UnknownNode(_))));

        let hierarchy = app.scenes.active().unwrap().tree().hierarchy();
        assert_eq!(hierarchy[0].children[0].children[0].name, "b");
    }

    #[test]
    fn test_spawn_with_missing_texture_fails() {
        let mut app = app();
        let mut spawn = custom("ghost", None);
        spawn.texture_path = "no/such/file.png".into();
        let err = app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(spawn))).unwrap_err();
        assert!(matches!(err, RequestError::Texture(_)));
        assert!(entity(&app, "ghost").is_none());
    }

    #[test]
    fn test_spawn_with_unknown_script_fails() {
        let mut app = app();
        let mut spawn = custom("bot", None);
        spawn.has_script = true;
        spawn.script_path = "scripts/DanceScript.py".into();
        let err = app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(spawn))).unwrap_err();
        assert!(matches!(err, RequestError::UnknownScript(_)));
    }

    fn mode7_spawn(name: &str, texture: &str) -> CustomSpawn {
        CustomSpawn {
            position: SpawnPosition { x: 0.8, y: 0.2 },
            texture_path: texture.into(),
            is_mode7: true,
            ..custom(name, None)
        }
    }

    fn object_sprite(app: &App, index: usize) -> Option<String> {
        let object = app.mode7.objects().get(index)?;
        Some(object.entity.texture()?.path().to_string())
    }

    #[test]
    fn test_mode7_spawn_places_world_object() {
        let mut app = app();
        app.set_mode(RenderMode::Mode7);
        let spawn = mode7_spawn("hazard_1", "");
        app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(spawn))).unwrap();

        let objects = app.mode7.objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].kind, ObjectKind::Hazard);
        assert_eq!((objects[0].position.x, objects[0].position.y), (0.8, 0.2));
        assert!(entity(&app, "hazard_1").is_none());
    }

    #[test]
    fn test_mode7_flag_routes_spawn_even_in_2d() {
        let mut app = app();
        assert_eq!(app.mode(), RenderMode::Mode2D);
        let spawn = mode7_spawn("capsule_1", "");
        app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(spawn))).unwrap();

        assert!(entity(&app, "capsule_1").is_none());
        assert_eq!(app.mode7.objects().len(), 1);
        assert_eq!(app.mode(), RenderMode::Mode2D);
    }

    #[test]
    fn test_2d_spawn_stays_in_scene_while_in_mode7() {
        let mut app = app();
        app.set_mode(RenderMode::Mode7);
        app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(custom("box", None))))
            .unwrap();
        assert_eq!(entity(&app, "box").unwrap().position(), (12, 8));
        assert!(app.mode7.objects().is_empty());
    }

    #[test]
    fn test_mode7_spawn_keeps_chosen_texture_and_collision() {
        let mut app = app();
        app.set_mode(RenderMode::Mode7);
        app.textures.insert("gem.png", Texture::solid(8, 8, Color::new(255, 0, 0)));
        let spawn = mode7_spawn("gem", "gem.png");
        app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(spawn))).unwrap();
        assert_eq!(object_sprite(&app, 0).as_deref(), Some("gem.png"));
        assert!(app.mode7.objects()[0].entity.collision().is_some());

        let spawn = CustomSpawn { has_collision: false, ..mode7_spawn("tree", "gem.png") };
        app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(spawn))).unwrap();
        assert!(app.mode7.objects()[1].entity.collision().is_none());
    }

    #[test]
    fn test_spawn_bitmap_text() {
        let mut app = app();
        let spawn = BitmapTextSpawn {
            name: "score".into(),
            position: SpawnPosition { x: 4.0, y: 4.0 },
            initial_score: 12,
            parent_node: None,
            texture_path: None,
        };
        app.apply_request(ControlRequest::Spawn(SpawnRequest::BitmapText(spawn))).unwrap();
        let text = entity(&app, "score").unwrap().bitmap_text().unwrap();
        let mut surface = RecordingSurface::new(320.0, 240.0);
        text.render(&mut surface, 1.0);
        let glyphs: Vec<_> = surface.textures_named("font").iter().map(|(src, _)| src.x).collect();
        assert_eq!(glyphs, vec![8.0, 16.0]);
    }

    #[test]
    fn test_scene_and_node_operations() {
        let mut app = app();
        app.apply_request(ControlRequest::Scene(SceneOperation::Create { name: "two".into() }))
            .unwrap();
        let err = app
            .apply_request(ControlRequest::Scene(SceneOperation::Delete { name: "main".into() }))
            .unwrap_err();
        assert!(matches!(err, RequestError::Scene(SceneError::ActiveScene(_))));

        app.apply_request(ControlRequest::Node(NodeOperation::AddNode { name: "group".into(), parent: None }))
            .unwrap();
        app.apply_request(ControlRequest::Node(NodeOperation::AddNode {
            name: "leaf".into(),
            parent: Some("group".into()),
        }))
        .unwrap();
        app.apply_request(ControlRequest::Node(NodeOperation::RemoveNode { name: "group".into(), reparent: true }))
            .unwrap();
        let hierarchy = app.scenes.active().unwrap().tree().hierarchy();
        assert_eq!(hierarchy[0].children.len(), 1);
        assert_eq!(hierarchy[0].children[0].name, "leaf");

        app.apply_request(ControlRequest::SwitchScene { scene: "two".into() }).unwrap();
        assert_eq!(app.scenes.active_name(), Some("two"));
        app.apply_request(ControlRequest::Scene(SceneOperation::Delete { name: "main".into() }))
            .unwrap();
        assert!(!app.scenes.scene_names().contains(&"main".to_string()));
    }

    #[test]
    fn test_save_then_load_activates_scene() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scenes").join("main.json");
        let path = path.to_string_lossy().to_string();

        let mut app = app();
        app.apply_request(ControlRequest::Spawn(SpawnRequest::Custom(custom("box", None))))
            .unwrap();
        app.apply_request(ControlRequest::SaveScene { path: path.clone() }).unwrap();

        app.apply_request(ControlRequest::Scene(SceneOperation::Create { name: "other".into() }))
            .unwrap();
        app.apply_request(ControlRequest::SwitchScene { scene: "other".into() }).unwrap();
        app.apply_request(ControlRequest::LoadScene { path }).unwrap();

        assert_eq!(app.scenes.active_name(), Some("main"));
        assert_eq!(entity(&app, "box").unwrap().position(), (12, 8));
    }

    #[test]
    fn test_retexture_failure_is_reported() {
        let mut app = app();
        let err = app
            .apply_request(ControlRequest::Retexture { ground: "crate".into(), sky: "nope.png".into() })
            .unwrap_err();
        assert!(matches!(err, RequestError::Mode7(Mode7Error::Texture(_))));
    }
}

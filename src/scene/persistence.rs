//! JSON scene files
//!
//! A scene file is a JSON array. Element 0 is the header
//! `{"sceneName": ...}`; every following element is one entity record:
//!
//! ```json
//! {"name": "hero", "position": {"x": 10, "y": 20}, "parent": "Root",
//!  "components": {"texture": {"path": "assets/hero.bmp"},
//!                 "script": {"path": "scripts/MovementScript.cpp"},
//!                 "collision": true}}
//! ```
//!
//! The root entity is implicit: it is never written, and records named
//! `Root` are skipped on load. Records are written in pre-order, so a parent
//! always precedes its children.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::manager::{Scene, ROOT_NAME};
use super::tree::NodeId;
use super::SceneError;
use crate::config::ScriptSettings;
use crate::game::components::{CollisionComponent, ScriptComponent, TextureComponent};
use crate::game::{Entity, EntityIds};
use crate::texture::TextureCache;

/// Collider size used when an entity has no loaded texture to size it from
pub const DEFAULT_COLLIDER: (f32, f32) = (32.0, 32.0);

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access scene file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scene file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene file has no header")]
    MissingHeader,
    #[error(transparent)]
    Scene(#[from] SceneError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneHeader {
    scene_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub path: String,
}

/// Which components an entity carries, as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecords {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<PathRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathRecord>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collision: bool,
}

impl ComponentRecords {
    pub fn of(entity: &Entity) -> Self {
        Self {
            texture: entity.texture().map(|t| PathRecord { path: t.path().to_string() }),
            script: entity.script().map(|s| PathRecord { path: s.path().to_string() }),
            collision: entity.collision().is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub components: ComponentRecords,
}

/// Parsed but not yet instantiated scene file
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFile {
    pub name: String,
    pub records: Vec<EntityRecord>,
}

/// Services needed to turn records into live entities
pub struct LoadContext<'a> {
    pub ids: &'a mut EntityIds,
    pub textures: &'a mut TextureCache,
    pub scripts: &'a ScriptSettings,
}

/// Records for every non-root entity of `scene`, in pre-order
pub fn scene_records(scene: &Scene) -> Vec<EntityRecord> {
    let tree = scene.tree();
    let mut records = Vec::new();
    tree.traverse(|id, node| {
        if id == scene.root() {
            return;
        }
        let entity = node.entity();
        let (x, y) = entity.position();
        let parent = node
            .parent()
            .and_then(|p| tree.entity(p))
            .map(|e| e.name().to_string())
            .unwrap_or_else(|| ROOT_NAME.to_string());
        records.push(EntityRecord {
            name: entity.name().to_string(),
            position: Position { x, y },
            parent,
            components: ComponentRecords::of(entity),
        });
    });
    records
}

pub fn scene_to_json(scene: &Scene) -> Result<serde_json::Value, PersistenceError> {
    let mut items = vec![serde_json::to_value(SceneHeader {
        scene_name: scene.name().to_string(),
    })?];
    for record in scene_records(scene) {
        items.push(serde_json::to_value(record)?);
    }
    Ok(serde_json::Value::Array(items))
}

pub fn save_scene(scene: &Scene, path: &Path) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(&scene_to_json(scene)?)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| PersistenceError::Io {
            path: dir.display().to_string(),
            source,
        })?;
    }
    std::fs::write(path, json).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("saved scene '{}' to {}", scene.name(), path.display());
    Ok(())
}

/// Parse scene JSON. Records that do not match the record shape are logged
/// and dropped; a missing or malformed header fails the whole file.
pub fn parse_scene(text: &str) -> Result<SceneFile, PersistenceError> {
    let items: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let mut items = items.into_iter();
    let header: SceneHeader = match items.next() {
        Some(value) => serde_json::from_value(value)?,
        None => return Err(PersistenceError::MissingHeader),
    };

    let mut records = Vec::new();
    for (i, value) in items.enumerate() {
        match serde_json::from_value::<EntityRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("scene '{}': skipping record {}: {}", header.scene_name, i + 1, e),
        }
    }
    Ok(SceneFile {
        name: header.scene_name,
        records,
    })
}

/// Build an entity with the components named in `components`. A texture or
/// script that cannot be resolved is logged and left off.
pub fn build_entity(
    ctx: &mut LoadContext<'_>,
    name: &str,
    x: i32,
    y: i32,
    components: &ComponentRecords,
) -> Entity {
    let mut entity = Entity::new(ctx.ids, name, x, y);
    let mut collider = DEFAULT_COLLIDER;

    if let Some(texture) = &components.texture {
        let component = TextureComponent::load(ctx.textures, &texture.path);
        if component.is_loaded() {
            collider = component.frame_dims();
        }
        entity.add_component(component);
    }
    if let Some(script) = &components.script {
        match ScriptComponent::from_path(&script.path, ctx.scripts) {
            Some(component) => {
                log::debug!("{}: attached {}", name, component.kind());
                entity.add_component(component);
            }
            None => log::warn!("{}: unknown script {}", name, script.path),
        }
    }
    if components.collision {
        entity.add_component(CollisionComponent::new(collider.0, collider.1));
    }
    entity
}

/// Turn a parsed file into a scene. Records whose parent is unknown are
/// logged and skipped (so are their descendants, which then have no parent).
pub fn instantiate(file: &SceneFile, ctx: &mut LoadContext<'_>) -> Scene {
    let mut scene = Scene::new(file.name.clone(), ctx.ids);
    for record in &file.records {
        if record.name == ROOT_NAME {
            continue;
        }
        if scene.tree().find_node(&record.name).is_some() {
            log::warn!("scene '{}': duplicate entity '{}', skipped", file.name, record.name);
            continue;
        }
        let parent: Option<NodeId> = if record.parent.is_empty() {
            Some(scene.root())
        } else {
            scene.tree().find_node(&record.parent)
        };
        let Some(parent) = parent else {
            log::warn!(
                "scene '{}': '{}' has unknown parent '{}', skipped",
                file.name,
                record.name,
                record.parent
            );
            continue;
        };
        let entity = build_entity(
            ctx,
            &record.name,
            record.position.x,
            record.position.y,
            &record.components,
        );
        if let Err(e) = scene.tree_mut().add_child(Some(parent), entity) {
            log::warn!("scene '{}': {}", file.name, e);
        }
    }
    scene
}

pub fn load_scene(path: &Path, ctx: &mut LoadContext<'_>) -> Result<Scene, PersistenceError> {
    let text = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file = parse_scene(&text)?;
    let scene = instantiate(&file, ctx);
    log::info!(
        "loaded scene '{}' ({} entities) from {}",
        scene.name(),
        scene.entity_count() - 1,
        path.display()
    );
    Ok(scene)
}

//! Scene registry
//!
//! The manager is an ordinary value owned by the frame driver. Invariant:
//! the active scene name, when set, always names a registered scene.

use std::collections::BTreeMap;

use super::tree::{NodeId, SceneTree};
use super::SceneError;
use crate::game::{Entity, EntityIds};

/// Name of the entity every scene tree is rooted at
pub const ROOT_NAME: &str = "Root";

#[derive(Debug)]
pub struct Scene {
    name: String,
    tree: SceneTree,
    root: NodeId,
}

impl Scene {
    /// Empty scene holding just its root entity
    pub fn new(name: impl Into<String>, ids: &mut EntityIds) -> Self {
        let (tree, root) = SceneTree::with_root(Entity::new(ids, ROOT_NAME, 0, 0));
        Self {
            name: name.into(),
            tree,
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Node called `name`, or an `UnknownNode` error
    pub fn node(&self, name: &str) -> Result<NodeId, SceneError> {
        self.tree
            .find_node(name)
            .ok_or_else(|| SceneError::UnknownNode(format!("'{}'", name)))
    }

    /// Add `entity` under the node called `parent` (the root when `None`).
    /// Entity names must be unique within a scene.
    pub fn add_entity(&mut self, parent: Option<&str>, entity: Entity) -> Result<NodeId, SceneError> {
        if self.tree.find_node(entity.name()).is_some() {
            return Err(SceneError::DuplicateNode(entity.name().to_string()));
        }
        let parent = match parent {
            Some(name) => self.node(name)?,
            None => self.root,
        };
        self.tree.add_child(Some(parent), entity)
    }

    /// Number of entities, root included
    pub fn entity_count(&self) -> usize {
        self.tree.len()
    }
}

#[derive(Debug, Default)]
pub struct SceneManager {
    scenes: BTreeMap<String, Scene>,
    active: Option<String>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new empty scene. Fails if the name is taken; the existing
    /// scene is left untouched.
    pub fn create_scene(&mut self, name: &str, ids: &mut EntityIds) -> Result<&mut Scene, SceneError> {
        if self.scenes.contains_key(name) {
            return Err(SceneError::DuplicateScene(name.to_string()));
        }
        log::info!("created scene '{}'", name);
        Ok(self
            .scenes
            .entry(name.to_string())
            .or_insert_with(|| Scene::new(name, ids)))
    }

    /// Register a scene built elsewhere (e.g. loaded from disk), replacing
    /// any scene of the same name. Returns the replaced scene.
    pub fn insert_scene(&mut self, scene: Scene) -> Option<Scene> {
        self.scenes.insert(scene.name().to_string(), scene)
    }

    pub fn remove_scene(&mut self, name: &str) -> Result<Scene, SceneError> {
        if self.active.as_deref() == Some(name) {
            return Err(SceneError::ActiveScene(name.to_string()));
        }
        let scene = self
            .scenes
            .remove(name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
        log::info!("removed scene '{}'", name);
        Ok(scene)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.scenes.contains_key(name) {
            return Err(SceneError::UnknownScene(name.to_string()));
        }
        if self.active.as_deref() != Some(name) {
            log::info!("active scene: '{}'", name);
            self.active = Some(name.to_string());
        }
        Ok(())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Scene> {
        self.scenes.get(self.active.as_deref()?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Scene> {
        let name = self.active.as_deref()?;
        self.scenes.get_mut(name)
    }

    /// Active scene or `NoActiveScene`
    pub fn require_active_mut(&mut self) -> Result<&mut Scene, SceneError> {
        self.active_mut().ok_or(SceneError::NoActiveScene)
    }

    /// Registered scene names, sorted
    pub fn scene_names(&self) -> Vec<String> {
        self.scenes.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_scene_leaves_original_untouched() {
        let mut ids = EntityIds::new();
        let mut scenes = SceneManager::new();
        let main = scenes.create_scene("main", &mut ids).unwrap();
        main.add_entity(None, Entity::new(&mut ids, "hero", 1, 2)).unwrap();

        let err = scenes.create_scene("main", &mut ids).unwrap_err();
        assert_eq!(err, SceneError::DuplicateScene("main".into()));
        let main = &scenes.scenes["main"];
        assert_eq!(main.entity_count(), 2);
        assert!(main.tree().find_node("hero").is_some());
    }

    #[test]
    fn test_active_scene_cannot_be_removed() {
        let mut ids = EntityIds::new();
        let mut scenes = SceneManager::new();
        scenes.create_scene("main", &mut ids).unwrap();
        scenes.create_scene("other", &mut ids).unwrap();
        scenes.set_active("main").unwrap();

        assert_eq!(scenes.remove_scene("main").unwrap_err(), SceneError::ActiveScene("main".into()));
        assert!(scenes.remove_scene("other").is_ok());
        assert_eq!(scenes.remove_scene("other").unwrap_err(), SceneError::UnknownScene("other".into()));
        assert_eq!(scenes.scene_names(), vec!["main".to_string()]);
    }

    #[test]
    fn test_set_active_requires_existing_scene() {
        let mut scenes = SceneManager::new();
        assert!(scenes.set_active("ghost").is_err());
        assert!(scenes.active().is_none());
        assert_eq!(scenes.require_active_mut().unwrap_err(), SceneError::NoActiveScene);
    }

    #[test]
    fn test_add_entity_rejects_duplicates_and_unknown_parents() {
        let mut ids = EntityIds::new();
        let mut scene = Scene::new("main", &mut ids);
        scene.add_entity(None, Entity::new(&mut ids, "a", 0, 0)).unwrap();
        assert_eq!(
            scene.add_entity(None, Entity::new(&mut ids, "a", 0, 0)).unwrap_err(),
            SceneError::DuplicateNode("a".into())
        );
        assert!(matches!(
            scene.add_entity(Some("nope"), Entity::new(&mut ids, "b", 0, 0)),
            Err(SceneError::UnknownNode(_))
        ));
        scene.add_entity(Some("a"), Entity::new(&mut ids, "b", 0, 0)).unwrap();
        let b = scene.node("b").unwrap();
        assert_eq!(scene.tree().get(b).unwrap().parent(), Some(scene.node("a").unwrap()));
    }
}

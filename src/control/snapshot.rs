//! Engine state published for the editor

use serde::{Deserialize, Serialize};

use crate::scene::{NodeInfo, SceneManager};

/// `active_scene.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveScenePayload {
    pub scene: String,
}

/// `available_scenes.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenesPayload {
    pub scenes: Vec<String>,
    pub active: Option<String>,
}

/// `click_event.json`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickPayload {
    pub x: i32,
    pub y: i32,
}

/// `spawn_error.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnErrorPayload {
    pub error: String,
}

/// What the editor can see of the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub active_scene: Option<String>,
    pub scenes: Vec<String>,
    /// Hierarchy of the active scene
    pub nodes: Vec<NodeInfo>,
}

impl StateSnapshot {
    pub fn capture(scenes: &SceneManager) -> Self {
        Self {
            active_scene: scenes.active_name().map(str::to_string),
            scenes: scenes.scene_names(),
            nodes: scenes
                .active()
                .map(|s| s.tree().hierarchy())
                .unwrap_or_default(),
        }
    }

    pub fn scenes_payload(&self) -> ScenesPayload {
        ScenesPayload {
            scenes: self.scenes.clone(),
            active: self.active_scene.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Entity, EntityIds};

    #[test]
    fn test_capture_reflects_active_scene() {
        let mut ids = EntityIds::new();
        let mut scenes = SceneManager::new();
        scenes.create_scene("b", &mut ids).unwrap();
        let a = scenes.create_scene("a", &mut ids).unwrap();
        a.add_entity(None, Entity::new(&mut ids, "hero", 0, 0)).unwrap();
        scenes.set_active("a").unwrap();

        let snap = StateSnapshot::capture(&scenes);
        assert_eq!(snap.active_scene.as_deref(), Some("a"));
        assert_eq!(snap.scenes, vec!["a", "b"]);
        assert_eq!(snap.nodes[0].name, "Root");
        assert_eq!(snap.nodes[0].children[0].name, "hero");
    }

    #[test]
    fn test_empty_manager() {
        let snap = StateSnapshot::capture(&SceneManager::new());
        assert_eq!(snap, StateSnapshot::default());
    }
}

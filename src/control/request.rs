//! Requests the editor can make, and their JSON payloads

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ControlError;

/// Spawn position. 2D spawns use whole pixels; Mode7 spawns use world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnPosition {
    pub x: f64,
    pub y: f64,
}

impl SpawnPosition {
    pub fn to_pixels(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// A sprite entity with optional collision and script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomSpawn {
    pub name: String,
    #[serde(default)]
    pub position: SpawnPosition,
    #[serde(default)]
    pub texture_path: String,
    #[serde(default)]
    pub has_collision: bool,
    #[serde(default)]
    pub has_script: bool,
    #[serde(default)]
    pub script_path: String,
    #[serde(default)]
    pub parent_node: Option<String>,
    /// Place on the Mode7 ground plane (world units) instead of the 2D scene
    #[serde(default)]
    pub is_mode7: bool,
}

/// A numeric text entity (score display)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitmapTextSpawn {
    pub name: String,
    #[serde(default)]
    pub position: SpawnPosition,
    #[serde(default)]
    pub initial_score: u32,
    #[serde(default)]
    pub parent_node: Option<String>,
    /// Font strip; the configured font when absent
    #[serde(default)]
    pub texture_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnRequest {
    Custom(CustomSpawn),
    BitmapText(BitmapTextSpawn),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SceneOperation {
    Create { name: String },
    Delete { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NodeOperation {
    AddNode {
        name: String,
        #[serde(default)]
        parent: Option<String>,
    },
    RemoveNode {
        name: String,
        /// Move the children up instead of removing them
        #[serde(default)]
        reparent: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPayload {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchScenePayload {
    pub scene: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSwitchPayload {
    pub mode7: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TexturesPayload {
    pub ground_texture: String,
    pub sky_texture: String,
}

/// One mutation or query from the editor
#[derive(Debug, Clone, PartialEq)]
pub enum ControlRequest {
    Spawn(SpawnRequest),
    RequestNodes,
    RequestScenes,
    Scene(SceneOperation),
    Node(NodeOperation),
    SaveScene { path: String },
    LoadScene { path: String },
    SwitchScene { scene: String },
    SetMode7(bool),
    Retexture { ground: String, sky: String },
}

fn payload<T: DeserializeOwned>(request: &'static str, value: serde_json::Value) -> Result<T, ControlError> {
    serde_json::from_value(value).map_err(|source| ControlError::Malformed { request, source })
}

impl ControlRequest {
    /// Build a request from its name (the stem of its flag file) and payload
    pub fn decode(name: &str, value: serde_json::Value) -> Result<Self, ControlError> {
        let request = match name {
            "spawn" => ControlRequest::Spawn(payload("spawn", value)?),
            "request_nodes" => ControlRequest::RequestNodes,
            "request_scenes" => ControlRequest::RequestScenes,
            "scene_operation" => ControlRequest::Scene(payload("scene_operation", value)?),
            "node_operation" => ControlRequest::Node(payload("node_operation", value)?),
            "save_scene" => {
                let p: PathPayload = payload("save_scene", value)?;
                ControlRequest::SaveScene { path: p.path }
            }
            "load_scene" => {
                let p: PathPayload = payload("load_scene", value)?;
                ControlRequest::LoadScene { path: p.path }
            }
            "switch_scene" => {
                let p: SwitchScenePayload = payload("switch_scene", value)?;
                ControlRequest::SwitchScene { scene: p.scene }
            }
            "mode_switch" => {
                let p: ModeSwitchPayload = payload("mode_switch", value)?;
                ControlRequest::SetMode7(p.mode7)
            }
            "mode7_textures" => {
                let p: TexturesPayload = payload("mode7_textures", value)?;
                ControlRequest::Retexture {
                    ground: p.ground_texture,
                    sky: p.sky_texture,
                }
            }
            other => return Err(ControlError::UnknownRequest(other.to_string())),
        };
        Ok(request)
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            ControlRequest::Spawn(_) => "spawn",
            ControlRequest::RequestNodes => "request_nodes",
            ControlRequest::RequestScenes => "request_scenes",
            ControlRequest::Scene(_) => "scene_operation",
            ControlRequest::Node(_) => "node_operation",
            ControlRequest::SaveScene { .. } => "save_scene",
            ControlRequest::LoadScene { .. } => "load_scene",
            ControlRequest::SwitchScene { .. } => "switch_scene",
            ControlRequest::SetMode7(_) => "mode_switch",
            ControlRequest::Retexture { .. } => "mode7_textures",
        }
    }
}

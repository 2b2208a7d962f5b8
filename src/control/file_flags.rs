//! File-flag transport
//!
//! The editor requests an action by writing a payload file and then an
//! empty `.flag` marker next to it. The engine reads the payload, removes
//! both files and acts. State goes the other way as JSON files that are
//! written to a temporary name and renamed into place, so the editor never
//! sees half a file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::snapshot::{ActiveScenePayload, ClickPayload, SpawnErrorPayload, StateSnapshot};
use super::{ControlError, ControlRequest, ControlStatus, ControlTransport};

const RUNNING_FLAG: &str = "running.flag";
const PLACEMENT_FLAG: &str = "placement_mode.flag";
const COLLIDERS_FLAG: &str = "show_colliders.flag";
const CLICK_FLAG: &str = "click_event.flag";
const CLICK_FILE: &str = "click_event.json";
const SPAWN_ERROR_FILE: &str = "spawn_error.json";
const ACTIVE_SCENE_FILE: &str = "active_scene.json";
const SCENES_FILE: &str = "available_scenes.json";
const NODES_FILE: &str = "available_nodes.json";
/// Shared by the save and load markers
const SCENE_PATH_FILE: &str = "load_scene.json";

#[derive(Debug, Clone)]
pub struct FileFlagTransport {
    dir: PathBuf,
}

impl FileFlagTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> ControlError {
        ControlError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    /// Delete a file, treating "already gone" as success
    fn remove(&self, name: &str) -> Result<(), ControlError> {
        let path = self.resolve(name);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }

    fn write_atomic(&self, name: &str, data: &[u8]) -> Result<(), ControlError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;
        let path = self.resolve(name);
        let tmp = self.resolve(&format!("{}.tmp", name));
        std::fs::write(&tmp, data).map_err(|e| Self::io_error(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Self::io_error(&path, e))
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), ControlError> {
        let json = serde_json::to_vec_pretty(value).map_err(|source| ControlError::Malformed {
            request: "publish",
            source,
        })?;
        self.write_atomic(name, &json)
    }

    fn read_request(&self, name: &str, request: &'static str) -> Result<ControlRequest, ControlError> {
        let path = self.resolve(name);
        let text = std::fs::read_to_string(&path).map_err(|e| Self::io_error(&path, e))?;
        let value = serde_json::from_str(&text)
            .map_err(|source| ControlError::Malformed { request, source })?;
        ControlRequest::decode(request, value)
    }

    /// If `marker` is present, decode `payload` and consume both files
    fn take(
        &self,
        marker: &str,
        payload: &str,
        request: &'static str,
    ) -> Option<Result<ControlRequest, ControlError>> {
        if !self.exists(marker) {
            return None;
        }
        let parsed = self.read_request(payload, request);
        let cleanup = self.remove(marker).and_then(|_| self.remove(payload));
        if let Err(e) = cleanup {
            log::warn!("{}", e);
        }
        Some(parsed)
    }

    fn take_marker(&self, marker: &str) -> bool {
        if !self.exists(marker) {
            return false;
        }
        if let Err(e) = self.remove(marker) {
            log::warn!("{}", e);
        }
        true
    }

    /// Save and load share one payload file, so it is only removed once
    /// both markers have been read
    fn take_scene_paths(&self, out: &mut Vec<Result<ControlRequest, ControlError>>) {
        let mut seen = false;
        for request in ["save_scene", "load_scene"] {
            if self.take_marker(&format!("{}.flag", request)) {
                seen = true;
                out.push(self.read_request(SCENE_PATH_FILE, request));
            }
        }
        if seen {
            if let Err(e) = self.remove(SCENE_PATH_FILE) {
                log::warn!("{}", e);
            }
        }
    }
}

impl ControlTransport for FileFlagTransport {
    fn open(&mut self) -> Result<(), ControlError> {
        self.write_atomic(RUNNING_FLAG, b"")?;
        log::info!("control channel open in {}", self.dir.display());
        Ok(())
    }

    fn poll(&mut self) -> Vec<Result<ControlRequest, ControlError>> {
        let mut out = Vec::new();

        if let Some(r) = self.take("spawn_object.flag", "temp_object.json", "spawn") {
            out.push(r);
        }
        if self.take_marker("request_nodes.flag") {
            out.push(Ok(ControlRequest::RequestNodes));
        }
        if self.take_marker("request_scenes.flag") {
            out.push(Ok(ControlRequest::RequestScenes));
        }
        for request in ["scene_operation", "node_operation"] {
            let (marker, payload) = (format!("{}.flag", request), format!("{}.json", request));
            if let Some(r) = self.take(&marker, &payload, request) {
                out.push(r);
            }
        }
        self.take_scene_paths(&mut out);
        for request in ["switch_scene", "mode_switch", "mode7_textures"] {
            let (marker, payload) = (format!("{}.flag", request), format!("{}.json", request));
            if let Some(r) = self.take(&marker, &payload, request) {
                out.push(r);
            }
        }
        out
    }

    fn publish(&mut self, snapshot: &StateSnapshot) -> Result<(), ControlError> {
        if let Some(scene) = &snapshot.active_scene {
            self.write_json(ACTIVE_SCENE_FILE, &ActiveScenePayload { scene: scene.clone() })?;
        }
        self.write_json(SCENES_FILE, &snapshot.scenes_payload())?;
        self.write_json(NODES_FILE, &snapshot.nodes)
    }

    fn report_spawn_error(&mut self, message: &str) -> Result<(), ControlError> {
        self.write_json(
            SPAWN_ERROR_FILE,
            &SpawnErrorPayload {
                error: message.to_string(),
            },
        )
    }

    fn status(&mut self) -> ControlStatus {
        ControlStatus {
            placement_mode: self.exists(PLACEMENT_FLAG),
            show_colliders: self.exists(COLLIDERS_FLAG),
        }
    }

    fn publish_click(&mut self, x: i32, y: i32) -> Result<(), ControlError> {
        self.write_json(CLICK_FILE, &ClickPayload { x, y })?;
        self.write_atomic(CLICK_FLAG, b"")
    }

    fn close(&mut self) -> Result<(), ControlError> {
        self.remove(RUNNING_FLAG)?;
        log::info!("control channel closed");
        Ok(())
    }
}

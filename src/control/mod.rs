//! Control channel
//!
//! An external editor drives the engine through a [`ControlTransport`]:
//! the engine polls it once per frame for requests, and publishes state
//! snapshots, click events and spawn errors back through it.
//!
//! Two transports exist. [`FileFlagTransport`] talks through marker and
//! payload files in a shared directory; [`ChannelTransport`] carries the
//! same requests over in-process channels, fed by the stdin [`console`].

mod channel;
pub mod console;
mod file_flags;
pub mod request;
mod snapshot;

pub use channel::{ChannelTransport, ControlEvent, ControlHandle};
pub use file_flags::FileFlagTransport;
pub use request::{BitmapTextSpawn, ControlRequest, CustomSpawn, NodeOperation, SceneOperation, SpawnRequest};
pub use snapshot::StateSnapshot;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("control file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {request} payload: {source}")]
    Malformed {
        request: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown control request '{0}'")]
    UnknownRequest(String),
    #[error("control channel disconnected")]
    Disconnected,
}

impl ControlError {
    /// Whether the failed request was a spawn, which also reports back to the editor
    pub fn is_spawn(&self) -> bool {
        matches!(self, ControlError::Malformed { request: "spawn", .. })
    }
}

/// Editor-side toggles, read every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControlStatus {
    pub placement_mode: bool,
    pub show_colliders: bool,
}

pub trait ControlTransport {
    /// Announce that the engine is running
    fn open(&mut self) -> Result<(), ControlError> {
        Ok(())
    }

    /// Every request that arrived since the last poll. Each request is
    /// consumed even when it fails to parse.
    fn poll(&mut self) -> Vec<Result<ControlRequest, ControlError>>;

    /// Publish the scene list, active scene and hierarchy
    fn publish(&mut self, snapshot: &StateSnapshot) -> Result<(), ControlError>;

    fn report_spawn_error(&mut self, message: &str) -> Result<(), ControlError>;

    fn status(&mut self) -> ControlStatus;

    /// A left click while in placement mode, in screen pixels
    fn publish_click(&mut self, x: i32, y: i32) -> Result<(), ControlError>;

    fn close(&mut self) -> Result<(), ControlError> {
        Ok(())
    }
}

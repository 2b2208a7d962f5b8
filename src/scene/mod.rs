//! Scenes
//!
//! A scene is a named tree of entities. The [`SceneManager`] owns every
//! scene and tracks which one is active; the frame driver only ever updates
//! and draws the active scene.
//!
//! - `tree` - arena-backed parent/child hierarchy
//! - `manager` - scene registry and active scene
//! - `persistence` - JSON scene files

pub mod manager;
pub mod persistence;
pub mod tree;

use thiserror::Error;

pub use manager::SceneManager;
pub use persistence::{
    build_entity, load_scene, save_scene, ComponentRecords, LoadContext, PathRecord, PersistenceError,
};
pub use tree::NodeInfo;

/// Structural errors. Returned to the caller, never fatal to the loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("scene '{0}' already exists")]
    DuplicateScene(String),
    #[error("no scene named '{0}'")]
    UnknownScene(String),
    #[error("cannot remove the active scene '{0}'")]
    ActiveScene(String),
    #[error("no node {0}")]
    UnknownNode(String),
    #[error("a node named '{0}' already exists")]
    DuplicateNode(String),
    #[error("tree already has a root")]
    RootExists,
    #[error("the root node cannot be removed or moved")]
    RootImmutable,
    #[error("moving {node} under {parent} would create a cycle")]
    WouldCycle { node: String, parent: String },
    #[error("no active scene")]
    NoActiveScene,
}

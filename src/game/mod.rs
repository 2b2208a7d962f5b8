//! Game Foundation Module
//!
//! Entities, their behaviour components, and the scripts that drive them.
//!
//! Key concepts:
//! - Entity: named container of at most one component per kind, owns its position
//! - Component: closed set of behaviours (texture, collision, script, bitmap text, hover)
//! - Script: per-frame logic selected from a fixed registry
//! - Event: commands scripts send back to the frame driver
//!
//! Design philosophy:
//! - Simple over flexible (the component set is known at compile time)
//! - No runtime type registration, no downcasting

pub mod entity;
pub mod component;
pub mod components;
pub mod event;
pub mod scripts;

pub use entity::{Entity, EntityIds};
pub use event::{EventQueue, ScriptCommand};
pub use scripts::ScriptKind;

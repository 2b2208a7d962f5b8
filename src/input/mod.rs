//! Input handling
//!
//! Provides an action-based input system. The keyboard is polled once per
//! frame into an [`InputState`] snapshot; game code only ever sees actions.

mod actions;
mod state;

pub use actions::*;
pub use state::*;

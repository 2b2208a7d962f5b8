//! Texture resource management
//!
//! Textures are loaded once per path and handed out as shared [`TextureHandle`]s.
//! The [`TextureCache`] is constructed at start-up, passed by reference to
//! whoever needs to load textures, and released once at shutdown. Callers
//! never free a shared texture themselves.

mod cache;

pub use cache::{TextureCache, TextureHandle};

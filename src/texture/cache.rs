//! Path-keyed texture cache

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::rasterizer::{Texture, TextureError};

/// Shared, immutable texture. Cloning the handle never copies pixels.
pub type TextureHandle = Rc<Texture>;

/// Cache of loaded textures keyed by the path they were requested with
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: HashMap<String, TextureHandle>,
    /// Relative paths are resolved against this directory
    base_dir: PathBuf,
}

impl TextureCache {
    /// Create a cache rooted at the current directory
    pub fn new() -> Self {
        Self::with_base_dir(".")
    }

    /// Create a cache with a custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    /// Load a texture, or return the cached handle if this path was loaded before
    pub fn load(&mut self, path: &str) -> Result<TextureHandle, TextureError> {
        if let Some(handle) = self.textures.get(path) {
            return Ok(Rc::clone(handle));
        }

        let texture = Texture::from_file(self.resolve(path))?;
        log::debug!("loaded texture {} ({}x{})", path, texture.width, texture.height);
        Ok(self.insert(path, texture))
    }

    /// Register a texture under `path`
    pub fn insert(&mut self, path: &str, texture: Texture) -> TextureHandle {
        let handle = Rc::new(texture.with_name(path));
        self.textures.insert(path.to_string(), Rc::clone(&handle));
        handle
    }

    /// Release every cached texture. Returns how many were released.
    /// Outstanding handles stay valid until their owners drop them.
    pub fn release_all(&mut self) -> usize {
        let count = self.textures.len();
        self.textures.clear();
        log::info!("released {} cached textures", count);
        count
    }
}

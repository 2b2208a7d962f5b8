use crate::config::ScriptSettings;
use crate::game::component::Behavior;
use crate::game::scripts::{Script, ScriptKind};

/// Holds one script instance and the path it was created from
#[derive(Debug)]
pub struct ScriptComponent {
    path: String,
    script: Box<dyn Script>,
    position: (i32, i32),
}

impl ScriptComponent {
    pub fn new(path: impl Into<String>, script: Box<dyn Script>) -> Self {
        Self {
            path: path.into(),
            script,
            position: (0, 0),
        }
    }

    /// Resolve the script kind from a file path such as `scripts/MovementScript.cpp`.
    /// Returns `None` for unknown scripts.
    pub fn from_path(path: &str, settings: &ScriptSettings) -> Option<Self> {
        let kind = ScriptKind::from_path(path)?;
        Some(Self::new(path, kind.create(settings)))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ScriptKind {
        self.script.kind()
    }

    pub fn script_mut(&mut self) -> &mut dyn Script {
        self.script.as_mut()
    }
}

impl Behavior for ScriptComponent {
    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }
}

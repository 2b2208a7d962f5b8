//! Game action definitions

/// All actions the engine reacts to
///
/// Keyboard mapping:
/// - Arrows / WASD = Move
/// - Q / E = Turn (Mode7)
/// - Enter / Space = Interact (scripts)
/// - M = Toggle render mode (debug)
/// - C = Toggle collider overlay
/// - F1 = Launch the external editor
/// - Escape = Quit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    // Movement
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,

    // Mode7 camera
    TurnLeft,
    TurnRight,

    // Scripts
    Interact,

    // Debug / tooling
    ToggleMode,
    ToggleColliders,
    LaunchEditor,

    // System
    Quit,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Interact,
        Action::ToggleMode,
        Action::ToggleColliders,
        Action::LaunchEditor,
        Action::Quit,
    ];
}

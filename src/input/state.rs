//! Input state snapshot
//!
//! Polls the keyboard and mouse (macroquad) once per frame into plain data,
//! so everything downstream can be driven without a window in tests.

use std::collections::BTreeSet;

use macroquad::prelude::{
    is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};

use super::Action;

/// One frame's worth of input
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held
    down: BTreeSet<Action>,
    /// Actions that went down this frame (edge-triggered)
    pressed: BTreeSet<Action>,
    /// Mouse position in window coordinates
    pub mouse: (f32, f32),
    /// Left button went down this frame
    pub clicked: bool,
}

impl InputState {
    /// Read the keyboard and mouse. Call once per frame.
    pub fn poll() -> Self {
        let mut state = Self::default();
        for action in Action::ALL {
            if keys_for(action).iter().any(|&k| is_key_down(k)) {
                state.down.insert(action);
            }
            if keys_for(action).iter().any(|&k| is_key_pressed(k)) {
                state.pressed.insert(action);
            }
        }
        state.mouse = mouse_position();
        state.clicked = is_mouse_button_pressed(MouseButton::Left);
        state
    }

    /// Check if action is currently held down
    pub fn action_down(&self, action: Action) -> bool {
        self.down.contains(&action)
    }

    /// Check if action was just pressed this frame
    pub fn action_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}

#[cfg(test)]
impl InputState {
    /// Snapshot with the given actions held (pressed this frame as well)
    pub fn with_down(actions: &[Action]) -> Self {
        let mut state = Self::held(actions);
        state.pressed.extend(actions.iter().copied());
        state
    }

    /// Snapshot with the given actions held but not newly pressed
    pub fn held(actions: &[Action]) -> Self {
        let mut state = Self::default();
        state.down.extend(actions.iter().copied());
        state
    }
}

fn keys_for(action: Action) -> &'static [KeyCode] {
    match action {
        Action::MoveForward => &[KeyCode::Up, KeyCode::W],
        Action::MoveBackward => &[KeyCode::Down, KeyCode::S],
        Action::MoveLeft => &[KeyCode::Left, KeyCode::A],
        Action::MoveRight => &[KeyCode::Right, KeyCode::D],
        Action::TurnLeft => &[KeyCode::Q],
        Action::TurnRight => &[KeyCode::E],
        Action::Interact => &[KeyCode::Enter, KeyCode::Space],
        Action::ToggleMode => &[KeyCode::M],
        Action::ToggleColliders => &[KeyCode::C],
        Action::LaunchEditor => &[KeyCode::F1],
        Action::Quit => &[KeyCode::Escape],
    }
}

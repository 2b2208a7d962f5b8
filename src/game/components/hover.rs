use std::f32::consts::TAU;

use crate::game::component::Behavior;

/// Sinusoidal vertical bob
#[derive(Debug, Clone)]
pub struct HoverComponent {
    amplitude: f32,
    /// Cycles per second
    frequency: f32,
    elapsed: f32,
    position: (i32, i32),
}

impl HoverComponent {
    pub fn new(amplitude: f32, frequency: f32) -> Self {
        Self {
            amplitude,
            frequency,
            elapsed: 0.0,
            position: (0, 0),
        }
    }

    /// Upward render offset for the current phase
    pub fn offset(&self) -> f32 {
        self.amplitude * (TAU * self.frequency * self.elapsed).sin()
    }
}

impl Behavior for HoverComponent {
    fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn position(&self) -> (i32, i32) {
        self.position
    }

    fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.frequency > 0.0 {
            // wrap to one period
            self.elapsed %= 1.0 / self.frequency;
        }
    }
}

//! Event System
//!
//! Scripts do not reach into the scene manager or the renderer. They send
//! commands into a queue that the frame driver drains after the update pass.

use crate::app::RenderMode;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    /// Check if there are any events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events in queue
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests a script makes of the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Make the named scene active
    SwitchScene(String),
    /// Change the render mode
    SetRenderMode(RenderMode),
}

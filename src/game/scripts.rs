//! Built-in scripts
//!
//! Scripts are chosen by name from a fixed registry. A scene file refers to
//! a script by path (e.g. `scripts/Mode7TimerScript.cpp`); the file stem is
//! normalised to an identifier such as `mode7_timer` and looked up in
//! [`ScriptKind`]. Each kind maps to a factory that builds the behaviour
//! from the shared [`ScriptSettings`].
//!
//! Scripts never touch the scene manager or the renderer. They read a
//! [`ScriptContext`], may move their entity or pick an animation, and send
//! [`ScriptCommand`]s for the frame driver to apply after the update pass.

use std::fmt;
use std::path::Path;

use super::event::{EventQueue, ScriptCommand};
use crate::app::RenderMode;
use crate::config::ScriptSettings;
use crate::input::{Action, InputState};

/// Everything a script may read or change during one update
pub struct ScriptContext<'a> {
    pub dt: f32,
    pub input: &'a InputState,
    pub mode: RenderMode,
    /// Name of the owning entity
    pub entity: &'a str,
    /// Entity position; written back after the script runs
    pub position: (i32, i32),
    /// Animation to select on the entity's texture, if any
    pub animation: Option<&'static str>,
    pub commands: &'a mut EventQueue<ScriptCommand>,
}

pub trait Script: fmt::Debug {
    fn kind(&self) -> ScriptKind;
    fn update(&mut self, ctx: &mut ScriptContext<'_>);
}

type ScriptFactory = fn(&ScriptSettings) -> Box<dyn Script>;

/// The closed set of scripts the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Movement,
    Debug,
    SceneTransition,
    SceneTransitionReturn,
    Mode7Enabler,
    Mode7Timer,
    Mode7DelayTimer,
    TimerTransition,
}

impl ScriptKind {
    pub const ALL: [ScriptKind; 8] = [
        ScriptKind::Movement,
        ScriptKind::Debug,
        ScriptKind::SceneTransition,
        ScriptKind::SceneTransitionReturn,
        ScriptKind::Mode7Enabler,
        ScriptKind::Mode7Timer,
        ScriptKind::Mode7DelayTimer,
        ScriptKind::TimerTransition,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            ScriptKind::Movement => "movement",
            ScriptKind::Debug => "debug",
            ScriptKind::SceneTransition => "scene_transition",
            ScriptKind::SceneTransitionReturn => "scene_transition_return",
            ScriptKind::Mode7Enabler => "mode7_enabler",
            ScriptKind::Mode7Timer => "mode7_timer",
            ScriptKind::Mode7DelayTimer => "mode7_delay_timer",
            ScriptKind::TimerTransition => "timer_transition",
        }
    }

    pub fn from_identifier(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.identifier() == id)
    }

    /// Resolve a script file path to its kind
    pub fn from_path(path: &str) -> Option<Self> {
        let stem = Path::new(path).file_stem()?.to_str()?;
        let snake = to_snake_case(stem).replace('-', "_");
        let id = snake.strip_suffix("_script").unwrap_or(&snake);
        Self::from_identifier(id)
    }

    fn factory(self) -> ScriptFactory {
        match self {
            ScriptKind::Movement => new_movement,
            ScriptKind::Debug => new_debug,
            ScriptKind::SceneTransition => new_scene_transition,
            ScriptKind::SceneTransitionReturn => new_scene_transition_return,
            ScriptKind::Mode7Enabler => new_mode7_enabler,
            ScriptKind::Mode7Timer => new_mode7_timer,
            ScriptKind::Mode7DelayTimer => new_mode7_delay_timer,
            ScriptKind::TimerTransition => new_timer_transition,
        }
    }

    pub fn create(self, settings: &ScriptSettings) -> Box<dyn Script> {
        (self.factory())(settings)
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

fn new_movement(s: &ScriptSettings) -> Box<dyn Script> {
    Box::new(MovementScript::new(s.movement_speed))
}

fn new_debug(s: &ScriptSettings) -> Box<dyn Script> {
    Box::new(DebugScript::new(s.debug_interval))
}

fn new_scene_transition(s: &ScriptSettings) -> Box<dyn Script> {
    Box::new(SceneTransitionScript::new(ScriptKind::SceneTransition, &s.transition_target))
}

fn new_scene_transition_return(s: &ScriptSettings) -> Box<dyn Script> {
    Box::new(SceneTransitionScript::new(ScriptKind::SceneTransitionReturn, &s.return_target))
}

fn new_mode7_enabler(_: &ScriptSettings) -> Box<dyn Script> {
    Box::new(Mode7EnablerScript)
}

fn new_mode7_timer(s: &ScriptSettings) -> Box<dyn Script> {
    Box::new(Mode7TimerScript::new(s.mode7_timer_secs))
}

fn new_mode7_delay_timer(s: &ScriptSettings) -> Box<dyn Script> {
    Box::new(Mode7DelayTimerScript::new(s.mode7_delay_secs))
}

fn new_timer_transition(s: &ScriptSettings) -> Box<dyn Script> {
    Box::new(TimerTransitionScript::new(s.timer_transition_secs, &s.timer_transition_target))
}

/// `Mode7DelayTimer` -> `mode7_delay_timer`
fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if matches!(prev, Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

// =============================================================================
// Movement
// =============================================================================

/// Moves the entity with the direction keys and picks a matching animation
#[derive(Debug)]
pub struct MovementScript {
    /// Pixels per second
    speed: f32,
    /// Sub-pixel remainder carried between frames
    carry: (f32, f32),
}

impl MovementScript {
    pub fn new(speed: f32) -> Self {
        Self { speed, carry: (0.0, 0.0) }
    }
}

impl Script for MovementScript {
    fn kind(&self) -> ScriptKind {
        ScriptKind::Movement
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        let input = ctx.input;
        let mut dir = (0.0f32, 0.0f32);
        if input.action_down(Action::MoveLeft) {
            dir.0 -= 1.0;
        }
        if input.action_down(Action::MoveRight) {
            dir.0 += 1.0;
        }
        if input.action_down(Action::MoveForward) {
            dir.1 -= 1.0;
        }
        if input.action_down(Action::MoveBackward) {
            dir.1 += 1.0;
        }

        ctx.animation = Some(if dir.1 < 0.0 {
            "forward"
        } else if dir.1 > 0.0 {
            "backward"
        } else if dir.0 < 0.0 {
            "left"
        } else if dir.0 > 0.0 {
            "right"
        } else {
            "idle"
        });

        let step = self.speed * ctx.dt;
        self.carry.0 += dir.0 * step;
        self.carry.1 += dir.1 * step;
        let whole = (self.carry.0.trunc(), self.carry.1.trunc());
        self.carry.0 -= whole.0;
        self.carry.1 -= whole.1;
        ctx.position.0 += whole.0 as i32;
        ctx.position.1 += whole.1 as i32;
    }
}

// =============================================================================
// Debug
// =============================================================================

/// Logs the entity position at a fixed interval
#[derive(Debug)]
pub struct DebugScript {
    interval: f32,
    elapsed: f32,
}

impl DebugScript {
    pub fn new(interval: f32) -> Self {
        Self { interval, elapsed: 0.0 }
    }
}

impl Script for DebugScript {
    fn kind(&self) -> ScriptKind {
        ScriptKind::Debug
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        self.elapsed += ctx.dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            log::debug!(
                "{} at ({}, {}) in {:?}",
                ctx.entity,
                ctx.position.0,
                ctx.position.1,
                ctx.mode
            );
        }
    }
}

// =============================================================================
// Scene transitions
// =============================================================================

/// Switches to a fixed scene when Interact is pressed
#[derive(Debug)]
pub struct SceneTransitionScript {
    kind: ScriptKind,
    target: String,
}

impl SceneTransitionScript {
    pub fn new(kind: ScriptKind, target: &str) -> Self {
        Self { kind, target: target.to_string() }
    }
}

impl Script for SceneTransitionScript {
    fn kind(&self) -> ScriptKind {
        self.kind
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        if ctx.input.action_pressed(Action::Interact) {
            log::info!("{}: switching to scene '{}'", ctx.entity, self.target);
            ctx.commands.send(ScriptCommand::SwitchScene(self.target.clone()));
        }
    }
}

/// Switches to a fixed scene once, after a delay
#[derive(Debug)]
pub struct TimerTransitionScript {
    secs: f32,
    elapsed: f32,
    target: String,
    fired: bool,
}

impl TimerTransitionScript {
    pub fn new(secs: f32, target: &str) -> Self {
        Self {
            secs,
            elapsed: 0.0,
            target: target.to_string(),
            fired: false,
        }
    }
}

impl Script for TimerTransitionScript {
    fn kind(&self) -> ScriptKind {
        ScriptKind::TimerTransition
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        if self.fired {
            return;
        }
        self.elapsed += ctx.dt;
        if self.elapsed >= self.secs {
            self.fired = true;
            ctx.commands.send(ScriptCommand::SwitchScene(self.target.clone()));
        }
    }
}

// =============================================================================
// Render mode scripts
// =============================================================================

/// Enters Mode7 when Interact is pressed in 2D
#[derive(Debug)]
pub struct Mode7EnablerScript;

impl Script for Mode7EnablerScript {
    fn kind(&self) -> ScriptKind {
        ScriptKind::Mode7Enabler
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        if ctx.mode == RenderMode::Mode2D && ctx.input.action_pressed(Action::Interact) {
            ctx.commands.send(ScriptCommand::SetRenderMode(RenderMode::Mode7));
        }
    }
}

/// Enters Mode7 after `secs` of continuous 2D play
#[derive(Debug)]
pub struct Mode7TimerScript {
    secs: f32,
    elapsed: f32,
}

impl Mode7TimerScript {
    pub fn new(secs: f32) -> Self {
        Self { secs, elapsed: 0.0 }
    }
}

impl Script for Mode7TimerScript {
    fn kind(&self) -> ScriptKind {
        ScriptKind::Mode7Timer
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        if ctx.mode != RenderMode::Mode2D {
            self.elapsed = 0.0;
            return;
        }
        self.elapsed += ctx.dt;
        if self.elapsed >= self.secs {
            self.elapsed = 0.0;
            ctx.commands.send(ScriptCommand::SetRenderMode(RenderMode::Mode7));
        }
    }
}

/// Returns to 2D after `secs` in Mode7
#[derive(Debug)]
pub struct Mode7DelayTimerScript {
    secs: f32,
    elapsed: f32,
}

impl Mode7DelayTimerScript {
    pub fn new(secs: f32) -> Self {
        Self { secs, elapsed: 0.0 }
    }
}

impl Script for Mode7DelayTimerScript {
    fn kind(&self) -> ScriptKind {
        ScriptKind::Mode7DelayTimer
    }

    fn update(&mut self, ctx: &mut ScriptContext<'_>) {
        if ctx.mode != RenderMode::Mode7 {
            self.elapsed = 0.0;
            return;
        }
        self.elapsed += ctx.dt;
        if self.elapsed >= self.secs {
            self.elapsed = 0.0;
            ctx.commands.send(ScriptCommand::SetRenderMode(RenderMode::Mode2D));
        }
    }
}

//! Frame driver
//!
//! Owns the engine services (id allocator, scenes, texture cache, Mode7
//! renderer, control transport) and advances them one frame at a time.
//! The window loop in `main` only polls input, calls [`App::frame`] and
//! paces the result.

mod editor;
mod requests;
mod timing;

pub use editor::EditorLauncher;
pub use timing::{FpsCounter, FrameLimiter};

use crate::config::EngineConfig;
use crate::control::{ControlError, ControlRequest, ControlStatus, ControlTransport, StateSnapshot};
use crate::game::{EntityIds, EventQueue, ScriptCommand};
use crate::input::{Action, InputState};
use crate::mode7::Mode7Renderer;
use crate::rasterizer::{Color, Surface, WIDTH};
use crate::scene::SceneManager;
use crate::texture::TextureCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Mode2D,
    Mode7,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Mode2D => RenderMode::Mode7,
            RenderMode::Mode7 => RenderMode::Mode2D,
        }
    }
}

pub struct App {
    config: EngineConfig,
    ids: EntityIds,
    scenes: SceneManager,
    textures: TextureCache,
    mode7: Mode7Renderer,
    mode: RenderMode,
    transport: Option<Box<dyn ControlTransport>>,
    status: ControlStatus,
    fps: FpsCounter,
    commands: EventQueue<ScriptCommand>,
    last_snapshot: Option<StateSnapshot>,
    publish_requested: bool,
    show_colliders: bool,
    editor: EditorLauncher,
    running: bool,
}

impl App {
    /// Engine with the configured start scene created and active
    pub fn new(config: EngineConfig) -> Self {
        let mut ids = EntityIds::new();
        let mut scenes = SceneManager::new();
        if let Err(e) = scenes.create_scene(&config.start_scene, &mut ids) {
            log::error!("{}", e);
        }
        if let Err(e) = scenes.set_active(&config.start_scene) {
            log::error!("{}", e);
        }
        Self {
            mode7: Mode7Renderer::new(config.mode7.clone()),
            editor: EditorLauncher::new(config.editor.command.clone()),
            ids,
            scenes,
            textures: TextureCache::new(),
            mode: RenderMode::Mode2D,
            transport: None,
            status: ControlStatus::default(),
            fps: FpsCounter::new(),
            commands: EventQueue::new(),
            last_snapshot: None,
            publish_requested: true,
            show_colliders: false,
            running: true,
            config,
        }
    }

    pub fn with_transport(mut self, transport: Box<dyn ControlTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Open the control channel
    pub fn startup(&mut self) {
        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.open() {
                log::error!("{}", e);
            }
        }
        log::info!(
            "engine started: scene '{}', {} fps target",
            self.scenes.active_name().unwrap_or("-"),
            self.config.target_fps
        );
    }

    /// Close the control channel and release every cached texture
    pub fn shutdown(&mut self) {
        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.close() {
                log::warn!("{}", e);
            }
        }
        let released = self.textures.release_all();
        log::info!("shutdown: released {} textures", released);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switch immediately. The other mode keeps its state; Mode7 is
    /// initialized the first time it is entered.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode == RenderMode::Mode7 && !self.mode7.is_running() {
            self.mode7.initialize(&mut self.textures, &mut self.ids);
        }
        if self.mode != mode {
            if self.mode == RenderMode::Mode7 {
                log::info!("leaving mode7 with score {}", self.mode7.score());
            }
            log::info!("render mode: {:?}", mode);
            self.mode = mode;
        }
    }

    pub fn show_colliders(&self) -> bool {
        self.show_colliders || self.status.show_colliders
    }

    /// Load and activate a scene file given on the command line
    pub fn load_initial_scene(&mut self, path: &str) {
        if let Err(e) = self.load_scene_file(path) {
            log::error!("{}", e);
        }
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Advance one frame and draw it to `surface`
    pub fn frame(&mut self, input: &InputState, dt: f32, surface: &mut dyn Surface) {
        self.handle_input(input);
        if !self.running {
            return;
        }
        self.process_control();
        self.update_entities(input, dt);
        self.apply_script_commands();

        match self.mode {
            RenderMode::Mode7 => self.frame_mode7(input, dt, surface),
            RenderMode::Mode2D => self.frame_2d(surface),
        }

        self.fps.tick(dt);
        surface.draw_text(&format!("FPS: {}", self.fps.fps()), 8.0, 20.0, 20.0, Color::WHITE);

        self.publish_snapshot();
        self.handle_placement_click(input, surface);
    }

    fn handle_input(&mut self, input: &InputState) {
        if input.action_pressed(Action::Quit) {
            log::info!("quit requested");
            self.running = false;
            return;
        }
        if input.action_pressed(Action::ToggleMode) {
            self.set_mode(self.mode.toggled());
        }
        if input.action_pressed(Action::ToggleColliders) {
            self.show_colliders = !self.show_colliders;
        }
        if input.action_pressed(Action::LaunchEditor) {
            if let Err(e) = self.editor.launch() {
                log::error!("failed to launch editor: {}", e);
            }
        }
    }

    fn process_control(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        self.status = transport.status();
        let requests = transport.poll();

        for request in requests {
            let result = match request {
                Ok(request) => {
                    let label = request.label();
                    let is_spawn = matches!(request, ControlRequest::Spawn(_));
                    log::debug!("control request: {}", label);
                    self.apply_request(request)
                        .map_err(|e| (format!("{} failed: {}", label, e), is_spawn))
                }
                Err(ControlError::Disconnected) => {
                    log::warn!("control channel disconnected");
                    self.transport = None;
                    return;
                }
                Err(e) => Err((e.to_string(), e.is_spawn())),
            };
            if let Err((message, is_spawn)) = result {
                log::error!("{}", message);
                if is_spawn {
                    self.report_spawn_error(&message);
                }
            }
        }
    }

    fn report_spawn_error(&mut self, message: &str) {
        if let Some(transport) = self.transport.as_mut() {
            if let Err(e) = transport.report_spawn_error(message) {
                log::warn!("{}", e);
            }
        }
    }

    fn update_entities(&mut self, input: &InputState, dt: f32) {
        let mode = self.mode;
        let commands = &mut self.commands;
        if let Some(scene) = self.scenes.active_mut() {
            scene.tree_mut().traverse_mut(|_, entity| {
                entity.run_scripts(input, dt, mode, commands);
                entity.tick(dt);
                entity.update();
            });
        }
    }

    fn apply_script_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        log::trace!("{} script commands", self.commands.len());
        let commands: Vec<_> = self.commands.drain().collect();
        for command in commands {
            match command {
                ScriptCommand::SwitchScene(name) => {
                    if let Err(e) = self.scenes.set_active(&name) {
                        log::error!("script scene switch: {}", e);
                    }
                }
                ScriptCommand::SetRenderMode(mode) => self.set_mode(mode),
            }
        }
    }

    fn frame_mode7(&mut self, input: &InputState, dt: f32, surface: &mut dyn Surface) {
        if let Err(e) = self.mode7.update(input, dt, &mut self.ids) {
            log::error!("{}", e);
        }
        let show_colliders = self.show_colliders();
        if let Err(e) = self.mode7.render(surface, show_colliders) {
            log::error!("{}", e);
        }
    }

    fn frame_2d(&mut self, surface: &mut dyn Surface) {
        surface.clear(self.config.background);
        let view_scale = view_scale(surface);
        let show_colliders = self.show_colliders();
        if let Some(scene) = self.scenes.active() {
            scene.tree().traverse(|_, node| {
                node.entity().render(surface, view_scale, show_colliders);
            });
        }
    }

    fn publish_snapshot(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        let snapshot = StateSnapshot::capture(&self.scenes);
        if !self.publish_requested && self.last_snapshot.as_ref() == Some(&snapshot) {
            return;
        }
        if let Err(e) = transport.publish(&snapshot) {
            log::warn!("{}", e);
        }
        self.publish_requested = false;
        self.last_snapshot = Some(snapshot);
    }

    fn handle_placement_click(&mut self, input: &InputState, surface: &dyn Surface) {
        if !self.status.placement_mode || self.mode != RenderMode::Mode2D || !input.clicked {
            return;
        }
        let scale = view_scale(surface);
        let (x, y) = (input.mouse.0 / scale, input.mouse.1 / scale);
        if let Some(transport) = self.transport.as_mut() {
            log::debug!("placement click at ({:.0}, {:.0})", x, y);
            if let Err(e) = transport.publish_click(x.round() as i32, y.round() as i32) {
                log::warn!("{}", e);
            }
        }
    }
}

/// Screen pixels per 2D view pixel
fn view_scale(surface: &dyn Surface) -> f32 {
    let scale = surface.width() / WIDTH as f32;
    if scale > 0.0 {
        scale
    } else {
        1.0
    }
}

//! Engine configuration
//!
//! Loaded from a RON file at start-up. Every section has defaults, so a
//! partial file (or no file at all) is valid.

use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rasterizer::{Color, HEIGHT, WIDTH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Top-level engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frame rate the loop paces itself to (0 = unlocked)
    pub target_fps: u32,
    /// Scene created and activated at start-up
    pub start_scene: String,
    /// Clear color for the 2D path
    pub background: Color,
    pub control: ControlConfig,
    pub editor: EditorConfig,
    pub mode7: Mode7Config,
    pub scripts: ScriptSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            start_scene: "main".to_string(),
            background: Color::new(24, 24, 32),
            control: ControlConfig::default(),
            editor: EditorConfig::default(),
            mode7: Mode7Config::default(),
            scripts: ScriptSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Load `path`, falling back to defaults when it is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}

/// Control channel (editor IPC) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub enabled: bool,
    /// Directory holding the marker and payload files
    pub dir: PathBuf,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("."),
        }
    }
}

/// External editor process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Program and arguments; empty disables the launch key
    pub command: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: vec!["python3".to_string(), "src/object_editor.py".to_string()],
        }
    }
}

/// Mode7 renderer tuning. World units: one ground tile spans 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mode7Config {
    /// Framebuffer resolution
    pub resolution: (usize, usize),

    pub ground_texture: String,
    pub sky_texture: String,
    pub font_texture: String,
    pub player_texture: String,
    pub collectible_texture: String,
    pub hazard_texture: String,

    /// Full horizontal field of view, radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    pub start_position: (f32, f32),
    pub start_angle: f32,
    /// World units per second
    pub move_speed: f32,
    /// Radians per second
    pub turn_speed: f32,
    /// Framebuffer pixels per second added to `x_stat` while strafing
    pub strafe_shift: f32,
    /// Added to `scale_stat` per second while strafing
    pub strafe_depth: f32,
    /// World-y distance of the camera from the player
    pub camera_offset: f32,

    pub spawn_interval: f32,
    pub max_spawn_attempts: u32,
    pub min_spawn_distance: f32,
    pub spawn_radius: f32,
    /// Candidate must differ from the last spawn by more than this on both axes
    pub min_spawn_delta: f32,
    /// Probability that a spawn is a hazard
    pub hazard_chance: f64,

    /// Half-size of the player's world bounding box
    pub player_half_extent: f32,
    /// Half-size of a world object's bounding box
    pub object_half_extent: f32,

    /// Objects whose projected scale falls below this are destroyed
    pub cull_scale: f32,
    pub max_sprite_scale: f32,
    pub player_scale: f32,
    /// Width and height of one player animation frame
    pub player_frame: (u32, u32),

    /// Width and height of one digit glyph in the font strip
    pub glyph_size: (u32, u32),
    pub score_padding: f32,

    pub horizon_color: Color,
    /// Used when the ground texture failed to load
    pub ground_fallback: Color,
    /// Used when the sky texture failed to load
    pub sky_fallback: Color,
}

/// Spawn hazard probability when none (or a non-finite one) is configured
pub const DEFAULT_HAZARD_CHANCE: f64 = 0.3;

impl Default for Mode7Config {
    fn default() -> Self {
        Self {
            resolution: (WIDTH, HEIGHT),
            ground_texture: "assets/images/ground.bmp".to_string(),
            sky_texture: "assets/images/sky.bmp".to_string(),
            font_texture: "assets/images/textspritesheet.bmp".to_string(),
            player_texture: "assets/images/player.bmp".to_string(),
            collectible_texture: "assets/images/capsule.bmp".to_string(),
            hazard_texture: "assets/images/hazard.bmp".to_string(),
            fov: FRAC_PI_2,
            near: 0.005,
            far: 0.03,
            start_position: (0.5, 0.5),
            start_angle: 0.0,
            move_speed: 0.2,
            turn_speed: 1.5,
            strafe_shift: 40.0,
            strafe_depth: 0.005,
            camera_offset: 0.02,
            spawn_interval: 2.0,
            max_spawn_attempts: 5,
            min_spawn_distance: 0.05,
            spawn_radius: 0.3,
            min_spawn_delta: 0.02,
            hazard_chance: DEFAULT_HAZARD_CHANCE,
            player_half_extent: 0.03,
            object_half_extent: 0.03,
            cull_scale: 0.05,
            max_sprite_scale: 4.0,
            player_scale: 1.0,
            player_frame: (32, 32),
            glyph_size: (8, 8),
            score_padding: 8.0,
            horizon_color: Color::WHITE,
            ground_fallback: Color::new(40, 110, 40),
            sky_fallback: Color::new(90, 140, 220),
        }
    }
}

impl Mode7Config {
    pub fn half_fov(&self) -> f32 {
        self.fov * 0.5
    }
}

/// Parameters shared by the built-in scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Pixels per second for the movement script
    pub movement_speed: f32,
    /// Seconds between debug script reports
    pub debug_interval: f32,
    /// Scene the forward transition script switches to
    pub transition_target: String,
    /// Scene the return transition script switches to
    pub return_target: String,
    /// Seconds in 2D before the Mode7 timer switches to Mode7
    pub mode7_timer_secs: f32,
    /// Seconds in Mode7 before the delay timer switches back to 2D
    pub mode7_delay_secs: f32,
    pub timer_transition_secs: f32,
    pub timer_transition_target: String,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            movement_speed: 120.0,
            debug_interval: 1.0,
            transition_target: "scene2".to_string(),
            return_target: "main".to_string(),
            mode7_timer_secs: 5.0,
            mode7_delay_secs: 10.0,
            timer_transition_secs: 3.0,
            timer_transition_target: "main".to_string(),
        }
    }
}

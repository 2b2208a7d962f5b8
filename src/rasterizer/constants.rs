//! Rasterizer constants
//!
//! Screen resolution and other fundamental constants.

/// Mode7 framebuffer width (low-res, scaled up to the window)
pub const WIDTH: usize = 320;

/// Mode7 framebuffer height
pub const HEIGHT: usize = 240;

/// Default window width (2x framebuffer)
pub const WINDOW_WIDTH: i32 = 640;

/// Default window height (2x framebuffer)
pub const WINDOW_HEIGHT: i32 = 480;

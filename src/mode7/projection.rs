//! Scanline ground/sky mapping and sprite projection
//!
//! For every row below the horizon the two frustum edges are sampled at a
//! depth proportional to the row's distance from the horizon, giving the
//! world-space endpoints of that scanline. Columns interpolate linearly
//! between the endpoints. The same world sample colours the ground row below
//! the horizon and the mirrored sky row above it.

use super::camera::{Frustum, Pose};
use crate::rasterizer::{Color, Framebuffer, Texture, Vec2};

/// Wrap into [0, 1). Non-finite input maps to 0.
#[inline]
pub fn wrap_unit(v: f32) -> f32 {
    if !v.is_finite() {
        return 0.0;
    }
    let w = v - v.floor();
    // -tiny - floor(-tiny) rounds to exactly 1.0 in f32
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// Texel index for a wrapped coordinate, always in `[0, dim)`
#[inline]
pub fn texel_coord(unit: f32, dim: usize) -> usize {
    if dim == 0 {
        return 0;
    }
    ((unit * dim as f32) as usize).min(dim - 1)
}

fn sample(texture: Option<&Texture>, fallback: Color, u: f32, v: f32) -> Color {
    match texture {
        Some(t) if !t.pixels.is_empty() => {
            t.get_pixel(texel_coord(u, t.width), texel_coord(v, t.height))
        }
        _ => fallback,
    }
}

/// Ground and sky textures, with flat colours for whichever failed to load
pub struct PlaneTextures<'a> {
    pub ground: Option<&'a Texture>,
    pub sky: Option<&'a Texture>,
    pub ground_fallback: Color,
    pub sky_fallback: Color,
}

/// Fill `fb` with the perspective-mapped ground (lower half) and sky (upper half)
pub fn render_planes(fb: &mut Framebuffer, frustum: &Frustum, planes: &PlaneTextures<'_>) {
    let width = fb.width;
    let half_h = fb.height / 2;
    if width == 0 || half_h == 0 {
        return;
    }

    let near_span = (frustum.near_left, frustum.near_right);
    let far_delta = (
        frustum.far_left - frustum.near_left,
        frustum.far_right - frustum.near_right,
    );

    for y in 0..half_h {
        // row 0 is the horizon itself, where the depth sample is singular
        let d = y.max(1) as f32 / half_h as f32;
        let start = near_span.0 + far_delta.0 * (1.0 / d);
        let end = near_span.1 + far_delta.1 * (1.0 / d);

        let ground_row = half_h + y;
        let sky_row = half_h - y - 1;
        for x in 0..width {
            let world: Vec2 = start.lerp(end, x as f32 / width as f32);
            let (u, v) = (wrap_unit(world.x), wrap_unit(world.y));
            fb.set_pixel(x, ground_row, sample(planes.ground, planes.ground_fallback, u, v));
            fb.set_pixel(x, sky_row, sample(planes.sky, planes.sky_fallback, u, v));
        }
    }

    // odd heights leave one row under the last ground row
    let last = fb.height - 1;
    if last == 2 * half_h {
        for x in 0..width {
            if let Some(color) = fb.get_pixel(x, last - 1) {
                fb.set_pixel(x, last, color);
            }
        }
    }
}

/// Constants of the sprite projection for one frame
#[derive(Debug, Clone, Copy)]
pub struct SpriteParams {
    pub width: f32,
    pub height: f32,
    pub half_fov: f32,
    pub far: f32,
    pub scale_stat: f32,
    pub x_stat: f32,
    pub max_scale: f32,
    pub cull_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projected {
    /// Not drawn this frame
    Culled,
    /// Too small to matter; the object should be removed
    Destroyed,
    /// Anchor point (bottom centre of the sprite) and uniform scale
    Visible { x: f32, y: f32, scale: f32 },
}

/// Project a world object for drawing.
///
/// Depth comes from the object's forward distance plus the strafe-driven
/// `scale_stat` accumulator, divided by the far plane. This is not a true
/// perspective depth; sprites drift with strafing the way the floor does not.
pub fn project_sprite(camera: &Pose, object: Vec2, params: &SpriteParams) -> Projected {
    let (forward, side) = camera.to_local(object);
    let depth = (forward + params.scale_stat) / params.far;
    if depth <= 0.0 || !depth.is_finite() {
        return Projected::Culled;
    }

    let scale = (1.0 / depth).min(params.max_scale);
    if scale < params.cull_scale {
        return Projected::Destroyed;
    }

    let half_w = params.width * 0.5;
    let half_h = params.height * 0.5;
    let lateral = (side / forward.max(1e-4)) / params.half_fov.tan();
    Projected::Visible {
        x: half_w + lateral * half_w + params.x_stat,
        y: half_h + half_h * scale.min(1.0),
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_wrap_edges_stay_in_range() {
        for v in [1.0, -0.0001, 0.0, 0.9999999, -1.0, 7.25, -7.25, f32::NAN, f32::INFINITY] {
            let w = wrap_unit(v);
            assert!((0.0..1.0).contains(&w), "{} -> {}", v, w);
            for dim in [1, 7, 256] {
                assert!(texel_coord(w, dim) < dim);
            }
        }
        assert_eq!(wrap_unit(1.0), 0.0);
        assert!((wrap_unit(-0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_planes_fill_every_row_of_even_buffer() {
        let mut fb = Framebuffer::new(16, 12);
        fb.clear(Color::TRANSPARENT);
        let frustum = Frustum::new(&Pose::new(0.5, 0.5, 0.3), FRAC_PI_4, 0.005, 0.03);
        let ground = Texture::solid(8, 8, Color::GREEN);
        let planes = PlaneTextures {
            ground: Some(&ground),
            sky: None,
            ground_fallback: Color::BLACK,
            sky_fallback: Color::new(255, 0, 0),
        };
        render_planes(&mut fb, &frustum, &planes);
        for y in 0..12 {
            let expected = if y < 6 { Color::new(255, 0, 0) } else { Color::GREEN };
            for x in 0..16 {
                assert_eq!(fb.get_pixel(x, y), Some(expected), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_odd_height_fills_bottom_row() {
        let mut fb = Framebuffer::new(10, 7);
        fb.clear(Color::TRANSPARENT);
        let frustum = Frustum::new(&Pose::new(0.2, 0.4, 0.0), FRAC_PI_4, 0.005, 0.03);
        let tex = Texture::from_fn(16, 16, |x, y| Color::new((x * 16) as u8, (y * 16) as u8, 0));
        let planes = PlaneTextures {
            ground: Some(&tex),
            sky: None,
            ground_fallback: Color::BLACK,
            sky_fallback: Color::new(255, 0, 0),
        };
        render_planes(&mut fb, &frustum, &planes);
        for x in 0..10 {
            assert_ne!(fb.get_pixel(x, 6), Some(Color::TRANSPARENT));
            assert_eq!(fb.get_pixel(x, 6), fb.get_pixel(x, 5));
        }
    }

    #[test]
    fn test_ground_and_sky_rows_mirror() {
        let mut fb = Framebuffer::new(32, 20);
        let frustum = Frustum::new(&Pose::new(0.1, 0.7, 1.0), FRAC_PI_4, 0.005, 0.03);
        let tex = Texture::from_fn(16, 16, |x, y| Color::new((x * 16) as u8, (y * 16) as u8, 0));
        let planes = PlaneTextures {
            ground: Some(&tex),
            sky: Some(&tex),
            ground_fallback: Color::BLACK,
            sky_fallback: Color::BLACK,
        };
        render_planes(&mut fb, &frustum, &planes);
        for y in 0..10 {
            for x in 0..32 {
                assert_eq!(fb.get_pixel(x, 10 + y), fb.get_pixel(x, 10 - y - 1));
            }
        }
    }

    fn params() -> SpriteParams {
        SpriteParams {
            width: 320.0,
            height: 240.0,
            half_fov: FRAC_PI_4,
            far: 0.03,
            scale_stat: 0.0,
            x_stat: 0.0,
            max_scale: 4.0,
            cull_scale: 0.05,
        }
    }

    #[test]
    fn test_object_behind_camera_is_culled() {
        let cam = Pose::new(0.5, 0.5, 0.0);
        assert_eq!(project_sprite(&cam, Vec2::new(0.4, 0.5), &params()), Projected::Culled);
    }

    #[test]
    fn test_distant_object_is_destroyed() {
        let cam = Pose::new(0.0, 0.0, 0.0);
        // depth = 0.9 / 0.03 = 30, scale 1/30 < 0.05
        assert_eq!(project_sprite(&cam, Vec2::new(0.9, 0.0), &params()), Projected::Destroyed);
    }

    #[test]
    fn test_centered_object_projects_to_screen_centre() {
        let cam = Pose::new(0.0, 0.0, 0.0);
        let Projected::Visible { x, scale, .. } = project_sprite(&cam, Vec2::new(0.06, 0.0), &params())
        else {
            panic!("expected visible");
        };
        assert!((x - 160.0).abs() < 1e-3);
        assert!((scale - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_scale_stat_and_x_stat_shift_sprites() {
        let cam = Pose::new(0.0, 0.0, 0.0);
        let mut p = params();
        p.scale_stat = 0.03;
        p.x_stat = 12.0;
        let Projected::Visible { x, scale, .. } = project_sprite(&cam, Vec2::new(0.03, 0.0), &p) else {
            panic!("expected visible");
        };
        assert!((scale - 0.5).abs() < 1e-4);
        assert!((x - 172.0).abs() < 1e-3);
    }

    #[test]
    fn test_near_object_scale_is_clamped() {
        let cam = Pose::new(0.0, 0.0, 0.0);
        let Projected::Visible { scale, .. } = project_sprite(&cam, Vec2::new(0.001, 0.0), &params())
        else {
            panic!("expected visible");
        };
        assert_eq!(scale, 4.0);
    }
}

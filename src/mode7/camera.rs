//! Camera pose and view frustum on the ground plane

use crate::rasterizer::Vec2;

/// Position and facing on the world plane. Angle 0 faces +x.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec2,
    pub angle: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            angle,
        }
    }

    /// Unit facing direction
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Unit direction toward the right edge of the view
    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }

    /// Express a world point as (forward, side) distances from this pose
    pub fn to_local(&self, point: Vec2) -> (f32, f32) {
        let rel = point - self.position;
        (rel.dot(self.forward()), rel.dot(self.right()))
    }
}

/// The four corners where the edge rays cross the near and far planes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub near_left: Vec2,
    pub near_right: Vec2,
    pub far_left: Vec2,
    pub far_right: Vec2,
}

impl Frustum {
    pub fn new(pose: &Pose, half_fov: f32, near: f32, far: f32) -> Self {
        let p = pose.position;
        let left = pose.angle - half_fov;
        let right = pose.angle + half_fov;
        Self {
            near_left: p.polar_offset(left, near),
            near_right: p.polar_offset(right, near),
            far_left: p.polar_offset(left, far),
            far_right: p.polar_offset(right, far),
        }
    }
}

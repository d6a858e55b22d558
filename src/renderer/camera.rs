//! Orthographic camera for the fixed-size world
//!
//! The world is y-up with its origin at the bottom-left. Screens (windows,
//! terminals) are y-down with their origin at the top-left and may be any
//! size; the camera stretches the world over the whole viewport.

use glam::{Mat4, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World size in units
    pub world: Vec2,
    /// Viewport size in screen units (pixels, cells)
    pub viewport: Vec2,
}

impl Camera {
    /// Camera whose viewport matches the world one-to-one
    pub fn new(world_width: f32, world_height: f32) -> Self {
        let world = Vec2::new(world_width, world_height);
        Self {
            world,
            viewport: world,
        }
    }

    /// Resize the viewport. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.viewport = Vec2::new(width, height);
        } else {
            log::warn!("Ignoring viewport size {}x{}", width, height);
        }
    }

    /// World-to-clip projection
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(0.0, self.world.x, 0.0, self.world.y, -1.0, 1.0)
    }

    /// Screen point (y-down) to world point (y-up)
    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        let scale = self.world / self.viewport;
        Vec2::new(
            screen.x * scale.x,
            (self.viewport.y - screen.y) * scale.y,
        )
    }

    /// World point (y-up) to screen point (y-down)
    pub fn project(&self, world: Vec2) -> Vec2 {
        let scale = self.viewport / self.world;
        Vec2::new(world.x * scale.x, self.viewport.y - world.y * scale.y)
    }
}

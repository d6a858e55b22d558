//! Rendering capability
//!
//! The game draws through the immediate-mode `Renderer` trait. The sprite
//! batch records frames for headless runs and tests; the terminal frontend
//! rasterizes into character cells.

pub mod batch;
pub mod camera;
pub mod vertex;

pub use batch::{DrawCommand, SpriteBatch};
pub use camera::Camera;
pub use vertex::SpriteVertex;

use glam::Mat4;

use crate::assets::TextureId;

/// Immediate-mode 2D renderer
pub trait Renderer {
    /// Clear the whole target to an RGBA color
    fn clear(&mut self, color: [f32; 4]);
    /// World-to-clip projection for the following draws
    fn set_projection(&mut self, projection: Mat4);
    /// Start a draw batch
    fn begin(&mut self);
    /// Draw a texture with its bottom-left corner at world (x, y)
    fn draw_texture(&mut self, texture: TextureId, x: f32, y: f32);
    /// Draw text with its baseline starting at world (x, y)
    fn draw_text(&mut self, text: &str, x: f32, y: f32);
    /// Finish the batch and present it
    fn end(&mut self);
}

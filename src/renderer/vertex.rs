//! Vertex types for sprite rendering

use bytemuck::{Pod, Zeroable};

/// Textured 2D vertex in clip space
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    pub texture: u32,
}

impl SpriteVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, texture: u32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color: colors::WHITE,
            texture,
        }
    }
}

/// Tint colors
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

//! Recording sprite batch
//!
//! Implements `Renderer` without a GPU: every frame's draw calls are kept
//! as commands and expanded into projected sprite quads, ready to upload
//! as a vertex buffer.

use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3};

use super::Renderer;
use super::vertex::SpriteVertex;
use crate::assets::TextureId;

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear([f32; 4]),
    Texture { texture: TextureId, x: f32, y: f32 },
    Text { text: String, x: f32, y: f32 },
}

/// Renderer that records frames
#[derive(Debug)]
pub struct SpriteBatch {
    projection: Mat4,
    drawing: bool,
    commands: Vec<DrawCommand>,
    vertices: Vec<SpriteVertex>,
    texture_sizes: HashMap<TextureId, Vec2>,
    default_size: Vec2,
    /// Completed begin/end pairs
    frames: u64,
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new(Vec2::splat(64.0))
    }
}

impl SpriteBatch {
    /// Batch that assumes `default_size` for textures it has no size for
    pub fn new(default_size: Vec2) -> Self {
        Self {
            projection: Mat4::IDENTITY,
            drawing: false,
            commands: Vec::new(),
            vertices: Vec::new(),
            texture_sizes: HashMap::new(),
            default_size,
            frames: 0,
        }
    }

    /// Record the pixel size of a texture
    pub fn set_texture_size(&mut self, texture: TextureId, size: Vec2) {
        self.texture_sizes.insert(texture, size);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Vertex data of the current frame
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// Vertex data as raw bytes for a GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Text drawn this frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of texture draws this frame
    pub fn texture_draws(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Texture { .. }))
            .count()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn to_clip(&self, x: f32, y: f32) -> Vec2 {
        self.projection.project_point3(Vec3::new(x, y, 0.0)).truncate()
    }

    /// Two triangles covering the texture, bottom-left at (x, y)
    fn push_quad(&mut self, texture: TextureId, x: f32, y: f32) {
        let size = self
            .texture_sizes
            .get(&texture)
            .copied()
            .unwrap_or(self.default_size);

        let bl = self.to_clip(x, y);
        let br = self.to_clip(x + size.x, y);
        let tl = self.to_clip(x, y + size.y);
        let tr = self.to_clip(x + size.x, y + size.y);
        let t = texture.0;

        self.vertices.extend_from_slice(&[
            SpriteVertex::new(bl.x, bl.y, 0.0, 1.0, t),
            SpriteVertex::new(br.x, br.y, 1.0, 1.0, t),
            SpriteVertex::new(tl.x, tl.y, 0.0, 0.0, t),
            SpriteVertex::new(tl.x, tl.y, 0.0, 0.0, t),
            SpriteVertex::new(br.x, br.y, 1.0, 1.0, t),
            SpriteVertex::new(tr.x, tr.y, 1.0, 0.0, t),
        ]);
    }
}

impl Renderer for SpriteBatch {
    fn clear(&mut self, color: [f32; 4]) {
        // A clear starts a new frame
        self.commands.clear();
        self.vertices.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_projection(&mut self, projection: Mat4) {
        if self.drawing {
            log::warn!("Projection changed inside a batch");
        }
        self.projection = projection;
    }

    fn begin(&mut self) {
        if self.drawing {
            log::warn!("begin() called twice without end()");
        }
        self.drawing = true;
    }

    fn draw_texture(&mut self, texture: TextureId, x: f32, y: f32) {
        if !self.drawing {
            log::warn!("draw_texture outside begin/end ignored");
            return;
        }
        self.commands.push(DrawCommand::Texture { texture, x, y });
        self.push_quad(texture, x, y);
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        if !self.drawing {
            log::warn!("draw_text outside begin/end ignored");
            return;
        }
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn end(&mut self) {
        if !self.drawing {
            log::warn!("end() without begin()");
            return;
        }
        self.drawing = false;
        self.frames += 1;
    }
}

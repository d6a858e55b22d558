//! Drop Catch - catch the falling raindrops with a bucket
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bucket, raindrops, spawning, collisions)
//! - `renderer`: Renderer capability, camera and the recording sprite batch
//! - `platform`: Input, frame clock, JSON storage and the terminal frontend
//! - `screen`: Screen lifecycle and the per-frame update that wires it all
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod screen;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// World dimensions (y-up, origin bottom-left)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 480.0;

    /// Bucket defaults
    pub const BUCKET_SIZE: f32 = 64.0;
    pub const BUCKET_Y: f32 = 20.0;
    /// Keyboard movement speed (units per second)
    pub const BUCKET_SPEED: f32 = 200.0;

    /// Raindrop defaults
    pub const DROP_SIZE: f32 = 64.0;
    /// Fall speed (units per second)
    pub const DROP_SPEED: f32 = 200.0;
    /// Drops enter at the top edge of the world
    pub const DROP_SPAWN_Y: f32 = WORLD_HEIGHT;
    /// Seconds between spawns
    pub const SPAWN_INTERVAL: f32 = 1.0;
    /// Number of raindrop textures
    pub const SPRITE_VARIANTS: u8 = 3;

    /// Clear color (dark blue)
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.2, 1.0];

    /// HUD text anchors (world units)
    pub const CAUGHT_TEXT_POS: (f32, f32) = (0.0, 400.0);
    pub const MISSED_TEXT_POS: (f32, f32) = (0.0, 300.0);

    /// Largest frame delta the frame clock hands out
    pub const MAX_FRAME_DT: f32 = 0.25;
}

/// Clamp `x` so a span of `width` starting at `x` fits inside `[0, limit]`
#[inline]
pub fn clamp_span(x: f32, width: f32, limit: f32) -> f32 {
    x.clamp(0.0, (limit - width).max(0.0))
}

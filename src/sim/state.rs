//! Game state and core simulation types
//!
//! Everything the frame update mutates lives in `GameState`. Rendering,
//! audio and input never reach in here directly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::Tuning;

/// Raindrop texture variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropSprite {
    Droplet,
    Fire,
    Ice,
}

impl DropSprite {
    pub const ALL: [DropSprite; 3] = [DropSprite::Droplet, DropSprite::Fire, DropSprite::Ice];

    /// Variant for a texture index (out-of-range wraps)
    pub fn from_index(idx: u8) -> Self {
        Self::ALL[idx as usize % Self::ALL.len()]
    }

    pub fn index(self) -> u8 {
        match self {
            DropSprite::Droplet => 0,
            DropSprite::Fire => 1,
            DropSprite::Ice => 2,
        }
    }
}

/// A falling raindrop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Raindrop {
    pub id: u32,
    pub rect: Rect,
    pub sprite: DropSprite,
}

/// The player's bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub rect: Rect,
}

impl Bucket {
    /// Bucket centered horizontally at its resting height
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                tuning.bucket_start_x(),
                tuning.bucket_y,
                tuning.bucket_size,
                tuning.bucket_size,
            ),
        }
    }
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { id: u32 },
    Caught { id: u32 },
    Missed { id: u32 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub bucket: Bucket,
    /// Live raindrops in spawn order
    pub raindrops: Vec<Raindrop>,
    /// Drops caught in the bucket
    pub caught: u32,
    /// Drops that fell past the bottom edge
    pub missed: u32,
    /// Simulated seconds since the state was created
    pub clock: f64,
    /// `clock` value at the most recent spawn
    pub last_spawn_at: f64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh state with the first raindrop already falling
    pub fn new(tuning: Tuning, rng: &mut impl Rng) -> Self {
        let mut state = Self::empty(tuning);
        state.spawn_raindrop(rng);
        state
    }

    /// Create a state without any raindrop
    pub fn empty(tuning: Tuning) -> Self {
        Self {
            bucket: Bucket::new(&tuning),
            tuning,
            raindrops: Vec::new(),
            caught: 0,
            missed: 0,
            clock: 0.0,
            last_spawn_at: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a raindrop at a random x along the top edge. Returns its id.
    pub fn spawn_raindrop(&mut self, rng: &mut impl Rng) -> u32 {
        let x = rng.random_range(0..=self.tuning.max_drop_x()) as f32;
        let sprite = DropSprite::from_index(rng.random_range(0..self.tuning.sprite_variants));
        self.push_raindrop(x, self.tuning.spawn_y, sprite)
    }

    /// Add a raindrop at a fixed position and mark the spawn time
    pub fn push_raindrop(&mut self, x: f32, y: f32, sprite: DropSprite) -> u32 {
        let id = self.next_entity_id();
        let size = self.tuning.drop_size;
        self.raindrops.push(Raindrop {
            id,
            rect: Rect::new(x, y, size, size),
            sprite,
        });
        self.last_spawn_at = self.clock;
        log::debug!("Spawned drop {} at x={} ({:?})", id, x, sprite);
        id
    }

    /// Seconds since the last spawn
    pub fn since_last_spawn(&self) -> f64 {
        self.clock - self.last_spawn_at
    }

    /// Total drops resolved either way
    pub fn resolved(&self) -> u32 {
        self.caught + self.missed
    }
}

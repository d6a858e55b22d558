//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through the `dt` handed to `tick`
//! - Randomness only comes from the injected RNG
//! - No rendering, audio or platform dependencies

pub mod rect;
pub mod state;
pub mod tick;

pub use rect::Rect;
pub use state::{Bucket, DropSprite, GameEvent, GameState, Raindrop};
pub use tick::{TickInput, autopilot, tick};

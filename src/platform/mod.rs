//! Platform abstraction layer
//!
//! Handles the outside world for:
//! - Input polling (pointer and keys)
//! - Frame timing
//! - Storage (JSON files)
//! - The interactive terminal frontend

pub mod storage;
pub mod terminal;
pub mod time;

pub use time::{Clock, FixedClock, FrameClock};

use glam::Vec2;

/// Keys the game polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
}

/// Polled input state
pub trait InputSource {
    /// Screen position (y-down) of an active pointer press
    fn pointer_pressed(&self) -> Option<Vec2>;
    /// Whether a key is held right now
    fn key_held(&self, key: Key) -> bool;
}

/// Plain input snapshot, set by whoever owns it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub pointer: Option<Vec2>,
    pub left: bool,
    pub right: bool,
}

impl InputSource for InputState {
    fn pointer_pressed(&self) -> Option<Vec2> {
        self.pointer
    }

    fn key_held(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
        }
    }
}

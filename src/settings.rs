//! Player settings and preferences
//!
//! Persisted as JSON next to the user's config, separate from tuning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform::storage::{self, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute everything
    pub muted: bool,
    /// Play the rain track in the background
    pub music: bool,

    // === Frame pacing ===
    /// Frames per second the frontends aim for
    pub target_fps: u32,

    // === Terminal input ===
    /// A key counts as held this long after its last press/repeat event.
    /// Terminals without key-release events rely on it. It has to outlast
    /// the OS key-repeat delay, or a held key stalls before repeats start;
    /// the cost is that the bucket keeps gliding this long after letting go.
    pub key_hold_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music: true,
            target_fps: 60,
            key_hold_ms: 500,
        }
    }
}

impl Settings {
    /// File name inside the config directory
    const FILE_NAME: &'static str = "settings.json";

    /// Default settings location: `$XDG_CONFIG_HOME/drop-catch` or `~/.config/drop-catch`
    pub fn default_path() -> PathBuf {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("drop-catch").join(Self::FILE_NAME)
    }

    /// Load settings, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match storage::read_json::<Settings>(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(StorageError::Io { .. }) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        storage::write_json(path, self)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp volumes into range and keep the frame rate usable
    pub fn sanitized(mut self) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        self.master_volume = unit(self.master_volume);
        self.sfx_volume = unit(self.sfx_volume);
        self.music_volume = unit(self.music_volume);
        self.target_fps = self.target_fps.clamp(10, 240);
        self
    }

    /// Seconds per frame at the target rate
    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

//! Audio playback through an external mixer
//!
//! Calls are fire-and-forget: the game never waits on the mixer and never
//! learns whether a sound actually played.

use crate::assets::{Assets, MusicId, SoundId};
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Raindrop landed in the bucket
    DropCaught,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    /// Looping rain ambience
    Rain,
}

/// The mixer the game talks to
pub trait AudioBackend {
    fn play_sound(&mut self, sound: SoundId, volume: f32);
    fn play_music(&mut self, music: MusicId, volume: f32, looping: bool);
    fn stop_music(&mut self, music: MusicId);
}

/// Mixer that drops everything
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_sound(&mut self, _sound: SoundId, _volume: f32) {}
    fn play_music(&mut self, _music: MusicId, _volume: f32, _looping: bool) {}
    fn stop_music(&mut self, _music: MusicId) {}
}

/// Mixer that only logs and counts, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    pub sounds_played: u32,
    pub music_playing: Option<MusicId>,
}

impl AudioBackend for LogAudio {
    fn play_sound(&mut self, sound: SoundId, volume: f32) {
        self.sounds_played += 1;
        log::debug!("sfx #{} at {:.2}", sound.0, volume);
    }

    fn play_music(&mut self, music: MusicId, volume: f32, looping: bool) {
        self.music_playing = Some(music);
        log::info!("music #{} at {:.2} (looping: {})", music.0, volume, looping);
    }

    fn stop_music(&mut self, music: MusicId) {
        if self.music_playing == Some(music) {
            self.music_playing = None;
        }
        log::info!("music #{} stopped", music.0);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    drop_sound: SoundId,
    rain_music: MusicId,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_enabled: bool,
    /// Track the game asked for (survives mute)
    wanted: Option<MusicTrack>,
    /// Track the backend is currently playing
    playing: Option<MusicTrack>,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, assets: &Assets, settings: &Settings) -> Self {
        Self {
            backend,
            drop_sound: assets.drop_sound,
            rain_music: assets.rain_music,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            music_enabled: settings.music,
            wanted: None,
            playing: None,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio. Music resumes on unmute.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.halt_music();
        } else if let Some(track) = self.wanted {
            self.start_music(track);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective sound effect volume
    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Get effective music volume
    fn effective_music_volume(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        match effect {
            SoundEffect::DropCaught => self.backend.play_sound(self.drop_sound, vol),
        }
    }

    /// Start a looping track. Does nothing if it is already playing.
    pub fn start_music(&mut self, track: MusicTrack) {
        self.wanted = Some(track);
        if self.playing == Some(track) {
            return;
        }
        let vol = self.effective_music_volume();
        if vol <= 0.0 {
            return;
        }
        self.halt_music();
        match track {
            MusicTrack::Rain => self.backend.play_music(self.rain_music, vol, true),
        }
        self.playing = Some(track);
    }

    /// Stop the background track
    pub fn stop_music(&mut self) {
        self.wanted = None;
        self.halt_music();
    }

    fn halt_music(&mut self) {
        if let Some(track) = self.playing.take() {
            match track {
                MusicTrack::Rain => self.backend.stop_music(self.rain_music),
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

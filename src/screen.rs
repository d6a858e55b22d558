//! Screen lifecycle and the game screen
//!
//! `GameScreen::render` is the whole frame: draw the current state, read
//! input, advance the simulation and fire sounds for what happened.

use rand::Rng;

use crate::assets::Assets;
use crate::audio::{AudioBackend, AudioManager, MusicTrack, SoundEffect};
use crate::consts::{BACKGROUND, CAUGHT_TEXT_POS, MISSED_TEXT_POS};
use crate::platform::{InputSource, Key};
use crate::renderer::{Camera, Renderer};
use crate::sim::{GameEvent, GameState, TickInput, autopilot, tick};

/// Lifecycle callbacks of a screen. Everything but `render` is optional.
pub trait Screen {
    /// Screen became the active one
    fn show(&mut self) {}
    /// Draw and update one frame
    fn render(&mut self, dt: f32, renderer: &mut dyn Renderer, input: &dyn InputSource);
    /// Output surface changed size (screen units)
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    /// Screen is no longer the active one
    fn hide(&mut self) {}
    /// Release everything
    fn dispose(&mut self) {}
}

/// The one and only gameplay screen
pub struct GameScreen<A: AudioBackend, R: Rng> {
    state: GameState,
    assets: Assets,
    audio: AudioManager<A>,
    camera: Camera,
    rng: R,
    /// Steer automatically when the player gives no input
    autopilot: bool,
    frames: u64,
}

impl<A: AudioBackend, R: Rng> GameScreen<A, R> {
    pub fn new(state: GameState, assets: Assets, audio: AudioManager<A>, rng: R) -> Self {
        let camera = Camera::new(state.tuning.world_width, state.tuning.world_height);
        Self {
            state,
            assets,
            audio,
            camera,
            rng,
            autopilot: false,
            frames: 0,
        }
    }

    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<A> {
        &mut self.audio
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw the HUD, the bucket and every raindrop
    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.clear(BACKGROUND);
        renderer.set_projection(self.camera.projection());
        renderer.begin();

        renderer.draw_text(
            &format!("Drops Collected: {}", self.state.caught),
            CAUGHT_TEXT_POS.0,
            CAUGHT_TEXT_POS.1,
        );
        renderer.draw_text(
            &format!("Drops Missed: {}", self.state.missed),
            MISSED_TEXT_POS.0,
            MISSED_TEXT_POS.1,
        );

        let bucket = &self.state.bucket.rect;
        renderer.draw_texture(self.assets.bucket, bucket.x, bucket.y);
        for drop in &self.state.raindrops {
            renderer.draw_texture(
                self.assets.drop_texture(drop.sprite),
                drop.rect.x,
                drop.rect.y,
            );
        }

        renderer.end();
    }

    /// Poll the input source into world-space tick input
    fn poll_input(&self, input: &dyn InputSource) -> TickInput {
        let polled = TickInput {
            pointer_x: input
                .pointer_pressed()
                .map(|screen| self.camera.unproject(screen).x),
            left: input.key_held(Key::Left),
            right: input.key_held(Key::Right),
        };

        if self.autopilot && polled == TickInput::default() {
            autopilot(&self.state)
        } else {
            polled
        }
    }
}

impl<A: AudioBackend, R: Rng> Screen for GameScreen<A, R> {
    fn show(&mut self) {
        log::info!("Game screen shown");
        self.audio.start_music(MusicTrack::Rain);
    }

    fn render(&mut self, dt: f32, renderer: &mut dyn Renderer, input: &dyn InputSource) {
        self.draw(renderer);

        let tick_input = self.poll_input(input);
        for event in tick(&mut self.state, &tick_input, dt, &mut self.rng) {
            if let GameEvent::Caught { .. } = event {
                self.audio.play(SoundEffect::DropCaught);
            }
        }
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::info!("Resized to {}x{}", width, height);
        self.camera.set_viewport(width as f32, height as f32);
    }

    fn pause(&mut self) {
        self.audio.stop_music();
    }

    fn resume(&mut self) {
        self.audio.start_music(MusicTrack::Rain);
    }

    fn hide(&mut self) {
        self.audio.stop_music();
    }

    fn dispose(&mut self) {
        self.audio.stop_music();
        log::info!(
            "Session over after {} frames: {} caught, {} missed",
            self.frames,
            self.state.caught,
            self.state.missed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::assets::AssetRegistry;
    use crate::audio::LogAudio;
    use crate::platform::InputState;
    use crate::renderer::{DrawCommand, SpriteBatch};
    use crate::sim::DropSprite;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn screen(state: GameState) -> GameScreen<LogAudio, Pcg32> {
        let assets = Assets::load(&mut AssetRegistry::new()).unwrap();
        let audio = AudioManager::new(LogAudio::default(), &assets, &Settings::default());
        GameScreen::new(state, assets, audio, Pcg32::seed_from_u64(5))
    }

    #[test]
    fn test_frame_draws_hud_bucket_and_drops() {
        let mut state = GameState::empty(Tuning::default());
        state.push_raindrop(100.0, 400.0, DropSprite::Droplet);
        state.push_raindrop(500.0, 300.0, DropSprite::Ice);
        let mut screen = screen(state);
        let mut batch = SpriteBatch::default();

        screen.render(0.0, &mut batch, &InputState::default());

        assert_eq!(batch.commands()[0], DrawCommand::Clear(BACKGROUND));
        let texts: Vec<_> = batch.texts().collect();
        assert_eq!(texts, vec!["Drops Collected: 0", "Drops Missed: 0"]);
        assert_eq!(batch.texture_draws(), 3);
        assert_eq!(batch.frames(), 1);
        assert_eq!(screen.frames(), 1);
    }

    #[test]
    fn test_catch_plays_sound() {
        let mut state = GameState::empty(Tuning::default());
        state.push_raindrop(368.0, 88.0, DropSprite::Fire);
        let mut screen = screen(state);
        let mut batch = SpriteBatch::default();

        screen.render(0.025, &mut batch, &InputState::default());
        assert_eq!(screen.state().caught, 1);
        assert_eq!(screen.audio().backend().sounds_played, 1);

        // The counter shows up on the next frame
        screen.render(0.0, &mut batch, &InputState::default());
        assert!(batch.texts().any(|t| t == "Drops Collected: 1"));
    }

    #[test]
    fn test_pointer_is_unprojected() {
        let mut screen = screen(GameState::empty(Tuning::default()));
        screen.resize(80, 24);
        let input = InputState {
            pointer: Some(Vec2::new(40.0, 3.0)),
            ..Default::default()
        };
        screen.render(0.0, &mut SpriteBatch::default(), &input);
        // Screen column 40 of 80 is world x 400; bucket centers on it
        assert_eq!(screen.state().bucket.rect.x, 368.0);

        let input = InputState {
            pointer: Some(Vec2::new(10.0, 3.0)),
            ..Default::default()
        };
        screen.render(0.0, &mut SpriteBatch::default(), &input);
        assert_eq!(screen.state().bucket.rect.x, 68.0);
    }

    #[test]
    fn test_lifecycle_controls_music() {
        let mut screen = screen(GameState::empty(Tuning::default()));
        screen.show();
        assert!(screen.audio().backend().music_playing.is_some());
        screen.pause();
        assert!(screen.audio().backend().music_playing.is_none());
        screen.resume();
        assert!(screen.audio().backend().music_playing.is_some());
        screen.dispose();
        assert!(screen.audio().backend().music_playing.is_none());
    }

    #[test]
    fn test_autopilot_only_without_player_input() {
        let mut state = GameState::empty(Tuning::default());
        state.push_raindrop(0.0, 300.0, DropSprite::Droplet);
        let mut screen = screen(state).with_autopilot(true);

        screen.render(0.5, &mut SpriteBatch::default(), &InputState::default());
        assert_eq!(screen.state().bucket.rect.x, 268.0);

        let input = InputState {
            right: true,
            ..Default::default()
        };
        screen.render(0.5, &mut SpriteBatch::default(), &input);
        assert_eq!(screen.state().bucket.rect.x, 368.0);
    }
}

//! Drop Catch entry point
//!
//! Parses the command line, loads settings and tuning, then runs either the
//! interactive terminal game or a headless demo.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use drop_catch::assets::{AssetRegistry, Assets};
use drop_catch::audio::{AudioManager, LogAudio};
use drop_catch::platform::{Clock, FixedClock, InputState, terminal};
use drop_catch::renderer::SpriteBatch;
use drop_catch::screen::{GameScreen, Screen};
use drop_catch::sim::GameState;
use drop_catch::{Settings, Tuning};

#[derive(Parser, Debug)]
#[command(name = "drop-catch", version, about = "Catch the falling raindrops with a bucket")]
struct Args {
    /// Run headless for a fixed time and print the score
    #[arg(long)]
    demo: bool,

    /// Simulated seconds for --demo
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Let the bucket steer itself when no key or mouse is used
    #[arg(long)]
    autopilot: bool,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Game balance overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Log output would scribble over the terminal game
    let default_filter = if args.demo { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Drop Catch starting with seed {}", seed);
    let rng = Pcg32::seed_from_u64(seed);

    let settings = load_settings(&args);
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path),
        None => Tuning::default(),
    };

    if args.demo {
        run_demo(&settings, tuning, rng, args.seconds)
    } else {
        terminal::run(&settings, tuning, rng, args.autopilot)?;
        Ok(())
    }
}

/// Load settings. Interactive runs leave a file behind for the player to
/// edit; the demo never writes.
fn load_settings(args: &Args) -> Settings {
    let path = args.settings.clone().unwrap_or_else(Settings::default_path);
    let settings = Settings::load(&path);
    if !args.demo && !path.exists() {
        if let Err(e) = settings.save(&path) {
            log::warn!("Could not write default settings: {}", e);
        }
    }
    settings
}

/// Headless session: the screen after the run and the batch holding its last frame
type DemoRun = (GameScreen<LogAudio, Pcg32>, SpriteBatch);

/// Play on autopilot with a fixed 60 Hz step and no output device
fn play_demo(
    settings: &Settings,
    tuning: Tuning,
    mut rng: Pcg32,
    seconds: f32,
) -> Result<DemoRun, Box<dyn Error>> {
    const STEP: f32 = 1.0 / 60.0;

    let (width, height) = (tuning.world_width as u32, tuning.world_height as u32);
    let assets = Assets::load(&mut AssetRegistry::new())?;

    let mut batch = SpriteBatch::new(Vec2::splat(tuning.drop_size));
    batch.set_texture_size(assets.bucket, Vec2::splat(tuning.bucket_size));

    let audio = AudioManager::new(LogAudio::default(), &assets, settings);
    let state = GameState::new(tuning, &mut rng);
    let mut screen = GameScreen::new(state, assets, audio, rng).with_autopilot(true);

    let mut clock = FixedClock { step: STEP };
    let input = InputState::default();
    let frames = (seconds.max(0.0) / STEP).round() as u64;

    screen.resize(width, height);
    screen.show();
    for _ in 0..frames {
        screen.render(clock.delta(), &mut batch, &input);
    }
    screen.hide();
    screen.dispose();

    Ok((screen, batch))
}

fn run_demo(settings: &Settings, tuning: Tuning, rng: Pcg32, seconds: f32) -> Result<(), Box<dyn Error>> {
    let (screen, _) = play_demo(settings, tuning, rng, seconds)?;
    let state = screen.state();
    println!(
        "{:.1}s simulated: {} caught, {} missed, {} falling, {} catch sounds",
        state.clock,
        state.caught,
        state.missed,
        state.raindrops.len(),
        screen.audio().backend().sounds_played
    );
    Ok(())
}

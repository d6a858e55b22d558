//! Interactive terminal frontend
//!
//! Stretches the 800x480 world over the terminal, one character cell per
//! sprite "pixel block". Keyboard and mouse arrive from a dedicated reader
//! thread over a channel so the frame loop never blocks on I/O.
//!
//! Most terminals never report key releases, so a key counts as held for
//! `Settings::key_hold_ms` after its last press or repeat. Terminals with
//! the keyboard enhancement protocol also send releases, which end the
//! hold right away.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
};
use glam::{Mat4, Vec2, Vec3};
use rand::Rng;

use super::{Clock, FrameClock, InputSource, Key};
use crate::Settings;
use crate::assets::{
    AssetError, AssetLoader, Assets, BUCKET_TEXTURE, DROP_SOUND, DROP_TEXTURES, MusicId,
    RAIN_MUSIC, SoundId, TextureId,
};
use crate::audio::{AudioBackend, AudioManager};
use crate::consts::MAX_FRAME_DT;
use crate::screen::{GameScreen, Screen};
use crate::sim::GameState;
use crate::tuning::Tuning;

/// How a texture looks in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Color,
}

/// Asset loader that turns the game's textures into glyphs
#[derive(Debug, Default)]
pub struct GlyphLoader {
    glyphs: HashMap<TextureId, Glyph>,
    next_id: u32,
}

impl GlyphLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn glyph_for(path: &str) -> Option<Glyph> {
        let glyph = |ch, color| Some(Glyph { ch, color });
        match path {
            p if p == DROP_TEXTURES[0] => glyph('o', Color::Blue),
            p if p == DROP_TEXTURES[1] => glyph('*', Color::Red),
            p if p == DROP_TEXTURES[2] => glyph('#', Color::Cyan),
            p if p == BUCKET_TEXTURE => glyph('U', Color::Yellow),
            _ => None,
        }
    }

    fn next(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Hand the glyph table to the renderer
    pub fn into_glyphs(self) -> HashMap<TextureId, Glyph> {
        self.glyphs
    }
}

impl AssetLoader for GlyphLoader {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        let glyph = Self::glyph_for(path).ok_or_else(|| AssetError::Unknown(path.to_string()))?;
        let id = TextureId(self.next());
        self.glyphs.insert(id, glyph);
        Ok(id)
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundId, AssetError> {
        if path != DROP_SOUND {
            return Err(AssetError::Unknown(path.to_string()));
        }
        Ok(SoundId(self.next()))
    }

    fn load_music(&mut self, path: &str) -> Result<MusicId, AssetError> {
        if path != RAIN_MUSIC {
            return Err(AssetError::Unknown(path.to_string()));
        }
        Ok(MusicId(self.next()))
    }
}

/// The catch sound is the terminal bell. There is no music.
pub struct BellAudio<W: Write> {
    out: W,
}

impl<W: Write> BellAudio<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioBackend for BellAudio<W> {
    fn play_sound(&mut self, _sound: SoundId, _volume: f32) {
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }

    fn play_music(&mut self, music: MusicId, _volume: f32, _looping: bool) {
        log::debug!("music #{} requested, terminal has no mixer", music.0);
    }

    fn stop_music(&mut self, _music: MusicId) {}
}

// ── Renderer ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::White,
};

const HINT: &str = " \u{2190}/\u{2192} or A/D move  mouse drag  M mute  Q quit ";

/// Renderer that rasterizes sprites into terminal cells
pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    background: Color,
    projection: Mat4,
    glyphs: HashMap<TextureId, Glyph>,
    /// Sprite sizes in world units
    texture_sizes: HashMap<TextureId, Vec2>,
    default_size: Vec2,
    drawing: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer that assumes `default_size` for textures it has no size for
    pub fn new(
        out: W,
        cols: u16,
        rows: u16,
        glyphs: HashMap<TextureId, Glyph>,
        default_size: Vec2,
    ) -> Self {
        let mut renderer = Self {
            out,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            background: Color::Black,
            projection: Mat4::IDENTITY,
            glyphs,
            texture_sizes: HashMap::new(),
            default_size,
            drawing: false,
        };
        renderer.resize(cols, rows);
        renderer
    }

    /// Record the world size a texture is drawn at
    pub fn set_texture_size(&mut self, texture: TextureId, size: Vec2) {
        self.texture_sizes.insert(texture, size);
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    /// World point to fractional cell coordinates
    fn to_cell(&self, x: f32, y: f32) -> Vec2 {
        let clip = self.projection.project_point3(Vec3::new(x, y, 0.0));
        Vec2::new(
            (clip.x + 1.0) * 0.5 * self.cols as f32,
            (1.0 - clip.y) * 0.5 * self.rows as f32,
        )
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = cell;
    }

    /// Character at a cell of the current frame
    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize].ch)
    }

    /// One row of the current frame as text
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.char_at(col, row))
            .collect()
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        self.out.queue(style::SetBackgroundColor(self.background))?;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            let line = &self.cells[start..start + self.cols as usize];

            // Print runs of equal color in one go
            let mut run = String::new();
            let mut run_color = line[0].fg;
            for cell in line {
                if cell.fg != run_color && !run.is_empty() {
                    self.out.queue(style::SetForegroundColor(run_color))?;
                    self.out.queue(Print(&run))?;
                    run.clear();
                }
                run_color = cell.fg;
                run.push(cell.ch);
            }
            self.out.queue(style::SetForegroundColor(run_color))?;
            self.out.queue(Print(&run))?;
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> crate::renderer::Renderer for TerminalRenderer<W> {
    fn clear(&mut self, color: [f32; 4]) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.background = Color::Rgb {
            r: channel(color[0]),
            g: channel(color[1]),
            b: channel(color[2]),
        };
        self.cells.fill(BLANK);
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    fn begin(&mut self) {
        self.drawing = true;
    }

    fn draw_texture(&mut self, texture: TextureId, x: f32, y: f32) {
        if !self.drawing {
            return;
        }
        let Some(glyph) = self.glyphs.get(&texture).copied() else {
            log::warn!("No glyph for texture #{}", texture.0);
            return;
        };

        let size = self
            .texture_sizes
            .get(&texture)
            .copied()
            .unwrap_or(self.default_size);
        let top_left = self.to_cell(x, y + size.y);
        let bottom_right = self.to_cell(x + size.x, y);
        let c0 = top_left.x.round() as i32;
        let r0 = top_left.y.round() as i32;
        let c1 = (bottom_right.x.round() as i32).max(c0 + 1);
        let r1 = (bottom_right.y.round() as i32).max(r0 + 1);

        let cell = Cell {
            ch: glyph.ch,
            fg: glyph.color,
        };
        for row in r0..r1 {
            for col in c0..c1 {
                self.put(col, row, cell);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        if !self.drawing {
            return;
        }
        let at = self.to_cell(x, y);
        let row = at.y.floor() as i32;
        let col0 = at.x.floor() as i32;
        for (i, ch) in text.chars().enumerate() {
            self.put(col0 + i as i32, row, Cell { ch, fg: Color::White });
        }
    }

    fn end(&mut self) {
        if !self.drawing {
            return;
        }
        self.drawing = false;

        let hint_row = self.rows as i32 - 1;
        for (i, ch) in HINT.chars().enumerate() {
            self.put(i as i32, hint_row, Cell { ch, fg: Color::DarkGrey });
        }

        if let Err(e) = self.flush_frame() {
            log::error!("Terminal write failed: {}", e);
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keyboard and mouse state built from crossterm events
#[derive(Debug)]
pub struct TerminalInput {
    /// Last press/repeat time per key
    last_seen: HashMap<Key, Instant>,
    /// Mouse position (cell centers) while the left button is down
    pointer: Option<Vec2>,
    hold: Duration,
    now: Instant,
    pub quit: bool,
    pub toggle_mute: bool,
    pub resized: Option<(u16, u16)>,
}

impl TerminalInput {
    pub fn new(hold: Duration) -> Self {
        Self {
            last_seen: HashMap::new(),
            pointer: None,
            hold,
            now: Instant::now(),
            quit: false,
            toggle_mute: false,
            resized: None,
        }
    }

    /// Reference time for "held" checks this frame
    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    fn key_for(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
            _ => None,
        }
    }

    /// Fold one event into the state
    pub fn handle(&mut self, event: Event, at: Instant) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                if let Some(key) = Self::key_for(code) {
                    match kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => {
                            self.last_seen.insert(key, at);
                        }
                        KeyEventKind::Release => {
                            self.last_seen.remove(&key);
                        }
                    }
                    return;
                }
                if kind != KeyEventKind::Press {
                    return;
                }
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => self.toggle_mute = true,
                    _ => {}
                }
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => match kind {
                MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                    self.pointer = Some(Vec2::new(column as f32 + 0.5, row as f32 + 0.5));
                }
                MouseEventKind::Up(MouseButton::Left) => self.pointer = None,
                _ => {}
            },
            Event::Resize(cols, rows) => self.resized = Some((cols, rows)),
            Event::FocusLost => {
                self.last_seen.clear();
                self.pointer = None;
            }
            _ => {}
        }
    }
}

impl InputSource for TerminalInput {
    fn pointer_pressed(&self) -> Option<Vec2> {
        self.pointer
    }

    fn key_held(&self, key: Key) -> bool {
        self.last_seen
            .get(&key)
            .map(|&at| self.now.saturating_duration_since(at) <= self.hold)
            .unwrap_or(false)
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Raw mode and screen setup, undone on drop
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on, an early return restores through Drop
        let mut guard = Self {
            keyboard_enhanced: false,
        };

        let mut out = io::stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(EnableMouseCapture)?;
        out.execute(EnableFocusChange)?;

        // Key release events where the terminal supports them
        guard.keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(DisableFocusChange);
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the game in the terminal until the player quits.
/// The terminal is restored even when the game fails.
pub fn run(settings: &Settings, tuning: Tuning, rng: impl Rng, autopilot: bool) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    game_loop(settings, tuning, rng, autopilot, &rx)
}

fn game_loop(
    settings: &Settings,
    tuning: Tuning,
    mut rng: impl Rng,
    autopilot: bool,
    rx: &mpsc::Receiver<Event>,
) -> io::Result<()> {
    let mut loader = GlyphLoader::new();
    let assets = Assets::load(&mut loader).map_err(io::Error::other)?;

    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(
        io::BufWriter::new(io::stdout()),
        cols,
        rows,
        loader.into_glyphs(),
        Vec2::splat(tuning.drop_size),
    );
    renderer.set_texture_size(assets.bucket, Vec2::splat(tuning.bucket_size));

    let audio = AudioManager::new(BellAudio::new(io::stdout()), &assets, settings);
    let state = GameState::new(tuning, &mut rng);
    let mut screen = GameScreen::new(state, assets, audio, rng).with_autopilot(autopilot);
    let mut input = TerminalInput::new(Duration::from_millis(settings.key_hold_ms));
    let mut clock = FrameClock::new(MAX_FRAME_DT);
    let frame = settings.frame_duration();

    screen.resize(u32::from(cols), u32::from(rows));
    screen.show();

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            input.handle(ev, Instant::now());
        }
        if input.quit {
            break;
        }
        if let Some((cols, rows)) = input.resized.take() {
            renderer.resize(cols, rows);
            screen.resize(u32::from(cols), u32::from(rows));
        }
        if std::mem::take(&mut input.toggle_mute) {
            let muted = screen.audio().is_muted();
            screen.audio_mut().set_muted(!muted);
        }

        input.set_now(Instant::now());
        let dt = clock.delta();
        screen.render(dt, &mut renderer, &input);

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }

    screen.hide();
    screen.dispose();
    Ok(())
}

//! Asset manifest and loading capability
//!
//! The game needs four textures, one short sound effect and one looping
//! music track. How they become pixels and samples is up to the frontend's
//! `AssetLoader`; the game only keeps the handles.

use std::collections::HashMap;

use thiserror::Error;

use crate::sim::DropSprite;

/// Raindrop textures, indexed by `DropSprite::index`
pub const DROP_TEXTURES: [&str; 3] = ["droplet.png", "dropletFire.png", "ice.png"];
pub const BUCKET_TEXTURE: &str = "bucket.png";
pub const DROP_SOUND: &str = "drop.wav";
pub const RAIN_MUSIC: &str = "rain.mp3";

/// Handle to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Handle to a loaded sound effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Handle to a loaded (streamed) music track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MusicId(pub u32);

/// Asset loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("Unknown asset: {0}")]
    Unknown(String),

    #[error("Asset {path} is not a {expected}")]
    WrongKind { path: String, expected: &'static str },
}

/// Loads assets by path
pub trait AssetLoader {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError>;
    fn load_sound(&mut self, path: &str) -> Result<SoundId, AssetError>;
    fn load_music(&mut self, path: &str) -> Result<MusicId, AssetError>;
}

/// Every handle the game screen draws or plays with
#[derive(Debug, Clone)]
pub struct Assets {
    pub drops: [TextureId; 3],
    pub bucket: TextureId,
    pub drop_sound: SoundId,
    pub rain_music: MusicId,
}

impl Assets {
    /// Load the whole manifest
    pub fn load(loader: &mut impl AssetLoader) -> Result<Self, AssetError> {
        let drops = [
            loader.load_texture(DROP_TEXTURES[0])?,
            loader.load_texture(DROP_TEXTURES[1])?,
            loader.load_texture(DROP_TEXTURES[2])?,
        ];
        let assets = Self {
            drops,
            bucket: loader.load_texture(BUCKET_TEXTURE)?,
            drop_sound: loader.load_sound(DROP_SOUND)?,
            rain_music: loader.load_music(RAIN_MUSIC)?,
        };
        log::info!("Loaded {} textures, 1 sound, 1 music track", DROP_TEXTURES.len() + 1);
        Ok(assets)
    }

    /// Texture for a raindrop variant
    pub fn drop_texture(&self, sprite: DropSprite) -> TextureId {
        self.drops[sprite.index() as usize]
    }
}

/// Kind of asset a path names, from its extension
fn kind_of(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" => Some("texture"),
        "wav" | "ogg" => Some("sound"),
        "mp3" => Some("music"),
        _ => None,
    }
}

/// Loader that hands out sequential handles and remembers the paths.
/// Used by the headless frontend and by tests.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    paths: Vec<String>,
    by_path: HashMap<String, u32>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, path: &str, expected: &'static str) -> Result<u32, AssetError> {
        match kind_of(path) {
            None => return Err(AssetError::Unknown(path.to_string())),
            Some(kind) if kind != expected => {
                return Err(AssetError::WrongKind {
                    path: path.to_string(),
                    expected,
                });
            }
            Some(_) => {}
        }

        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }
        let id = self.paths.len() as u32;
        self.paths.push(path.to_string());
        self.by_path.insert(path.to_string(), id);
        log::debug!("Registered {} {} as #{}", expected, path, id);
        Ok(id)
    }

    /// Path a handle was loaded from
    pub fn path_of(&self, id: u32) -> Option<&str> {
        self.paths.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl AssetLoader for AssetRegistry {
    fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        self.register(path, "texture").map(TextureId)
    }

    fn load_sound(&mut self, path: &str) -> Result<SoundId, AssetError> {
        self.register(path, "sound").map(SoundId)
    }

    fn load_music(&mut self, path: &str) -> Result<MusicId, AssetError> {
        self.register(path, "music").map(MusicId)
    }
}

//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here. Defaults match
//! `crate::consts`; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::DropSprite;

/// Smallest spawn interval accepted from a tuning file (seconds)
pub const MIN_SPAWN_INTERVAL: f32 = 0.05;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// World width in units
    pub world_width: f32,
    /// World height in units
    pub world_height: f32,
    /// Bucket width and height
    pub bucket_size: f32,
    /// Bucket bottom edge
    pub bucket_y: f32,
    /// Keyboard movement speed (units/sec)
    pub bucket_speed: f32,
    /// Raindrop width and height
    pub drop_size: f32,
    /// Raindrop fall speed (units/sec)
    pub drop_speed: f32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Bottom edge of a freshly spawned drop
    pub spawn_y: f32,
    /// Number of raindrop sprite variants to pick from
    pub sprite_variants: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            bucket_size: BUCKET_SIZE,
            bucket_y: BUCKET_Y,
            bucket_speed: BUCKET_SPEED,
            drop_size: DROP_SIZE,
            drop_speed: DROP_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            spawn_y: DROP_SPAWN_Y,
            sprite_variants: SPRITE_VARIANTS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &std::path::Path) -> Self {
        match crate::platform::storage::read_json::<Tuning>(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning.sanitized()
            }
            Err(e) => {
                log::warn!("Using default tuning ({})", e);
                Self::default()
            }
        }
    }

    /// Replace values the simulation cannot work with by their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive(value: &mut f32, fallback: f32, name: &str) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Tuning: {} = {} is invalid, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        positive(&mut self.world_height, defaults.world_height, "world_height");
        positive(&mut self.bucket_size, defaults.bucket_size, "bucket_size");
        positive(&mut self.bucket_speed, defaults.bucket_speed, "bucket_speed");
        positive(&mut self.drop_size, defaults.drop_size, "drop_size");
        positive(&mut self.drop_speed, defaults.drop_speed, "drop_speed");

        if !self.world_width.is_finite()
            || self.world_width <= self.bucket_size
            || self.world_width <= self.drop_size
        {
            log::warn!(
                "Tuning: world_width = {} cannot fit the sprites, using {}",
                self.world_width,
                defaults.world_width
            );
            self.world_width = defaults.world_width;
            self.bucket_size = defaults.bucket_size;
            self.drop_size = defaults.drop_size;
        }

        if !self.spawn_interval.is_finite() || self.spawn_interval < MIN_SPAWN_INTERVAL {
            log::warn!(
                "Tuning: spawn_interval = {} is too short, using {}",
                self.spawn_interval,
                defaults.spawn_interval
            );
            self.spawn_interval = defaults.spawn_interval;
        }

        if !self.bucket_y.is_finite() {
            self.bucket_y = defaults.bucket_y;
        }
        if !self.spawn_y.is_finite() {
            self.spawn_y = defaults.spawn_y;
        }
        let max_variants = DropSprite::ALL.len() as u8;
        if self.sprite_variants == 0 || self.sprite_variants > max_variants {
            let fixed = if self.sprite_variants == 0 {
                defaults.sprite_variants
            } else {
                max_variants
            };
            log::warn!(
                "Tuning: sprite_variants = {} is out of range, using {}",
                self.sprite_variants,
                fixed
            );
            self.sprite_variants = fixed;
        }

        self
    }

    /// Largest x a drop may spawn at (drops spawn fully on-screen)
    pub fn max_drop_x(&self) -> u32 {
        (self.world_width - self.drop_size).max(0.0) as u32
    }

    /// Bucket starting x (centered)
    pub fn bucket_start_x(&self) -> f32 {
        self.world_width / 2.0 - self.bucket_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.max_drop_x(), 736);
        assert_eq!(t.bucket_start_x(), 368.0);
        assert_eq!(t.spawn_y, 480.0);
    }

    #[test]
    fn test_partial_json() {
        let t = Tuning::from_json(r#"{ "drop_speed": 320.0 }"#).unwrap();
        assert_eq!(t.drop_speed, 320.0);
        assert_eq!(t.bucket_speed, BUCKET_SPEED);
    }

    #[test]
    fn test_sanitize_rejects_nonsense() {
        let t = Tuning::from_json(
            r#"{ "drop_speed": -5.0, "spawn_interval": 0.0, "world_width": 10.0, "sprite_variants": 0 }"#,
        )
        .unwrap();
        assert_eq!(t.drop_speed, DROP_SPEED);
        assert_eq!(t.spawn_interval, SPAWN_INTERVAL);
        assert_eq!(t.world_width, WORLD_WIDTH);
        assert_eq!(t.sprite_variants, SPRITE_VARIANTS);
    }

    #[test]
    fn test_sprite_variants_capped_at_texture_count() {
        let t = Tuning::from_json(r#"{ "sprite_variants": 4 }"#).unwrap();
        assert_eq!(t.sprite_variants, 3);
        let t = Tuning::from_json(r#"{ "sprite_variants": 255 }"#).unwrap();
        assert_eq!(t.sprite_variants, 3);
        let t = Tuning::from_json(r#"{ "sprite_variants": 2 }"#).unwrap();
        assert_eq!(t.sprite_variants, 2);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("drop-catch-no-such-dir/tuning.json");
        assert_eq!(Tuning::load(&path), Tuning::default());
    }

    #[test]
    fn test_load_malformed_file_gives_defaults() {
        let dir = std::env::temp_dir().join(format!("drop-catch-tuning-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let bad = dir.join("bad.json");
        std::fs::write(&bad, "{ \"drop_speed\": ").unwrap();
        assert_eq!(Tuning::load(&bad), Tuning::default());

        let good = dir.join("good.json");
        std::fs::write(&good, r#"{ "drop_speed": 250.0, "sprite_variants": 9 }"#).unwrap();
        let t = Tuning::load(&good);
        assert_eq!(t.drop_speed, 250.0);
        assert_eq!(t.sprite_variants, 3);

        let _ = std::fs::remove_file(&bad);
        let _ = std::fs::remove_file(&good);
    }
}

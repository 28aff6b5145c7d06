//! Generation parameters and validation

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CaveError, Result};

/// Which smoothing and carving style to use for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CaveMode {
    /// Cellular-automaton caves with round tunnels
    #[default]
    Organic,
    /// Straight, corridor-like layouts with L-shaped passages
    Structured,
}

impl std::fmt::Display for CaveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaveMode::Organic => write!(f, "organic"),
            CaveMode::Structured => write!(f, "structured"),
        }
    }
}

/// Default border margin added around the finished grid.
pub const DEFAULT_BORDER_SIZE: usize = 5;

/// Smallest border that still surrounds the map with solid 2x2 wall blocks.
pub const MIN_BORDER_SIZE: usize = 1;

/// Upper bound for `passage_radius` and `corridor_half_width`.
pub const MAX_PASSAGE_SIZE: i32 = 32;

/// Complete configuration for one cave generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Grid width in tiles, before the border is added
    pub width: usize,
    /// Grid height in tiles, before the border is added
    pub height: usize,
    /// Number of cellular-automaton passes
    pub smoothing_passes: usize,
    pub mode: CaveMode,
    /// Chance (percent) that an interior cell starts as wall
    pub fill_percent: u32,
    /// Seed text; numeric strings are used as-is, anything else is hashed
    pub seed: String,
    /// Ignore `seed` and draw a fresh one on every regeneration
    pub use_random_seed: bool,

    /// Wall regions smaller than this become floor
    pub wall_threshold: usize,
    /// Floor regions smaller than this are sealed; larger ones become rooms
    pub room_threshold: usize,
    /// Wall margin added on every side before meshing
    pub border_size: usize,
    /// Disk radius for organic passages
    pub passage_radius: i32,
    /// Square half-width for structured corridors
    pub corridor_half_width: i32,

    /// World-space size of one grid cell
    pub square_size: f32,
    /// How far extruded walls hang below the surface
    pub wall_height: f32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 72,
            smoothing_passes: 5,
            mode: CaveMode::Organic,
            fill_percent: 47,
            seed: "42".to_string(),
            use_random_seed: false,
            wall_threshold: 30,
            room_threshold: 30,
            border_size: DEFAULT_BORDER_SIZE,
            passage_radius: 4,
            corridor_half_width: 1,
            square_size: 1.0,
            wall_height: 5.0,
        }
    }
}

impl CaveConfig {
    /// Smallest accepted width or height for the current border size.
    pub fn min_dimension(&self) -> usize {
        self.border_size + 3
    }

    /// Reject parameters that cannot produce a sensible map.
    pub fn validate(&self) -> Result<()> {
        if self.border_size < MIN_BORDER_SIZE {
            return Err(CaveError::InvalidBorder(self.border_size));
        }
        let min = self.min_dimension();
        if self.width < min || self.height < min {
            return Err(CaveError::InvalidDimensions {
                width: self.width,
                height: self.height,
                min,
            });
        }
        if !(1..=100).contains(&self.fill_percent) {
            return Err(CaveError::InvalidFillPercent(self.fill_percent));
        }
        for (name, value) in [
            ("passage_radius", self.passage_radius),
            ("corridor_half_width", self.corridor_half_width),
        ] {
            if !(0..=MAX_PASSAGE_SIZE).contains(&value) {
                return Err(CaveError::InvalidPassageSize {
                    name,
                    value,
                    max: MAX_PASSAGE_SIZE,
                });
            }
        }
        if !self.square_size.is_finite() || self.square_size <= 0.0 {
            return Err(CaveError::InvalidScale {
                name: "square_size",
                value: self.square_size,
            });
        }
        if !self.wall_height.is_finite() || self.wall_height < 0.0 {
            return Err(CaveError::InvalidScale {
                name: "wall_height",
                value: self.wall_height,
            });
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: CaveConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CaveConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_small_dimensions() {
        let config = CaveConfig {
            width: 7,
            ..Default::default()
        };
        match config.validate() {
            Err(CaveError::InvalidDimensions { width, min, .. }) => {
                assert_eq!(width, 7);
                assert_eq!(min, 8);
            }
            other => panic!("expected InvalidDimensions, got {:?}", other),
        }

        let config = CaveConfig {
            width: 8,
            height: 8,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_fill_percent_out_of_range() {
        for fill in [0, 101, 250] {
            let config = CaveConfig {
                fill_percent: fill,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(CaveError::InvalidFillPercent(f)) if f == fill
            ));
        }
        for fill in [1, 100] {
            let config = CaveConfig {
                fill_percent: fill,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_rejects_bad_scale() {
        let config = CaveConfig {
            square_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CaveError::InvalidScale { name: "square_size", .. })));

        let config = CaveConfig {
            wall_height: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CaveError::InvalidScale { name: "wall_height", .. })));
    }

    #[test]
    fn test_rejects_passage_sizes_out_of_range() {
        for radius in [-1, MAX_PASSAGE_SIZE + 1, i32::MAX] {
            let config = CaveConfig {
                passage_radius: radius,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(CaveError::InvalidPassageSize { name: "passage_radius", value, .. }) if value == radius
            ));
        }

        let config = CaveConfig {
            corridor_half_width: -1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CaveError::InvalidPassageSize { name: "corridor_half_width", value: -1, .. })
        ));

        let config = CaveConfig {
            passage_radius: 0,
            corridor_half_width: MAX_PASSAGE_SIZE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_missing_border() {
        let config = CaveConfig {
            border_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CaveError::InvalidBorder(0))));

        let config = CaveConfig {
            border_size: MIN_BORDER_SIZE,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_partial_config_uses_defaults() {
        let config: CaveConfig =
            serde_json::from_str(r#"{ "width": 40, "mode": "structured" }"#).unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.mode, CaveMode::Structured);
        assert_eq!(config.height, CaveConfig::default().height);
        assert_eq!(config.passage_radius, 4);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cave.json");
        let config = CaveConfig {
            seed: "granite".to_string(),
            smoothing_passes: 3,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(CaveConfig::load(&path).unwrap(), config);
    }
}

//! Error types for cave generation and export

use thiserror::Error;

/// Everything that can go wrong while configuring, generating or exporting a cave.
#[derive(Debug, Error)]
pub enum CaveError {
    /// Grid too small to hold an interior inside the border margin.
    #[error("map size {width}x{height} is too small (both sides must be at least {min})")]
    InvalidDimensions {
        width: usize,
        height: usize,
        min: usize,
    },

    /// Fill percentage outside 1..=100.
    #[error("fill percentage {0} is outside 1..=100")]
    InvalidFillPercent(u32),

    /// A mesh scale parameter that cannot produce geometry.
    #[error("invalid {name}: {value}")]
    InvalidScale { name: &'static str, value: f32 },

    /// Passage footprint that would carve nothing or cover the whole map.
    #[error("{name} {value} is outside 0..={max}")]
    InvalidPassageSize {
        name: &'static str,
        value: i32,
        max: i32,
    },

    /// Border too thin to enclose the map, which leaves the outline open.
    #[error("border size {0} is too small (must be at least {min})", min = crate::config::MIN_BORDER_SIZE)]
    InvalidBorder(usize),

    /// Every floor region was pruned; there is nothing to connect or mesh.
    #[error("no rooms generated for seed {seed}")]
    NoRooms { seed: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CaveError {
    /// True for the degenerate-but-legal outcome where pruning removed every room.
    pub fn is_no_rooms(&self) -> bool {
        matches!(self, CaveError::NoRooms { .. })
    }
}

pub type Result<T> = std::result::Result<T, CaveError>;

//! Cave generation library
//!
//! Cellular-automaton cave layouts with guaranteed connectivity, meshed with
//! marching squares and extruded walls.

pub mod ascii;
pub mod cave;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod grid;
pub mod mesh;
pub mod passage;
pub mod regions;
pub mod rooms;
pub mod seeds;

pub use cave::{generate_cave, CaveGenerator, CaveMap, CaveStats};
pub use config::{CaveConfig, CaveMode};
pub use error::{CaveError, Result};
pub use grid::{Coord, Grid, TileType};
pub use seeds::CaveSeed;

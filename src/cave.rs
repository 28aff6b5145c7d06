//! Full generation pipeline
//!
//! fill -> smooth -> prune -> connect -> pad -> mesh

use serde::Serialize;

use crate::config::CaveConfig;
use crate::error::{CaveError, Result};
use crate::generator::generate_grid;
use crate::grid::{Grid, TileType};
use crate::mesh::{generate_mesh, CaveMesh};
use crate::passage::PassageCarver;
use crate::rooms::{Passage, RoomGraph, Thresholds};
use crate::seeds::CaveSeed;

/// Summary numbers for one generated cave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaveStats {
    /// Size of the bordered grid
    pub width: usize,
    pub height: usize,
    pub floor_tiles: usize,
    pub wall_tiles: usize,
    pub rooms: usize,
    pub passages: usize,
    pub wall_regions_removed: usize,
    pub floor_regions_sealed: usize,
    pub floor_vertices: usize,
    pub floor_triangles: usize,
    pub wall_triangles: usize,
    pub outlines: usize,
}

/// Everything one regeneration produces.
#[derive(Clone, Debug)]
pub struct CaveMap {
    pub seed: CaveSeed,
    /// Final grid including the wall border
    pub grid: Grid,
    pub border_size: usize,
    /// Rooms and passages. Tile coordinates are relative to the unbordered
    /// grid; add `border_size` to index into `grid`.
    pub rooms: RoomGraph,
    pub mesh: CaveMesh,
    pub stats: CaveStats,
}

impl CaveMap {
    pub fn passages(&self) -> &[Passage] {
        &self.rooms.passages
    }

    /// Grid flags for tiles belonging to the main room, in bordered coordinates.
    pub fn main_room_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.grid.width * self.grid.height];
        if let Some(main) = self.rooms.main_room() {
            let offset = self.border_size as i32;
            for tile in &main.tiles {
                let (x, y) = (tile.x + offset, tile.y + offset);
                if self.grid.in_bounds(x, y) {
                    mask[y as usize * self.grid.width + x as usize] = true;
                }
            }
        }
        mask
    }
}

/// Holds a validated configuration and the seed of the most recent run.
#[derive(Clone, Debug)]
pub struct CaveGenerator {
    config: CaveConfig,
    seed: CaveSeed,
}

impl CaveGenerator {
    pub fn new(config: CaveConfig) -> Result<Self> {
        config.validate()?;
        let seed = if config.use_random_seed {
            CaveSeed::random()
        } else {
            CaveSeed::from_text(&config.seed)
        };
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Seed used by the last call to `regenerate`, or the one the next call
    /// will use when the seed is fixed.
    pub fn seed(&self) -> &CaveSeed {
        &self.seed
    }

    /// Run the whole pipeline again. With a fixed seed every call returns the
    /// same cave; with `use_random_seed` a fresh seed is drawn each time.
    pub fn regenerate(&mut self) -> Result<CaveMap> {
        if self.config.use_random_seed {
            self.seed = CaveSeed::random();
        }
        generate_cave(&self.config, &self.seed)
    }
}

/// Generate one cave for an explicit seed. `config.seed` is ignored.
pub fn generate_cave(config: &CaveConfig, seed: &CaveSeed) -> Result<CaveMap> {
    config.validate()?;

    let mut rng = seed.rng();
    let mut grid = generate_grid(
        config.width,
        config.height,
        config.fill_percent,
        config.smoothing_passes,
        config.mode,
        &mut rng,
    );

    let thresholds = Thresholds {
        wall: config.wall_threshold,
        room: config.room_threshold,
    };
    let mut rooms = RoomGraph::build(&mut grid, thresholds);
    if rooms.is_empty() {
        log::warn!("Seed {} produced no rooms", seed);
        return Err(CaveError::NoRooms {
            seed: seed.text.clone(),
        });
    }

    let carver = PassageCarver::from_config(config);
    rooms.connect_rooms(&mut grid, &carver);

    let grid = grid.with_border(config.border_size);
    let mesh = generate_mesh(&grid, config.square_size, config.wall_height);

    let stats = CaveStats {
        width: grid.width,
        height: grid.height,
        floor_tiles: grid.count(TileType::Floor),
        wall_tiles: grid.count(TileType::Wall),
        rooms: rooms.len(),
        passages: rooms.passages.len(),
        wall_regions_removed: rooms.prune_stats.wall_regions_removed,
        floor_regions_sealed: rooms.prune_stats.floor_regions_sealed,
        floor_vertices: mesh.floor.vertices.len(),
        floor_triangles: mesh.floor.triangle_count(),
        wall_triangles: mesh.walls.triangle_count(),
        outlines: mesh.outlines.len(),
    };

    log::info!(
        "Cave {} ({}, {}x{}): {} rooms, {} passages, {} floor triangles, {} wall triangles",
        seed,
        config.mode,
        config.width,
        config.height,
        stats.rooms,
        stats.passages,
        stats.floor_triangles,
        stats.wall_triangles
    );

    Ok(CaveMap {
        seed: seed.clone(),
        grid,
        border_size: config.border_size,
        rooms,
        mesh,
        stats,
    })
}

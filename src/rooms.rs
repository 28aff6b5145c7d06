//! Room discovery and connectivity repair
//!
//! Floor regions that survive pruning become rooms. Rooms live in a flat
//! vector and refer to each other by `RoomId`; the connection relation is an
//! undirected adjacency list, so cycles in the cave never become ownership cycles.
//!
//! Connection runs in two phases:
//! 1. every room that has no connection yet is joined to its nearest room;
//! 2. while some room is unreachable from the main room, the closest pair
//!    (unreachable room, reachable room) is joined.

use serde::Serialize;

use crate::grid::{Coord, Grid, TileType, NEIGHBORS_4};
use crate::passage::PassageCarver;
use crate::regions::{fill_region, find_regions, Region};

/// Index of a room inside its `RoomGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RoomId(pub usize);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Room#{}", self.0)
    }
}

/// A floor region large enough to be kept.
#[derive(Clone, Debug, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub tiles: Vec<Coord>,
    /// Tiles with a wall (or the map edge) directly N, S, E or W
    pub edge_tiles: Vec<Coord>,
    pub is_main_room: bool,
    pub is_accessible_from_main: bool,
    pub connected: Vec<RoomId>,
}

impl Room {
    fn new(id: RoomId, tiles: Region, grid: &Grid) -> Self {
        let edge_tiles = tiles
            .iter()
            .copied()
            .filter(|tile| {
                NEIGHBORS_4
                    .iter()
                    .any(|&(dx, dy)| grid.is_wall_or_outside(tile.x + dx, tile.y + dy))
            })
            .collect();

        Self {
            id,
            tiles,
            edge_tiles,
            is_main_room: false,
            is_accessible_from_main: false,
            connected: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_connected(&self, other: RoomId) -> bool {
        self.connected.contains(&other)
    }
}

/// One carved connection between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Passage {
    pub from_room: RoomId,
    pub to_room: RoomId,
    pub from_tile: Coord,
    pub to_tile: Coord,
}

/// Closest edge-tile pair found between two rooms.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance: i64,
    room_a: RoomId,
    room_b: RoomId,
    tile_a: Coord,
    tile_b: Coord,
}

/// Pruning thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub wall: usize,
    pub room: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { wall: 30, room: 30 }
    }
}

/// What pruning removed, for logging and statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PruneStats {
    pub wall_regions_removed: usize,
    pub floor_regions_sealed: usize,
}

/// All rooms of one generation pass and the passages between them.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RoomGraph {
    pub rooms: Vec<Room>,
    pub passages: Vec<Passage>,
    pub prune_stats: PruneStats,
}

impl RoomGraph {
    /// Prune small regions in place and promote the remaining floor regions
    /// to rooms, largest first. The largest room becomes the main room.
    pub fn build(grid: &mut Grid, thresholds: Thresholds) -> Self {
        let mut prune_stats = PruneStats::default();

        for region in find_regions(grid, TileType::Wall) {
            if region.len() < thresholds.wall {
                fill_region(grid, &region, TileType::Floor);
                prune_stats.wall_regions_removed += 1;
            }
        }

        let mut surviving = Vec::new();
        for region in find_regions(grid, TileType::Floor) {
            if region.len() < thresholds.room {
                fill_region(grid, &region, TileType::Wall);
                prune_stats.floor_regions_sealed += 1;
            } else {
                surviving.push(region);
            }
        }

        // Stable: equal sizes keep discovery order
        surviving.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut rooms: Vec<Room> = surviving
            .into_iter()
            .enumerate()
            .map(|(i, region)| Room::new(RoomId(i), region, grid))
            .collect();

        if let Some(main) = rooms.first_mut() {
            main.is_main_room = true;
            main.is_accessible_from_main = true;
        }

        log::debug!(
            "Pruned {} wall regions and {} floor pockets; {} rooms survive",
            prune_stats.wall_regions_removed,
            prune_stats.floor_regions_sealed,
            rooms.len()
        );

        Self {
            rooms,
            passages: Vec::new(),
            prune_stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0]
    }

    pub fn main_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|r| r.is_main_room)
    }

    /// Join rooms until every room is reachable from the main room, carving
    /// each connection into `grid`.
    pub fn connect_rooms(&mut self, grid: &mut Grid, carver: &PassageCarver) {
        let count = self.rooms.len();

        // Phase 1: give every isolated room a link to its nearest neighbour
        for a in 0..count {
            if !self.rooms[a].connected.is_empty() {
                continue;
            }
            let others: Vec<usize> = (0..count).collect();
            if let Some(best) = self.closest_pair(&[a], &others) {
                self.create_passage(grid, carver, best);
            }
        }

        // Phase 2: bridge the remaining components to the main room
        loop {
            let (reachable, unreachable): (Vec<usize>, Vec<usize>) =
                (0..count).partition(|&i| self.rooms[i].is_accessible_from_main);

            if unreachable.is_empty() {
                break;
            }
            match self.closest_pair(&unreachable, &reachable) {
                Some(best) => self.create_passage(grid, carver, best),
                None => break,
            }
        }

        log::debug!(
            "Connected {} rooms with {} passages",
            count,
            self.passages.len()
        );
    }

    /// Closest edge-tile pair over all unconnected room pairs (a, b) with
    /// `a` from `from` and `b` from `to`. Ties keep the first pair found.
    fn closest_pair(&self, from: &[usize], to: &[usize]) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for &a in from {
            let room_a = &self.rooms[a];
            for &b in to {
                if a == b || room_a.is_connected(RoomId(b)) {
                    continue;
                }
                let room_b = &self.rooms[b];

                for &tile_a in &room_a.edge_tiles {
                    for &tile_b in &room_b.edge_tiles {
                        let distance = tile_a.distance_sq(tile_b);
                        if best.map_or(true, |c| distance < c.distance) {
                            best = Some(Candidate {
                                distance,
                                room_a: RoomId(a),
                                room_b: RoomId(b),
                                tile_a,
                                tile_b,
                            });
                        }
                    }
                }
            }
        }

        best
    }

    fn create_passage(&mut self, grid: &mut Grid, carver: &PassageCarver, candidate: Candidate) {
        self.link(candidate.room_a, candidate.room_b);
        carver.carve(grid, candidate.tile_a, candidate.tile_b);
        self.passages.push(Passage {
            from_room: candidate.room_a,
            to_room: candidate.room_b,
            from_tile: candidate.tile_a,
            to_tile: candidate.tile_b,
        });
    }

    /// Record a mutual connection and spread main-room accessibility across it.
    pub fn link(&mut self, a: RoomId, b: RoomId) {
        if self.rooms[a.0].is_accessible_from_main {
            self.mark_accessible(b);
        } else if self.rooms[b.0].is_accessible_from_main {
            self.mark_accessible(a);
        }
        if !self.rooms[a.0].is_connected(b) {
            self.rooms[a.0].connected.push(b);
        }
        if !self.rooms[b.0].is_connected(a) {
            self.rooms[b.0].connected.push(a);
        }
    }

    /// Flag `start` and everything already connected to it as accessible.
    fn mark_accessible(&mut self, start: RoomId) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let room = &mut self.rooms[id.0];
            if room.is_accessible_from_main {
                continue;
            }
            room.is_accessible_from_main = true;
            stack.extend(room.connected.iter().copied());
        }
    }

    /// True when every room can reach every other room through connections.
    pub fn is_fully_connected(&self) -> bool {
        if self.rooms.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.rooms.len()];
        let mut stack = vec![RoomId(0)];
        seen[0] = true;
        while let Some(id) = stack.pop() {
            for &next in &self.rooms[id.0].connected {
                if !seen[next.0] {
                    seen[next.0] = true;
                    stack.push(next);
                }
            }
        }
        seen.into_iter().all(|s| s)
    }
}

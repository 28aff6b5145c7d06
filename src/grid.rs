//! Tile grid for cave layouts
//!
//! A fixed-size, non-wrapping 2D grid of wall/floor tiles. All coordinate
//! access is bounds-checked; out-of-range reads return `None` and out-of-range
//! writes are ignored, which is what the stamping and smoothing code relies on.

use serde::{Deserialize, Serialize};

/// State of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    /// Open, walkable space
    Floor,
    /// Solid rock
    #[default]
    Wall,
}

impl TileType {
    pub fn is_wall(self) -> bool {
        self == TileType::Wall
    }
}

/// Integer grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.
    pub fn distance_sq(self, other: Coord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// 4-connected neighbour offsets, in the order the flood fill visits them.
pub const NEIGHBORS_4: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// A 2D grid of tiles, row-major storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    data: Vec<TileType>,
}

impl Grid {
    pub fn new_with(width: usize, height: usize, value: TileType) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a grid from rows of text: `#` is wall, anything else is floor.
    /// Row 0 of the text is `y = 0`.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = Grid::new_with(width, height, TileType::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '#' {
                    grid.data[y * width + x] = TileType::Floor;
                }
            }
        }
        grid
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Option<TileType> {
        self.index(x, y).map(|idx| self.data[idx])
    }

    pub fn tile(&self, coord: Coord) -> Option<TileType> {
        self.get(coord.x, coord.y)
    }

    /// Wall test where anything outside the grid counts as wall.
    pub fn is_wall_or_outside(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map_or(true, TileType::is_wall)
    }

    /// Set a tile. Returns false (and changes nothing) when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, value: TileType) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.data[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn set_coord(&mut self, coord: Coord, value: TileType) -> bool {
        self.set(coord.x, coord.y, value)
    }

    /// True if the cell lies on the outermost ring.
    pub fn is_edge(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x as usize == self.width - 1 || y as usize == self.height - 1
    }

    /// In-bounds 4-connected neighbours (left, up, down, right).
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        NEIGHBORS_4
            .iter()
            .map(move |&(dx, dy)| coord.offset(dx, dy))
            .filter(move |c| self.in_bounds(c.x, c.y))
    }

    /// Number of wall cells among the 8 surrounding cells; cells beyond the
    /// grid edge count as wall.
    pub fn surrounding_wall_count(&self, x: i32, y: i32) -> usize {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.is_wall_or_outside(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn count(&self, value: TileType) -> usize {
        self.data.iter().filter(|&&t| t == value).count()
    }

    /// Copy of this grid surrounded by `margin` cells of wall on every side.
    pub fn with_border(&self, margin: usize) -> Grid {
        let mut bordered = Grid::new_with(
            self.width + margin * 2,
            self.height + margin * 2,
            TileType::Wall,
        );
        for (x, y, &tile) in self.iter() {
            bordered.set((x + margin) as i32, (y + margin) as i32, tile);
        }
        bordered
    }

    /// Raw row-major tiles.
    pub fn tiles(&self) -> &[TileType] {
        &self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &TileType)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }
}

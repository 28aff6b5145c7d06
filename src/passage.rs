//! Passage carving between rooms
//!
//! Organic caves get a round tunnel: a disk stamped along a rasterised line.
//! Structured layouts get an L-shaped corridor of square stamps, horizontal
//! first at the start tile's row, then vertical at the end tile's column.

use crate::config::{CaveConfig, CaveMode};
use crate::grid::{Coord, Grid, TileType};

/// Carving style and footprint sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassageCarver {
    pub mode: CaveMode,
    /// Disk radius used in organic mode
    pub radius: i32,
    /// Square half-width used in structured mode
    pub half_width: i32,
}

impl Default for PassageCarver {
    fn default() -> Self {
        Self {
            mode: CaveMode::Organic,
            radius: 4,
            half_width: 1,
        }
    }
}

impl PassageCarver {
    pub fn from_config(config: &CaveConfig) -> Self {
        Self {
            mode: config.mode,
            radius: config.passage_radius,
            half_width: config.corridor_half_width,
        }
    }

    /// Open a walkable path from `from` to `to`.
    pub fn carve(&self, grid: &mut Grid, from: Coord, to: Coord) {
        match self.mode {
            CaveMode::Organic => {
                for point in line(from, to) {
                    for tile in filled_circle(point, self.radius) {
                        grid.set_coord(tile, TileType::Floor);
                    }
                }
            }
            CaveMode::Structured => {
                for point in l_corridor(from, to) {
                    for tile in filled_square(point, self.half_width) {
                        grid.set_coord(tile, TileType::Floor);
                    }
                }
            }
        }
        log::trace!("Carved {} passage {:?} -> {:?}", self.mode, from, to);
    }
}

/// Integer line from `from` to `to`, both ends included.
///
/// Steps one cell along the major axis each iteration and uses an error
/// accumulator (starting at half the major length) for the minor axis, so
/// consecutive points are 8-connected.
pub fn line(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let mut inverted = false;
    let mut step = dx.signum();
    let mut gradient_step = dy.signum();
    let mut longest = dx.abs();
    let mut shortest = dy.abs();

    if longest < shortest {
        inverted = true;
        longest = dy.abs();
        shortest = dx.abs();
        step = dy.signum();
        gradient_step = dx.signum();
    }

    let mut points = Vec::with_capacity(longest as usize + 1);
    let mut x = from.x;
    let mut y = from.y;
    let mut accumulation = longest / 2;

    for _ in 0..longest {
        points.push(Coord::new(x, y));
        if inverted {
            y += step;
        } else {
            x += step;
        }

        accumulation += shortest;
        if accumulation >= longest {
            if inverted {
                x += gradient_step;
            } else {
                y += gradient_step;
            }
            accumulation -= longest;
        }
    }
    points.push(Coord::new(x, y));

    points
}

/// Cells of an axis-aligned corridor: the x-span at `from.y`, then the y-span
/// at `to.x`. Spans are inclusive so the corner and both ends are covered.
pub fn l_corridor(from: Coord, to: Coord) -> Vec<Coord> {
    let mut points = Vec::new();

    let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
    for x in x0..=x1 {
        points.push(Coord::new(x, from.y));
    }

    let (y0, y1) = (from.y.min(to.y), from.y.max(to.y));
    for y in y0..=y1 {
        points.push(Coord::new(to.x, y));
    }

    points
}

/// Points of a filled disk: every offset with dx² + dy² <= r².
/// A negative radius stamps just the centre.
pub fn filled_circle(center: Coord, radius: i32) -> Vec<Coord> {
    let radius = radius.max(0);
    let r_sq = radius as i64 * radius as i64;
    let mut points = Vec::new();

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if (dx as i64).pow(2) + (dy as i64).pow(2) <= r_sq {
                points.push(center.offset(dx, dy));
            }
        }
    }

    points
}

/// Points of a filled square extending `half_width` in each direction.
/// A negative half-width stamps just the centre.
pub fn filled_square(center: Coord, half_width: i32) -> Vec<Coord> {
    let half_width = half_width.max(0);
    let mut points = Vec::new();

    for dy in -half_width..=half_width {
        for dx in -half_width..=half_width {
            points.push(center.offset(dx, dy));
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_eight_connected(points: &[Coord]) -> bool {
        points
            .windows(2)
            .all(|w| (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1)
    }

    #[test]
    fn test_line_horizontal() {
        let points = line(Coord::new(0, 0), Coord::new(5, 0));
        let expected: Vec<_> = (0..=5).map(|x| Coord::new(x, 0)).collect();
        assert_eq!(points, expected);
    }

    #[test]
    fn test_line_all_octants_are_connected() {
        let origin = Coord::new(10, 10);
        let targets = [
            (17, 12), (12, 17), (3, 13), (8, 2),
            (10, 0), (0, 10), (20, 20), (1, 19), (10, 10),
        ];
        for &(tx, ty) in &targets {
            let to = Coord::new(tx, ty);
            let points = line(origin, to);
            assert_eq!(points.first(), Some(&origin));
            assert_eq!(points.last(), Some(&to));
            assert!(is_eight_connected(&points), "line to {:?}", to);
            let expected_len = (tx - 10).abs().max((ty - 10).abs()) as usize + 1;
            assert_eq!(points.len(), expected_len);
        }
    }

    #[test]
    fn test_line_steep() {
        let points = line(Coord::new(0, 0), Coord::new(1, 4));
        assert_eq!(points.len(), 5);
        assert!(points.windows(2).all(|w| w[1].y == w[0].y + 1));
    }

    #[test]
    fn test_organic_carve_marks_band() {
        let mut grid = Grid::new_with(20, 20, TileType::Wall);
        let carver = PassageCarver::default();
        carver.carve(&mut grid, Coord::new(0, 0), Coord::new(5, 0));

        // Stamps at the grid corner clip silently; every x in [0, 5 + r] on row 0 is open
        for x in 0..=9 {
            assert_eq!(grid.get(x, 0), Some(TileType::Floor), "x = {}", x);
        }
        for y in 0..=4 {
            assert_eq!(grid.get(0, y), Some(TileType::Floor), "y = {}", y);
        }
        assert_eq!(grid.get(10, 0), Some(TileType::Wall));
        assert_eq!(grid.get(0, 5), Some(TileType::Wall));
    }

    #[test]
    fn test_structured_carve_both_directions() {
        let carver = PassageCarver {
            mode: CaveMode::Structured,
            radius: 4,
            half_width: 1,
        };

        let mut forward = Grid::new_with(20, 20, TileType::Wall);
        carver.carve(&mut forward, Coord::new(2, 3), Coord::new(12, 15));

        let mut backward = Grid::new_with(20, 20, TileType::Wall);
        carver.carve(&mut backward, Coord::new(12, 15), Coord::new(2, 3));

        // Forward: row 3 from x=2..=12, then column 12 from y=3..=15
        for x in 2..=12 {
            assert_eq!(forward.get(x, 3), Some(TileType::Floor));
        }
        for y in 3..=15 {
            assert_eq!(forward.get(12, y), Some(TileType::Floor));
        }
        assert_eq!(forward.get(2, 15), Some(TileType::Wall));

        // Backward: row 15 from x=2..=12, then column 2 from y=3..=15
        for x in 2..=12 {
            assert_eq!(backward.get(x, 15), Some(TileType::Floor));
        }
        for y in 3..=15 {
            assert_eq!(backward.get(2, y), Some(TileType::Floor));
        }
        assert_eq!(backward.get(12, 3), Some(TileType::Wall));

        // Footprint is 3 wide around the corridor centre line
        assert_eq!(forward.get(7, 2), Some(TileType::Floor));
        assert_eq!(forward.get(7, 4), Some(TileType::Floor));
        assert_eq!(forward.get(7, 5), Some(TileType::Wall));
    }

    #[test]
    fn test_stamps_clip_to_bounds() {
        let mut grid = Grid::new_with(3, 3, TileType::Wall);
        let carver = PassageCarver::default();
        carver.carve(&mut grid, Coord::new(-2, -2), Coord::new(-1, -1));
        // Disk of radius 4 around (-1,-1) covers part of the grid; nothing panics
        assert_eq!(grid.get(0, 0), Some(TileType::Floor));
        assert_eq!(grid.width, 3);
    }

    #[test]
    fn test_negative_footprint_still_opens_centre_line() {
        for mode in [CaveMode::Organic, CaveMode::Structured] {
            let carver = PassageCarver {
                mode,
                radius: -1,
                half_width: -1,
            };
            let mut grid = Grid::new_with(12, 12, TileType::Wall);
            carver.carve(&mut grid, Coord::new(2, 2), Coord::new(9, 2));
            for x in 2..=9 {
                assert_eq!(grid.get(x, 2), Some(TileType::Floor), "{} x = {}", mode, x);
            }
            assert_eq!(grid.count(TileType::Floor), 8);
        }
        assert_eq!(filled_circle(Coord::new(3, 3), -5), vec![Coord::new(3, 3)]);
        assert_eq!(filled_square(Coord::new(3, 3), -5), vec![Coord::new(3, 3)]);
    }

    #[test]
    fn test_filled_circle_size() {
        assert_eq!(filled_circle(Coord::new(0, 0), 0).len(), 1);
        assert_eq!(filled_circle(Coord::new(0, 0), 1).len(), 5);
        assert_eq!(filled_circle(Coord::new(0, 0), 2).len(), 13);
        assert_eq!(filled_square(Coord::new(0, 0), 1).len(), 9);
    }
}

//! Connected region detection
//!
//! Flood-fills 4-connected groups of same-state tiles. Used both to prune
//! noise (tiny wall islands, tiny floor pockets) and to discover rooms.

use std::collections::VecDeque;

use crate::grid::{Coord, Grid, TileType};

/// A maximal 4-connected set of tiles sharing one state, in BFS order.
pub type Region = Vec<Coord>;

/// Find every region of `state`.
///
/// Scans row by row; each unvisited matching tile seeds a breadth-first fill.
/// Every matching tile ends up in exactly one region.
pub fn find_regions(grid: &Grid, state: TileType) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut visited = vec![false; grid.width * grid.height];
    let index = |c: Coord| c.y as usize * grid.width + c.x as usize;

    for y in 0..grid.height as i32 {
        for x in 0..grid.width as i32 {
            let start = Coord::new(x, y);
            if visited[index(start)] || grid.tile(start) != Some(state) {
                continue;
            }

            let mut region = Vec::new();
            let mut queue = VecDeque::new();
            queue.push_back(start);
            visited[index(start)] = true;

            while let Some(tile) = queue.pop_front() {
                region.push(tile);

                for next in grid.neighbors(tile) {
                    let idx = index(next);
                    if !visited[idx] && grid.tile(next) == Some(state) {
                        visited[idx] = true;
                        queue.push_back(next);
                    }
                }
            }

            regions.push(region);
        }
    }

    regions
}

/// Overwrite every tile of `region` with `value`.
pub fn fill_region(grid: &mut Grid, region: &[Coord], value: TileType) {
    for &tile in region {
        grid.set_coord(tile, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_regions_are_four_connected() {
        // The two floor tiles touch only diagonally, so they are separate regions
        let grid = Grid::from_rows(&[
            "####",
            "#.##",
            "##.#",
            "####",
        ]);
        let floors = find_regions(&grid, TileType::Floor);
        assert_eq!(floors.len(), 2);
        assert_eq!(floors[0], vec![Coord::new(1, 1)]);
        assert_eq!(floors[1], vec![Coord::new(2, 2)]);

        let walls = find_regions(&grid, TileType::Wall);
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].len(), 14);
    }

    #[test]
    fn test_regions_in_row_major_discovery_order() {
        let grid = Grid::from_rows(&[
            "#####",
            "#..#.",
            "#####",
            ".####",
        ]);
        let floors = find_regions(&grid, TileType::Floor);
        assert_eq!(floors.len(), 3);
        assert_eq!(floors[0][0], Coord::new(1, 1));
        assert_eq!(floors[0].len(), 2);
        assert_eq!(floors[1][0], Coord::new(4, 1));
        assert_eq!(floors[2][0], Coord::new(0, 3));
    }

    #[test]
    fn test_regions_partition_all_tiles() {
        let grid = Grid::from_rows(&[
            "..#..#....",
            ".##..###..",
            "...#....#.",
            "####..#...",
            "..#..##.##",
            "#...#.....",
        ]);
        for state in [TileType::Floor, TileType::Wall] {
            let regions = find_regions(&grid, state);
            let mut seen = HashSet::new();
            for region in &regions {
                for &tile in region {
                    assert_eq!(grid.tile(tile), Some(state));
                    assert!(seen.insert(tile), "{:?} appears twice", tile);
                }
            }
            assert_eq!(seen.len(), grid.count(state));
        }
    }

    #[test]
    fn test_fill_region() {
        let mut grid = Grid::from_rows(&["#..#", "####"]);
        let regions = find_regions(&grid, TileType::Floor);
        fill_region(&mut grid, &regions[0], TileType::Wall);
        assert_eq!(grid.count(TileType::Floor), 0);
    }
}

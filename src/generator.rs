//! Raw grid generation: seeded random fill and cellular-automaton smoothing
//!
//! Organic mode uses the classic 4-5 rule over the Moore neighbourhood.
//! Structured mode only keeps walls that continue a straight run along an
//! axis, which produces corridor-like layouts.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::CaveMode;
use crate::grid::{Grid, TileType};

/// Fill the grid: edge cells are wall, interior cells are wall with
/// probability `fill_percent` / 100.
pub fn random_fill(width: usize, height: usize, fill_percent: u32, rng: &mut ChaCha8Rng) -> Grid {
    let mut grid = Grid::new_with(width, height, TileType::Wall);

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if grid.is_edge(x, y) {
                continue;
            }
            let tile = if rng.gen_range(0..100) < fill_percent {
                TileType::Wall
            } else {
                TileType::Floor
            };
            grid.set(x, y, tile);
        }
    }

    grid
}

/// Run one smoothing pass. Every cell of the result is computed from `grid`
/// only, never from cells already rewritten in this pass.
pub fn smooth(grid: &Grid, mode: CaveMode) -> Grid {
    let mut next = grid.clone();

    for y in 0..grid.height as i32 {
        for x in 0..grid.width as i32 {
            let state = match mode {
                CaveMode::Organic => organic_state(grid, x, y),
                CaveMode::Structured => structured_state(grid, x, y),
            };
            next.set(x, y, state);
        }
    }

    next
}

fn organic_state(grid: &Grid, x: i32, y: i32) -> TileType {
    let walls = grid.surrounding_wall_count(x, y);
    if walls > 4 {
        TileType::Wall
    } else if walls < 4 {
        TileType::Floor
    } else {
        grid.get(x, y).unwrap_or(TileType::Wall)
    }
}

fn structured_state(grid: &Grid, x: i32, y: i32) -> TileType {
    let current = grid.get(x, y).unwrap_or(TileType::Wall);

    let near_edge = !grid.in_bounds(x - 1, y)
        || !grid.in_bounds(x + 1, y)
        || !grid.in_bounds(x, y - 1)
        || !grid.in_bounds(x, y + 1);
    if near_edge {
        return TileType::Wall;
    }

    let second_ring_outside = !grid.in_bounds(x - 2, y)
        || !grid.in_bounds(x + 2, y)
        || !grid.in_bounds(x, y - 2)
        || !grid.in_bounds(x, y + 2);
    if second_ring_outside {
        return current;
    }

    let wall = |dx: i32, dy: i32| grid.is_wall_or_outside(x + dx, y + dy);

    let horizontal_run = wall(1, 0) && wall(-1, 0) && (wall(2, 0) || wall(-2, 0));
    let vertical_run = wall(0, 1) && wall(0, -1) && (wall(0, 2) || wall(0, -2));

    if horizontal_run || vertical_run {
        TileType::Wall
    } else {
        TileType::Floor
    }
}

/// Random fill followed by `passes` smoothing passes.
pub fn generate_grid(
    width: usize,
    height: usize,
    fill_percent: u32,
    passes: usize,
    mode: CaveMode,
    rng: &mut ChaCha8Rng,
) -> Grid {
    let mut grid = random_fill(width, height, fill_percent, rng);
    for _ in 0..passes {
        grid = smooth(&grid, mode);
    }
    log::debug!(
        "Generated {}x{} {} grid: {} wall / {} floor after {} passes",
        width,
        height,
        mode,
        grid.count(TileType::Wall),
        grid.count(TileType::Floor),
        passes
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_fill_edges_are_wall() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = random_fill(20, 12, 1, &mut rng);
        for (x, y, tile) in grid.iter() {
            if grid.is_edge(x as i32, y as i32) {
                assert_eq!(*tile, TileType::Wall, "edge ({}, {})", x, y);
            }
        }
        // With 1% fill almost the whole interior should be open
        assert!(grid.count(TileType::Floor) > 150);
    }

    #[test]
    fn test_full_fill_is_all_wall() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let grid = random_fill(10, 10, 100, &mut rng);
        assert_eq!(grid.count(TileType::Floor), 0);
    }

    #[test]
    fn test_fill_is_deterministic() {
        let a = random_fill(32, 32, 45, &mut ChaCha8Rng::seed_from_u64(99));
        let b = random_fill(32, 32, 45, &mut ChaCha8Rng::seed_from_u64(99));
        let c = random_fill(32, 32, 45, &mut ChaCha8Rng::seed_from_u64(100));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_organic_rule() {
        let grid = Grid::from_rows(&[
            ".....",
            ".###.",
            "..#..",
            "..##.",
            ".....",
        ]);
        let next = smooth(&grid, CaveMode::Organic);
        // (2,2): neighbours (1,1),(2,1),(3,1),(3,3),(2,3) walls = 5
        assert_eq!(next.get(2, 2), Some(TileType::Wall));
        // (0,0): 5 outside plus (1,1) -> 6 -> wall
        assert_eq!(next.get(0, 0), Some(TileType::Wall));
        // (2,0): outside 3, (1,1),(2,1),(3,1) walls -> 6 -> wall
        assert_eq!(next.get(2, 0), Some(TileType::Wall));
        // (1,2): (1,1),(2,1),(2,2),(2,3) walls -> 4 -> unchanged floor
        assert_eq!(next.get(1, 2), Some(TileType::Floor));
    }

    #[test]
    fn test_organic_smoothing_reads_previous_grid() {
        // A lone wall in open space: its neighbours all see 1 wall and stay
        // floor, and the wall itself sees 0 walls and becomes floor.
        let mut grid = Grid::new_with(7, 7, TileType::Floor);
        grid.set(3, 3, TileType::Wall);
        let next = smooth(&grid, CaveMode::Organic);
        assert_eq!(next.get(3, 3), Some(TileType::Floor));
        assert_eq!(next.get(2, 3), Some(TileType::Floor));
        // Original untouched
        assert_eq!(grid.get(3, 3), Some(TileType::Wall));
    }

    #[test]
    fn test_structured_rule() {
        let grid = Grid::from_rows(&[
            ".........",
            ".........",
            ".#####...",
            ".........",
            "....#....",
            "....#....",
            ".........",
            ".........",
            ".........",
        ]);
        let next = smooth(&grid, CaveMode::Structured);
        // Within 1 of the boundary: forced wall
        assert_eq!(next.get(0, 4), Some(TileType::Wall));
        assert_eq!(next.get(4, 8), Some(TileType::Wall));
        // Within 2 of the boundary: unchanged
        assert_eq!(next.get(1, 4), Some(TileType::Floor));
        assert_eq!(next.get(1, 2), Some(TileType::Wall));
        // (3,2): E and W wall, E2 wall -> wall
        assert_eq!(next.get(3, 2), Some(TileType::Wall));
        // (5,2): W wall but E floor -> floor
        assert_eq!(next.get(5, 2), Some(TileType::Floor));
        // (4,3): N wall, S wall, S2 (4,5) wall -> wall even though it was floor
        assert_eq!(next.get(4, 3), Some(TileType::Wall));
        // (4,4): N floor, S wall -> no vertical run; E/W floor -> floor
        assert_eq!(next.get(4, 4), Some(TileType::Floor));
        // (5,5): isolated -> floor
        assert_eq!(next.get(5, 5), Some(TileType::Floor));
    }

    #[test]
    fn test_generate_grid_keeps_edges_walled() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for mode in [CaveMode::Organic, CaveMode::Structured] {
            let grid = generate_grid(40, 30, 47, 5, mode, &mut rng);
            for x in 0..40 {
                assert_eq!(grid.get(x, 0), Some(TileType::Wall));
                assert_eq!(grid.get(x, 29), Some(TileType::Wall));
            }
            for y in 0..30 {
                assert_eq!(grid.get(0, y), Some(TileType::Wall));
                assert_eq!(grid.get(39, y), Some(TileType::Wall));
            }
        }
    }
}

//! Marching-squares triangulation
//!
//! Each square's 4-bit configuration selects a convex fan of boundary points
//! (corners and edge midpoints) in clockwise order. A fan of `k` points yields
//! `k - 2` triangles, all sharing the first point.

use super::square_grid::{NodeId, Square, SquareGrid};
use super::Vec3;

/// Fan of boundary points for one square, per the standard 16-case table.
pub fn fan_points(square: &Square) -> Vec<NodeId> {
    let s = square;
    match s.configuration {
        0 => vec![],

        // One corner
        1 => vec![s.centre_left, s.centre_bottom, s.bottom_left],
        2 => vec![s.bottom_right, s.centre_bottom, s.centre_right],
        4 => vec![s.top_right, s.centre_right, s.centre_top],
        8 => vec![s.top_left, s.centre_top, s.centre_left],

        // Two adjacent corners
        3 => vec![s.centre_right, s.bottom_right, s.bottom_left, s.centre_left],
        6 => vec![s.centre_top, s.top_right, s.bottom_right, s.centre_bottom],
        9 => vec![s.top_left, s.centre_top, s.centre_bottom, s.bottom_left],
        12 => vec![s.top_left, s.top_right, s.centre_right, s.centre_left],

        // Two opposite corners
        5 => vec![
            s.centre_top,
            s.top_right,
            s.centre_right,
            s.centre_bottom,
            s.bottom_left,
            s.centre_left,
        ],
        10 => vec![
            s.top_left,
            s.centre_top,
            s.centre_right,
            s.bottom_right,
            s.centre_bottom,
            s.centre_left,
        ],

        // Three corners
        7 => vec![s.centre_top, s.top_right, s.bottom_right, s.bottom_left, s.centre_left],
        11 => vec![s.top_left, s.centre_top, s.centre_right, s.bottom_right, s.bottom_left],
        13 => vec![s.top_left, s.top_right, s.centre_right, s.centre_bottom, s.bottom_left],
        14 => vec![s.top_left, s.top_right, s.bottom_right, s.centre_bottom, s.centre_left],

        // Solid
        15 => vec![s.top_left, s.top_right, s.bottom_right, s.bottom_left],

        _ => vec![],
    }
}

/// Output of triangulating a whole square grid.
#[derive(Clone, Debug, Default)]
pub struct Triangulation {
    pub vertices: Vec<Vec3>,
    /// Index triples into `vertices`
    pub triangles: Vec<u32>,
    /// Per vertex: true if it is a corner of a fully solid square
    pub enclosed: Vec<bool>,
}

impl Triangulation {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Triangulate every square, assigning vertex indices lazily so each shared
/// node is emitted once.
pub fn triangulate(square_grid: &mut SquareGrid) -> Triangulation {
    let mut out = Triangulation::default();

    for i in 0..square_grid.squares.len() {
        let square = square_grid.squares[i];
        let points = fan_points(&square);
        if points.is_empty() {
            continue;
        }

        let indices: Vec<u32> = points
            .iter()
            .map(|&id| assign_vertex(square_grid, &mut out, id))
            .collect();

        for k in 1..indices.len() - 1 {
            out.triangles
                .extend_from_slice(&[indices[0], indices[k], indices[k + 1]]);
        }

        if square.configuration == 15 {
            for id in square.corners() {
                if let Some(index) = square_grid.node(id).vertex_index {
                    out.enclosed[index as usize] = true;
                }
            }
        }
    }

    out
}

fn assign_vertex(square_grid: &mut SquareGrid, out: &mut Triangulation, id: NodeId) -> u32 {
    let node = &mut square_grid.nodes[id.0];
    match node.vertex_index {
        Some(index) => index,
        None => {
            let index = out.vertices.len() as u32;
            node.vertex_index = Some(index);
            out.vertices.push(node.position);
            out.enclosed.push(false);
            index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, TileType};

    fn triangulate_grid(grid: &Grid) -> Triangulation {
        let mut sg = SquareGrid::new(grid, 1.0);
        triangulate(&mut sg)
    }

    /// Twice the signed area in the xz plane, summed over all triangles.
    fn total_area(t: &Triangulation) -> f32 {
        t.triangles
            .chunks(3)
            .map(|tri| {
                let a = t.vertices[tri[0] as usize];
                let b = t.vertices[tri[1] as usize];
                let c = t.vertices[tri[2] as usize];
                ((b.x - a.x) * (c.z - a.z) - (c.x - a.x) * (b.z - a.z)).abs() / 2.0
            })
            .sum()
    }

    #[test]
    fn test_full_square() {
        let t = triangulate_grid(&Grid::new_with(2, 2, TileType::Wall));
        assert_eq!(t.vertices.len(), 4);
        assert_eq!(t.triangle_count(), 2);
        assert!((total_area(&t) - 1.0).abs() < 1e-6);
        assert!(t.enclosed.iter().all(|&e| e));
    }

    #[test]
    fn test_empty_square() {
        let t = triangulate_grid(&Grid::new_with(2, 2, TileType::Floor));
        assert!(t.vertices.is_empty());
        assert!(t.triangles.is_empty());
    }

    #[test]
    fn test_every_configuration_fan_size() {
        // Expected fan length per configuration
        let expected = [0, 3, 3, 4, 3, 6, 4, 5, 3, 4, 6, 5, 4, 5, 5, 4];
        for config in 0u8..16 {
            let mut grid = Grid::new_with(2, 2, TileType::Floor);
            if config & 8 != 0 {
                grid.set(0, 1, TileType::Wall);
            }
            if config & 4 != 0 {
                grid.set(1, 1, TileType::Wall);
            }
            if config & 2 != 0 {
                grid.set(1, 0, TileType::Wall);
            }
            if config & 1 != 0 {
                grid.set(0, 0, TileType::Wall);
            }
            let mut sg = SquareGrid::new(&grid, 1.0);
            assert_eq!(sg.square(0, 0).configuration, config);
            let k = expected[config as usize];
            assert_eq!(fan_points(sg.square(0, 0)).len(), k, "config {}", config);

            let t = triangulate(&mut sg);
            assert_eq!(t.vertices.len(), k);
            assert_eq!(t.triangle_count(), k.saturating_sub(2));
        }
    }

    #[test]
    fn test_single_corner_area() {
        let mut grid = Grid::new_with(2, 2, TileType::Floor);
        grid.set(0, 0, TileType::Wall);
        let t = triangulate_grid(&grid);
        // Right triangle with legs of half a square
        assert!((total_area(&t) - 0.125).abs() < 1e-6);
        assert!(t.enclosed.iter().all(|&e| !e));
    }

    #[test]
    fn test_shared_vertices_deduplicated() {
        // 3x3 solid control grid -> 4 solid squares sharing a 3x3 lattice of corners
        let t = triangulate_grid(&Grid::new_with(3, 3, TileType::Wall));
        assert_eq!(t.vertices.len(), 9);
        assert_eq!(t.triangle_count(), 8);
        assert!((total_area(&t) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_half_wall_strip_shares_midpoints() {
        // Left column wall, right column floor: both squares are config 9
        let grid = Grid::from_rows(&["#.", "#.", "#."]);
        let t = triangulate_grid(&grid);
        // 3 left corners + 3 bottom/top midpoints on the shared horizontal edges
        assert_eq!(t.vertices.len(), 6);
        assert_eq!(t.triangle_count(), 4);
    }
}

//! Dual grid for marching squares
//!
//! Every grid cell becomes a control node. Each control node also owns two
//! half-step nodes, one above (+z) and one to the right (+x). Neighbouring
//! squares pick up their edge midpoints from these shared nodes, so a
//! midpoint used by two squares still turns into a single vertex.
//!
//! Nodes live in one arena and are addressed by `NodeId`; squares only store ids.

use super::Vec3;
use crate::grid::Grid;

/// Index into `SquareGrid::nodes`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A point that may become a mesh vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub position: Vec3,
    /// Assigned on first use by the triangulator
    pub vertex_index: Option<u32>,
}

impl Node {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            vertex_index: None,
        }
    }
}

/// A node sitting on a grid cell, active when the cell is wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlNode {
    pub node: NodeId,
    pub active: bool,
    pub above: NodeId,
    pub right: NodeId,
}

/// Corner bit values of the configuration code.
pub const TOP_LEFT: u8 = 8;
pub const TOP_RIGHT: u8 = 4;
pub const BOTTOM_RIGHT: u8 = 2;
pub const BOTTOM_LEFT: u8 = 1;

/// One 2x2 block of control nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub top_left: NodeId,
    pub top_right: NodeId,
    pub bottom_right: NodeId,
    pub bottom_left: NodeId,
    pub centre_top: NodeId,
    pub centre_right: NodeId,
    pub centre_bottom: NodeId,
    pub centre_left: NodeId,
    /// TL=8 | TR=4 | BR=2 | BL=1 for each active corner
    pub configuration: u8,
}

impl Square {
    fn new(top_left: ControlNode, top_right: ControlNode, bottom_right: ControlNode, bottom_left: ControlNode) -> Self {
        let mut configuration = 0;
        if top_left.active {
            configuration |= TOP_LEFT;
        }
        if top_right.active {
            configuration |= TOP_RIGHT;
        }
        if bottom_right.active {
            configuration |= BOTTOM_RIGHT;
        }
        if bottom_left.active {
            configuration |= BOTTOM_LEFT;
        }

        Self {
            top_left: top_left.node,
            top_right: top_right.node,
            bottom_right: bottom_right.node,
            bottom_left: bottom_left.node,
            centre_top: top_left.right,
            centre_right: bottom_right.above,
            centre_bottom: bottom_left.right,
            centre_left: bottom_left.above,
            configuration,
        }
    }

    pub fn corners(&self) -> [NodeId; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// Node arena plus the `(width - 1) x (height - 1)` squares built on it.
#[derive(Clone, Debug)]
pub struct SquareGrid {
    pub nodes: Vec<Node>,
    /// Squares stored column-major: index = x * squares_y + y
    pub squares: Vec<Square>,
    pub squares_x: usize,
    pub squares_y: usize,
}

impl SquareGrid {
    pub fn new(grid: &Grid, square_size: f32) -> Self {
        let count_x = grid.width;
        let count_y = grid.height;
        let map_width = count_x as f32 * square_size;
        let map_height = count_y as f32 * square_size;
        let half = square_size / 2.0;

        let mut nodes = Vec::with_capacity(count_x * count_y * 3);
        let mut controls = Vec::with_capacity(count_x * count_y);

        for x in 0..count_x {
            for y in 0..count_y {
                let position = Vec3::new(
                    -map_width / 2.0 + x as f32 * square_size + half,
                    0.0,
                    -map_height / 2.0 + y as f32 * square_size + half,
                );
                let active = grid.is_wall_or_outside(x as i32, y as i32);

                let node = NodeId(nodes.len());
                nodes.push(Node::new(position));
                let above = NodeId(nodes.len());
                nodes.push(Node::new(position + Vec3::new(0.0, 0.0, half)));
                let right = NodeId(nodes.len());
                nodes.push(Node::new(position + Vec3::new(half, 0.0, 0.0)));

                controls.push(ControlNode {
                    node,
                    active,
                    above,
                    right,
                });
            }
        }

        let control = |x: usize, y: usize| controls[x * count_y + y];

        let squares_x = count_x.saturating_sub(1);
        let squares_y = count_y.saturating_sub(1);
        let mut squares = Vec::with_capacity(squares_x * squares_y);
        for x in 0..squares_x {
            for y in 0..squares_y {
                squares.push(Square::new(
                    control(x, y + 1),
                    control(x + 1, y + 1),
                    control(x + 1, y),
                    control(x, y),
                ));
            }
        }

        Self {
            nodes,
            squares,
            squares_x,
            squares_y,
        }
    }

    pub fn square(&self, x: usize, y: usize) -> &Square {
        &self.squares[x * self.squares_y + y]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileType;

    #[test]
    fn test_configuration_bits() {
        // y grows "up" in mesh space: row 1 is the top of the single square
        let mut grid = Grid::new_with(2, 2, TileType::Floor);
        grid.set(0, 1, TileType::Wall); // top-left
        let sg = SquareGrid::new(&grid, 1.0);
        assert_eq!(sg.squares.len(), 1);
        assert_eq!(sg.square(0, 0).configuration, TOP_LEFT);

        grid.set(1, 0, TileType::Wall); // bottom-right
        let sg = SquareGrid::new(&grid, 1.0);
        assert_eq!(sg.square(0, 0).configuration, TOP_LEFT | BOTTOM_RIGHT);

        let full = Grid::new_with(2, 2, TileType::Wall);
        assert_eq!(SquareGrid::new(&full, 1.0).square(0, 0).configuration, 15);
        let empty = Grid::new_with(2, 2, TileType::Floor);
        assert_eq!(SquareGrid::new(&empty, 1.0).square(0, 0).configuration, 0);
    }

    #[test]
    fn test_neighbouring_squares_share_edge_nodes() {
        let grid = Grid::new_with(3, 3, TileType::Wall);
        let sg = SquareGrid::new(&grid, 1.0);
        assert_eq!(sg.squares.len(), 4);

        // Horizontal neighbours share the vertical edge
        assert_eq!(sg.square(0, 0).centre_right, sg.square(1, 0).centre_left);
        // Vertical neighbours share the horizontal edge
        assert_eq!(sg.square(0, 0).centre_top, sg.square(0, 1).centre_bottom);
        // Corners are shared too
        assert_eq!(sg.square(0, 0).top_right, sg.square(1, 1).bottom_left);
    }

    #[test]
    fn test_node_positions_centred() {
        let grid = Grid::new_with(4, 2, TileType::Wall);
        let sg = SquareGrid::new(&grid, 2.0);
        let sq = sg.square(0, 0);
        assert_eq!(sg.node(sq.bottom_left).position, Vec3::new(-3.0, 0.0, -1.0));
        assert_eq!(sg.node(sq.top_right).position, Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(sg.node(sq.centre_top).position, Vec3::new(-2.0, 0.0, 1.0));
        assert_eq!(sg.node(sq.centre_left).position, Vec3::new(-3.0, 0.0, 0.0));
        assert!(sg.nodes.iter().all(|n| n.vertex_index.is_none()));
    }
}

//! Mesh generation from a finished cave grid
//!
//! Marching squares turns wall cells into a flat surface at `y = 0`; the
//! boundary of that surface is traced and extruded downward into walls.

pub mod outline;
pub mod square_grid;
pub mod triangulator;

use std::ops::{Add, Sub};

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::grid::Grid;

pub use outline::{extrude_walls, trace_outlines, Outline, Triangle, TriangleAdjacency};
pub use square_grid::{ControlNode, Node, NodeId, Square, SquareGrid};
pub use triangulator::{fan_points, triangulate, Triangulation};

/// Three-component position or direction, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector, or `fallback` if the length is (nearly) zero.
    pub fn normalize_or(self, fallback: Vec3) -> Vec3 {
        let len = self.length();
        if len > 1e-12 {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        } else {
            fallback
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Vertex, index and normal buffers for one mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeshBuffers {
    pub vertices: Vec<Vec3>,
    /// Index triples into `vertices`
    pub triangles: Vec<u32>,
    /// One unit normal per vertex
    pub normals: Vec<Vec3>,
}

impl MeshBuffers {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Recompute `normals` by summing the face normals around each vertex.
    pub fn recalculate_normals(&mut self) {
        let mut sums = vec![Vec3::default(); self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            let a = self.vertices[tri[0] as usize];
            let b = self.vertices[tri[1] as usize];
            let c = self.vertices[tri[2] as usize];
            let face = (b - a).cross(c - a);
            for &i in tri {
                sums[i as usize] = sums[i as usize] + face;
            }
        }
        self.normals = sums.into_iter().map(|n| n.normalize_or(Vec3::UP)).collect();
    }

    /// Raw bytes of the vertex buffer, e.g. for upload or hashing.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

/// Surface and wall meshes for one cave.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CaveMesh {
    /// Marching-squares surface over the wall cells at `y = 0`
    pub floor: MeshBuffers,
    /// Strips hanging below every outline
    pub walls: MeshBuffers,
    /// Boundary loops, as indices into `floor.vertices`
    pub outlines: Vec<Outline>,
}

/// Build both meshes for a (bordered) grid.
pub fn generate_mesh(grid: &Grid, square_size: f32, wall_height: f32) -> CaveMesh {
    let mut square_grid = SquareGrid::new(grid, square_size);
    let triangulation = triangulate(&mut square_grid);
    let outlines = trace_outlines(&triangulation);

    let mut walls = extrude_walls(&triangulation.vertices, &outlines, wall_height);
    walls.recalculate_normals();

    let mut floor = MeshBuffers {
        vertices: triangulation.vertices,
        triangles: triangulation.triangles,
        normals: Vec::new(),
    };
    floor.recalculate_normals();

    log::debug!(
        "Mesh: {} floor vertices / {} triangles, {} outlines, {} wall triangles",
        floor.vertices.len(),
        floor.triangle_count(),
        outlines.len(),
        walls.triangle_count()
    );

    CaveMesh {
        floor,
        walls,
        outlines,
    }
}

//! Boundary outline tracing and wall extrusion
//!
//! An edge that belongs to exactly one triangle lies on the boundary of the
//! solid surface. Walking boundary edges vertex to vertex yields closed
//! loops, which are then extruded downward into wall strips.

use super::triangulator::Triangulation;
use super::{MeshBuffers, Vec3};

/// Closed loop of vertex indices; the first index is repeated at the end.
pub type Outline = Vec<u32>;

/// Triangle referenced by its three vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle(pub [u32; 3]);

impl Triangle {
    pub fn contains(&self, vertex: u32) -> bool {
        self.0.contains(&vertex)
    }
}

/// For every vertex, the triangles that use it.
#[derive(Clone, Debug, Default)]
pub struct TriangleAdjacency {
    by_vertex: Vec<Vec<Triangle>>,
}

impl TriangleAdjacency {
    pub fn new(vertex_count: usize, triangles: &[u32]) -> Self {
        let mut by_vertex = vec![Vec::new(); vertex_count];
        for tri in triangles.chunks_exact(3) {
            let triangle = Triangle([tri[0], tri[1], tri[2]]);
            for &v in tri {
                by_vertex[v as usize].push(triangle);
            }
        }
        Self { by_vertex }
    }

    pub fn triangles_of(&self, vertex: u32) -> &[Triangle] {
        self.by_vertex
            .get(vertex as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when exactly one triangle contains both `a` and `b`.
    pub fn is_outline_edge(&self, a: u32, b: u32) -> bool {
        self.triangles_of(a)
            .iter()
            .filter(|t| t.contains(b))
            .take(2)
            .count()
            == 1
    }

    /// First unvisited neighbour of `vertex` reachable over a boundary edge.
    fn next_outline_vertex(&self, vertex: u32, visited: &[bool]) -> Option<u32> {
        for triangle in self.triangles_of(vertex) {
            for &other in &triangle.0 {
                if other == vertex || visited[other as usize] {
                    continue;
                }
                if self.is_outline_edge(vertex, other) {
                    return Some(other);
                }
            }
        }
        None
    }
}

/// Trace every boundary loop of the triangulation.
///
/// Corners of fully solid squares are interior and never start or join a
/// loop, which also keeps the all-wall map border from being traced.
pub fn trace_outlines(triangulation: &Triangulation) -> Vec<Outline> {
    let vertex_count = triangulation.vertices.len();
    let adjacency = TriangleAdjacency::new(vertex_count, &triangulation.triangles);
    let mut visited = triangulation.enclosed.clone();
    let mut outlines = Vec::new();

    for start in 0..vertex_count as u32 {
        if visited[start as usize] {
            continue;
        }
        let Some(mut current) = adjacency.next_outline_vertex(start, &visited) else {
            continue;
        };

        visited[start as usize] = true;
        let mut outline = vec![start];
        loop {
            outline.push(current);
            visited[current as usize] = true;
            match adjacency.next_outline_vertex(current, &visited) {
                Some(next) => current = next,
                None => break,
            }
        }
        outline.push(start);
        outlines.push(outline);
    }

    outlines
}

/// Extrude each outline segment into a quad hanging `wall_height` below it.
pub fn extrude_walls(vertices: &[Vec3], outlines: &[Outline], wall_height: f32) -> MeshBuffers {
    let mut walls = MeshBuffers::default();
    let drop = Vec3::new(0.0, wall_height, 0.0);

    for outline in outlines {
        for pair in outline.windows(2) {
            let a = vertices[pair[0] as usize];
            let b = vertices[pair[1] as usize];
            let start = walls.vertices.len() as u32;

            walls.vertices.extend_from_slice(&[a, b, a - drop, b - drop]);
            walls.triangles.extend_from_slice(&[
                start,
                start + 2,
                start + 3,
                start + 3,
                start + 1,
                start,
            ]);
        }
    }

    walls
}

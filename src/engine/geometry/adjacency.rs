use std::collections::HashMap;

use serde::{ Deserialize, Serialize };
use thiserror::Error;

use super::weld::WeldMap;

/// Indices per triangle in an adjacency-expanded element list.
pub const ADJACENCY_GROUP: usize = 6;

/// What to do with an edge that has no neighbor across it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenEdgePolicy {
    /// Fail the build and report every open edge.
    #[default]
    Reject,
    /// Close the edge onto the triangle's own opposite vertex.
    CloseOnSelf,
}

/// Outcome of the neighbor search for one triangle edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeNeighbor {
    /// Canonical index of the vertex opposite the edge in the neighboring triangle.
    Shared(u32),
    /// Boundary edge, or a non-manifold edge without a distinct opposite vertex.
    Open,
}

/// Location of an edge: triangle index and edge slot (edge `j` runs from
/// vertex `j` to vertex `(j + 1) % 3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenEdge {
    pub triangle: usize,
    pub edge: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdjacencyError {
    #[error("{} open or non-manifold edge(s), first at triangle {} edge {}", .0.len(), .0[0].triangle, .0[0].edge)]
    OpenEdges(Vec<OpenEdge>),
}

/// Edges bucketed by unordered canonical vertex pair. Each bucket keeps the
/// opposite vertices in (triangle, edge) scan order, so the first entry that
/// qualifies is the same one a full scan over all triangles would find.
struct EdgeTable {
    buckets: HashMap<(u32, u32), Vec<u32>>,
}

impl EdgeTable {
    fn build(canonical: &[[u32; 3]]) -> Self {
        let mut buckets: HashMap<(u32, u32), Vec<u32>> = HashMap::with_capacity(canonical.len() * 3);
        for tri in canonical {
            for edge in 0..3 {
                let (a, b, opposite) = edge_of(tri, edge);
                buckets.entry(edge_key(a, b)).or_default().push(opposite);
            }
        }
        Self { buckets }
    }

    fn neighbor(&self, a: u32, b: u32, opposite: u32) -> EdgeNeighbor {
        self.buckets
            .get(&edge_key(a, b))
            .and_then(|candidates| candidates.iter().copied().find(|&c| c != opposite))
            .map_or(EdgeNeighbor::Open, EdgeNeighbor::Shared)
    }
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}

fn edge_of(tri: &[u32; 3], edge: usize) -> (u32, u32, u32) {
    (tri[edge], tri[(edge + 1) % 3], tri[(edge + 2) % 3])
}

/// Finds, for every edge of every triangle, the opposite vertex across it.
pub fn find_edge_neighbors(indices: &[u32], weld: &WeldMap) -> Vec<[EdgeNeighbor; 3]> {
    let canonical: Vec<[u32; 3]> = indices
        .chunks_exact(3)
        .map(|tri| weld.canonical_triangle(tri))
        .collect();
    let table = EdgeTable::build(&canonical);

    canonical
        .iter()
        .map(|tri| {
            [0, 1, 2].map(|edge| {
                let (a, b, opposite) = edge_of(tri, edge);
                table.neighbor(a, b, opposite)
            })
        })
        .collect()
}

/// Expands a triangle list into the 6-per-triangle layout consumed by
/// `GL_TRIANGLES_ADJACENCY`: `(v0, n01, v1, n12, v2, n20)`.
///
/// The `v` slots keep the original indices so attributes stay per-face; the
/// `n` slots are canonical indices, only their positions are ever read.
pub fn build_adjacency(
    indices: &[u32],
    weld: &WeldMap,
    policy: OpenEdgePolicy
) -> Result<Vec<u32>, AdjacencyError> {
    debug_assert_eq!(indices.len() % 3, 0, "triangle list length must be a multiple of 3");

    let neighbors = find_edge_neighbors(indices, weld);
    let mut expanded = Vec::with_capacity(neighbors.len() * ADJACENCY_GROUP);
    let mut open_edges = Vec::new();

    for (triangle, (tri, edges)) in indices.chunks_exact(3).zip(&neighbors).enumerate() {
        for (edge, neighbor) in edges.iter().enumerate() {
            expanded.push(tri[edge]);
            match *neighbor {
                EdgeNeighbor::Shared(opposite) => expanded.push(opposite),
                EdgeNeighbor::Open => {
                    open_edges.push(OpenEdge { triangle, edge });
                    expanded.push(tri[(edge + 2) % 3]);
                }
            }
        }
    }

    if open_edges.is_empty() {
        return Ok(expanded);
    }

    match policy {
        OpenEdgePolicy::Reject => Err(AdjacencyError::OpenEdges(open_edges)),
        OpenEdgePolicy::CloseOnSelf => {
            log::warn!("Closed {} open edge(s) onto their own triangles", open_edges.len());
            Ok(expanded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::Vertex;
    use crate::engine::loaders::mesh_creator;

    fn tetrahedron() -> (Vec<Vertex>, Vec<u32>) {
        let vertices = vec![
            Vertex::at([0.0, 0.0, 0.0]),
            Vertex::at([1.0, 0.0, 0.0]),
            Vertex::at([0.0, 1.0, 0.0]),
            Vertex::at([0.0, 0.0, 1.0]),
        ];
        (vertices, vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 1, 3, 2])
    }

    /// Reference answer: scan every triangle and edge in order.
    fn scan_neighbor(canonical: &[[u32; 3]], a: u32, b: u32, opposite: u32) -> EdgeNeighbor {
        for tri in canonical {
            for edge in 0..3 {
                let (v0, v1, v2) = edge_of(tri, edge);
                if ((v0 == a && v1 == b) || (v1 == a && v0 == b)) && v2 != opposite {
                    return EdgeNeighbor::Shared(v2);
                }
            }
        }
        EdgeNeighbor::Open
    }

    fn assert_matches_scan(vertices: &[Vertex], indices: &[u32]) {
        let weld = WeldMap::build(indices, vertices);
        let canonical: Vec<[u32; 3]> = indices.chunks_exact(3).map(|t| weld.canonical_triangle(t)).collect();
        let found = find_edge_neighbors(indices, &weld);

        for (tri, edges) in canonical.iter().zip(&found) {
            for edge in 0..3 {
                let (a, b, opposite) = edge_of(tri, edge);
                assert_eq!(edges[edge], scan_neighbor(&canonical, a, b, opposite));
            }
        }
    }

    #[test]
    fn test_tetrahedron_groups() {
        let (vertices, indices) = tetrahedron();
        let weld = WeldMap::build(&indices, &vertices);
        let adjacency = build_adjacency(&indices, &weld, OpenEdgePolicy::Reject).unwrap();

        assert_eq!(adjacency.len(), 4 * ADJACENCY_GROUP);
        // Edge (0,1) of triangle 0 is shared with triangle (0,3,1), whose
        // opposite vertex is 3.
        assert_eq!(&adjacency[0..6], &[0, 3, 1, 3, 2, 3]);
        assert_eq!(&adjacency[6..12], &[0, 1, 2, 1, 3, 1]);
    }

    #[test]
    fn test_tetrahedron_neighbors_round_trip() {
        let (vertices, indices) = tetrahedron();
        let weld = WeldMap::build(&indices, &vertices);
        let neighbors = find_edge_neighbors(&indices, &weld);
        let triangles: Vec<[u32; 3]> = indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();

        for (i, tri) in triangles.iter().enumerate() {
            for edge in 0..3 {
                let (a, b, opposite) = edge_of(tri, edge);
                let EdgeNeighbor::Shared(n) = neighbors[i][edge] else {
                    panic!("closed mesh has an open edge at {i}/{edge}");
                };
                // The neighbor triangle holds a, b and n, and points back at our opposite.
                let (k, other) = triangles
                    .iter()
                    .enumerate()
                    .find(|(k, t)| *k != i && t.contains(&a) && t.contains(&b) && t.contains(&n))
                    .expect("neighbor triangle exists");
                let back_edge = (0..3)
                    .find(|&e| edge_key(other[e], other[(e + 1) % 3]) == edge_key(a, b))
                    .expect("shared edge present in neighbor");
                assert_eq!(neighbors[k][back_edge], EdgeNeighbor::Shared(opposite));
            }
        }
    }

    #[test]
    fn test_isolated_triangle_is_rejected_on_every_edge() {
        let (vertices, indices) = mesh_creator::triangle().into_parts();
        let weld = WeldMap::build(&indices, &vertices);

        assert!(find_edge_neighbors(&indices, &weld)[0].iter().all(|n| *n == EdgeNeighbor::Open));

        let err = build_adjacency(&indices, &weld, OpenEdgePolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            AdjacencyError::OpenEdges(vec![
                OpenEdge { triangle: 0, edge: 0 },
                OpenEdge { triangle: 0, edge: 1 },
                OpenEdge { triangle: 0, edge: 2 },
            ])
        );
    }

    #[test]
    fn test_close_on_self_duplicates_opposite_vertex() {
        let (vertices, indices) = mesh_creator::triangle().into_parts();
        let weld = WeldMap::build(&indices, &vertices);
        let adjacency = build_adjacency(&indices, &weld, OpenEdgePolicy::CloseOnSelf).unwrap();

        assert_eq!(adjacency, vec![0, 2, 1, 0, 2, 1]);
        assert!(!adjacency.is_empty());
    }

    #[test]
    fn test_split_box_welds_closed() {
        let (vertices, indices) = mesh_creator::cuboid(0.5, 0.5, 0.2).into_parts();
        let weld = WeldMap::build(&indices, &vertices);

        assert_eq!(weld.unique_positions(), 8);
        let adjacency = build_adjacency(&indices, &weld, OpenEdgePolicy::Reject).unwrap();
        assert_eq!(adjacency.len(), 12 * ADJACENCY_GROUP);
        // Vertex slots keep the original (split) indices.
        for (group, tri) in adjacency.chunks_exact(6).zip(indices.chunks_exact(3)) {
            assert_eq!([group[0], group[2], group[4]], [tri[0], tri[1], tri[2]]);
        }
    }

    #[test]
    fn test_bucketed_search_matches_full_scan() {
        let (vertices, indices) = mesh_creator::sphere(1.0, 6).into_parts();
        assert_matches_scan(&vertices, &indices);

        let (vertices, indices) = mesh_creator::cuboid(1.0, 2.0, 3.0).into_parts();
        assert_matches_scan(&vertices, &indices);
    }

    #[test]
    fn test_non_manifold_edge_takes_first_distinct_opposite() {
        // Three triangles fan around edge (0,1).
        let vertices = vec![
            Vertex::at([0.0, 0.0, 0.0]),
            Vertex::at([1.0, 0.0, 0.0]),
            Vertex::at([0.0, 1.0, 0.0]),
            Vertex::at([0.0, -1.0, 0.0]),
            Vertex::at([0.0, 0.0, 1.0]),
        ];
        let indices = vec![0, 1, 2, 1, 0, 3, 0, 1, 4];
        let weld = WeldMap::build(&indices, &vertices);
        let neighbors = find_edge_neighbors(&indices, &weld);

        assert_eq!(neighbors[0][0], EdgeNeighbor::Shared(3));
        assert_eq!(neighbors[1][0], EdgeNeighbor::Shared(2));
        assert_eq!(neighbors[2][0], EdgeNeighbor::Shared(2));
        assert_matches_scan(&vertices, &indices);
    }

    #[test]
    fn test_duplicated_triangle_edge_stays_open() {
        // The same triangle twice: every candidate shares the opposite vertex.
        let vertices = vec![
            Vertex::at([0.0, 0.0, 0.0]),
            Vertex::at([1.0, 0.0, 0.0]),
            Vertex::at([0.0, 1.0, 0.0]),
        ];
        let indices = vec![0, 1, 2, 2, 1, 0];
        let weld = WeldMap::build(&indices, &vertices);

        let err = build_adjacency(&indices, &weld, OpenEdgePolicy::Reject).unwrap_err();
        let AdjacencyError::OpenEdges(edges) = err;
        assert_eq!(edges.len(), 6);
    }
}

use std::collections::HashMap;

use crate::engine::components::Vertex;

/// Bit-exact key for a position. `-0.0` is folded into `+0.0` so the two
/// zeros weld together, as they compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey([u32; 3]);

impl PositionKey {
    pub fn new(position: [f32; 3]) -> Self {
        let bits = |c: f32| if c == 0.0 { 0.0f32.to_bits() } else { c.to_bits() };
        Self([bits(position[0]), bits(position[1]), bits(position[2])])
    }
}

/// Maps every vertex referenced by a triangle list to the first vertex
/// index seen at the same position.
///
/// The scan runs triangle by triangle, slot by slot, so the winner among
/// duplicates depends only on the order of the index list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeldMap {
    by_position: HashMap<PositionKey, u32>,
    canonical: Vec<Option<u32>>,
}

impl WeldMap {
    /// Builds the map over `indices` (three per triangle). Indices must be
    /// in range for `vertices`; the mesh validates this before welding.
    pub fn build(indices: &[u32], vertices: &[Vertex]) -> Self {
        let mut by_position = HashMap::new();
        let mut canonical = vec![None; vertices.len()];

        for triangle in indices.chunks_exact(3) {
            for &idx in triangle {
                let key = PositionKey::new(vertices[idx as usize].position);
                let winner = *by_position.entry(key).or_insert(idx);
                canonical[idx as usize] = Some(winner);
            }
        }

        Self { by_position, canonical }
    }

    /// Canonical index of `vertex`, or `None` if no triangle references it.
    pub fn canonical(&self, vertex: u32) -> Option<u32> {
        self.canonical.get(vertex as usize).copied().flatten()
    }

    /// Canonical index for a position, if any referenced vertex sits there.
    pub fn lookup(&self, position: [f32; 3]) -> Option<u32> {
        self.by_position.get(&PositionKey::new(position)).copied()
    }

    /// Canonical indices of one triangle, in its original winding.
    pub fn canonical_triangle(&self, triangle: &[u32]) -> [u32; 3] {
        // Every index of a welded triangle list has an entry.
        [0, 1, 2].map(|slot| self.canonical(triangle[slot]).unwrap_or(triangle[slot]))
    }

    /// Number of distinct positions.
    pub fn unique_positions(&self) -> usize {
        self.by_position.len()
    }
}

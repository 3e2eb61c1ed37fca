use crate::engine::components::Vertex;

/// CPU-side triangle soup handed from a mesh source to `Mesh::new`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub triangle_count: usize,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, triangle_count: usize) -> Self {
        Self { vertices, indices, triangle_count }
    }

    pub fn into_parts(self) -> (Vec<Vertex>, Vec<u32>) {
        (self.vertices, self.indices)
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        Some(
            self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
                for axis in 0..3 {
                    lo[axis] = lo[axis].min(v.position[axis]);
                    hi[axis] = hi[axis].max(v.position[axis]);
                }
                (lo, hi)
            })
        )
    }
}

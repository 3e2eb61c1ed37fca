use thiserror::Error;

use crate::engine::geometry::{ build_adjacency, AdjacencyError, MeshData, OpenEdgePolicy, WeldMap };
use crate::engine::rendering::{ DeviceError, GraphicsDevice, Topology };

use super::vertex::Vertex;

/// Which element list the mesh draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    TrianglesAdjacency,
}

impl DrawMode {
    pub fn topology(self) -> Topology {
        match self {
            DrawMode::Triangles => Topology::Triangles,
            DrawMode::TrianglesAdjacency => Topology::TrianglesAdjacency,
        }
    }
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("{index_count} indices cannot describe {triangle_count} triangles")]
    IndexCountMismatch { index_count: usize, triangle_count: usize },
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { position: usize, index: u32, vertex_count: usize },
    #[error("adjacency build failed: {0}")]
    Adjacency(#[from] AdjacencyError),
    #[error("mesh upload failed: {0}")]
    Device(#[from] DeviceError),
}

/// Triangle mesh living on a graphics device.
///
/// The adjacency element list is built on the first switch to
/// `DrawMode::TrianglesAdjacency` and kept for the lifetime of the mesh.
/// Device buffers are not freed on drop; call [`Mesh::release`].
pub struct Mesh<D: GraphicsDevice = glow::Context> {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    triangle_count: usize,
    adjacency: Option<Vec<u32>>,
    mode: DrawMode,
    buffers: D::MeshBuffers,
}

impl<D: GraphicsDevice> Mesh<D> {
    /// Validates the triangle list and uploads it. Nothing reaches the
    /// device if validation fails.
    pub fn new(device: &D, data: MeshData) -> Result<Self, MeshError> {
        let MeshData { vertices, indices, triangle_count } = data;
        validate(&vertices, &indices, triangle_count)?;

        let buffers = device.upload_mesh(&vertices, &indices)?;
        log::debug!("Created mesh: {} vertices, {} triangles", vertices.len(), triangle_count);

        Ok(Self {
            vertices,
            indices,
            triangle_count,
            adjacency: None,
            mode: DrawMode::Triangles,
            buffers,
        })
    }

    /// Switches to adjacency drawing, building the adjacency list on first
    /// use. Calling it again in adjacency mode does nothing. On failure the
    /// mesh stays in `DrawMode::Triangles`.
    pub fn enable_adjacency(&mut self, device: &D, policy: OpenEdgePolicy) -> Result<(), MeshError> {
        if self.mode == DrawMode::TrianglesAdjacency {
            return Ok(());
        }

        if self.adjacency.is_none() {
            let weld = WeldMap::build(&self.indices, &self.vertices);
            let adjacency = build_adjacency(&self.indices, &weld, policy)?;
            log::debug!(
                "Built adjacency for {} triangles ({} welded positions)",
                self.triangle_count,
                weld.unique_positions()
            );
            self.adjacency = Some(adjacency);
        }

        self.mode = DrawMode::TrianglesAdjacency;
        self.rebuild_device_buffers(device);
        Ok(())
    }

    /// Switches back to plain triangles. The adjacency list stays cached.
    pub fn disable_adjacency(&mut self, device: &D) {
        if self.mode == DrawMode::Triangles {
            return;
        }
        self.mode = DrawMode::Triangles;
        self.rebuild_device_buffers(device);
    }

    /// Uploads the element list that matches the current draw mode.
    pub fn rebuild_device_buffers(&self, device: &D) {
        device.replace_elements(&self.buffers, self.elements());
    }

    pub fn draw(&self, device: &D) {
        let elements = self.elements();
        device.draw_elements(&self.buffers, self.mode.topology(), elements.len());
    }

    pub fn release(self, device: &D) {
        device.release_mesh(self.buffers);
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.mode
    }

    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn adjacency_indices(&self) -> Option<&[u32]> {
        self.adjacency.as_deref()
    }

    fn elements(&self) -> &[u32] {
        match (self.mode, &self.adjacency) {
            (DrawMode::TrianglesAdjacency, Some(adjacency)) => adjacency,
            _ => &self.indices,
        }
    }
}

impl<D: GraphicsDevice> std::fmt::Debug for Mesh<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertices.len())
            .field("triangle_count", &self.triangle_count)
            .field("mode", &self.mode)
            .field("buffers", &self.buffers)
            .finish()
    }
}

fn validate(vertices: &[Vertex], indices: &[u32], triangle_count: usize) -> Result<(), MeshError> {
    if indices.len() != triangle_count * 3 {
        return Err(MeshError::IndexCountMismatch { index_count: indices.len(), triangle_count });
    }
    match indices.iter().position(|&i| (i as usize) >= vertices.len()) {
        Some(position) =>
            Err(MeshError::IndexOutOfRange {
                position,
                index: indices[position],
                vertex_count: vertices.len(),
            }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::ADJACENCY_GROUP;
    use crate::engine::loaders::mesh_creator;
    use crate::engine::rendering::recording_device::{ DeviceCall, RecordingDevice };

    fn tetrahedron() -> MeshData {
        let vertices = vec![
            Vertex::at([0.0, 0.0, 0.0]),
            Vertex::at([1.0, 0.0, 0.0]),
            Vertex::at([0.0, 1.0, 0.0]),
            Vertex::at([0.0, 0.0, 1.0])
        ];
        MeshData::new(vertices, vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 1, 3, 2], 4)
    }

    fn replaces(device: &RecordingDevice) -> usize {
        device.count(|c| matches!(c, DeviceCall::ReplaceElements { .. }))
    }

    #[test]
    fn test_new_uploads_plain_triangles() {
        let device = RecordingDevice::new();
        let mesh = Mesh::new(&device, tetrahedron()).unwrap();

        assert_eq!(mesh.draw_mode(), DrawMode::Triangles);
        assert!(mesh.adjacency_indices().is_none());
        assert_eq!(
            device.calls(),
            vec![DeviceCall::Upload { buffers: 1, vertices: 4, elements: mesh.indices().to_vec() }]
        );
    }

    #[test]
    fn test_malformed_input_uploads_nothing() {
        let device = RecordingDevice::new();

        let mut short = tetrahedron();
        short.indices.pop();
        let err = Mesh::new(&device, short).unwrap_err();
        assert!(matches!(err, MeshError::IndexCountMismatch { index_count: 11, triangle_count: 4 }));

        let mut out_of_range = tetrahedron();
        out_of_range.indices[7] = 4;
        let err = Mesh::new(&device, out_of_range).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { position: 7, index: 4, vertex_count: 4 }));

        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_device_failure_propagates() {
        let device = RecordingDevice::new();
        device.fail_next_uploads();

        let err = Mesh::new(&device, tetrahedron()).unwrap_err();
        assert!(matches!(err, MeshError::Device(_)));
    }

    #[test]
    fn test_enable_adjacency_is_idempotent() {
        let device = RecordingDevice::new();
        let mut mesh = Mesh::new(&device, tetrahedron()).unwrap();

        mesh.enable_adjacency(&device, OpenEdgePolicy::Reject).unwrap();
        let first = mesh.adjacency_indices().unwrap().to_vec();
        mesh.enable_adjacency(&device, OpenEdgePolicy::Reject).unwrap();

        assert_eq!(mesh.draw_mode(), DrawMode::TrianglesAdjacency);
        assert_eq!(mesh.adjacency_indices().unwrap(), first.as_slice());
        assert_eq!(first.len(), 4 * ADJACENCY_GROUP);
        assert_eq!(replaces(&device), 1);
        assert!(device.calls().contains(&DeviceCall::ReplaceElements { buffers: 1, elements: first }));
    }

    #[test]
    fn test_disable_restores_plain_elements_and_keeps_cache() {
        let device = RecordingDevice::new();
        let mut mesh = Mesh::new(&device, tetrahedron()).unwrap();
        mesh.enable_adjacency(&device, OpenEdgePolicy::Reject).unwrap();
        let cached = mesh.adjacency_indices().unwrap().as_ptr();

        mesh.disable_adjacency(&device);
        assert_eq!(mesh.draw_mode(), DrawMode::Triangles);
        assert_eq!(
            device.calls().last(),
            Some(&DeviceCall::ReplaceElements { buffers: 1, elements: mesh.indices().to_vec() })
        );

        mesh.disable_adjacency(&device);
        assert_eq!(replaces(&device), 2);

        // Re-enabling reuses the cached list.
        mesh.enable_adjacency(&device, OpenEdgePolicy::Reject).unwrap();
        assert_eq!(mesh.adjacency_indices().unwrap().as_ptr(), cached);
    }

    #[test]
    fn test_draw_matches_mode() {
        let device = RecordingDevice::new();
        let mut mesh = Mesh::new(&device, mesh_creator::cuboid(1.0, 1.0, 1.0)).unwrap();

        mesh.draw(&device);
        mesh.enable_adjacency(&device, OpenEdgePolicy::Reject).unwrap();
        mesh.draw(&device);

        let draws: Vec<DeviceCall> = device
            .calls()
            .into_iter()
            .filter(|c| matches!(c, DeviceCall::Draw { .. }))
            .collect();
        assert_eq!(
            draws,
            vec![
                DeviceCall::Draw { buffers: 1, topology: Topology::Triangles, count: 36 },
                DeviceCall::Draw { buffers: 1, topology: Topology::TrianglesAdjacency, count: 72 }
            ]
        );
    }

    #[test]
    fn test_failed_build_stays_in_triangle_mode() {
        let device = RecordingDevice::new();
        let mut mesh = Mesh::new(&device, mesh_creator::triangle()).unwrap();

        let err = mesh.enable_adjacency(&device, OpenEdgePolicy::Reject).unwrap_err();
        match err {
            MeshError::Adjacency(AdjacencyError::OpenEdges(edges)) => assert_eq!(edges.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(mesh.draw_mode(), DrawMode::Triangles);
        assert!(mesh.adjacency_indices().is_none());
        assert_eq!(replaces(&device), 0);

        mesh.enable_adjacency(&device, OpenEdgePolicy::CloseOnSelf).unwrap();
        assert_eq!(mesh.adjacency_indices().unwrap(), &[0, 2, 1, 0, 2, 1]);
    }

    #[test]
    fn test_release_frees_buffers() {
        let device = RecordingDevice::new();
        let mesh = Mesh::new(&device, mesh_creator::triangle()).unwrap();
        mesh.release(&device);

        assert_eq!(device.calls().last(), Some(&DeviceCall::Release(1)));
    }
}

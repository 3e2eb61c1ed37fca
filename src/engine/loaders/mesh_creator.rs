//! Procedural meshes: a single triangle, a box and a UV sphere.
//!
//! All of them split vertices per face (normals and texcoords differ), which
//! is exactly the case the weld map exists for.

use std::f64::consts::PI;

use crate::engine::components::Vertex;
use crate::engine::geometry::MeshData;

pub fn triangle() -> MeshData {
    let normal = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex::new([-1.0, -1.0, 0.0], normal, [0.0, 0.0]),
        Vertex::new([1.0, -1.0, 0.0], normal, [1.0, 0.0]),
        Vertex::new([0.0, 1.0, 0.0], normal, [0.5, 1.0]),
    ];
    MeshData::new(vertices, vec![0, 1, 2], 1)
}

/// Box spanning `[-xsize, xsize] x [-ysize, ysize] x [-zsize, zsize]`.
///
/// Each of the 8 corners appears three times, once per adjacent face.
pub fn cuboid(xsize: f32, ysize: f32, zsize: f32) -> MeshData {
    let (x, y, z) = (xsize, ysize, zsize);
    // (corner, [(normal, texcoord); 3])
    let corners: [([f32; 3], [([f32; 3], [f32; 2]); 3]); 8] = [
        ([x, -y, z], [([1.0, 0.0, 0.0], [0.0, 0.0]), ([0.0, -1.0, 0.0], [1.0, 1.0]), ([0.0, 0.0, 1.0], [1.0, 0.0])]),
        ([x, -y, -z], [([1.0, 0.0, 0.0], [1.0, 0.0]), ([0.0, -1.0, 0.0], [1.0, 0.0]), ([0.0, 0.0, -1.0], [0.0, 0.0])]),
        ([x, y, -z], [([1.0, 0.0, 0.0], [1.0, 1.0]), ([0.0, 1.0, 0.0], [1.0, 1.0]), ([0.0, 0.0, -1.0], [0.0, 1.0])]),
        ([x, y, z], [([1.0, 0.0, 0.0], [0.0, 1.0]), ([0.0, 1.0, 0.0], [1.0, 0.0]), ([0.0, 0.0, 1.0], [1.0, 1.0])]),
        ([-x, -y, z], [([-1.0, 0.0, 0.0], [1.0, 0.0]), ([0.0, -1.0, 0.0], [0.0, 1.0]), ([0.0, 0.0, 1.0], [0.0, 0.0])]),
        ([-x, y, z], [([-1.0, 0.0, 0.0], [1.0, 1.0]), ([0.0, 1.0, 0.0], [0.0, 0.0]), ([0.0, 0.0, 1.0], [0.0, 1.0])]),
        ([-x, y, -z], [([-1.0, 0.0, 0.0], [0.0, 1.0]), ([0.0, 1.0, 0.0], [0.0, 1.0]), ([0.0, 0.0, -1.0], [1.0, 1.0])]),
        ([-x, -y, -z], [([-1.0, 0.0, 0.0], [0.0, 0.0]), ([0.0, -1.0, 0.0], [0.0, 0.0]), ([0.0, 0.0, -1.0], [1.0, 0.0])]),
    ];

    let vertices = corners
        .iter()
        .flat_map(|(position, faces)| {
            faces.iter().map(move |(normal, uv)| Vertex::new(*position, *normal, *uv))
        })
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        0, 3, 6,    0, 6, 9,     // right
        2, 11, 14,  14, 11, 17,  // front
        10, 7, 19,  10, 19, 16,  // top
        1, 22, 4,   1, 13, 22,   // bottom
        12, 15, 21, 21, 15, 18,  // left
        5, 23, 20,  5, 20, 8,    // back
    ];

    MeshData::new(vertices, indices, 12)
}

/// UV sphere around the origin with `+z` up. `segments` latitude bands
/// (at least 2) and twice as many longitude bands.
///
/// Every ring carries a duplicate seam vertex for texcoords; the seam
/// copy reuses the first vertex's angle so both positions are bit-identical
/// and the sphere welds closed.
pub fn sphere(radius: f32, segments: u32) -> MeshData {
    let vsegs = segments.max(2) as usize;
    let hsegs = vsegs * 2;
    let nverts = 1 + (vsegs - 1) * (hsegs + 1) + 1;
    let ntris = hsegs + (vsegs - 2) * hsegs * 2 + hsegs;

    let mut vertices = Vec::with_capacity(nverts);
    vertices.push(Vertex::new([0.0, 0.0, radius], [0.0, 0.0, 1.0], [0.5, 1.0]));

    for j in 0..vsegs - 1 {
        let theta = ((j + 1) as f64) / (vsegs as f64) * PI;
        let (ring_radius, z) = (theta.sin(), theta.cos());
        for i in 0..=hsegs {
            let phi = ((i % hsegs) as f64) / (hsegs as f64) * 2.0 * PI;
            let normal = [
                (ring_radius * phi.cos()) as f32,
                (ring_radius * phi.sin()) as f32,
                z as f32,
            ];
            vertices.push(
                Vertex::new(
                    normal.map(|c| c * radius),
                    normal,
                    [(i as f32) / (hsegs as f32), 1.0 - ((j + 1) as f32) / (vsegs as f32)]
                )
            );
        }
    }

    vertices.push(Vertex::new([0.0, 0.0, -radius], [0.0, 0.0, -1.0], [0.5, 0.0]));

    let mut indices: Vec<u32> = Vec::with_capacity(ntris * 3);
    // Top cap
    for i in 0..hsegs {
        indices.extend([0, 1 + i, 2 + i].map(|v| v as u32));
    }
    // Middle bands
    for j in 0..vsegs - 2 {
        for i in 0..hsegs {
            let i0 = 1 + j * (hsegs + 1) + i;
            indices.extend([i0, i0 + hsegs + 1, i0 + 1].map(|v| v as u32));
            indices.extend([i0 + 1, i0 + hsegs + 1, i0 + hsegs + 2].map(|v| v as u32));
        }
    }
    // Bottom cap
    let bottom = nverts - 1;
    for i in 0..hsegs {
        indices.extend([bottom, bottom - 1 - i, bottom - 2 - i].map(|v| v as u32));
    }

    MeshData::new(vertices, indices, ntris)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::geometry::WeldMap;

    fn assert_well_formed(mesh: &MeshData) {
        assert_eq!(mesh.indices.len(), mesh.triangle_count * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_cuboid_counts_and_bounds() {
        let mesh = cuboid(0.5, 0.5, 0.2);
        assert_well_formed(&mesh);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.bounds(), Some(([-0.5, -0.5, -0.2], [0.5, 0.5, 0.2])));
    }

    #[test]
    fn test_cuboid_faces_wind_outward() {
        let mesh = cuboid(1.0, 2.0, 3.0);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize].position);
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let n = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let centroid = [(a[0] + b[0] + c[0]) / 3.0, (a[1] + b[1] + c[1]) / 3.0, (a[2] + b[2] + c[2]) / 3.0];
            let outward: f32 = n.iter().zip(centroid).map(|(n, c)| n * c).sum();
            assert!(outward > 0.0, "triangle {:?} winds inward", tri);
        }
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = sphere(1.0, 10);
        assert_well_formed(&mesh);
        assert_eq!(mesh.vertices.len(), 1 + 9 * 21 + 1);
        assert_eq!(mesh.triangle_count, 20 + 8 * 20 * 2 + 20);
    }

    #[test]
    fn test_sphere_segments_clamped() {
        let mesh = sphere(1.0, 0);
        assert_well_formed(&mesh);
        assert_eq!(mesh.triangle_count, 8);
    }

    #[test]
    fn test_sphere_seam_welds() {
        let mesh = sphere(2.0, 4);
        let weld = WeldMap::build(&mesh.indices, &mesh.vertices);
        // poles + (vsegs - 1) rings of hsegs distinct positions
        assert_eq!(weld.unique_positions(), 2 + 3 * 8);
    }
}

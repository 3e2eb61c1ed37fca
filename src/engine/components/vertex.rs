use bytemuck::{ Pod, Zeroable };

/// Interleaved vertex as uploaded to the GPU: position, normal, texcoord.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;
    pub const NORMAL_OFFSET: i32 = 12;
    pub const TEX_COORDS_OFFSET: i32 = 24;

    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self { position, normal, tex_coords }
    }

    /// Vertex with only a position; normal and texcoord zeroed.
    pub fn at(position: [f32; 3]) -> Self {
        Self { position, ..Self::default() }
    }
}

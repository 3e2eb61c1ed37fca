use glow::HasContext;
use thiserror::Error;

use crate::engine::components::Vertex;

use super::raster_state::{ CompareFunc, CullMode, RasterState, StencilFaceOps, StencilOp, StencilState };

/// Primitive topology for an indexed draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    TrianglesAdjacency,
}

impl Topology {
    pub fn to_gl(self) -> u32 {
        match self {
            Topology::Triangles => glow::TRIANGLES,
            Topology::TrianglesAdjacency => glow::TRIANGLES_ADJACENCY,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to create {resource}: {reason}")]
    Allocation { resource: &'static str, reason: String },
}

/// Every state change and draw the renderer issues goes through this trait.
pub trait GraphicsDevice {
    /// Handle to the buffers backing one mesh.
    type MeshBuffers: std::fmt::Debug;

    fn apply_raster_state(&self, state: &RasterState);

    /// Reads the live pipeline state back from the device.
    fn capture_raster_state(&self) -> RasterState;

    fn set_viewport(&self, width: u32, height: u32);

    /// Clears color to `color`, depth to 1.0 and stencil to 0.
    fn clear_frame(&self, color: [f32; 4]);

    fn upload_mesh(&self, vertices: &[Vertex], elements: &[u32]) -> Result<Self::MeshBuffers, DeviceError>;

    /// Replaces the element buffer of an uploaded mesh.
    fn replace_elements(&self, buffers: &Self::MeshBuffers, elements: &[u32]);

    fn draw_elements(&self, buffers: &Self::MeshBuffers, topology: Topology, count: usize);

    fn release_mesh(&self, buffers: Self::MeshBuffers);

    /// Stencil value at a window pixel (origin bottom-left).
    fn read_stencil(&self, x: i32, y: i32) -> u8;
}

/// Vertex array with its vertex and element buffers.
#[derive(Clone, Copy, Debug)]
pub struct GlMeshBuffers {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
}

impl GraphicsDevice for glow::Context {
    type MeshBuffers = GlMeshBuffers;

    fn apply_raster_state(&self, state: &RasterState) {
        unsafe {
            set_capability(self, glow::DEPTH_TEST, state.depth_test);
            self.depth_func(state.depth_func.to_gl());
            self.depth_mask(state.depth_write);
            let c = state.color_write;
            self.color_mask(c, c, c, c);

            match state.stencil {
                Some(stencil) => {
                    self.enable(glow::STENCIL_TEST);
                    self.stencil_func(
                        stencil.func.to_gl(),
                        stencil.reference as i32,
                        stencil.read_mask as u32
                    );
                    self.stencil_mask(stencil.write_mask as u32);
                    for (face, ops) in [
                        (glow::FRONT, stencil.front),
                        (glow::BACK, stencil.back),
                    ] {
                        self.stencil_op_separate(
                            face,
                            ops.stencil_fail.to_gl(),
                            ops.depth_fail.to_gl(),
                            ops.depth_pass.to_gl()
                        );
                    }
                }
                None => {
                    self.disable(glow::STENCIL_TEST);
                    // Clears honour the stencil write mask.
                    self.stencil_mask(0xff);
                }
            }

            match state.cull {
                CullMode::None => self.disable(glow::CULL_FACE),
                CullMode::Front => {
                    self.enable(glow::CULL_FACE);
                    self.cull_face(glow::FRONT);
                }
                CullMode::Back => {
                    self.enable(glow::CULL_FACE);
                    self.cull_face(glow::BACK);
                }
            }

            set_capability(self, glow::DEPTH_CLAMP, state.depth_clamp);
        }
    }

    fn capture_raster_state(&self) -> RasterState {
        unsafe {
            let mut color_mask = [0i32; 4];
            self.get_parameter_i32_slice(glow::COLOR_WRITEMASK, &mut color_mask);

            let stencil = if self.is_enabled(glow::STENCIL_TEST) {
                let face_ops = |fail: u32, depth_fail: u32, pass: u32| StencilFaceOps {
                    stencil_fail: read_stencil_op(self, fail),
                    depth_fail: read_stencil_op(self, depth_fail),
                    depth_pass: read_stencil_op(self, pass),
                };
                Some(StencilState {
                    func: read_compare_func(self, glow::STENCIL_FUNC),
                    reference: self.get_parameter_i32(glow::STENCIL_REF) as u8,
                    read_mask: self.get_parameter_i32(glow::STENCIL_VALUE_MASK) as u8,
                    write_mask: self.get_parameter_i32(glow::STENCIL_WRITEMASK) as u8,
                    front: face_ops(
                        glow::STENCIL_FAIL,
                        glow::STENCIL_PASS_DEPTH_FAIL,
                        glow::STENCIL_PASS_DEPTH_PASS
                    ),
                    back: face_ops(
                        glow::STENCIL_BACK_FAIL,
                        glow::STENCIL_BACK_PASS_DEPTH_FAIL,
                        glow::STENCIL_BACK_PASS_DEPTH_PASS
                    ),
                })
            } else {
                None
            };

            let cull = if !self.is_enabled(glow::CULL_FACE) {
                CullMode::None
            } else if (self.get_parameter_i32(glow::CULL_FACE_MODE) as u32) == glow::FRONT {
                CullMode::Front
            } else {
                CullMode::Back
            };

            RasterState {
                depth_test: self.is_enabled(glow::DEPTH_TEST),
                depth_func: read_compare_func(self, glow::DEPTH_FUNC),
                depth_write: self.get_parameter_i32(glow::DEPTH_WRITEMASK) != 0,
                color_write: color_mask.iter().all(|&m| m != 0),
                stencil,
                cull,
                depth_clamp: self.is_enabled(glow::DEPTH_CLAMP),
            }
        }
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe {
            self.viewport(0, 0, width as i32, height as i32);
        }
    }

    fn clear_frame(&self, color: [f32; 4]) {
        unsafe {
            self.clear_color(color[0], color[1], color[2], color[3]);
            self.clear_depth_f32(1.0);
            self.clear_stencil(0);
            self.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
        }
    }

    fn upload_mesh(&self, vertices: &[Vertex], elements: &[u32]) -> Result<GlMeshBuffers, DeviceError> {
        let allocation = |resource: &'static str| move |reason: String| DeviceError::Allocation { resource, reason };
        unsafe {
            let vao = self.create_vertex_array().map_err(allocation("vertex array"))?;
            let vbo = match self.create_buffer() {
                Ok(vbo) => vbo,
                Err(reason) => {
                    self.delete_vertex_array(vao);
                    return Err(allocation("vertex buffer")(reason));
                }
            };
            let ebo = match self.create_buffer() {
                Ok(ebo) => ebo,
                Err(reason) => {
                    self.delete_buffer(vbo);
                    self.delete_vertex_array(vao);
                    return Err(allocation("element buffer")(reason));
                }
            };

            self.bind_vertex_array(Some(vao));

            self.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW
            );

            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            self.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(elements),
                glow::STATIC_DRAW
            );

            // position, normal, texcoord
            for (location, size, offset) in [
                (0, 3, 0),
                (1, 3, Vertex::NORMAL_OFFSET),
                (2, 2, Vertex::TEX_COORDS_OFFSET),
            ] {
                self.vertex_attrib_pointer_f32(location, size, glow::FLOAT, false, Vertex::STRIDE, offset);
                self.enable_vertex_attrib_array(location);
            }

            self.bind_vertex_array(None);
            self.bind_buffer(glow::ARRAY_BUFFER, None);

            log::debug!("Uploaded mesh: {} vertices, {} elements", vertices.len(), elements.len());
            Ok(GlMeshBuffers { vao, vbo, ebo })
        }
    }

    fn replace_elements(&self, buffers: &GlMeshBuffers, elements: &[u32]) {
        unsafe {
            self.bind_vertex_array(Some(buffers.vao));
            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffers.ebo));
            self.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(elements),
                glow::STATIC_DRAW
            );
            self.bind_vertex_array(None);
        }
    }

    fn draw_elements(&self, buffers: &GlMeshBuffers, topology: Topology, count: usize) {
        unsafe {
            self.bind_vertex_array(Some(buffers.vao));
            HasContext::draw_elements(self, topology.to_gl(), count as i32, glow::UNSIGNED_INT, 0);
            self.bind_vertex_array(None);
        }
    }

    fn release_mesh(&self, buffers: GlMeshBuffers) {
        unsafe {
            self.delete_vertex_array(buffers.vao);
            self.delete_buffer(buffers.vbo);
            self.delete_buffer(buffers.ebo);
        }
    }

    fn read_stencil(&self, x: i32, y: i32) -> u8 {
        let mut value = [0u8; 1];
        unsafe {
            self.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            self.read_pixels(
                x,
                y,
                1,
                1,
                glow::STENCIL_INDEX,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(&mut value))
            );
        }
        value[0]
    }
}

unsafe fn set_capability(gl: &glow::Context, capability: u32, enabled: bool) {
    if enabled {
        gl.enable(capability);
    } else {
        gl.disable(capability);
    }
}

unsafe fn read_compare_func(gl: &glow::Context, parameter: u32) -> CompareFunc {
    CompareFunc::from_gl(gl.get_parameter_i32(parameter) as u32).unwrap_or(CompareFunc::Always)
}

unsafe fn read_stencil_op(gl: &glow::Context, parameter: u32) -> StencilOp {
    StencilOp::from_gl(gl.get_parameter_i32(parameter) as u32).unwrap_or(StencilOp::Keep)
}

//! Test double that records every device call instead of talking to a GPU.

use std::cell::{ Cell, RefCell };

use crate::engine::components::Vertex;

use super::device::{ DeviceError, GraphicsDevice, Topology };
use super::raster_state::RasterState;

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceCall {
    ApplyState(RasterState),
    Viewport(u32, u32),
    Clear([f32; 4]),
    Upload { buffers: u32, vertices: usize, elements: Vec<u32> },
    ReplaceElements { buffers: u32, elements: Vec<u32> },
    Draw { buffers: u32, topology: Topology, count: usize },
    Release(u32),
    ReadStencil(i32, i32),
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    calls: RefCell<Vec<DeviceCall>>,
    state: Cell<RasterState>,
    next_buffers: Cell<u32>,
    fail_uploads: Cell<bool>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn fail_next_uploads(&self) {
        self.fail_uploads.set(true);
    }

    pub fn count(&self, matches: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches(c))
            .count()
    }

    fn record(&self, call: DeviceCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl GraphicsDevice for RecordingDevice {
    type MeshBuffers = u32;

    fn apply_raster_state(&self, state: &RasterState) {
        self.state.set(*state);
        self.record(DeviceCall::ApplyState(*state));
    }

    fn capture_raster_state(&self) -> RasterState {
        self.state.get()
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.record(DeviceCall::Viewport(width, height));
    }

    fn clear_frame(&self, color: [f32; 4]) {
        self.record(DeviceCall::Clear(color));
    }

    fn upload_mesh(&self, vertices: &[Vertex], elements: &[u32]) -> Result<u32, DeviceError> {
        if self.fail_uploads.get() {
            return Err(DeviceError::Allocation {
                resource: "vertex array",
                reason: "out of memory".to_string(),
            });
        }
        let buffers = self.next_buffers.get() + 1;
        self.next_buffers.set(buffers);
        self.record(DeviceCall::Upload { buffers, vertices: vertices.len(), elements: elements.to_vec() });
        Ok(buffers)
    }

    fn replace_elements(&self, buffers: &u32, elements: &[u32]) {
        self.record(DeviceCall::ReplaceElements { buffers: *buffers, elements: elements.to_vec() });
    }

    fn draw_elements(&self, buffers: &u32, topology: Topology, count: usize) {
        self.record(DeviceCall::Draw { buffers: *buffers, topology, count });
    }

    fn release_mesh(&self, buffers: u32) {
        self.record(DeviceCall::Release(buffers));
    }

    fn read_stencil(&self, x: i32, y: i32) -> u8 {
        self.record(DeviceCall::ReadStencil(x, y));
        0
    }
}

use crate::engine::rendering::device::GraphicsDevice;
use crate::engine::rendering::raster_state::{
    CompareFunc,
    CullMode,
    RasterState,
    StencilFaceOps,
    StencilOp,
    StencilState,
};
use crate::engine::rendering::render_pass_manager::{ PassStage, RenderPass, SceneDraw, Shading };

/// Counts shadow-volume surfaces behind the visible depth (depth-fail).
///
/// Back faces increment and front faces decrement, in two draws with
/// opposite culling. Depth clamp keeps the back cap at infinity from
/// being clipped by the far plane.
pub struct StencilVolumePass;

impl StencilVolumePass {
    pub fn new() -> Self {
        Self
    }

    const fn counting_state(cull: CullMode, op: StencilOp) -> RasterState {
        let ops = StencilFaceOps::on_depth_fail(op);
        RasterState {
            depth_test: true,
            depth_func: CompareFunc::Less,
            depth_write: false,
            color_write: false,
            stencil: Some(StencilState {
                func: CompareFunc::Always,
                reference: 0,
                read_mask: 0xff,
                write_mask: 0xff,
                front: ops,
                back: ops,
            }),
            cull,
            depth_clamp: true,
        }
    }

    /// Back faces only; depth-fail increments.
    pub const fn back_faces_state() -> RasterState {
        Self::counting_state(CullMode::Front, StencilOp::IncrementWrap)
    }

    /// Front faces only; depth-fail decrements.
    pub const fn front_faces_state() -> RasterState {
        Self::counting_state(CullMode::Back, StencilOp::DecrementWrap)
    }
}

impl<D: GraphicsDevice> RenderPass<D> for StencilVolumePass {
    fn stage(&self) -> PassStage {
        PassStage::StencilAccumulation
    }

    fn setup(&mut self, device: &D) {
        device.apply_raster_state(&Self::back_faces_state());
    }

    fn render(&mut self, device: &D, scene: &mut dyn SceneDraw<D>) {
        scene.draw_occluders(device, Shading::ShadowVolume);

        device.apply_raster_state(&Self::front_faces_state());
        scene.draw_occluders(device, Shading::ShadowVolume);
    }

    fn cleanup(&mut self, device: &D) {
        device.apply_raster_state(&RasterState { depth_clamp: false, ..Self::front_faces_state() });
    }

    fn name(&self) -> &'static str {
        "StencilVolume"
    }
}

impl Default for StencilVolumePass {
    fn default() -> Self {
        Self::new()
    }
}

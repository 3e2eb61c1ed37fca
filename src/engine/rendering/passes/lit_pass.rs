use crate::engine::rendering::device::GraphicsDevice;
use crate::engine::rendering::raster_state::{
    CompareFunc,
    CullMode,
    RasterState,
    StencilFaceOps,
    StencilState,
};
use crate::engine::rendering::render_pass_manager::{ PassStage, RenderPass, SceneDraw, Shading };

/// Redraws the scene fully lit wherever the stencil count is zero. Only
/// the surfaces that won the depth fill pass get through `Equal`.
pub struct LitPass;

impl LitPass {
    pub fn new() -> Self {
        Self
    }

    pub const fn raster_state() -> RasterState {
        RasterState {
            depth_test: true,
            depth_func: CompareFunc::Equal,
            depth_write: false,
            color_write: true,
            stencil: Some(StencilState {
                func: CompareFunc::Equal,
                reference: 0,
                read_mask: 0xff,
                write_mask: 0x00,
                front: StencilFaceOps::KEEP,
                back: StencilFaceOps::KEEP,
            }),
            cull: CullMode::None,
            depth_clamp: false,
        }
    }
}

impl<D: GraphicsDevice> RenderPass<D> for LitPass {
    fn stage(&self) -> PassStage {
        PassStage::LitMasked
    }

    fn setup(&mut self, device: &D) {
        device.apply_raster_state(&Self::raster_state());
    }

    fn render(&mut self, device: &D, scene: &mut dyn SceneDraw<D>) {
        scene.draw_occluders(device, Shading::FullLighting);
        scene.draw_receivers(device, Shading::FullLighting);
    }

    fn cleanup(&mut self, _device: &D) {}

    fn name(&self) -> &'static str {
        "LitMasked"
    }
}

impl Default for LitPass {
    fn default() -> Self {
        Self::new()
    }
}

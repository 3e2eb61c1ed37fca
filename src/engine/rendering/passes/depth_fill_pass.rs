use crate::engine::rendering::device::GraphicsDevice;
use crate::engine::rendering::raster_state::{ CompareFunc, CullMode, RasterState };
use crate::engine::rendering::render_pass_manager::{ PassStage, RenderPass, SceneDraw, Shading };

/// Clears the frame and lays down depth for everything, shaded with the
/// ambient term only.
pub struct DepthFillPass {
    clear_color: [f32; 4],
}

impl DepthFillPass {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self { clear_color }
    }

    pub const fn raster_state() -> RasterState {
        RasterState {
            depth_test: true,
            depth_func: CompareFunc::Less,
            depth_write: true,
            color_write: true,
            stencil: None,
            cull: CullMode::None,
            depth_clamp: false,
        }
    }
}

impl<D: GraphicsDevice> RenderPass<D> for DepthFillPass {
    fn stage(&self) -> PassStage {
        PassStage::DepthFill
    }

    fn setup(&mut self, device: &D) {
        // Write masks must be on before the clear.
        device.apply_raster_state(&Self::raster_state());
        device.clear_frame(self.clear_color);
    }

    fn render(&mut self, device: &D, scene: &mut dyn SceneDraw<D>) {
        scene.draw_occluders(device, Shading::AmbientOnly);
        scene.draw_receivers(device, Shading::AmbientOnly);
    }

    fn cleanup(&mut self, _device: &D) {}

    fn name(&self) -> &'static str {
        "DepthFill"
    }
}

impl Default for DepthFillPass {
    fn default() -> Self {
        Self::new([0.2, 0.3, 0.3, 1.0])
    }
}

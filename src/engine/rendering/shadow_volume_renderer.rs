use super::device::GraphicsDevice;
use super::passes::{ DepthFillPass, LitPass, StencilVolumePass };
use super::raster_state::RasterState;
use super::render_pass_manager::{ PassStage, RenderPassManager, SceneDraw };

/// Drives one shadowed frame: depth fill, stencil accumulation, masked
/// lighting, restore.
///
/// The device has to be in [`RasterState::resting`] when a frame starts;
/// [`ShadowVolumeRenderer::initialize`] puts it there once and every frame
/// leaves it there.
pub struct ShadowVolumeRenderer<D: GraphicsDevice> {
    manager: RenderPassManager<D>,
    frames: u64,
}

impl<D: GraphicsDevice> ShadowVolumeRenderer<D> {
    pub fn new(clear_color: [f32; 4]) -> Self {
        let mut manager = RenderPassManager::new();
        manager.add_pass(Box::new(DepthFillPass::new(clear_color)));
        manager.add_pass(Box::new(StencilVolumePass::new()));
        manager.add_pass(Box::new(LitPass::new()));
        log::debug!("Shadow volume passes: {:?}", manager.get_pass_names());

        Self { manager, frames: 0 }
    }

    pub fn initialize(&self, device: &D) {
        device.apply_raster_state(&RasterState::resting());
    }

    pub fn render_frame(&mut self, device: &D, scene: &mut dyn SceneDraw<D>, width: u32, height: u32) {
        debug_assert_eq!(
            device.capture_raster_state(),
            RasterState::resting(),
            "frame {} started outside the resting state",
            self.frames
        );

        device.set_viewport(width, height);
        self.manager.execute_passes(device, scene);
        self.frames += 1;
    }

    /// Stages the last frame went through.
    pub fn last_frame_trace(&self) -> &[PassStage] {
        self.manager.trace()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Stencil count left at a pixel by the last frame.
    pub fn probe_stencil(&self, device: &D, x: i32, y: i32) -> u8 {
        device.read_stencil(x, y)
    }
}

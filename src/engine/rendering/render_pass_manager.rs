use super::device::GraphicsDevice;
use super::raster_state::RasterState;

/// How the scene should shade what it draws in the current pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shading {
    /// Ambient term only; used while laying down depth.
    AmbientOnly,
    /// Extrude shadow volumes from the occluders' silhouettes.
    ShadowVolume,
    /// Ambient plus the light's diffuse and specular terms.
    FullLighting,
}

/// The scene side of a frame. Passes call back into it to issue draws;
/// the pipeline state is already set when they do.
pub trait SceneDraw<D: GraphicsDevice> {
    fn draw_occluders(&mut self, device: &D, shading: Shading);
    fn draw_receivers(&mut self, device: &D, shading: Shading);
}

/// Pipeline stage a frame goes through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassStage {
    DepthFill,
    StencilAccumulation,
    LitMasked,
    Restore,
}

impl PassStage {
    pub const SEQUENCE: [PassStage; 4] = [
        PassStage::DepthFill,
        PassStage::StencilAccumulation,
        PassStage::LitMasked,
        PassStage::Restore,
    ];
}

/// Trait for individual rendering passes
pub trait RenderPass<D: GraphicsDevice> {
    /// Stage this pass implements
    fn stage(&self) -> PassStage;

    /// Apply the pass's pipeline state
    fn setup(&mut self, device: &D);

    /// Issue the pass's draws
    fn render(&mut self, device: &D, scene: &mut dyn SceneDraw<D>);

    /// Leave the device ready for the next pass
    fn cleanup(&mut self, device: &D);

    fn name(&self) -> &'static str;
}

/// Runs the registered passes in order, then puts the device back into the
/// resting state. Records the stages each frame went through.
pub struct RenderPassManager<D: GraphicsDevice> {
    passes: Vec<Box<dyn RenderPass<D>>>,
    trace: Vec<PassStage>,
}

impl<D: GraphicsDevice> RenderPassManager<D> {
    pub fn new() -> Self {
        Self {
            passes: Vec::new(),
            trace: Vec::with_capacity(PassStage::SEQUENCE.len()),
        }
    }

    pub fn add_pass(&mut self, pass: Box<dyn RenderPass<D>>) {
        self.passes.push(pass);
    }

    /// Execute all rendering passes in order
    pub fn execute_passes(&mut self, device: &D, scene: &mut dyn SceneDraw<D>) {
        self.trace.clear();

        for pass in &mut self.passes {
            debug_assert_eq!(
                Some(&pass.stage()),
                PassStage::SEQUENCE.get(self.trace.len()),
                "pass '{}' out of order after {:?}",
                pass.name(),
                self.trace
            );

            pass.setup(device);
            pass.render(device, scene);
            pass.cleanup(device);
            self.trace.push(pass.stage());
        }

        device.apply_raster_state(&RasterState::resting());
        self.trace.push(PassStage::Restore);

        debug_assert_eq!(self.trace.as_slice(), &PassStage::SEQUENCE[..], "incomplete frame");
    }

    /// Stages the last frame went through
    pub fn trace(&self) -> &[PassStage] {
        &self.trace
    }

    /// Get pass names for debugging
    pub fn get_pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }
}

impl<D: GraphicsDevice> Default for RenderPassManager<D> {
    fn default() -> Self {
        Self::new()
    }
}

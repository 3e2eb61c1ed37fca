pub mod device;
pub mod passes;
pub mod raster_state;
pub mod render_pass_manager;
pub mod shadow_volume_renderer;

#[cfg(test)]
pub(crate) mod recording_device;

pub use device::{ DeviceError, GlMeshBuffers, GraphicsDevice, Topology };
pub use passes::*;
pub use raster_state::{ CompareFunc, CullMode, Facing, RasterState, StencilFaceOps, StencilOp, StencilState };
pub use render_pass_manager::{ PassStage, RenderPass, RenderPassManager, SceneDraw, Shading };
pub use shadow_volume_renderer::ShadowVolumeRenderer;

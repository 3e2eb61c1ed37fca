pub mod depth_fill_pass;
pub mod lit_pass;
pub mod stencil_volume_pass;

pub use depth_fill_pass::DepthFillPass;
pub use lit_pass::LitPass;
pub use stencil_volume_pass::StencilVolumePass;

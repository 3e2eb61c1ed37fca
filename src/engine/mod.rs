pub mod components;
pub mod config;
pub mod geometry;
pub mod loaders;
pub mod rendering;
pub mod scene;
pub mod utils;

pub use config::{ ConfigError, DemoConfig };
pub use scene::{ Scene, SceneError };

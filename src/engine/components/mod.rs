pub mod camera;
pub mod mesh;
pub mod shader;
pub mod vertex;

pub use camera::{ Camera, CameraMovement, PointLight };
pub use mesh::{ DrawMode, Mesh, MeshError };
pub use shader::{ ShaderError, ShaderProgram, ShaderSources, ShaderStage, UniformValue };
pub use vertex::Vertex;

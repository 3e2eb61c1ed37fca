use glow::HasContext;
use thiserror::Error;

use crate::engine::utils::math::{ Mat3x3, Mat4x4 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

impl ShaderStage {
    fn to_gl(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to create {0} shader object: {1}")]
    Create(ShaderStage, String),
    #[error("{program}: {stage} shader failed to compile:\n{log}")]
    Compile { program: String, stage: ShaderStage, log: String },
    #[error("{program}: link failed:\n{log}")]
    Link { program: String, log: String },
}

/// Value for [`ShaderProgram::set_uniform`]. Matrices are row-major and
/// uploaded with transpose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat2([f32; 4]),
    Mat3(Mat3x3),
    Mat4(Mat4x4),
}

/// Sources for one program. `geometry` is optional.
#[derive(Clone, Copy, Debug)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub geometry: Option<&'a str>,
    pub fragment: &'a str,
}

/// Linked GLSL program.
#[derive(Debug)]
pub struct ShaderProgram {
    name: String,
    program: glow::Program,
}

impl ShaderProgram {
    pub fn new(gl: &glow::Context, name: &str, sources: ShaderSources<'_>) -> Result<Self, ShaderError> {
        let stages = [
            (ShaderStage::Vertex, Some(sources.vertex)),
            (ShaderStage::Geometry, sources.geometry),
            (ShaderStage::Fragment, Some(sources.fragment)),
        ];

        unsafe {
            let mut shaders = Vec::with_capacity(3);
            for (stage, source) in stages {
                let Some(source) = source else {
                    continue;
                };
                match compile_shader(gl, name, stage, source) {
                    Ok(shader) => shaders.push(shader),
                    Err(e) => {
                        for shader in shaders {
                            gl.delete_shader(shader);
                        }
                        return Err(e);
                    }
                }
            }

            let program = match gl.create_program() {
                Ok(program) => program,
                Err(reason) => {
                    for shader in shaders {
                        gl.delete_shader(shader);
                    }
                    return Err(ShaderError::Link { program: name.to_string(), log: reason });
                }
            };
            for &shader in &shaders {
                gl.attach_shader(program, shader);
            }
            gl.link_program(program);
            let linked = gl.get_program_link_status(program);

            for shader in shaders {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }

            if !linked {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ShaderError::Link { program: name.to_string(), log });
            }

            log::info!(
                "Linked shader program '{}'{}",
                name,
                if sources.geometry.is_some() { " (with geometry stage)" } else { "" }
            );
            Ok(Self { name: name.to_string(), program })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn use_program(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
        }
    }

    /// Sets a uniform on this program, which must be in use. Names the
    /// program does not expose (or that the driver optimised out) are ignored.
    pub fn set_uniform(&self, gl: &glow::Context, name: &str, value: UniformValue) {
        unsafe {
            let Some(loc) = gl.get_uniform_location(self.program, name) else {
                return;
            };
            let loc = Some(&loc);
            match value {
                UniformValue::Bool(v) => gl.uniform_1_i32(loc, v as i32),
                UniformValue::Int(v) => gl.uniform_1_i32(loc, v),
                UniformValue::Float(v) => gl.uniform_1_f32(loc, v),
                UniformValue::Vec2(v) => gl.uniform_2_f32(loc, v[0], v[1]),
                UniformValue::Vec3(v) => gl.uniform_3_f32(loc, v[0], v[1], v[2]),
                UniformValue::Vec4(v) => gl.uniform_4_f32(loc, v[0], v[1], v[2], v[3]),
                UniformValue::Mat2(m) => gl.uniform_matrix_2_f32_slice(loc, true, &m),
                UniformValue::Mat3(m) => gl.uniform_matrix_3_f32_slice(loc, true, &m),
                UniformValue::Mat4(m) => gl.uniform_matrix_4_f32_slice(loc, true, &m),
            }
        }
    }

    pub fn delete(self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
        }
    }
}

unsafe fn compile_shader(
    gl: &glow::Context,
    program: &str,
    stage: ShaderStage,
    source: &str
) -> Result<glow::Shader, ShaderError> {
    let shader = gl.create_shader(stage.to_gl()).map_err(|e| ShaderError::Create(stage, e))?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(ShaderError::Compile { program: program.to_string(), stage, log });
    }
    Ok(shader)
}

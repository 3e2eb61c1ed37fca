use thiserror::Error;

use crate::engine::components::{
    Camera,
    Mesh,
    MeshError,
    PointLight,
    ShaderError,
    ShaderProgram,
    ShaderSources,
    UniformValue,
};
use crate::engine::config::{ DemoConfig, OccluderShape };
use crate::engine::geometry::MeshData;
use crate::engine::loaders::mesh_creator;
use crate::engine::loaders::obj_loader::{ load_obj, ObjError };
use crate::engine::rendering::{ SceneDraw, Shading };
use crate::engine::utils::math::{
    mat4x4_mul,
    mat4x4_rot_x,
    mat4x4_scale,
    mat4x4_translate,
    Mat4x4,
    Vec3,
};

const GROUND_OFFSET: f32 = -1.0;
const LAMP_RADIUS: f32 = 0.1;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Obj(#[from] ObjError),
}

struct Programs {
    lit: ShaderProgram,
    lamp: ShaderProgram,
    shadow_volume: ShaderProgram,
}

impl Programs {
    fn new(gl: &glow::Context) -> Result<Self, ShaderError> {
        let lit = ShaderProgram::new(gl, "diffuse", ShaderSources {
            vertex: include_str!("../assets/shaders/vertex_diffuse.glsl"),
            geometry: None,
            fragment: include_str!("../assets/shaders/fragment_diffuse.glsl"),
        })?;
        let lamp = ShaderProgram::new(gl, "lamp", ShaderSources {
            vertex: include_str!("../assets/shaders/vertex_lamp.glsl"),
            geometry: None,
            fragment: include_str!("../assets/shaders/fragment_lamp.glsl"),
        })?;
        let shadow_volume = ShaderProgram::new(gl, "shadow_volume", ShaderSources {
            vertex: include_str!("../assets/shaders/vertex_shadow_volume.glsl"),
            geometry: Some(include_str!("../assets/shaders/geometry_shadow_volume.glsl")),
            fragment: include_str!("../assets/shaders/fragment_shadow_volume.glsl"),
        })?;
        Ok(Self { lit, lamp, shadow_volume })
    }

    fn delete(self, gl: &glow::Context) {
        self.lit.delete(gl);
        self.lamp.delete(gl);
        self.shadow_volume.delete(gl);
    }
}

/// Everything drawn in a frame: one occluder in adjacency mode, a ground
/// slab and the lamp marker, lit by a single point light.
pub struct Scene {
    programs: Programs,
    occluder: Mesh,
    ground: Mesh,
    lamp: Mesh,
    pub camera: Camera,
    pub light: PointLight,
    object_color: Vec3,
    ground_color: Vec3,
    ambient_strength: f32,
    occluder_scale: f32,
    rotate_occluder: bool,
    occluder_angle: f32,
    aspect_ratio: f32,
}

impl Scene {
    pub fn new(gl: &glow::Context, config: &DemoConfig) -> Result<Self, SceneError> {
        let programs = Programs::new(gl)?;

        let (occluder_data, occluder_scale) = occluder_mesh(&config.occluder)?;
        let mut occluder = Mesh::new(gl, occluder_data)?;
        occluder.enable_adjacency(gl, config.open_edge_policy)?;
        log::info!(
            "Occluder {:?}: {} triangles in adjacency mode",
            config.occluder,
            occluder.triangle_count()
        );

        let ground = Mesh::new(gl, mesh_creator::cuboid(5.0, 0.01, 5.0))?;
        let lamp = Mesh::new(gl, mesh_creator::sphere(LAMP_RADIUS, 10))?;

        let mut camera = Camera::new(config.camera.position, config.camera.pitch, config.camera.yaw);
        camera.fov_degrees = config.camera.fov_degrees;
        camera.near = config.camera.near;
        camera.far = config.camera.far;
        camera.move_speed = config.camera.move_speed;
        camera.mouse_sensitivity = config.camera.mouse_sensitivity;

        Ok(Self {
            programs,
            occluder,
            ground,
            lamp,
            camera,
            light: PointLight {
                position: config.light.position,
                color: config.light.color,
                move_speed: config.light.move_speed,
            },
            object_color: config.colors.object,
            ground_color: config.colors.ground,
            ambient_strength: config.colors.ambient_strength,
            occluder_scale,
            rotate_occluder: config.rotate_occluder,
            occluder_angle: 0.0,
            aspect_ratio: (config.window.width as f32) / (config.window.height.max(1) as f32),
        })
    }

    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = (width as f32) / (height as f32);
        }
    }

    /// Advances animation to `elapsed_seconds` since start.
    pub fn update(&mut self, elapsed_seconds: f32) {
        if self.rotate_occluder {
            self.occluder_angle = elapsed_seconds;
        }
    }

    pub fn release(self, gl: &glow::Context) {
        self.occluder.release(gl);
        self.ground.release(gl);
        self.lamp.release(gl);
        self.programs.delete(gl);
    }

    fn occluder_model(&self) -> Mat4x4 {
        let s = self.occluder_scale;
        mat4x4_mul(mat4x4_rot_x(self.occluder_angle), mat4x4_scale(s, s, s))
    }

    fn set_camera_uniforms(&self, gl: &glow::Context, program: &ShaderProgram, model: Mat4x4) {
        program.set_uniform(gl, "model", UniformValue::Mat4(model));
        program.set_uniform(gl, "view", UniformValue::Mat4(self.camera.view_matrix()));
        program.set_uniform(
            gl,
            "projection",
            UniformValue::Mat4(self.camera.projection_matrix(self.aspect_ratio))
        );
    }

    fn draw_lit(&self, gl: &glow::Context, mesh: &Mesh, model: Mat4x4, color: Vec3, shading: Shading) {
        let program = &self.programs.lit;
        program.use_program(gl);
        self.set_camera_uniforms(gl, program, model);
        program.set_uniform(gl, "lightPos", UniformValue::Vec3(self.light.position));
        program.set_uniform(gl, "lightColor", UniformValue::Vec3(self.light.color));
        program.set_uniform(gl, "viewPos", UniformValue::Vec3(self.camera.position));
        program.set_uniform(gl, "objectColor", UniformValue::Vec3(color));
        program.set_uniform(gl, "ambientStrength", UniformValue::Float(self.ambient_strength));
        program.set_uniform(gl, "fullLighting", UniformValue::Bool(shading == Shading::FullLighting));
        mesh.draw(gl);
    }
}

impl SceneDraw<glow::Context> for Scene {
    fn draw_occluders(&mut self, gl: &glow::Context, shading: Shading) {
        let model = self.occluder_model();
        match shading {
            Shading::ShadowVolume => {
                let program = &self.programs.shadow_volume;
                program.use_program(gl);
                self.set_camera_uniforms(gl, program, model);
                program.set_uniform(gl, "lightPos", UniformValue::Vec3(self.light.position));
                self.occluder.draw(gl);
            }
            Shading::AmbientOnly | Shading::FullLighting => {
                self.draw_lit(gl, &self.occluder, model, self.object_color, shading);
            }
        }
    }

    fn draw_receivers(&mut self, gl: &glow::Context, shading: Shading) {
        let ground_model = mat4x4_translate(0.0, GROUND_OFFSET, 0.0);
        self.draw_lit(gl, &self.ground, ground_model, self.ground_color, shading);

        // The lamp is unlit, so it looks the same in both passes.
        let [x, y, z] = self.light.position;
        let program = &self.programs.lamp;
        program.use_program(gl);
        self.set_camera_uniforms(gl, program, mat4x4_translate(x, y, z));
        program.set_uniform(gl, "lightColor", UniformValue::Vec3(self.light.color));
        self.lamp.draw(gl);
    }
}

/// Builds the occluder mesh and the uniform scale to draw it with.
fn occluder_mesh(shape: &OccluderShape) -> Result<(MeshData, f32), ObjError> {
    Ok(match shape {
        OccluderShape::Triangle => (mesh_creator::triangle(), 1.0),
        OccluderShape::Box { half_extents: [x, y, z] } => (mesh_creator::cuboid(*x, *y, *z), 1.0),
        OccluderShape::Sphere { radius, segments } => (mesh_creator::sphere(*radius, *segments), 1.0),
        OccluderShape::Obj { path, scale } => (load_obj(path)?, *scale),
    })
}

use crate::engine::utils::math::{
    build_view_matrix,
    mat4x4_perspective,
    vec3_add,
    vec3_scale,
    view_basis,
    Mat4x4,
    Vec3,
};

const PITCH_LIMIT: f32 = 1.5;
const MIN_FOV_DEGREES: f32 = 1.0;
const MAX_FOV_DEGREES: f32 = 45.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Fly camera. Yaw 0 and pitch 0 look down `-z`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pitch: f32,
    yaw: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Radians per pixel of mouse drag.
    pub mouse_sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            position,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            yaw,
            fov_degrees: MAX_FOV_DEGREES,
            near: 0.1,
            far: 100.0,
            move_speed: 2.5,
            mouse_sensitivity: 0.002,
        }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn view_matrix(&self) -> Mat4x4 {
        build_view_matrix(self.position, self.pitch, self.yaw)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4x4 {
        mat4x4_perspective(self.fov_degrees.to_radians(), aspect_ratio, self.near, self.far)
    }

    pub fn process_keyboard(&mut self, movement: CameraMovement, delta_seconds: f32) {
        let (right, _, back) = view_basis(self.pitch, self.yaw);
        let step = self.move_speed * delta_seconds;
        let offset = match movement {
            CameraMovement::Forward => vec3_scale(back, -step),
            CameraMovement::Backward => vec3_scale(back, step),
            CameraMovement::Left => vec3_scale(right, -step),
            CameraMovement::Right => vec3_scale(right, step),
        };
        self.position = vec3_add(self.position, offset);
    }

    /// Drag deltas in pixels; positive `dy` looks up.
    pub fn process_mouse_drag(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch = (self.pitch + dy * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scroll zoom: narrows the field of view for positive `amount`.
    pub fn process_scroll(&mut self, amount: f32) {
        self.fov_degrees = (self.fov_degrees - amount).clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new([0.0, 0.0, 3.0], 0.0, 0.0)
    }
}

/// The single point light.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    /// World units per second for keyboard movement.
    pub move_speed: f32,
}

impl PointLight {
    pub fn translate(&mut self, direction: [f32; 2], delta_seconds: f32) {
        let step = self.move_speed * delta_seconds;
        self.position[0] += direction[0] * step;
        self.position[1] += direction[1] * step;
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self { position: [1.2, 2.0, 3.0], color: [1.0, 1.0, 1.0], move_speed: 1.0 }
    }
}

use std::collections::HashSet;

use thiserror::Error;
use winit::keyboard::KeyCode;

use crate::engine::components::{ Camera, CameraMovement, PointLight };
use crate::engine::rendering::ShadowVolumeRenderer;
use crate::engine::{ ConfigError, DemoConfig, Scene, SceneError };

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("window creation failed: {0}")]
    Window(String),
    #[error("OpenGL context setup failed: {0}")]
    Context(String),
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Keys held down and the state of a left-button drag.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    dragging: bool,
    last_cursor: Option<(f64, f64)>,
}

impl InputState {
    pub fn key_changed(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn left_button_changed(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    /// Returns the drag delta in pixels (x right, y up) while the left
    /// button is held.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let previous = self.last_cursor.replace((x, y));
        match previous {
            Some((px, py)) if self.dragging => Some(((x - px) as f32, (py - y) as f32)),
            _ => None,
        }
    }

    /// Moves the camera (WASD) and the light (arrow keys) for keys held
    /// over `delta_seconds`.
    pub fn apply_held_keys(&self, camera: &mut Camera, light: &mut PointLight, delta_seconds: f32) {
        for key in &self.held {
            match key {
                KeyCode::KeyW => camera.process_keyboard(CameraMovement::Forward, delta_seconds),
                KeyCode::KeyS => camera.process_keyboard(CameraMovement::Backward, delta_seconds),
                KeyCode::KeyA => camera.process_keyboard(CameraMovement::Left, delta_seconds),
                KeyCode::KeyD => camera.process_keyboard(CameraMovement::Right, delta_seconds),
                KeyCode::ArrowUp => light.translate([0.0, 1.0], delta_seconds),
                KeyCode::ArrowDown => light.translate([0.0, -1.0], delta_seconds),
                KeyCode::ArrowLeft => light.translate([-1.0, 0.0], delta_seconds),
                KeyCode::ArrowRight => light.translate([1.0, 0.0], delta_seconds),
                _ => {}
            }
        }
    }
}

/// The demo: scene, renderer and input on top of one GL context.
pub struct DemoProgram {
    gl: glow::Context,
    scene: Scene,
    renderer: ShadowVolumeRenderer<glow::Context>,
    input: InputState,
    stencil_probe: Option<[i32; 2]>,
    last_elapsed: f32,
}

impl DemoProgram {
    pub fn new(gl: glow::Context, config: &DemoConfig) -> Result<Self, AppError> {
        let scene = Scene::new(&gl, config)?;
        let renderer = ShadowVolumeRenderer::new(config.clear_color);
        renderer.initialize(&gl);

        Ok(Self {
            gl,
            scene,
            renderer,
            input: InputState::default(),
            stencil_probe: config.stencil_probe,
            last_elapsed: 0.0,
        })
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((dx, dy)) = self.input.cursor_moved(x, y) {
            self.scene.camera.process_mouse_drag(dx, dy);
        }
    }

    pub fn scrolled(&mut self, amount: f32) {
        self.scene.camera.process_scroll(amount);
    }

    /// Renders one frame at `elapsed` seconds since start.
    pub fn render(&mut self, width: u32, height: u32, elapsed: f32) {
        let delta = (elapsed - self.last_elapsed).max(0.0);
        self.last_elapsed = elapsed;

        self.input.apply_held_keys(&mut self.scene.camera, &mut self.scene.light, delta);
        self.scene.update(elapsed);
        self.scene.set_viewport_size(width, height);

        self.renderer.render_frame(&self.gl, &mut self.scene, width, height);

        if let Some([x, y]) = self.stencil_probe {
            let count = self.renderer.probe_stencil(&self.gl, x, y);
            log::debug!("frame {}: stencil at ({x}, {y}) = {count}", self.renderer.frames_rendered());
        }
    }

    pub fn cleanup(self) {
        log::info!("Releasing scene after {} frames", self.renderer.frames_rendered());
        self.scene.release(&self.gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_only_while_button_held() {
        let mut input = InputState::default();
        assert_eq!(input.cursor_moved(10.0, 10.0), None);
        assert_eq!(input.cursor_moved(20.0, 5.0), None);

        input.left_button_changed(true);
        assert_eq!(input.cursor_moved(25.0, 1.0), Some((5.0, 4.0)));

        input.left_button_changed(false);
        assert_eq!(input.cursor_moved(30.0, 1.0), None);
    }

    #[test]
    fn test_held_keys_move_camera_and_light() {
        let mut input = InputState::default();
        let mut camera = Camera::default();
        let mut light = PointLight::default();

        input.key_changed(KeyCode::KeyW, true);
        input.key_changed(KeyCode::ArrowUp, true);
        input.apply_held_keys(&mut camera, &mut light, 0.2);
        assert!((camera.position[2] - 2.5).abs() < 1e-5);
        assert!((light.position[1] - 2.2).abs() < 1e-5);

        input.key_changed(KeyCode::KeyW, false);
        input.key_changed(KeyCode::ArrowUp, false);
        input.apply_held_keys(&mut camera, &mut light, 1.0);
        assert!((camera.position[2] - 2.5).abs() < 1e-5);
    }
}

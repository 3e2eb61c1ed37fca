use glutin::config::{ ConfigTemplateBuilder, GlConfig };
use glutin::context::{ ContextApi, ContextAttributesBuilder, GlProfile, Version };
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{ SurfaceAttributesBuilder, WindowSurface };
use glow::HasContext;
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent };
use winit::event_loop::{ ActiveEventLoop, EventLoop };
use winit::keyboard::{ KeyCode, PhysicalKey };
use winit::window::{ Window, WindowId };

use stencil_shadows::app::{ AppError, DemoProgram };
use stencil_shadows::engine::DemoConfig;

struct App {
    config: DemoConfig,
    window: Option<Window>,
    gl_context: Option<glutin::context::PossiblyCurrentContext>,
    gl_surface: Option<glutin::surface::Surface<WindowSurface>>,
    program: Option<DemoProgram>,
    start_time: Option<Instant>,
    error: Option<AppError>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            window: None,
            gl_context: None,
            gl_surface: None,
            program: None,
            start_time: None,
            error: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));

        // Shadow volumes need a stencil buffer on the default framebuffer.
        let template = ConfigTemplateBuilder::new().with_depth_size(24).with_stencil_size(8);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, |configs| {
                configs
                    .max_by_key(|c| (c.stencil_size(), c.depth_size()))
                    .expect("display returned an empty config list")
            })
            .map_err(|e| AppError::Context(e.to_string()))?;
        let window = window.ok_or_else(|| AppError::Window("no window was created".to_string()))?;

        if gl_config.stencil_size() < 8 {
            return Err(AppError::Context(format!("need 8 stencil bits, got {}", gl_config.stencil_size())));
        }
        log::info!(
            "Framebuffer config: depth {} bits, stencil {} bits",
            gl_config.depth_size(),
            gl_config.stencil_size()
        );

        let raw_handle = window
            .window_handle()
            .map_err(|e| AppError::Window(e.to_string()))?
            .as_raw();

        let display = gl_config.display();
        let ctx_attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));

        let not_current = unsafe { display.create_context(&gl_config, &ctx_attrs) }.map_err(|e|
            AppError::Context(e.to_string())
        )?;

        let size = window.inner_size();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>
            ::new()
            .build(
                raw_handle,
                NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN)
            );
        let surface = unsafe { display.create_window_surface(&gl_config, &attrs) }.map_err(|e|
            AppError::Context(e.to_string())
        )?;
        let ctx = not_current.make_current(&surface).map_err(|e| AppError::Context(e.to_string()))?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                CString::new(s)
                    .map(|symbol| display.get_proc_address(&symbol))
                    .unwrap_or(std::ptr::null())
            })
        };
        log::info!("OpenGL context ready: {:?}", gl.version());

        let program = DemoProgram::new(gl, &self.config)?;

        self.start_time = Some(Instant::now());
        window.request_redraw();

        self.window = Some(window);
        self.gl_context = Some(ctx);
        self.gl_surface = Some(surface);
        self.program = Some(program);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::RedrawRequested => {
                let (Some(window), Some(surface), Some(ctx), Some(program)) = (
                    &self.window,
                    &self.gl_surface,
                    &self.gl_context,
                    &mut self.program,
                ) else {
                    return;
                };

                let elapsed = self.start_time.map(|s| s.elapsed().as_secs_f32()).unwrap_or(0.0);
                let size = window.inner_size();
                program.render(size.width, size.height, elapsed);

                let swapped = surface.swap_buffers(ctx);
                window.request_redraw();
                if let Err(e) = swapped {
                    self.fail(event_loop, AppError::Context(e.to_string()));
                }
            }

            WindowEvent::Resized(size) => {
                if let (Some(surface), Some(ctx)) = (&self.gl_surface, &self.gl_context) {
                    if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
                        surface.resize(ctx, w, h);
                    }
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    event_loop.exit();
                    return;
                }
                if let Some(program) = &mut self.program {
                    program.input_mut().key_changed(code, state == ElementState::Pressed);
                }
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                if let Some(program) = &mut self.program {
                    program.input_mut().left_button_changed(state == ElementState::Pressed);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(program) = &mut self.program {
                    program.cursor_moved(position.x, position.y);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / 20.0) as f32,
                };
                if let Some(program) = &mut self.program {
                    program.scrolled(amount);
                }
            }

            _ => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(program) = self.program.take() {
            program.cleanup();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => DemoConfig::load(path)?,
        None => {
            log::info!("No config file given, using defaults");
            DemoConfig::default()
        }
    };

    let event_loop = EventLoop::new().map_err(AppError::from)?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app).map_err(AppError::from)?;

    match app.error.take() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

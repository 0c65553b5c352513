//! Raging sea - an animated water plane under an environment sky
//!
//! Drag to orbit, scroll to zoom. `H` opens the debug panel; arrows pick and
//! nudge a parameter (hold Shift for bigger steps), `R` resets it.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Window, WindowId},
};

use ragingsea::camera::OrbitCamera;
use ragingsea::cli::Args;
use ragingsea::clock::{FrameDriver, MonotonicClock};
use ragingsea::controls::DebugPanel;
use ragingsea::environment::CubeMapImage;
use ragingsea::mesh::WaterPlane;
use ragingsea::noise::WaveNoise;
use ragingsea::params::{OrbitConfig, RenderConfig, WaterParams};
use ragingsea::rendering::{RenderSystem, SkyboxUniforms, WaterUniforms};

const TITLE: &str = "Raging Sea";

/// Panel steps per arrow press while Shift is held
const COARSE_STEPS: i32 = 100;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Scene
    params: WaterParams,
    driver: FrameDriver<MonotonicClock>,
    camera: OrbitCamera,
    plane: WaterPlane,
    noise: WaveNoise,

    // Debug panel
    panel: DebugPanel,
    modifiers: ModifiersState,

    // Configuration
    render_config: RenderConfig,
}

impl App {
    fn new(render_config: RenderConfig, show_panel: bool) -> Self {
        Self {
            window: None,
            render_system: None,
            params: WaterParams::default(),
            driver: FrameDriver::new(MonotonicClock::start()),
            camera: OrbitCamera::new(OrbitConfig::default()),
            plane: WaterPlane::from_config(&render_config),
            noise: WaveNoise::default(),
            panel: DebugPanel::new(show_panel),
            modifiers: ModifiersState::empty(),
            render_config,
        }
    }

    /// Advance time, then submit one frame with the current parameters
    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        self.driver.tick(&mut self.params);
        self.camera.update();

        let cpu_waves = self.render_config.cpu_waves;
        if cpu_waves {
            self.plane.displace(&self.params, &self.noise);
            render_system.update_vertices(&self.plane.vertices);
        }

        let (width, height) = render_system.size();
        let matrices = self
            .camera
            .matrices(&self.render_config, width as f32 / height.max(1) as f32);

        render_system.update_water_uniforms(&WaterUniforms::new(
            &self.params,
            matrices.view_proj,
            cpu_waves,
            render_system.srgb_target(),
        ));
        render_system.update_skybox_uniforms(&SkyboxUniforms {
            inv_view_proj: matrices.sky_inv_view_proj.to_cols_array_2d(),
        });

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => error!("Render error: {:?}", e),
        }
    }

    /// Route a key press to the debug panel
    fn handle_panel_key(&mut self, key: KeyCode) {
        if key == KeyCode::KeyH {
            self.panel.toggle();
        } else if self.panel.is_open() {
            let steps = if self.modifiers.shift_key() {
                COARSE_STEPS
            } else {
                1
            };
            let result = match key {
                KeyCode::ArrowUp => {
                    self.panel.select_prev();
                    Ok(())
                }
                KeyCode::ArrowDown => {
                    self.panel.select_next();
                    Ok(())
                }
                KeyCode::ArrowLeft => self.panel.nudge(&mut self.params, -steps),
                KeyCode::ArrowRight => self.panel.nudge(&mut self.params, steps),
                KeyCode::KeyR => self.panel.reset_selected(&mut self.params),
                _ => return,
            };
            if let Err(e) = result {
                warn!("{}", e);
            }
        } else {
            return;
        }

        self.refresh_title();
    }

    fn refresh_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.panel.is_open() {
            let status = self.panel.status_line(&self.params);
            window.set_title(&format!("{} | {}", TITLE, status));
        } else {
            window.set_title(&format!("{} (H: debug panel)", TITLE));
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let environment = CubeMapImage::load_or_gradient(&self.render_config.environment_dir);
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.plane,
            &environment,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                error!("{:#}", e);
                event_loop.exit();
                return;
            }
        };

        info!(
            "Water plane: {0}x{0} segments, waves on the {1}",
            self.plane.segments(),
            if self.render_config.cpu_waves { "CPU" } else { "GPU" }
        );

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.refresh_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.handle_panel_key(key),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.camera.set_dragging(state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.camera.cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.zoom(lines);
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.tick(event_loop);
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn"),
    )
    .init();

    let args = Args::parse();
    let mut app = App::new(args.render_config(), args.show_panel);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated with an error")?;

    info!("{} frames rendered", app.driver.frames());
    Ok(())
}

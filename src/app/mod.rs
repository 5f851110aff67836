mod egui_host;
mod timing;

use crate::assets::{self, VehicleModel};
use crate::config::ViewerConfig;
use crate::render::{OrbitCamera, RenderContext};
use crate::scene::materials::MaterialBindings;
use crate::scene::ViewerScene;
use crate::ui::UiState;
use egui_host::EguiHost;
use timing::FrameTiming;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

const DRAG_ORBIT_SENSITIVITY: f32 = 0.005;
const WHEEL_ZOOM_STEP: f32 = 0.6;

/// Scene-side state that only exists once the assets have loaded. Owns the
/// material bindings for the viewer's lifetime; dropped with the window.
struct Viewer {
    scene: ViewerScene,
    model: VehicleModel,
    bindings: MaterialBindings,
    camera: OrbitCamera,
}

pub struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render: Option<RenderContext>,
    egui_host: Option<EguiHost>,
    viewer: Option<Viewer>,
    ui: UiState,
    timing: FrameTiming,
    target_frame_duration: Duration,
    next_frame_time: Instant,
    dragging: bool,
    last_cursor: Option<(f32, f32)>,
    pushed_colors: Option<([u8; 3], [u8; 3])>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let base_title = config.window_title.clone();
        let ui = UiState::new(&config);
        Self {
            config,
            window: None,
            render: None,
            egui_host: None,
            viewer: None,
            ui,
            timing: FrameTiming::new(base_title),
            target_frame_duration: Duration::from_millis(16),
            next_frame_time: Instant::now(),
            dragging: false,
            last_cursor: None,
            pushed_colors: None,
        }
    }

    fn init_viewer(&mut self, window: &Window) {
        // One-shot load: failure leaves the loading indicator up for good.
        let model = match assets::load_vehicle(Path::new(&self.config.model_path)) {
            Ok(model) => model,
            Err(err) => {
                log::error!("Asset load failed, staying on fallback: {}", err);
                return;
            }
        };
        let environment = match assets::load_environment(Path::new(&self.config.environment_dir)) {
            Ok(environment) => environment,
            Err(err) => {
                log::error!("Environment load failed, staying on fallback: {}", err);
                return;
            }
        };

        let mut model = model;
        // Bind once, after parse, before any color update reaches the model.
        let bindings = MaterialBindings::bind(&mut model);

        let scene = ViewerScene::new(window.inner_size().width);
        let camera = OrbitCamera::new(scene.framing.camera_position, scene.camera_target);

        if let Some(render) = &mut self.render {
            render.upload_model(&model, &environment, &scene);
        }
        self.viewer = Some(Viewer {
            scene,
            model,
            bindings,
            camera,
        });
    }

    fn update_target_frame_duration(&mut self, window: &Window) {
        let mut target = Duration::from_millis(16);
        if let Some(monitor) = window.current_monitor() {
            if let Some(millihz) = monitor.refresh_rate_millihertz() {
                let hz = millihz as f32 / 1000.0;
                if hz > 1.0 {
                    target = Duration::from_secs_f32(1.0 / hz);
                }
            }
        }
        self.target_frame_duration = target;
        self.next_frame_time = Instant::now() + self.target_frame_duration;
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        // Aspect tracks the window; the framing breakpoint stays as chosen at
        // startup.
        if let Some(render) = &mut self.render {
            render.resize(new_size);
        }
    }

    /// Push control-panel colors into the bound materials when they change.
    fn sync_colors(&mut self) {
        let Some(viewer) = &mut self.viewer else {
            return;
        };
        let current = (self.ui.body_color(), self.ui.highlight_color());
        if self.pushed_colors == Some(current) {
            return;
        }
        viewer
            .bindings
            .apply_body_color(&mut viewer.model.materials, current.0);
        viewer
            .bindings
            .apply_rim_color(&mut viewer.model.materials, current.1);
        if let Some(render) = &self.render {
            render.update_materials(&viewer.model);
        }
        self.pushed_colors = Some(current);
    }

    fn redraw(&mut self) {
        let frame_start = Instant::now();

        // Per-frame orbit tick, gated only by the toggle.
        if let Some(viewer) = &mut self.viewer {
            viewer.camera.tick(self.ui.rotate());
        }

        let overlay = {
            let (Some(window), Some(host)) = (&self.window, &mut self.egui_host) else {
                return;
            };
            let loading = self.viewer.is_none();
            let ui = &mut self.ui;
            host.run(window, |ctx| ui.draw(ctx, loading))
        };

        self.sync_colors();

        if let Some(render) = &mut self.render {
            let camera = self
                .viewer
                .as_ref()
                .map(|viewer| (&viewer.camera, &viewer.scene));
            if let Err(err) = render.render(camera, overlay) {
                log::warn!("Frame dropped: {}", err);
            }
        }

        self.timing.update(self.window.as_deref(), frame_start);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let [width, height] = self.config.window_size;
        let window_attrs = WindowAttributes::default()
            .with_title(&self.config.window_title)
            .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
            .with_resizable(true);
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        match RenderContext::new(Arc::clone(&window)) {
            Ok(render) => self.render = Some(render),
            Err(err) => {
                log::error!("Renderer init failed: {}", err);
                event_loop.exit();
                return;
            }
        }
        self.egui_host = Some(EguiHost::new(&window));

        self.init_viewer(&window);
        self.update_target_frame_duration(&window);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let ui_consumed = match (&self.window, &mut self.egui_host) {
            (Some(window), Some(host)) => host.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
                if let Some(window) = self.window.clone() {
                    self.update_target_frame_duration(&window);
                }
            }
            WindowEvent::Moved(_) => {
                if let Some(window) = self.window.clone() {
                    self.update_target_frame_duration(&window);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    let pointer_free = !ui_consumed
                        && !self
                            .egui_host
                            .as_ref()
                            .is_some_and(|host| host.wants_pointer());
                    self.dragging = state == ElementState::Pressed && pointer_free;
                    if !self.dragging {
                        self.last_cursor = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current = (position.x as f32, position.y as f32);
                if self.dragging {
                    if let (Some(last), Some(viewer)) = (self.last_cursor, &mut self.viewer) {
                        let dx = current.0 - last.0;
                        let dy = current.1 - last.1;
                        viewer
                            .camera
                            .orbit(dx * DRAG_ORBIT_SENSITIVITY, dy * DRAG_ORBIT_SENSITIVITY);
                    }
                    self.last_cursor = Some(current);
                } else {
                    self.last_cursor = None;
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.last_cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !ui_consumed {
                    let amount = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                    };
                    if let Some(viewer) = &mut self.viewer {
                        viewer.camera.zoom(amount * WHEEL_ZOOM_STEP);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame_time {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame_time = now + self.target_frame_duration;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame_time));
    }
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = match ViewerConfig::load(Path::new("showroom.json")) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Bad config: {}", err);
            std::process::exit(1);
        }
    };

    log::info!("Showroom viewer starting");
    log::info!("   Press ESC or close window to exit");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");

    log::info!("Goodbye!");
}

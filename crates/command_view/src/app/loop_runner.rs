use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use command_input::{
    CanvasRect, InputEventHandlers, InputHandler, OrbitCamera, SceneView,
};
use glam::Vec3;
use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::bootstrap::AppWiring;
use super::input_bridge::InputBridge;
use super::renderer::{FrameView, Renderer};
use super::store::ViewStore;

#[derive(Debug, Clone)]
pub(crate) struct LoopConfig {
    pub(crate) window_title: String,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) max_frame_delta: Duration,
    pub(crate) max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Command View".to_string(),
            window_width: 1280,
            window_height: 720,
            max_frame_delta: Duration::from_millis(250),
            max_render_fps: Some(60),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to open command view window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize pixel surface: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    Quit,
    ToggleDrawing,
    ToggleBuildingDrag,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_app(app) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_app(app: AppWiring) -> Result<(), AppError> {
    let AppWiring {
        config,
        input_config,
        layout,
    } = app;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta = config.max_frame_delta;
    let mut pacer = FramePacer::new(config.max_render_fps);
    info!(
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        frame_budget_us = pacer.budget.map(|budget| budget.as_micros() as u64),
        "loop_config"
    );

    let mut scene = layout.build();
    let store = Rc::new(RefCell::new(ViewStore::new(layout)));
    let mut camera = OrbitCamera::default();
    let mut handler = InputHandler::new(
        input_config,
        canvas_for(window.inner_size()),
        InputEventHandlers::new(Rc::clone(&store)),
        Rc::clone(&store),
    );
    let mut bridge = InputBridge::new();

    let started = Instant::now();
    let mut last_frame = Duration::ZERO;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    handler.dispose();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    handler.set_canvas(canvas_for(new_size));
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    handler.set_canvas(canvas_for(size));
                }
                WindowEvent::KeyboardInput { event, .. } => match key_command(&event) {
                    Some(KeyCommand::Quit) => {
                        info!(reason = "escape_key", "shutdown_requested");
                        handler.dispose();
                        window_target.exit();
                    }
                    Some(KeyCommand::ToggleDrawing) => store.borrow_mut().toggle_drawing(),
                    Some(KeyCommand::ToggleBuildingDrag) => {
                        store.borrow_mut().toggle_building_drag()
                    }
                    None => {}
                },
                WindowEvent::RedrawRequested => {
                    let now = started.elapsed();
                    let frame_dt = now.saturating_sub(last_frame).min(max_frame_delta);
                    last_frame = now;

                    handler.tick(&mut SceneView::new(&mut camera, &scene), now);

                    {
                        let mut store = store.borrow_mut();
                        store.step(frame_dt.as_secs_f32());
                        if let Some(updated) = store.take_scene_update() {
                            scene = updated;
                        }
                        if let Some(target) = store.take_focus_request() {
                            focus_camera(&mut camera, target);
                        }
                    }

                    pacer.wait();

                    let store = store.borrow();
                    let frame = FrameView {
                        camera: &camera,
                        raycaster: handler.raycaster(),
                        store: &store,
                        selection: handler.selection_rect(),
                    };
                    if let Err(error) = renderer.render(&frame) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    pacer.presented();
                }
                other => {
                    let inputs = bridge.translate(&other, started.elapsed());
                    if inputs.is_empty() {
                        return;
                    }
                    let mut view = SceneView::new(&mut camera, &scene);
                    for input in inputs {
                        input.dispatch(&mut handler, &mut view);
                    }
                }
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!(
                    activity = store.borrow().activity_count(),
                    "shutdown"
                );
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn canvas_for(size: PhysicalSize<u32>) -> CanvasRect {
    CanvasRect::from_size(size.width as f32, size.height as f32)
}

/// Recentres the orbit on `target`, keeping distance and angle.
fn focus_camera(camera: &mut OrbitCamera, target: Vec3) {
    let offset = camera.offset();
    camera.target = Vec3::new(target.x, 0.0, target.z);
    camera.position = camera.target + offset;
}

fn key_command(event: &KeyEvent) -> Option<KeyCommand> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    command_for_key(event.physical_key)
}

fn command_for_key(key: PhysicalKey) -> Option<KeyCommand> {
    match key {
        PhysicalKey::Code(KeyCode::Escape) => Some(KeyCommand::Quit),
        PhysicalKey::Code(KeyCode::KeyD) => Some(KeyCommand::ToggleDrawing),
        PhysicalKey::Code(KeyCode::KeyB) => Some(KeyCommand::ToggleBuildingDrag),
        _ => None,
    }
}

/// Holds presents to at most one per frame budget. The only sleep in the loop.
#[derive(Debug, Clone, Copy)]
struct FramePacer {
    budget: Option<Duration>,
    last_present: Instant,
}

impl FramePacer {
    fn new(max_render_fps: Option<u32>) -> Self {
        Self {
            budget: frame_budget(max_render_fps),
            last_present: Instant::now(),
        }
    }

    fn wait(&self) {
        let remaining = remaining_budget(self.last_present.elapsed(), self.budget);
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }

    fn presented(&mut self) {
        self.last_present = Instant::now();
    }
}

/// `None` or `Some(0)` leaves rendering unpaced.
fn frame_budget(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps
        .filter(|fps| *fps > 0)
        .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)))
}

fn remaining_budget(elapsed: Duration, budget: Option<Duration>) -> Duration {
    budget.map_or(Duration::ZERO, |budget| budget.saturating_sub(elapsed))
}

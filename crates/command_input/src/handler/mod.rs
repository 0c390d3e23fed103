mod hover;
mod mode;

use std::mem;
use std::time::Duration;

use glam::{Vec2, Vec3};
use tracing::{debug, trace, warn};

use self::hover::HoverTracker;
use crate::callbacks::{ContextTarget, InputCallbacks, InputEvent};
use crate::camera::{CameraController, OrbitCamera};
use crate::config::InputConfig;
use crate::input::{
    CameraMotion, ClickKind, DoubleClickDetector, MouseAction, MouseControlHandler, PointerInput,
    PointerKind, TouchGesture, TouchGestureHandler, TouchInput, TrackpadAction,
    TrackpadGestureHandler, TrackpadGestureInput, WheelInput,
};
use crate::scene::{SceneRaycaster, SceneReferences};
use crate::state::StateAccessor;
use crate::types::{AgentId, AreaId, BuildingId, CanvasRect};

pub use mode::{BoxSelect, BuildingDrag, GestureMode, SelectionRect};

/// Camera and scene borrowed for the duration of one input call.
pub struct SceneView<'a> {
    pub camera: &'a mut OrbitCamera,
    pub scene: &'a dyn SceneReferences,
}

impl<'a> SceneView<'a> {
    pub fn new(camera: &'a mut OrbitCamera, scene: &'a dyn SceneReferences) -> Self {
        Self { camera, scene }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickSource {
    Mouse,
    Touch,
}

/// Routes pointer, wheel, trackpad and touch input to the gesture
/// recognizers, the camera and the semantic callbacks.
///
/// Every entry point first fires the deadlines that came due before the
/// event's timestamp, so a stale timer can never act after a contradicting
/// event has been processed.
pub struct InputHandler {
    config: InputConfig,
    callbacks: Box<dyn InputCallbacks>,
    state: Box<dyn StateAccessor>,
    raycaster: SceneRaycaster,
    camera_controller: CameraController,
    touch: TouchGestureHandler,
    trackpad: TrackpadGestureHandler,
    mouse: MouseControlHandler,
    hover: HoverTracker,
    mouse_agent_clicks: DoubleClickDetector<AgentId>,
    touch_agent_clicks: DoubleClickDetector<AgentId>,
    building_clicks: DoubleClickDetector<BuildingId>,
    area_clicks: DoubleClickDetector<AreaId>,
    mode: GestureMode,
    last_pointer: Option<Vec2>,
    disposed: bool,
}

impl InputHandler {
    pub fn new(
        config: InputConfig,
        canvas: CanvasRect,
        callbacks: impl InputCallbacks + 'static,
        state: impl StateAccessor + 'static,
    ) -> Self {
        let mouse_double = config.click.mouse_double_click();
        let touch_double = config.click.touch_double_click();
        Self {
            raycaster: SceneRaycaster::new(canvas),
            camera_controller: CameraController::new(config.camera.clone()),
            touch: TouchGestureHandler::new(config.touch.clone()),
            trackpad: TrackpadGestureHandler::new(config.trackpad.clone()),
            mouse: MouseControlHandler::new(config.mouse.clone(), config.click.drag_threshold_px),
            hover: HoverTracker::new(&config.hover),
            mouse_agent_clicks: DoubleClickDetector::new(mouse_double),
            touch_agent_clicks: DoubleClickDetector::new(touch_double),
            building_clicks: DoubleClickDetector::new(mouse_double),
            area_clicks: DoubleClickDetector::new(mouse_double),
            callbacks: Box::new(callbacks),
            state: Box::new(state),
            config,
            mode: GestureMode::Idle,
            last_pointer: None,
            disposed: false,
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn mode(&self) -> &GestureMode {
        &self.mode
    }

    pub fn raycaster(&self) -> &SceneRaycaster {
        &self.raycaster
    }

    pub fn last_pointer(&self) -> Option<Vec2> {
        self.last_pointer
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Screen rectangle of a box selection that has passed the drag threshold.
    pub fn selection_rect(&self) -> Option<SelectionRect> {
        match &self.mode {
            GestureMode::BoxSelect(select) if select.dragging => {
                Some(SelectionRect::from_corners(select.start, select.current))
            }
            _ => None,
        }
    }

    /// Canvas moved or resized; gestures in flight continue.
    pub fn set_canvas(&mut self, canvas: CanvasRect) {
        self.raycaster.set_canvas(canvas);
    }

    /// Binds to a remounted canvas. Gestures in flight are dropped.
    pub fn reattach(&mut self, canvas: CanvasRect) {
        self.raycaster.set_canvas(canvas);
        self.disposed = false;
        self.interrupt("reattach", true);
        debug!(
            width = canvas.width,
            height = canvas.height,
            "input_handler_reattached"
        );
    }

    /// Cancels every timer and gesture. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.mode = GestureMode::Idle;
        self.mouse.cancel();
        self.touch.reset();
        self.hover.clear();
        self.mouse_agent_clicks.dispose();
        self.touch_agent_clicks.dispose();
        self.building_clicks.dispose();
        self.area_clicks.dispose();
        debug!("input_handler_disposed");
    }

    /// Fires deadlines due at `now`. The host calls this once per frame.
    pub fn tick(&mut self, view: &mut SceneView<'_>, now: Duration) {
        self.begin_event(view, now);
    }

    pub fn pointer_down(&mut self, view: &mut SceneView<'_>, input: &PointerInput) {
        if !self.begin_event(view, input.time) || input.kind == PointerKind::Touch {
            return;
        }
        let screen = input.position;
        self.last_pointer = Some(screen);
        self.emit(InputEvent::Activity);
        self.heal_terminal_flag();

        let Some(button) = input.button else {
            return;
        };
        let action = self.mouse.resolve(button, input.modifiers);
        if action.is_camera() {
            self.enter(GestureMode::CameraDrag { action });
            self.mouse.begin(button, input.modifiers, screen);
            return;
        }
        if action != MouseAction::Select {
            return;
        }

        if let Some(handle) = self
            .raycaster
            .check_resize_handle(view.camera, view.scene, screen)
        {
            let position = self.plane_point(view, screen);
            self.enter(GestureMode::Resize {
                handle: handle.clone(),
            });
            self.emit(InputEvent::ResizeStart { handle, position });
            return;
        }

        let ground = self.raycaster.raycast_ground(view.camera, view.scene, screen);

        if self.state.drawing_mode_active() {
            match ground {
                Some(position) => {
                    self.enter(GestureMode::Draw);
                    self.emit(InputEvent::DrawStart { position });
                }
                None => self.enter(GestureMode::Idle),
            }
            return;
        }

        if self.state.building_drag_enabled() {
            let hit = ground.and_then(|point| view.scene.building_at(point).map(|id| (id, point)));
            if let Some((building, point)) = hit {
                self.enter(GestureMode::DragBuilding(BuildingDrag {
                    building,
                    start: screen,
                    dragging: false,
                    last: point,
                }));
                return;
            }
        }

        self.enter(GestureMode::BoxSelect(BoxSelect {
            start: screen,
            current: screen,
            dragging: false,
        }));
    }

    pub fn pointer_move(&mut self, view: &mut SceneView<'_>, input: &PointerInput) {
        if !self.begin_event(view, input.time) || input.kind == PointerKind::Touch {
            return;
        }
        let screen = input.position;
        self.last_pointer = Some(screen);
        let threshold = self.config.click.drag_threshold_px;

        match self.mode.clone() {
            GestureMode::CameraDrag { .. } => {
                if let Some(motion) = self.mouse.drag(screen) {
                    self.apply_camera_motion(view.camera, motion);
                }
            }
            GestureMode::Resize { .. } => {
                if let Some(position) = self.plane_point(view, screen) {
                    self.emit(InputEvent::ResizeMove { position });
                }
            }
            GestureMode::Draw => {
                if let Some(position) = self.raycaster.raycast_ground(view.camera, view.scene, screen)
                {
                    self.emit(InputEvent::DrawMove { position });
                }
            }
            GestureMode::DragBuilding(mut drag) => {
                if !drag.dragging {
                    if screen.distance(drag.start) <= threshold {
                        return;
                    }
                    drag.dragging = true;
                    self.emit(InputEvent::BuildingDragStart {
                        building: drag.building.clone(),
                        position: drag.last,
                    });
                }
                if let Some(position) = self.raycaster.raycast_ground(view.camera, view.scene, screen)
                {
                    drag.last = position;
                    self.emit(InputEvent::BuildingDragMove {
                        building: drag.building.clone(),
                        position,
                    });
                }
                self.mode = GestureMode::DragBuilding(drag);
            }
            GestureMode::BoxSelect(mut select) => {
                select.current = screen;
                if !select.dragging && screen.distance(select.start) > threshold {
                    select.dragging = true;
                    debug!(x = select.start.x, y = select.start.y, "box_select_started");
                }
                self.mode = GestureMode::BoxSelect(select);
            }
            GestureMode::Idle => {
                if input.is_buttonless() {
                    self.update_hover(view, screen, input.time);
                }
            }
            GestureMode::Pinch | GestureMode::ThreeFingerOrbit => {}
        }
    }

    pub fn pointer_up(&mut self, view: &mut SceneView<'_>, input: &PointerInput) {
        if !self.begin_event(view, input.time) || input.kind == PointerKind::Touch {
            return;
        }
        let screen = input.position;
        self.last_pointer = Some(screen);

        match mem::take(&mut self.mode) {
            GestureMode::CameraDrag { .. } => {
                if let Some(button) = input.button {
                    self.mouse.end(button);
                }
                self.mouse.cancel();
            }
            GestureMode::Resize { .. } => self.emit(InputEvent::ResizeEnd),
            GestureMode::Draw => {
                let position = self.raycaster.raycast_ground(view.camera, view.scene, screen);
                self.emit(InputEvent::DrawEnd { position });
            }
            GestureMode::DragBuilding(drag) if drag.dragging => {
                let position = self
                    .raycaster
                    .raycast_ground(view.camera, view.scene, screen)
                    .unwrap_or(drag.last);
                self.emit(InputEvent::BuildingDragEnd {
                    building: drag.building,
                    position,
                });
            }
            GestureMode::DragBuilding(_) => {
                self.resolve_click(view, screen, input.modifiers.shift, ClickSource::Mouse, input.time);
            }
            GestureMode::BoxSelect(select) if select.dragging => {
                self.finish_box_select(view, SelectionRect::from_corners(select.start, screen));
            }
            GestureMode::BoxSelect(_) => {
                self.resolve_click(view, screen, input.modifiers.shift, ClickSource::Mouse, input.time);
            }
            GestureMode::Idle => {}
            touch @ (GestureMode::Pinch | GestureMode::ThreeFingerOrbit) => self.mode = touch,
        }
    }

    /// Right-click. Moves the selection when agents are selected, otherwise
    /// opens a context menu classified like a click.
    pub fn context_menu(&mut self, view: &mut SceneView<'_>, input: &PointerInput) {
        if !self.begin_event(view, input.time) {
            return;
        }
        if self.mouse.take_context_menu_suppressed() {
            debug!("context_menu_suppressed");
            return;
        }
        self.open_context(view, input.position);
    }

    pub fn pointer_leave(&mut self, view: &mut SceneView<'_>, now: Duration) {
        if !self.begin_event(view, now) {
            return;
        }
        self.last_pointer = None;
        self.interrupt("pointer_leave", false);
    }

    pub fn window_blur(&mut self, view: &mut SceneView<'_>, now: Duration) {
        if !self.begin_event(view, now) {
            return;
        }
        self.interrupt("window_blur", true);
    }

    pub fn visibility_changed(&mut self, view: &mut SceneView<'_>, hidden: bool, now: Duration) {
        if !self.begin_event(view, now) || !hidden {
            return;
        }
        self.interrupt("document_hidden", true);
    }

    pub fn wheel(&mut self, view: &mut SceneView<'_>, input: &WheelInput) {
        if !self.begin_event(view, input.time) {
            return;
        }
        self.emit(InputEvent::Activity);
        if let Some(action) = self.trackpad.handle_wheel(input) {
            self.apply_trackpad(view, action, input.position);
        }
    }

    /// Native magnify and rotate gestures from a trackpad.
    pub fn trackpad_gesture(&mut self, view: &mut SceneView<'_>, input: &TrackpadGestureInput) {
        if !self.begin_event(view, input.time) {
            return;
        }
        self.emit(InputEvent::Activity);
        if let Some(action) = self.trackpad.handle_gesture(input) {
            self.apply_trackpad(view, action, input.position);
        }
    }

    pub fn touch_start(&mut self, view: &mut SceneView<'_>, input: &TouchInput) {
        if !self.begin_event(view, input.time) {
            return;
        }
        self.emit(InputEvent::Activity);
        self.heal_terminal_flag();
        let gestures = self.touch.touch_start(input);
        self.sync_touch_mode();
        self.apply_touch(view, gestures, input.time);
    }

    pub fn touch_move(&mut self, view: &mut SceneView<'_>, input: &TouchInput) {
        if !self.begin_event(view, input.time) {
            return;
        }
        let gestures = self.touch.touch_move(input);
        self.sync_touch_mode();
        self.apply_touch(view, gestures, input.time);
    }

    pub fn touch_end(&mut self, view: &mut SceneView<'_>, input: &TouchInput) {
        if !self.begin_event(view, input.time) {
            return;
        }
        let gestures = self.touch.touch_end(input);
        self.sync_touch_mode();
        self.apply_touch(view, gestures, input.time);
    }

    pub fn touch_cancel(&mut self, view: &mut SceneView<'_>, now: Duration) {
        if !self.begin_event(view, now) {
            return;
        }
        self.touch.touch_cancel();
        self.sync_touch_mode();
    }

    fn begin_event(&mut self, view: &mut SceneView<'_>, now: Duration) -> bool {
        if self.disposed {
            return false;
        }
        self.fire_due(view, now);
        true
    }

    fn fire_due(&mut self, view: &mut SceneView<'_>, now: Duration) {
        let gestures = self.touch.poll(now);
        self.apply_touch(view, gestures, now);

        self.mouse_agent_clicks.poll(now);
        self.touch_agent_clicks.poll(now);
        self.building_clicks.poll(now);
        self.area_clicks.poll(now);

        if !self.mode.is_idle() || !self.hover.is_active() {
            return;
        }
        if self.state.terminal_open() {
            self.heal_terminal_flag();
            if self.state.terminal_open() {
                self.dismiss_hover();
                return;
            }
        }
        if let Some((agent, screen)) = self.hover.agent.poll(now) {
            self.emit(InputEvent::AgentHover {
                agent: Some(agent),
                screen: Some(screen),
            });
        }
        if let Some((building, screen)) = self.hover.building.poll(now) {
            self.emit(InputEvent::BuildingHover {
                building: Some(building),
                screen: Some(screen),
            });
        }
    }

    fn emit(&mut self, event: InputEvent) {
        trace!(event = event.name(), "input_event");
        self.callbacks.on_event(event);
    }

    /// Replaces the current mode, closing out whatever it was doing. Any
    /// gesture other than idle also drops hover.
    fn enter(&mut self, next: GestureMode) {
        self.end_mode();
        if !next.is_idle() {
            self.dismiss_hover();
        }
        debug!(mode = next.name(), "gesture_mode_entered");
        self.mode = next;
    }

    fn end_mode(&mut self) {
        match mem::take(&mut self.mode) {
            GestureMode::Resize { .. } => self.emit(InputEvent::ResizeEnd),
            GestureMode::Draw => self.emit(InputEvent::DrawEnd { position: None }),
            GestureMode::DragBuilding(drag) if drag.dragging => {
                self.emit(InputEvent::BuildingDragEnd {
                    building: drag.building,
                    position: drag.last,
                });
            }
            GestureMode::CameraDrag { .. } => self.mouse.cancel(),
            _ => {}
        }
    }

    fn interrupt(&mut self, reason: &'static str, include_touch: bool) {
        debug!(reason, mode = self.mode.name(), "input_interrupted");
        if include_touch || !self.mode.is_touch() {
            self.end_mode();
        }
        self.mouse.cancel();
        if include_touch {
            self.touch.reset();
        }
        self.clear_hover();
    }

    fn clear_hover(&mut self) {
        let building_active = self.hover.building.is_active();
        self.hover.clear();
        self.emit(InputEvent::AgentHover {
            agent: None,
            screen: None,
        });
        if building_active {
            self.emit(InputEvent::BuildingHover {
                building: None,
                screen: None,
            });
        }
    }

    /// Cancels pending hover and hides only what is on screen.
    fn dismiss_hover(&mut self) {
        let agent_shown = self.hover.agent.is_shown();
        let building_shown = self.hover.building.is_shown();
        self.hover.clear();
        if agent_shown {
            self.emit(InputEvent::AgentHover {
                agent: None,
                screen: None,
            });
        }
        if building_shown {
            self.emit(InputEvent::BuildingHover {
                building: None,
                screen: None,
            });
        }
    }

    fn heal_terminal_flag(&mut self) {
        if self.state.terminal_open() && !self.state.terminal_visible() {
            warn!("terminal_flag_desynced");
            self.state.set_terminal_open(false);
        }
    }

    fn update_hover(&mut self, view: &mut SceneView<'_>, screen: Vec2, now: Duration) {
        if !self.hover.should_poll(now) {
            return;
        }
        self.heal_terminal_flag();
        if self.state.terminal_open() {
            self.dismiss_hover();
            return;
        }

        let agent = self.raycaster.find_agent_at(view.camera, view.scene, screen);
        let building = match agent {
            Some(_) => None,
            None => self
                .raycaster
                .raycast_ground(view.camera, view.scene, screen)
                .and_then(|point| view.scene.building_at(point)),
        };

        if self.hover.agent.observe(agent, screen, now) {
            self.emit(InputEvent::AgentHover {
                agent: None,
                screen: None,
            });
        }
        if self.hover.building.observe(building, screen, now) {
            self.emit(InputEvent::BuildingHover {
                building: None,
                screen: None,
            });
        }
    }

    /// Click resolution: folder icon, agent, building, area, then ground.
    fn resolve_click(
        &mut self,
        view: &mut SceneView<'_>,
        screen: Vec2,
        shift: bool,
        source: ClickSource,
        now: Duration,
    ) {
        if let Some(area) = self.raycaster.check_folder_icon(view.camera, view.scene, screen) {
            self.emit(InputEvent::FolderIconClick { area });
            return;
        }

        if let Some(agent) = self.raycaster.find_agent_at(view.camera, view.scene, screen) {
            let detector = match source {
                ClickSource::Mouse => &mut self.mouse_agent_clicks,
                ClickSource::Touch => &mut self.touch_agent_clicks,
            };
            let event = match detector.handle_click(&agent, now) {
                ClickKind::Single => InputEvent::AgentClick { agent, shift },
                ClickKind::Double => InputEvent::AgentDoubleClick { agent },
            };
            self.emit(event);
            return;
        }

        let Some(ground) = self.raycaster.raycast_ground(view.camera, view.scene, screen) else {
            self.emit(InputEvent::GroundClick);
            return;
        };

        if let Some(building) = view.scene.building_at(ground) {
            let event = match self.building_clicks.handle_click(&building, now) {
                ClickKind::Single => InputEvent::BuildingClick { building },
                ClickKind::Double => InputEvent::BuildingDoubleClick { building },
            };
            self.emit(event);
            return;
        }

        if let Some(area) = view.scene.area_at(ground) {
            let event = match self.area_clicks.handle_click(&area, now) {
                ClickKind::Single => InputEvent::AreaClick { area },
                ClickKind::Double => InputEvent::AreaDoubleClick { area },
            };
            self.emit(event);
            return;
        }

        self.emit(InputEvent::GroundClick);
        self.emit(InputEvent::GroundClickOutsideArea);
    }

    fn classify_target(&mut self, view: &mut SceneView<'_>, screen: Vec2) -> ContextTarget {
        if let Some(area) = self.raycaster.check_folder_icon(view.camera, view.scene, screen) {
            return ContextTarget::FolderIcon(area);
        }
        if let Some(agent) = self.raycaster.find_agent_at(view.camera, view.scene, screen) {
            return ContextTarget::Agent(agent);
        }
        let Some(ground) = self.raycaster.raycast_ground(view.camera, view.scene, screen) else {
            return ContextTarget::Ground;
        };
        if let Some(building) = view.scene.building_at(ground) {
            return ContextTarget::Building(building);
        }
        match view.scene.area_at(ground) {
            Some(area) => ContextTarget::Area(area),
            None => ContextTarget::Ground,
        }
    }

    fn open_context(&mut self, view: &mut SceneView<'_>, screen: Vec2) {
        let selected = self.state.selected_agents();
        if !selected.is_empty() {
            if let Some(position) = self.raycaster.raycast_ground(view.camera, view.scene, screen) {
                debug!(agents = selected.len(), "move_command_issued");
                self.emit(InputEvent::MoveCommand {
                    position,
                    agents: selected,
                });
                if view.scene.area_at(position).is_some() {
                    self.emit(InputEvent::AreaRightClick { position });
                }
                return;
            }
        }

        let world = self.plane_point(view, screen);
        let target = self.classify_target(view, screen);
        self.emit(InputEvent::ContextMenu {
            screen,
            world,
            target,
        });
    }

    fn finish_box_select(&mut self, view: &mut SceneView<'_>, rect: SelectionRect) {
        let scene = view.scene;
        let graph = scene.graph();

        let mut agents = Vec::new();
        for (agent, root) in scene.agent_meshes() {
            let Some(node) = graph.node(*root) else {
                continue;
            };
            let inside = self
                .raycaster
                .project_to_screen(view.camera, node.position)
                .is_some_and(|screen| rect.contains(screen));
            if inside {
                agents.push(agent.clone());
            }
        }

        let mut buildings = Vec::new();
        for (building, position) in scene.building_positions() {
            let inside = self
                .raycaster
                .project_to_screen(view.camera, *position)
                .is_some_and(|screen| rect.contains(screen));
            if inside {
                buildings.push(building.clone());
            }
        }

        debug!(
            agents = agents.len(),
            buildings = buildings.len(),
            "box_select_finished"
        );
        self.emit(InputEvent::SelectionBox { agents, buildings });
    }

    fn sync_touch_mode(&mut self) {
        let next = match self.touch.active_touches() {
            0 | 1 => None,
            2 => Some(GestureMode::Pinch),
            _ => Some(GestureMode::ThreeFingerOrbit),
        };
        match next {
            Some(next) if self.mode != next => self.enter(next),
            None if self.mode.is_touch() => self.enter(GestureMode::Idle),
            _ => {}
        }
    }

    fn apply_touch(&mut self, view: &mut SceneView<'_>, gestures: Vec<TouchGesture>, now: Duration) {
        for gesture in gestures {
            match gesture {
                TouchGesture::Tap { position } => {
                    self.resolve_click(view, position, false, ClickSource::Touch, now);
                }
                TouchGesture::LongPress { position } => self.open_context(view, position),
                TouchGesture::Pan { delta } => self.camera_controller.handle_pan(view.camera, delta),
                TouchGesture::Pinch { scale, center } => {
                    let anchor = self.plane_point(view, center);
                    self.camera_controller
                        .handle_pinch_zoom(view.camera, scale, anchor);
                }
                TouchGesture::Orbit { delta } => {
                    self.camera_controller.handle_orbit(view.camera, delta);
                }
                TouchGesture::Rotation { delta } => {
                    self.camera_controller
                        .handle_twist_rotation(view.camera, delta);
                }
                TouchGesture::Haptic { duration } => self.emit(InputEvent::Haptic {
                    duration_ms: duration.as_millis() as u64,
                }),
            }
        }
    }

    fn apply_trackpad(&mut self, view: &mut SceneView<'_>, action: TrackpadAction, screen: Vec2) {
        match action {
            TrackpadAction::Zoom { delta_y } => {
                let anchor = self.plane_point(view, screen);
                self.camera_controller
                    .handle_wheel_zoom(view.camera, delta_y, anchor);
            }
            TrackpadAction::Pinch { scale } => {
                let anchor = self.plane_point(view, screen);
                self.camera_controller
                    .handle_pinch_zoom(view.camera, scale, anchor);
            }
            TrackpadAction::Pan { delta } => self.camera_controller.handle_pan(view.camera, delta),
            TrackpadAction::Twist { angle } => {
                self.camera_controller
                    .handle_twist_rotation(view.camera, angle);
            }
        }
    }

    fn apply_camera_motion(&mut self, camera: &mut OrbitCamera, motion: CameraMotion) {
        match motion.action {
            MouseAction::Pan => self.camera_controller.handle_pan(camera, motion.delta),
            MouseAction::Orbit => self.camera_controller.handle_orbit(camera, motion.delta),
            MouseAction::Rotate => {
                let angle = -motion.delta.x * self.camera_controller.config().orbit_speed;
                self.camera_controller.handle_twist_rotation(camera, angle);
            }
            MouseAction::Select | MouseAction::None => {}
        }
    }

    /// World point under `screen` on the ground, else on the `y = 0` plane.
    fn plane_point(&self, view: &SceneView<'_>, screen: Vec2) -> Option<Vec3> {
        let ndc = self.raycaster.screen_to_ndc(screen);
        self.raycaster.raycast_to_plane(view.camera, view.scene, ndc)
    }
}

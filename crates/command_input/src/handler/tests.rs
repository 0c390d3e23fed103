use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::callbacks::EventLog;
use crate::input::{DeltaMode, PointerButton, TouchPoint};
use crate::scene::{
    AgentSpec, AreaSpec, BuildingSpec, HandleCorner, LayoutScene, ResizeHandleHit, SceneLayout,
};
use crate::state::StaticState;
use crate::types::Modifiers;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn scout() -> AgentId {
    AgentId::new("scout")
}

fn miner() -> AgentId {
    AgentId::new("miner")
}

fn depot() -> BuildingId {
    BuildingId::new("depot")
}

fn farm() -> AreaId {
    AreaId::new("farm")
}

const SCOUT: Vec3 = Vec3::new(0.0, 0.5, 0.0);
const DEPOT: Vec3 = Vec3::new(-10.0, 0.0, -10.0);
const OPEN_GROUND: Vec3 = Vec3::new(-5.0, 0.0, 5.0);
const FARM_FIELD: Vec3 = Vec3::new(10.0, 0.0, 12.0);
const FARM_ICON: Vec3 = Vec3::new(7.2, 0.8, 7.2);

fn layout() -> SceneLayout {
    SceneLayout {
        agents: vec![
            AgentSpec {
                id: scout(),
                position: Vec3::ZERO,
                radius: 0.5,
            },
            AgentSpec {
                id: miner(),
                position: Vec3::new(8.0, 0.0, 0.0),
                radius: 0.5,
            },
        ],
        buildings: vec![BuildingSpec {
            id: depot(),
            position: DEPOT,
            half_size: Vec3::new(3.0, 2.0, 3.0),
        }],
        areas: vec![AreaSpec {
            id: farm(),
            center: Vec2::new(10.0, 10.0),
            half_extents: Vec2::new(4.0, 4.0),
        }],
        ..SceneLayout::default()
    }
}

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 0.05
}

struct Rig {
    handler: InputHandler,
    log: EventLog,
    state: Rc<RefCell<StaticState>>,
    camera: OrbitCamera,
    scene: LayoutScene,
}

impl Rig {
    fn new() -> Self {
        Self::with_state(StaticState::default())
    }

    fn with_state(state: StaticState) -> Self {
        let log = EventLog::new();
        let state = Rc::new(RefCell::new(state));
        let handler = InputHandler::new(
            InputConfig::default(),
            CanvasRect::from_size(800.0, 800.0),
            log.clone(),
            state.clone(),
        );
        Self {
            handler,
            log,
            state,
            camera: OrbitCamera::new(Vec3::new(0.0, 40.0, 0.001), Vec3::ZERO),
            scene: layout().build(),
        }
    }

    fn screen(&self, world: Vec3) -> Vec2 {
        self.handler
            .raycaster()
            .project_to_screen(&self.camera, world)
            .expect("visible")
    }

    /// Emitted events without the `Activity` pings.
    fn events(&self) -> Vec<InputEvent> {
        self.log
            .take()
            .into_iter()
            .filter(|event| *event != InputEvent::Activity)
            .collect()
    }

    fn down_with(&mut self, screen: Vec2, button: PointerButton, modifiers: Modifiers, at: u64) {
        let input = PointerInput::new(screen, ms(at))
            .with_button(button)
            .with_buttons(button.mask())
            .with_modifiers(modifiers);
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.pointer_down(&mut view, &input);
    }

    fn down(&mut self, screen: Vec2, button: PointerButton, at: u64) {
        self.down_with(screen, button, Modifiers::NONE, at);
    }

    fn move_to(&mut self, screen: Vec2, buttons: u8, at: u64) {
        let input = PointerInput::new(screen, ms(at)).with_buttons(buttons);
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.pointer_move(&mut view, &input);
    }

    fn up_with(&mut self, screen: Vec2, button: PointerButton, modifiers: Modifiers, at: u64) {
        let input = PointerInput::new(screen, ms(at))
            .with_button(button)
            .with_modifiers(modifiers);
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.pointer_up(&mut view, &input);
    }

    fn up(&mut self, screen: Vec2, button: PointerButton, at: u64) {
        self.up_with(screen, button, Modifiers::NONE, at);
    }

    fn click(&mut self, screen: Vec2, at: u64) {
        self.down(screen, PointerButton::Primary, at);
        self.up(screen, PointerButton::Primary, at + 50);
    }

    fn context(&mut self, screen: Vec2, at: u64) {
        let input = PointerInput::new(screen, ms(at)).with_button(PointerButton::Secondary);
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.context_menu(&mut view, &input);
    }

    fn tick(&mut self, at: u64) {
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.tick(&mut view, ms(at));
    }

    fn leave(&mut self, at: u64) {
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.pointer_leave(&mut view, ms(at));
    }

    fn blur(&mut self, at: u64) {
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.window_blur(&mut view, ms(at));
    }

    fn hide(&mut self, at: u64) {
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.visibility_changed(&mut view, true, ms(at));
    }

    fn wheel(&mut self, input: WheelInput) {
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.wheel(&mut view, &input);
    }

    fn touch_start(&mut self, touches: Vec<TouchPoint>, at: u64) {
        let input = TouchInput {
            changed: touches.clone(),
            touches,
            time: ms(at),
        };
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.touch_start(&mut view, &input);
    }

    fn touch_move(&mut self, touches: Vec<TouchPoint>, at: u64) {
        let input = TouchInput {
            changed: touches.clone(),
            touches,
            time: ms(at),
        };
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.touch_move(&mut view, &input);
    }

    fn touch_end(&mut self, remaining: Vec<TouchPoint>, lifted: Vec<TouchPoint>, at: u64) {
        let input = TouchInput {
            touches: remaining,
            changed: lifted,
            time: ms(at),
        };
        let mut view = SceneView::new(&mut self.camera, &self.scene);
        self.handler.touch_end(&mut view, &input);
    }
}

fn finger(id: u64, position: Vec2) -> TouchPoint {
    TouchPoint { id, position }
}

#[test]
fn click_on_agent_then_double_then_fresh_single() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);

    rig.click(at, 0);
    rig.click(at, 100);
    rig.click(at, 200);

    assert_eq!(
        rig.events(),
        vec![
            InputEvent::AgentClick {
                agent: scout(),
                shift: false
            },
            InputEvent::AgentDoubleClick { agent: scout() },
            InputEvent::AgentClick {
                agent: scout(),
                shift: false
            },
        ]
    );
}

#[test]
fn shift_click_reports_modifier() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);

    rig.down_with(at, PointerButton::Primary, Modifiers::shift(), 0);
    rig.up_with(at, PointerButton::Primary, Modifiers::shift(), 40);

    assert_eq!(
        rig.events(),
        vec![InputEvent::AgentClick {
            agent: scout(),
            shift: true
        }]
    );
}

#[test]
fn clicks_on_different_agents_stay_single() {
    let mut rig = Rig::new();
    let scout_at = rig.screen(SCOUT);
    let miner_at = rig.screen(Vec3::new(8.0, 0.5, 0.0));

    rig.click(scout_at, 0);
    rig.click(miner_at, 100);

    assert_eq!(
        rig.events(),
        vec![
            InputEvent::AgentClick {
                agent: scout(),
                shift: false
            },
            InputEvent::AgentClick {
                agent: miner(),
                shift: false
            },
        ]
    );
}

#[test]
fn folder_icon_wins_over_the_area_beneath_it() {
    let mut rig = Rig::new();
    let at = rig.screen(FARM_ICON);

    rig.click(at, 0);

    assert_eq!(rig.events(), vec![InputEvent::FolderIconClick { area: farm() }]);
}

#[test]
fn area_and_building_clicks_use_their_own_detectors() {
    let mut rig = Rig::new();
    let field = rig.screen(FARM_FIELD);
    let depot_at = rig.screen(DEPOT);

    rig.click(field, 0);
    rig.click(field, 100);
    rig.click(depot_at, 1_000);
    rig.click(depot_at, 1_100);

    assert_eq!(
        rig.events(),
        vec![
            InputEvent::AreaClick { area: farm() },
            InputEvent::AreaDoubleClick { area: farm() },
            InputEvent::BuildingClick { building: depot() },
            InputEvent::BuildingDoubleClick { building: depot() },
        ]
    );
}

#[test]
fn open_ground_click_is_outside_every_area() {
    let mut rig = Rig::new();
    let at = rig.screen(OPEN_GROUND);

    rig.click(at, 0);

    assert_eq!(
        rig.events(),
        vec![InputEvent::GroundClick, InputEvent::GroundClickOutsideArea]
    );
}

#[test]
fn every_pointer_down_reports_activity() {
    let mut rig = Rig::new();
    let at = rig.screen(OPEN_GROUND);

    rig.down(at, PointerButton::Primary, 0);

    assert_eq!(rig.log.take(), vec![InputEvent::Activity]);
}

#[test]
fn resize_handle_takes_priority_over_drawing_mode() {
    let mut rig = Rig::with_state(StaticState {
        drawing: true,
        ..StaticState::default()
    });
    let handle = rig.screen(Vec3::new(14.0, 0.3, 14.0));

    rig.down(handle, PointerButton::Primary, 0);
    assert!(matches!(rig.handler.mode(), GestureMode::Resize { .. }));

    rig.move_to(handle + Vec2::new(20.0, 20.0), 1, 20);
    rig.up(handle + Vec2::new(20.0, 20.0), PointerButton::Primary, 40);

    let events = rig.events();
    assert!(matches!(
        &events[0],
        InputEvent::ResizeStart {
            handle: ResizeHandleHit {
                corner: HandleCorner::SouthEast,
                ..
            },
            position: Some(_),
        }
    ));
    assert!(matches!(events[1], InputEvent::ResizeMove { .. }));
    assert_eq!(events[2], InputEvent::ResizeEnd);
    assert_eq!(events.len(), 3);
    assert!(rig.handler.mode().is_idle());
}

#[test]
fn second_button_closes_resize_before_camera_drag() {
    let mut rig = Rig::new();
    let handle = rig.screen(Vec3::new(14.0, 0.3, 14.0));

    rig.down(handle, PointerButton::Primary, 0);
    rig.down(handle, PointerButton::Secondary, 10);

    assert_eq!(
        rig.handler.mode(),
        &GestureMode::CameraDrag {
            action: MouseAction::Orbit
        }
    );
    let ends = rig
        .events()
        .into_iter()
        .filter(|event| *event == InputEvent::ResizeEnd)
        .count();
    assert_eq!(ends, 1);
}

#[test]
fn drawing_mode_draws_instead_of_box_selecting() {
    let mut rig = Rig::with_state(StaticState {
        drawing: true,
        ..StaticState::default()
    });
    let start = rig.screen(OPEN_GROUND);

    rig.down(start, PointerButton::Primary, 0);
    rig.move_to(start + Vec2::new(40.0, 0.0), 1, 20);
    rig.up(start + Vec2::new(40.0, 0.0), PointerButton::Primary, 40);

    let events = rig.events();
    assert!(matches!(events[0], InputEvent::DrawStart { position } if close(position, OPEN_GROUND)));
    assert!(matches!(events[1], InputEvent::DrawMove { .. }));
    assert!(matches!(events[2], InputEvent::DrawEnd { position: Some(_) }));
    assert_eq!(events.len(), 3);
}

#[test]
fn off_ground_draw_press_clears_stale_mode() {
    let mut rig = Rig::new();
    let start = rig.screen(OPEN_GROUND);
    rig.down(start, PointerButton::Primary, 0);
    rig.move_to(start + Vec2::new(40.0, 0.0), 1, 20);
    assert!(matches!(rig.handler.mode(), GestureMode::BoxSelect(_)));

    rig.state.borrow_mut().drawing = true;
    rig.scene = SceneLayout {
        ground_half_extents: None,
        ..layout()
    }
    .build();
    rig.down(start, PointerButton::Primary, 100);

    assert!(rig.handler.mode().is_idle());
    assert!(rig.events().is_empty());
}

#[test]
fn building_press_drags_past_threshold() {
    let mut rig = Rig::new();
    let start = rig.screen(DEPOT);
    let end = start + Vec2::new(60.0, 0.0);

    rig.down(start, PointerButton::Primary, 0);
    rig.move_to(start + Vec2::new(2.0, 0.0), 1, 10);
    rig.move_to(end, 1, 20);
    rig.up(end, PointerButton::Primary, 30);

    let events = rig.events();
    assert!(matches!(
        &events[0],
        InputEvent::BuildingDragStart { building, position } if *building == depot() && close(*position, DEPOT)
    ));
    assert!(matches!(&events[1], InputEvent::BuildingDragMove { .. }));
    assert!(matches!(
        &events[2],
        InputEvent::BuildingDragEnd { building, position } if *building == depot() && position.x > DEPOT.x
    ));
    assert_eq!(events.len(), 3);
}

#[test]
fn disabled_building_drag_falls_back_to_box_select() {
    let mut rig = Rig::with_state(StaticState {
        building_drag_disabled: true,
        ..StaticState::default()
    });
    let start = rig.screen(DEPOT);

    rig.down(start, PointerButton::Primary, 0);

    assert!(matches!(rig.handler.mode(), GestureMode::BoxSelect(_)));
}

#[test]
fn box_select_collects_agents_inside_the_rectangle() {
    let mut rig = Rig::new();
    let start = rig.screen(Vec3::new(-2.0, 0.0, -2.0));
    let end = rig.screen(Vec3::new(10.0, 0.0, 2.0));

    rig.down(start, PointerButton::Primary, 0);
    assert_eq!(rig.handler.selection_rect(), None);
    rig.move_to(end, 1, 30);
    assert!(rig.handler.selection_rect().is_some());
    rig.up(end, PointerButton::Primary, 60);

    assert_eq!(
        rig.events(),
        vec![InputEvent::SelectionBox {
            agents: vec![miner(), scout()],
            buildings: vec![],
        }]
    );
    assert_eq!(rig.handler.selection_rect(), None);
}

#[test]
fn right_click_with_selection_moves_and_assigns_area() {
    let mut rig = Rig::with_state(StaticState::with_selection(vec![scout()]));
    let target = Vec3::new(10.0, 0.0, 10.0);
    let at = rig.screen(target);

    rig.context(at, 0);

    let events = rig.events();
    assert!(matches!(
        &events[0],
        InputEvent::MoveCommand { position, agents } if close(*position, target) && *agents == vec![scout()]
    ));
    assert!(matches!(&events[1], InputEvent::AreaRightClick { position } if close(*position, target)));
    assert_eq!(events.len(), 2);
}

#[test]
fn right_click_without_selection_classifies_target() {
    let mut rig = Rig::new();
    let depot_at = rig.screen(DEPOT);
    let ground_at = rig.screen(OPEN_GROUND);

    rig.context(depot_at, 0);
    rig.context(ground_at, 10);

    let events = rig.events();
    assert!(matches!(
        &events[0],
        InputEvent::ContextMenu { world: Some(world), target: ContextTarget::Building(id), .. }
            if *id == depot() && close(*world, DEPOT)
    ));
    assert!(matches!(
        &events[1],
        InputEvent::ContextMenu {
            target: ContextTarget::Ground,
            ..
        }
    ));
}

#[test]
fn right_drag_orbits_and_swallows_the_context_menu() {
    let mut rig = Rig::new();
    let start = rig.screen(OPEN_GROUND);
    let before = rig.camera.position;

    rig.down(start, PointerButton::Secondary, 0);
    rig.move_to(start + Vec2::new(40.0, 0.0), 2, 20);
    rig.up(start + Vec2::new(40.0, 0.0), PointerButton::Secondary, 40);
    rig.context(start + Vec2::new(40.0, 0.0), 41);

    assert!(rig.camera.position.distance(before) > 0.1);
    assert!(rig.events().is_empty());
    assert!(rig.handler.mode().is_idle());
}

#[test]
fn agent_hover_shows_after_dwell() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);

    rig.move_to(at, 0, 0);
    rig.tick(399);
    assert!(rig.events().is_empty());

    rig.tick(400);
    assert_eq!(
        rig.events(),
        vec![InputEvent::AgentHover {
            agent: Some(scout()),
            screen: Some(at),
        }]
    );
}

#[test]
fn hover_rearms_when_the_entity_changes() {
    let mut rig = Rig::new();
    let scout_at = rig.screen(SCOUT);
    let miner_at = rig.screen(Vec3::new(8.0, 0.5, 0.0));

    rig.move_to(scout_at, 0, 0);
    rig.move_to(miner_at, 0, 200);
    rig.tick(450);
    assert!(rig.events().is_empty());

    rig.tick(600);
    assert_eq!(
        rig.events(),
        vec![InputEvent::AgentHover {
            agent: Some(miner()),
            screen: Some(miner_at),
        }]
    );
}

#[test]
fn building_hover_waits_for_its_longer_delay() {
    let mut rig = Rig::new();
    let at = rig.screen(DEPOT);

    rig.move_to(at, 0, 0);
    rig.tick(4_999);
    assert!(rig.events().is_empty());
    rig.tick(5_000);
    assert_eq!(
        rig.events(),
        vec![InputEvent::BuildingHover {
            building: Some(depot()),
            screen: Some(at),
        }]
    );

    rig.blur(5_100);
    assert_eq!(
        rig.events(),
        vec![
            InputEvent::AgentHover {
                agent: None,
                screen: None
            },
            InputEvent::BuildingHover {
                building: None,
                screen: None
            },
        ]
    );
}

#[test]
fn interrupts_cancel_pending_hover() {
    let interrupts: [fn(&mut Rig, u64); 3] = [Rig::leave, Rig::blur, Rig::hide];
    for interrupt in interrupts {
        let mut rig = Rig::new();
        let at = rig.screen(SCOUT);

        rig.move_to(at, 0, 0);
        rig.tick(100);
        interrupt(&mut rig, 150);
        assert_eq!(
            rig.events(),
            vec![InputEvent::AgentHover {
                agent: None,
                screen: None
            }]
        );

        rig.tick(1_000);
        assert!(rig.events().is_empty());
    }
}

#[test]
fn blur_cancels_box_select_in_flight() {
    let mut rig = Rig::new();
    let start = rig.screen(OPEN_GROUND);

    rig.down(start, PointerButton::Primary, 0);
    rig.move_to(start + Vec2::new(50.0, 50.0), 1, 20);
    rig.blur(30);
    rig.up(start + Vec2::new(50.0, 50.0), PointerButton::Primary, 40);

    let events = rig.events();
    assert!(!events
        .iter()
        .any(|event| matches!(event, InputEvent::SelectionBox { .. })));
    assert!(rig.handler.mode().is_idle());
}

#[test]
fn desynced_terminal_flag_heals_on_pointer_down() {
    let mut rig = Rig::with_state(StaticState {
        terminal_open: true,
        terminal_visible: false,
        ..StaticState::default()
    });
    let at = rig.screen(OPEN_GROUND);

    rig.down(at, PointerButton::Primary, 0);

    assert!(!rig.state.borrow().terminal_open);
}

#[test]
fn visible_terminal_suppresses_hover() {
    let mut rig = Rig::with_state(StaticState {
        terminal_open: true,
        terminal_visible: true,
        ..StaticState::default()
    });
    let at = rig.screen(SCOUT);

    rig.move_to(at, 0, 0);
    rig.tick(1_000);

    assert!(rig.events().is_empty());
    assert!(rig.state.borrow().terminal_open);
}

#[test]
fn press_before_dwell_drops_pending_hover() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);

    rig.move_to(at, 0, 0);
    rig.down(at, PointerButton::Primary, 100);
    rig.move_to(at + Vec2::new(30.0, 30.0), 1, 200);
    rig.move_to(at + Vec2::new(60.0, 60.0), 1, 450);
    rig.tick(1_000);

    assert!(matches!(rig.handler.mode(), GestureMode::BoxSelect(_)));
    assert!(!rig
        .events()
        .iter()
        .any(|event| matches!(event, InputEvent::AgentHover { agent: Some(_), .. })));
}

#[test]
fn box_select_hides_a_shown_hover() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);
    rig.move_to(at, 0, 0);
    rig.tick(400);
    rig.events();

    rig.down(at, PointerButton::Primary, 500);
    rig.move_to(at + Vec2::new(60.0, 60.0), 1, 520);
    rig.up(at + Vec2::new(60.0, 60.0), PointerButton::Primary, 540);

    let events = rig.events();
    assert_eq!(
        events[0],
        InputEvent::AgentHover {
            agent: None,
            screen: None
        }
    );
    assert!(matches!(events[1], InputEvent::SelectionBox { .. }));
    assert_eq!(events.len(), 2);
}

#[test]
fn terminal_opening_cancels_armed_hover() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);

    rig.move_to(at, 0, 0);
    {
        let mut state = rig.state.borrow_mut();
        state.terminal_open = true;
        state.terminal_visible = true;
    }
    rig.tick(1_000);

    assert!(rig.events().is_empty());
}

#[test]
fn terminal_opening_hides_a_shown_hover() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);
    rig.move_to(at, 0, 0);
    rig.tick(400);
    rig.events();

    {
        let mut state = rig.state.borrow_mut();
        state.terminal_open = true;
        state.terminal_visible = true;
    }
    rig.tick(500);
    assert_eq!(
        rig.events(),
        vec![InputEvent::AgentHover {
            agent: None,
            screen: None
        }]
    );

    rig.tick(2_000);
    assert!(rig.events().is_empty());
}

#[test]
fn touch_taps_use_the_touch_agent_detector() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);

    rig.touch_start(vec![finger(1, at)], 0);
    rig.touch_end(vec![], vec![finger(1, at)], 100);
    rig.touch_start(vec![finger(2, at)], 200);
    rig.touch_end(vec![], vec![finger(2, at)], 300);

    assert_eq!(
        rig.events(),
        vec![
            InputEvent::AgentClick {
                agent: scout(),
                shift: false
            },
            InputEvent::AgentDoubleClick { agent: scout() },
        ]
    );
}

#[test]
fn long_press_opens_context_menu_without_a_tap() {
    let mut rig = Rig::new();
    let at = rig.screen(OPEN_GROUND);

    rig.touch_start(vec![finger(1, at)], 0);
    rig.tick(600);
    let events = rig.events();
    assert!(matches!(
        &events[0],
        InputEvent::ContextMenu {
            target: ContextTarget::Ground,
            world: Some(_),
            ..
        }
    ));
    assert_eq!(events[1], InputEvent::Haptic { duration_ms: 50 });
    assert_eq!(events.len(), 2);

    rig.touch_end(vec![], vec![finger(1, at)], 700);
    assert!(rig.events().is_empty());
}

#[test]
fn two_finger_spread_pinches_toward_the_center() {
    let mut rig = Rig::new();
    let center = rig.screen(OPEN_GROUND);
    let before = rig.camera.distance();

    rig.touch_start(vec![finger(1, center - Vec2::X * 40.0)], 0);
    rig.touch_start(
        vec![
            finger(1, center - Vec2::X * 40.0),
            finger(2, center + Vec2::X * 40.0),
        ],
        10,
    );
    assert_eq!(rig.handler.mode(), &GestureMode::Pinch);

    rig.touch_move(
        vec![
            finger(1, center - Vec2::X * 80.0),
            finger(2, center + Vec2::X * 80.0),
        ],
        30,
    );
    assert!(rig.camera.distance() < before * 0.6);

    rig.touch_end(
        vec![finger(2, center + Vec2::X * 80.0)],
        vec![finger(1, center - Vec2::X * 80.0)],
        50,
    );
    assert!(rig.handler.mode().is_idle());
}

#[test]
fn wheel_zoom_keeps_the_point_under_the_cursor() {
    let mut rig = Rig::new();
    rig.camera = OrbitCamera::default();
    let anchor = Vec3::new(6.0, 0.0, -4.0);
    let before = rig.screen(anchor);
    let distance = rig.camera.distance();

    rig.wheel(WheelInput {
        position: before,
        delta_x: 0.0,
        delta_y: -3.0,
        delta_mode: DeltaMode::Line,
        modifiers: Modifiers::NONE,
        time: ms(0),
    });

    let after = rig.screen(anchor);
    assert!(rig.camera.distance() < distance);
    assert!((after - before).length() < 0.5, "{before:?} -> {after:?}");
    assert_eq!(rig.log.take(), vec![InputEvent::Activity]);
}

#[test]
fn dispose_is_idempotent_and_silences_input() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);

    rig.handler.dispose();
    rig.handler.dispose();
    rig.click(at, 0);
    assert!(rig.log.take().is_empty());

    rig.handler.reattach(CanvasRect::from_size(800.0, 800.0));
    assert_eq!(
        rig.events(),
        vec![InputEvent::AgentHover {
            agent: None,
            screen: None
        }]
    );
    rig.click(at, 1_000);
    assert_eq!(
        rig.events(),
        vec![InputEvent::AgentClick {
            agent: scout(),
            shift: false
        }]
    );
}

#[test]
fn touch_typed_pointer_events_are_ignored() {
    let mut rig = Rig::new();
    let at = rig.screen(SCOUT);
    let input = PointerInput::new(at, ms(0))
        .with_button(PointerButton::Primary)
        .with_kind(PointerKind::Touch);

    let mut view = SceneView::new(&mut rig.camera, &rig.scene);
    rig.handler.pointer_down(&mut view, &input);

    assert!(rig.log.take().is_empty());
    assert!(rig.handler.mode().is_idle());
}

//! Deterministic replay of recorded input traces through the input core.
//!
//! A trace pins the scene, camera and canvas, then lists timestamped input
//! events. Replaying it drives an [`InputHandler`] with a virtual clock, so
//! the emitted events are identical on every run.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use command_input::{
    AgentId, CanvasRect, ConfigError, EventLog, InputConfig, InputEvent, InputHandler,
    OrbitCamera, PointerInput, SceneLayout, SceneView, StaticState, TouchInput,
    TrackpadGestureInput, WheelInput,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read trace at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse trace at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("trace event {index} at {at_ms}ms is earlier than the previous event at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize input event: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write replay output: {0}")]
    Write(#[source] io::Error),
}

/// Recorded session: the fixed world plus the inputs to feed through it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayTrace {
    #[serde(default)]
    pub scene: SceneLayout,
    #[serde(default)]
    pub camera: OrbitCamera,
    #[serde(default)]
    pub canvas: CanvasRect,
    #[serde(default)]
    pub selected_agents: Vec<AgentId>,
    #[serde(default)]
    pub drawing: bool,
    #[serde(default)]
    pub building_drag_disabled: bool,
    /// Extra time after the last event so pending timers can fire.
    #[serde(default)]
    pub settle_ms: u64,
    pub events: Vec<TraceEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceEvent {
    pub at_ms: u64,
    #[serde(flatten)]
    pub input: TraceInput,
}

/// One recorded input. Payload timestamps come from the enclosing
/// [`TraceEvent::at_ms`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceInput {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    ContextMenu(PointerInput),
    Wheel(WheelInput),
    Trackpad(TrackpadGestureInput),
    TouchStart(TouchInput),
    TouchMove(TouchInput),
    TouchEnd(TouchInput),
    TouchCancel,
    Leave,
    Blur,
    Hidden,
    Tick,
}

impl TraceInput {
    fn name(&self) -> &'static str {
        match self {
            TraceInput::PointerDown(_) => "pointer_down",
            TraceInput::PointerMove(_) => "pointer_move",
            TraceInput::PointerUp(_) => "pointer_up",
            TraceInput::ContextMenu(_) => "context_menu",
            TraceInput::Wheel(_) => "wheel",
            TraceInput::Trackpad(_) => "trackpad",
            TraceInput::TouchStart(_) => "touch_start",
            TraceInput::TouchMove(_) => "touch_move",
            TraceInput::TouchEnd(_) => "touch_end",
            TraceInput::TouchCancel => "touch_cancel",
            TraceInput::Leave => "leave",
            TraceInput::Blur => "blur",
            TraceInput::Hidden => "hidden",
            TraceInput::Tick => "tick",
        }
    }

    fn apply(&self, handler: &mut InputHandler, view: &mut SceneView<'_>, at: Duration) {
        match self {
            TraceInput::PointerDown(input) => handler.pointer_down(view, &stamped(*input, at)),
            TraceInput::PointerMove(input) => handler.pointer_move(view, &stamped(*input, at)),
            TraceInput::PointerUp(input) => handler.pointer_up(view, &stamped(*input, at)),
            TraceInput::ContextMenu(input) => handler.context_menu(view, &stamped(*input, at)),
            TraceInput::Wheel(input) => handler.wheel(view, &WheelInput { time: at, ..*input }),
            TraceInput::Trackpad(input) => handler.trackpad_gesture(
                view,
                &TrackpadGestureInput {
                    time: at,
                    ..*input
                },
            ),
            TraceInput::TouchStart(input) => handler.touch_start(view, &stamped_touch(input, at)),
            TraceInput::TouchMove(input) => handler.touch_move(view, &stamped_touch(input, at)),
            TraceInput::TouchEnd(input) => handler.touch_end(view, &stamped_touch(input, at)),
            TraceInput::TouchCancel => handler.touch_cancel(view, at),
            TraceInput::Leave => handler.pointer_leave(view, at),
            TraceInput::Blur => handler.window_blur(view, at),
            TraceInput::Hidden => handler.visibility_changed(view, true, at),
            TraceInput::Tick => handler.tick(view, at),
        }
    }
}

fn stamped(input: PointerInput, at: Duration) -> PointerInput {
    PointerInput { time: at, ..input }
}

fn stamped_touch(input: &TouchInput, at: Duration) -> TouchInput {
    TouchInput {
        time: at,
        ..input.clone()
    }
}

impl ReplayTrace {
    pub fn parse(raw: &str) -> Result<Self, ReplayError> {
        Self::parse_at(raw, Path::new("<inline>"))
    }

    fn parse_at(raw: &str, path: &Path) -> Result<Self, ReplayError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let trace: Self =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
                ReplayError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        trace.validate()?;
        Ok(trace)
    }

    /// Timestamps must never go backwards.
    pub fn validate(&self) -> Result<(), ReplayError> {
        let mut previous_ms = 0;
        for (index, event) in self.events.iter().enumerate() {
            if event.at_ms < previous_ms {
                return Err(ReplayError::OutOfOrder {
                    index,
                    at_ms: event.at_ms,
                    previous_ms,
                });
            }
            previous_ms = event.at_ms;
        }
        Ok(())
    }
}

pub fn load_trace(path: &Path) -> Result<ReplayTrace, ReplayError> {
    let raw = fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ReplayTrace::parse_at(&raw, path)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub events: Vec<InputEvent>,
    pub camera: OrbitCamera,
}

/// Feeds every trace event through a fresh handler and collects what it emits.
pub fn replay(trace: &ReplayTrace, config: InputConfig) -> ReplayOutcome {
    let log = EventLog::new();
    let state = StaticState {
        selected: trace.selected_agents.clone(),
        drawing: trace.drawing,
        building_drag_disabled: trace.building_drag_disabled,
        ..StaticState::default()
    };
    let mut handler = InputHandler::new(config, trace.canvas, log.clone(), state);
    let scene = trace.scene.build();
    let mut camera = trace.camera;
    info!(events = trace.events.len(), "replay_started");

    {
        let mut view = SceneView::new(&mut camera, &scene);
        let mut clock = Duration::ZERO;
        for event in &trace.events {
            clock = Duration::from_millis(event.at_ms);
            debug!(at_ms = event.at_ms, input = event.input.name(), "replay_input");
            event.input.apply(&mut handler, &mut view, clock);
        }
        handler.tick(&mut view, clock + Duration::from_millis(trace.settle_ms));
        handler.dispose();
    }

    let events = log.take();
    info!(emitted = events.len(), "replay_finished");
    ReplayOutcome { events, camera }
}

/// One JSON document per event, newline separated.
pub fn write_events<W: Write>(
    events: &[InputEvent],
    pretty: bool,
    out: &mut W,
) -> Result<(), ReplayError> {
    for event in events {
        let line = if pretty {
            serde_json::to_string_pretty(event)
        } else {
            serde_json::to_string(event)
        }
        .map_err(ReplayError::Serialize)?;
        writeln!(out, "{line}").map_err(ReplayError::Write)?;
    }
    Ok(())
}

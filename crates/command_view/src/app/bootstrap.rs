use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use command_input::commands::{formation_offsets, FORMATION_SPACING};
use command_input::scene::{AgentSpec, AreaSpec, BuildingSpec};
use command_input::{AgentId, AreaId, BuildingId, InputConfig, SceneLayout};
use glam::{Vec2, Vec3};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::loop_runner::LoopConfig;

pub(crate) const CONFIG_ENV_VAR: &str = "COMMAND_VIEW_CONFIG";
pub(crate) const LAYOUT_ENV_VAR: &str = "COMMAND_VIEW_LAYOUT";
pub(crate) const AGENT_COUNT_ENV_VAR: &str = "COMMAND_VIEW_AGENTS";
const DEFAULT_AGENT_COUNT: usize = 6;
const DEMO_AGENT_SPACING: f32 = 2.5;

#[derive(Debug, Error)]
pub(crate) enum LayoutError {
    #[error("failed to read scene layout at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene layout at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) input_config: InputConfig,
    pub(crate) layout: SceneLayout,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Command View Startup ===");

    let input_config = resolve_input_config();
    let layout = resolve_layout();
    info!(
        agents = layout.agents.len(),
        buildings = layout.buildings.len(),
        areas = layout.areas.len(),
        "scene_layout_ready"
    );

    AppWiring {
        config: LoopConfig::default(),
        input_config,
        layout,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn resolve_input_config() -> InputConfig {
    let Some(path) = env::var_os(CONFIG_ENV_VAR) else {
        return InputConfig::default();
    };
    let path = PathBuf::from(path);
    match InputConfig::load(&path) {
        Ok(config) => {
            info!(path = %path.display(), "input_config_loaded");
            config
        }
        Err(error) => {
            warn!(
                env_var = CONFIG_ENV_VAR,
                error = %error,
                "invalid input config; falling back to defaults"
            );
            InputConfig::default()
        }
    }
}

fn resolve_layout() -> SceneLayout {
    if let Some(path) = env::var_os(LAYOUT_ENV_VAR) {
        match load_layout(Path::new(&path)) {
            Ok(layout) => return layout,
            Err(error) => warn!(
                env_var = LAYOUT_ENV_VAR,
                error = %error,
                "invalid scene layout; falling back to demo layout"
            ),
        }
    }
    demo_layout(resolve_agent_count())
}

pub(crate) fn load_layout(path: &Path) -> Result<SceneLayout, LayoutError> {
    let raw = fs::read_to_string(path).map_err(|source| LayoutError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|source| LayoutError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_agent_count() -> usize {
    match env::var(AGENT_COUNT_ENV_VAR) {
        Ok(value) => match parse_agent_count(&value) {
            Some(count) => count,
            None => {
                warn!(
                    env_var = AGENT_COUNT_ENV_VAR,
                    value = value.as_str(),
                    "invalid agent count env var value; falling back to default"
                );
                DEFAULT_AGENT_COUNT
            }
        },
        Err(env::VarError::NotPresent) => DEFAULT_AGENT_COUNT,
        Err(err) => {
            warn!(
                env_var = AGENT_COUNT_ENV_VAR,
                error = %err,
                "unable to read agent count env var; falling back to default"
            );
            DEFAULT_AGENT_COUNT
        }
    }
}

fn parse_agent_count(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok()
}

/// Agents in a grid at the origin, two buildings to the north and one
/// work area to the south-east.
pub(crate) fn demo_layout(agent_count: usize) -> SceneLayout {
    let agents = formation_offsets(agent_count)
        .into_iter()
        .enumerate()
        .map(|(index, offset)| AgentSpec {
            id: AgentId::new(format!("agent-{}", index + 1)),
            position: offset / FORMATION_SPACING * DEMO_AGENT_SPACING,
            radius: 0.5,
        })
        .collect();

    SceneLayout {
        agents,
        buildings: vec![
            BuildingSpec {
                id: BuildingId::new("workshop"),
                position: Vec3::new(-14.0, 1.0, -12.0),
                half_size: Vec3::new(3.0, 1.0, 2.0),
            },
            BuildingSpec {
                id: BuildingId::new("depot"),
                position: Vec3::new(14.0, 1.0, -14.0),
                half_size: Vec3::new(2.0, 1.0, 2.0),
            },
        ],
        areas: vec![AreaSpec {
            id: AreaId::new("area-1"),
            center: Vec2::new(12.0, 10.0),
            half_extents: Vec2::new(5.0, 4.0),
        }],
        ..SceneLayout::default()
    }
}

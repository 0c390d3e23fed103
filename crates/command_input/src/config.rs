use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::MouseBindings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read input config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse input config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("invalid input config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Every threshold the input core uses. The defaults are the tuned values the
/// command view ships with; a JSON file may override any subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub click: ClickConfig,
    pub touch: TouchConfig,
    pub hover: HoverConfig,
    pub camera: CameraConfig,
    pub trackpad: TrackpadConfig,
    pub mouse: MouseBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClickConfig {
    pub mouse_double_click_ms: u64,
    pub touch_double_click_ms: u64,
    pub drag_threshold_px: f32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            mouse_double_click_ms: 300,
            touch_double_click_ms: 450,
            drag_threshold_px: 5.0,
        }
    }
}

impl ClickConfig {
    pub fn mouse_double_click(&self) -> Duration {
        Duration::from_millis(self.mouse_double_click_ms)
    }

    pub fn touch_double_click(&self) -> Duration {
        Duration::from_millis(self.touch_double_click_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouchConfig {
    pub drag_threshold_px: f32,
    pub long_press_ms: u64,
    pub tap_max_ms: u64,
    pub rotation_noise_floor: f32,
    pub haptic_feedback: bool,
    pub haptic_duration_ms: u64,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 10.0,
            long_press_ms: 500,
            tap_max_ms: 400,
            rotation_noise_floor: 0.01,
            haptic_feedback: true,
            haptic_duration_ms: 50,
        }
    }
}

impl TouchConfig {
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn tap_max(&self) -> Duration {
        Duration::from_millis(self.tap_max_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HoverConfig {
    pub poll_interval_ms: u64,
    pub agent_delay_ms: u64,
    pub building_delay_ms: u64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            agent_delay_ms: 400,
            building_delay_ms: 5_000,
        }
    }
}

impl HoverConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn agent_delay(&self) -> Duration {
        Duration::from_millis(self.agent_delay_ms)
    }

    pub fn building_delay(&self) -> Duration {
        Duration::from_millis(self.building_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub pan_speed: f32,
    pub orbit_speed: f32,
    pub polar_margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            min_distance: 5.0,
            max_distance: 200.0,
            pan_speed: 0.005,
            orbit_speed: 0.005,
            polar_margin: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackpadConfig {
    pub pinch_sensitivity: f32,
    pub pan_multiplier: f32,
    /// Pixel-mode wheel deltas below this magnitude come from a trackpad.
    pub mouse_wheel_min_delta: f32,
}

impl Default for TrackpadConfig {
    fn default() -> Self {
        Self {
            pinch_sensitivity: 0.01,
            pan_multiplier: 1.0,
            mouse_wheel_min_delta: 4.0,
        }
    }
}

impl InputConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw).map_err(|error| match error {
            ParseOrInvalid::Parse(source) => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseOrInvalid::Invalid(error) => error,
        })?;
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Self::from_json_str(raw).map_err(|error| match error {
            ParseOrInvalid::Parse(source) => ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            },
            ParseOrInvalid::Invalid(error) => error,
        })
    }

    fn from_json_str(raw: &str) -> Result<Self, ParseOrInvalid> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: Self =
            serde_path_to_error::deserialize(&mut deserializer).map_err(ParseOrInvalid::Parse)?;
        config.validate().map_err(ParseOrInvalid::Invalid)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive_ms("click.mouse_double_click_ms", self.click.mouse_double_click_ms)?;
        require_positive_ms("click.touch_double_click_ms", self.click.touch_double_click_ms)?;
        require_non_negative("click.drag_threshold_px", self.click.drag_threshold_px)?;
        require_non_negative("touch.drag_threshold_px", self.touch.drag_threshold_px)?;
        require_positive_ms("touch.long_press_ms", self.touch.long_press_ms)?;
        require_positive_ms("touch.tap_max_ms", self.touch.tap_max_ms)?;
        require_non_negative("touch.rotation_noise_floor", self.touch.rotation_noise_floor)?;
        require_positive_ms("hover.poll_interval_ms", self.hover.poll_interval_ms)?;
        require_positive_ms("hover.agent_delay_ms", self.hover.agent_delay_ms)?;
        require_positive_ms("hover.building_delay_ms", self.hover.building_delay_ms)?;
        require_positive("camera.zoom_step", self.camera.zoom_step)?;
        if self.camera.zoom_step >= 1.0 {
            return Err(ConfigError::Invalid {
                field: "camera.zoom_step",
                reason: "must be below 1.0",
            });
        }
        require_positive("camera.min_distance", self.camera.min_distance)?;
        require_positive("camera.max_distance", self.camera.max_distance)?;
        if self.camera.min_distance > self.camera.max_distance {
            return Err(ConfigError::Invalid {
                field: "camera.min_distance",
                reason: "must not exceed camera.max_distance",
            });
        }
        require_positive("camera.pan_speed", self.camera.pan_speed)?;
        require_positive("camera.orbit_speed", self.camera.orbit_speed)?;
        require_non_negative("camera.polar_margin", self.camera.polar_margin)?;
        if self.camera.polar_margin >= std::f32::consts::FRAC_PI_2 {
            return Err(ConfigError::Invalid {
                field: "camera.polar_margin",
                reason: "must be below pi/2",
            });
        }
        require_positive("trackpad.pinch_sensitivity", self.trackpad.pinch_sensitivity)?;
        require_positive("trackpad.pan_multiplier", self.trackpad.pan_multiplier)?;
        Ok(())
    }
}

enum ParseOrInvalid {
    Parse(serde_path_to_error::Error<serde_json::Error>),
    Invalid(ConfigError),
}

fn require_positive_ms(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be a positive finite number",
        });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be a non-negative finite number",
        });
    }
    Ok(())
}

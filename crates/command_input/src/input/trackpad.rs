use glam::Vec2;

use super::events::{DeltaMode, TrackpadGesture, TrackpadGestureInput, WheelInput};
use crate::config::TrackpadConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackpadAction {
    /// Discrete mouse-wheel step; positive `delta_y` zooms out.
    Zoom { delta_y: f32 },
    /// Continuous zoom ratio; above 1 zooms in.
    Pinch { scale: f32 },
    /// Two-finger scroll, expressed as an equivalent pointer drag.
    Pan { delta: Vec2 },
    Twist { angle: f32 },
}

/// Separates mouse wheels from two-finger trackpad scrolls and pinches.
#[derive(Debug, Clone)]
pub struct TrackpadGestureHandler {
    config: TrackpadConfig,
}

impl TrackpadGestureHandler {
    pub fn new(config: TrackpadConfig) -> Self {
        Self { config }
    }

    pub fn handle_wheel(&self, input: &WheelInput) -> Option<TrackpadAction> {
        if input.delta_x == 0.0 && input.delta_y == 0.0 {
            return None;
        }

        // Browsers report trackpad pinch as a ctrl+wheel.
        if input.modifiers.ctrl {
            let scale = (-input.delta_y * self.config.pinch_sensitivity).exp();
            return Some(TrackpadAction::Pinch { scale });
        }

        if self.looks_like_trackpad_scroll(input) {
            let delta = -Vec2::new(input.delta_x, input.delta_y) * self.config.pan_multiplier;
            return Some(TrackpadAction::Pan { delta });
        }

        if input.delta_y == 0.0 {
            return None;
        }
        Some(TrackpadAction::Zoom {
            delta_y: input.delta_y,
        })
    }

    pub fn handle_gesture(&self, input: &TrackpadGestureInput) -> Option<TrackpadAction> {
        match input.gesture {
            TrackpadGesture::Magnify { delta } => {
                let scale = 1.0 + delta;
                (scale > 0.0 && delta != 0.0).then_some(TrackpadAction::Pinch { scale })
            }
            TrackpadGesture::Rotate { delta } => {
                (delta != 0.0).then_some(TrackpadAction::Twist { angle: delta })
            }
        }
    }

    fn looks_like_trackpad_scroll(&self, input: &WheelInput) -> bool {
        if input.delta_mode != DeltaMode::Pixel {
            return false;
        }
        if input.delta_x != 0.0 {
            return true;
        }
        let dy = input.delta_y;
        dy.fract() != 0.0 || dy.abs() < self.config.mouse_wheel_min_delta
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::types::Modifiers;

    fn wheel(delta_x: f32, delta_y: f32, delta_mode: DeltaMode) -> WheelInput {
        WheelInput {
            position: Vec2::new(300.0, 200.0),
            delta_x,
            delta_y,
            delta_mode,
            modifiers: Modifiers::NONE,
            time: Duration::ZERO,
        }
    }

    #[test]
    fn notched_mouse_wheel_zooms() {
        let handler = TrackpadGestureHandler::new(TrackpadConfig::default());

        assert_eq!(
            handler.handle_wheel(&wheel(0.0, 100.0, DeltaMode::Pixel)),
            Some(TrackpadAction::Zoom { delta_y: 100.0 })
        );
        assert_eq!(
            handler.handle_wheel(&wheel(0.0, -3.0, DeltaMode::Line)),
            Some(TrackpadAction::Zoom { delta_y: -3.0 })
        );
    }

    #[test]
    fn ctrl_wheel_is_pinch_with_exponential_scale() {
        let handler = TrackpadGestureHandler::new(TrackpadConfig::default());
        let mut input = wheel(0.0, -10.0, DeltaMode::Pixel);
        input.modifiers.ctrl = true;

        match handler.handle_wheel(&input) {
            Some(TrackpadAction::Pinch { scale }) => {
                assert!((scale - 0.1_f32.exp()).abs() < 1e-6);
            }
            other => panic!("expected pinch, got {other:?}"),
        }
    }

    #[test]
    fn horizontal_or_fractional_pixel_scroll_pans() {
        let handler = TrackpadGestureHandler::new(TrackpadConfig::default());

        assert_eq!(
            handler.handle_wheel(&wheel(6.0, 20.0, DeltaMode::Pixel)),
            Some(TrackpadAction::Pan {
                delta: Vec2::new(-6.0, -20.0)
            })
        );
        assert_eq!(
            handler.handle_wheel(&wheel(0.0, 2.5, DeltaMode::Pixel)),
            Some(TrackpadAction::Pan {
                delta: Vec2::new(0.0, -2.5)
            })
        );
    }

    #[test]
    fn native_gestures_map_to_pinch_and_twist() {
        let handler = TrackpadGestureHandler::new(TrackpadConfig::default());
        let magnify = TrackpadGestureInput {
            gesture: TrackpadGesture::Magnify { delta: 0.25 },
            position: Vec2::ZERO,
            time: Duration::ZERO,
        };
        let rotate = TrackpadGestureInput {
            gesture: TrackpadGesture::Rotate { delta: -0.2 },
            ..magnify
        };

        assert_eq!(
            handler.handle_gesture(&magnify),
            Some(TrackpadAction::Pinch { scale: 1.25 })
        );
        assert_eq!(
            handler.handle_gesture(&rotate),
            Some(TrackpadAction::Twist { angle: -0.2 })
        );
    }

    #[test]
    fn empty_wheel_is_ignored() {
        let handler = TrackpadGestureHandler::new(TrackpadConfig::default());
        assert_eq!(handler.handle_wheel(&wheel(0.0, 0.0, DeltaMode::Pixel)), None);
    }
}

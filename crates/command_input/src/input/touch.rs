use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};
use std::time::Duration;

use glam::Vec2;
use tracing::debug;

use super::events::{TouchInput, TouchPoint};
use super::timer::Deadline;
use crate::config::TouchConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchGesture {
    Tap { position: Vec2 },
    LongPress { position: Vec2 },
    /// Frame-to-frame single finger movement.
    Pan { delta: Vec2 },
    /// Frame-to-frame finger distance ratio; above 1 spreads the fingers.
    Pinch { scale: f32, center: Vec2 },
    Orbit { delta: Vec2 },
    Rotation { delta: f32 },
    Haptic { duration: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MultiBaseline {
    count: usize,
    distance: f32,
    centroid: Vec2,
    angle: f32,
}

/// Recognizes tap, long press, pan, pinch, orbit and twist from raw touches.
#[derive(Debug, Clone)]
pub struct TouchGestureHandler {
    config: TouchConfig,
    pointers: BTreeMap<u64, Vec2>,
    started_at: Option<Duration>,
    start_position: Vec2,
    last_position: Vec2,
    is_dragging: bool,
    long_press_triggered: bool,
    multi_touch: bool,
    long_press: Deadline,
    baseline: Option<MultiBaseline>,
}

impl TouchGestureHandler {
    pub fn new(config: TouchConfig) -> Self {
        Self {
            config,
            pointers: BTreeMap::new(),
            started_at: None,
            start_position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            is_dragging: false,
            long_press_triggered: false,
            multi_touch: false,
            long_press: Deadline::default(),
            baseline: None,
        }
    }

    pub fn active_touches(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn long_press_triggered(&self) -> bool {
        self.long_press_triggered
    }

    pub fn touch_start(&mut self, input: &TouchInput) -> Vec<TouchGesture> {
        let gestures = self.poll(input.time);
        self.track(&input.touches);

        match self.pointers.len() {
            0 => {}
            1 => {
                let position = self.single_position();
                if self.started_at.is_none() {
                    self.started_at = Some(input.time);
                    self.start_position = position;
                    self.is_dragging = false;
                    self.long_press_triggered = false;
                    self.multi_touch = false;
                    self.long_press.arm(input.time, self.config.long_press());
                }
                self.last_position = position;
                self.baseline = None;
            }
            count => {
                if self.started_at.is_none() {
                    self.started_at = Some(input.time);
                }
                self.multi_touch = true;
                self.long_press.cancel();
                self.baseline = self.measure(count);
                debug!(touches = count, "touch_multi_started");
            }
        }
        gestures
    }

    pub fn touch_move(&mut self, input: &TouchInput) -> Vec<TouchGesture> {
        let mut gestures = self.poll(input.time);
        self.track(&input.touches);

        match self.pointers.len() {
            0 => {}
            1 => self.move_single(&mut gestures),
            count => self.move_multi(count, &mut gestures),
        }
        gestures
    }

    pub fn touch_end(&mut self, input: &TouchInput) -> Vec<TouchGesture> {
        let mut gestures = self.poll(input.time);
        self.track(&input.touches);

        match self.pointers.len() {
            0 => {
                if let Some(position) = self.tap_position(input) {
                    gestures.push(TouchGesture::Tap { position });
                }
                self.reset();
            }
            1 => {
                // 2 -> 1: the remaining finger becomes the new pan origin.
                self.last_position = self.single_position();
                self.baseline = None;
            }
            count => self.baseline = self.measure(count),
        }
        gestures
    }

    pub fn touch_cancel(&mut self) {
        self.reset();
    }

    /// Fires the long-press deadline when due.
    pub fn poll(&mut self, now: Duration) -> Vec<TouchGesture> {
        let mut gestures = Vec::new();
        if !self.long_press.fire_if_due(now) {
            return gestures;
        }
        if self.pointers.len() != 1 || self.is_dragging || self.multi_touch {
            return gestures;
        }

        self.long_press_triggered = true;
        debug!(x = self.last_position.x, y = self.last_position.y, "touch_long_press");
        gestures.push(TouchGesture::LongPress {
            position: self.last_position,
        });
        if self.config.haptic_feedback {
            gestures.push(TouchGesture::Haptic {
                duration: Duration::from_millis(self.config.haptic_duration_ms),
            });
        }
        gestures
    }

    pub fn reset(&mut self) {
        self.pointers.clear();
        self.started_at = None;
        self.is_dragging = false;
        self.long_press_triggered = false;
        self.multi_touch = false;
        self.long_press.cancel();
        self.baseline = None;
    }

    fn track(&mut self, touches: &[TouchPoint]) {
        self.pointers.clear();
        for touch in touches {
            self.pointers.insert(touch.id, touch.position);
        }
    }

    fn single_position(&self) -> Vec2 {
        self.pointers
            .values()
            .next()
            .copied()
            .unwrap_or(self.last_position)
    }

    fn move_single(&mut self, gestures: &mut Vec<TouchGesture>) {
        let position = self.single_position();
        if !self.is_dragging && !self.long_press_triggered {
            let travelled = position.distance(self.start_position);
            if travelled > self.config.drag_threshold_px || self.multi_touch {
                self.is_dragging = true;
                self.long_press.cancel();
            }
        }

        if self.is_dragging && !self.long_press_triggered {
            let delta = position - self.last_position;
            if delta != Vec2::ZERO {
                gestures.push(TouchGesture::Pan { delta });
            }
        }
        self.last_position = position;
    }

    fn move_multi(&mut self, count: usize, gestures: &mut Vec<TouchGesture>) {
        let Some(current) = self.measure(count) else {
            return;
        };
        let previous = match self.baseline {
            Some(previous) if previous.count == count => previous,
            _ => {
                self.baseline = Some(current);
                return;
            }
        };

        let centroid_delta = current.centroid - previous.centroid;
        let mut next = current;

        if count == 2 {
            if previous.distance > f32::EPSILON && current.distance > f32::EPSILON {
                let scale = current.distance / previous.distance;
                if (scale - 1.0).abs() > f32::EPSILON {
                    gestures.push(TouchGesture::Pinch {
                        scale,
                        center: current.centroid,
                    });
                }
            }
            let rotation = wrap_angle(current.angle - previous.angle);
            if rotation.abs() > self.config.rotation_noise_floor {
                gestures.push(TouchGesture::Rotation { delta: rotation });
            } else {
                // Below the floor the baseline stays put so slow twists accumulate.
                next.angle = previous.angle;
            }
        }

        if centroid_delta != Vec2::ZERO {
            gestures.push(TouchGesture::Orbit {
                delta: centroid_delta,
            });
        }
        self.baseline = Some(next);
    }

    fn measure(&self, count: usize) -> Option<MultiBaseline> {
        if count < 2 {
            return None;
        }
        let points: Vec<Vec2> = self.pointers.values().copied().collect();
        let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
        let first = points[0];
        let second = points[1];
        let span = second - first;
        Some(MultiBaseline {
            count,
            distance: span.length(),
            centroid,
            angle: span.y.atan2(span.x),
        })
    }

    fn tap_position(&self, input: &TouchInput) -> Option<Vec2> {
        let started_at = self.started_at?;
        if self.is_dragging || self.long_press_triggered || self.multi_touch {
            return None;
        }
        if input.time.saturating_sub(started_at) >= self.config.tap_max() {
            return None;
        }
        let position = input
            .changed
            .first()
            .map(|touch| touch.position)
            .unwrap_or(self.last_position);
        Some(position)
    }
}

pub(crate) fn wrap_angle(mut angle: f32) -> f32 {
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

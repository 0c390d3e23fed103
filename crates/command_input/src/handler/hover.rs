use std::time::Duration;

use glam::Vec2;

use crate::config::HoverConfig;
use crate::input::Deadline;
use crate::types::{AgentId, BuildingId};

/// One dwell-timed hover pipeline.
#[derive(Debug, Clone)]
pub(crate) struct HoverSlot<T> {
    delay: Duration,
    candidate: Option<(T, Vec2)>,
    shown: Option<T>,
    deadline: Deadline,
}

impl<T: PartialEq + Clone> HoverSlot<T> {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            candidate: None,
            shown: None,
            deadline: Deadline::default(),
        }
    }

    /// Feeds the entity under the pointer. Returns `true` when a shown hover
    /// must be hidden because the pointer left it.
    pub(crate) fn observe(&mut self, entity: Option<T>, screen: Vec2, now: Duration) -> bool {
        let same_candidate = match (&self.candidate, &entity) {
            (Some((current, _)), Some(next)) => current == next,
            (None, None) => true,
            _ => false,
        };
        if same_candidate {
            if let (Some((_, at)), Some(_)) = (&mut self.candidate, &entity) {
                *at = screen;
            }
            return false;
        }

        // `shown` always mirrors the previous candidate.
        let hide = self.shown.take().is_some();
        match entity {
            Some(next) => {
                self.deadline.arm(now, self.delay);
                self.candidate = Some((next, screen));
            }
            None => {
                self.deadline.cancel();
                self.candidate = None;
            }
        }
        hide
    }

    /// The entity to show once its dwell delay has passed.
    pub(crate) fn poll(&mut self, now: Duration) -> Option<(T, Vec2)> {
        if !self.deadline.fire_if_due(now) {
            return None;
        }
        let (entity, screen) = self.candidate.clone()?;
        self.shown = Some(entity.clone());
        Some((entity, screen))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.shown.is_some() || self.deadline.is_armed()
    }

    pub(crate) fn is_shown(&self) -> bool {
        self.shown.is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.deadline.cancel();
        self.candidate = None;
        self.shown = None;
    }
}

/// Throttled agent and building hover, timed independently.
#[derive(Debug, Clone)]
pub(crate) struct HoverTracker {
    poll_interval: Duration,
    last_poll: Option<Duration>,
    pub(crate) agent: HoverSlot<AgentId>,
    pub(crate) building: HoverSlot<BuildingId>,
}

impl HoverTracker {
    pub(crate) fn new(config: &HoverConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            last_poll: None,
            agent: HoverSlot::new(config.agent_delay()),
            building: HoverSlot::new(config.building_delay()),
        }
    }

    /// Rate limit for hover raycasts.
    pub(crate) fn should_poll(&mut self, now: Duration) -> bool {
        match self.last_poll {
            Some(last) if now.saturating_sub(last) < self.poll_interval => false,
            _ => {
                self.last_poll = Some(now);
                true
            }
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.agent.is_active() || self.building.is_active()
    }

    pub(crate) fn clear(&mut self) {
        self.last_poll = None;
        self.agent.clear();
        self.building.clear();
    }
}

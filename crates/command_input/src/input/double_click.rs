use std::time::Duration;

use super::timer::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

/// Classifies clicks on one entity category as single or double.
///
/// A double click needs the same entity twice inside `threshold`. After a
/// double the state is cleared, so a third rapid click starts fresh.
#[derive(Debug, Clone)]
pub struct DoubleClickDetector<T> {
    threshold: Duration,
    last: Option<(T, Duration)>,
    reset_deadline: Deadline,
}

impl<T: PartialEq + Clone> DoubleClickDetector<T> {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last: None,
            reset_deadline: Deadline::default(),
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn handle_click(&mut self, entity: &T, now: Duration) -> ClickKind {
        self.poll(now);
        if let Some((last_entity, last_at)) = &self.last {
            let elapsed = now.saturating_sub(*last_at);
            if last_entity == entity && elapsed < self.threshold {
                self.reset();
                return ClickKind::Double;
            }
        }

        self.last = Some((entity.clone(), now));
        self.reset_deadline.arm(now, self.threshold);
        ClickKind::Single
    }

    /// Clears stale state once the reset deadline has passed.
    pub fn poll(&mut self, now: Duration) {
        if self.reset_deadline.fire_if_due(now) {
            self.last = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.last.is_some()
    }

    pub fn reset(&mut self) {
        self.reset_deadline.cancel();
        self.last = None;
    }

    pub fn dispose(&mut self) {
        self.reset();
    }
}

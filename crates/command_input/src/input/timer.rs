use std::time::Duration;

/// A cancellable one-shot deadline on the event timeline.
///
/// There is no background timer thread: the owner asks `fire_if_due` with the
/// timestamp of the event it is handling (or of the frame tick), and the
/// deadline disarms itself the first time it reports due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    due: Option<Duration>,
}

impl Deadline {
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.due = Some(now.saturating_add(delay));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Duration> {
        self.due
    }

    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Monotonic virtual time shared by every periodic task of a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: Duration,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    /// Moves the clock forward to `instant`. Never moves backwards.
    pub fn advance_to(&mut self, instant: Duration) {
        self.now = self.now.max(instant);
    }

    pub fn reset(&mut self) {
        self.now = Duration::ZERO;
    }
}

/// Fixed-cadence timer owned by the component it drives.
///
/// The first tick is due one period after [`PeriodicTimer::start`]. Ticks are
/// consumed with [`PeriodicTimer::fire`]; once stopped no further tick fires
/// until the timer is started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer {
    period: Duration,
    next_due: Option<Duration>,
}

impl PeriodicTimer {
    /// Periods shorter than one millisecond are raised to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Starts the timer. Starting a running timer keeps its current schedule.
    pub fn start(&mut self, now: Duration) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    /// Stops the timer. Stopping an idle timer is a no-op.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Consumes one tick if it is due at `now` and schedules the following one.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(due + self.period);
                true
            }
            _ => false,
        }
    }

    /// Drops the backlog when the timer is more than one period behind `now`:
    /// the next tick becomes due at `now` and the cadence restarts from there.
    /// Returns whether any ticks were dropped.
    pub fn skip_missed(&mut self, now: Duration) -> bool {
        match self.next_due {
            Some(due) if now >= due + self.period => {
                self.next_due = Some(now);
                true
            }
            _ => false,
        }
    }
}

/// Earliest of two optional deadlines.
pub fn earliest(a: Option<Duration>, b: Option<Duration>) -> Option<Duration> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;
use core::time::Duration;

/// Monotonic time source, only differences between readings matter.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `web_time`, so it also works in the browser.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to, clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Accumulates time across start/stop intervals.
pub struct Stopwatch {
    clock: Box<dyn Clock>,
    accumulated: Duration,
    started_at: Option<Duration>,
}

impl Stopwatch {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            accumulated: Duration::ZERO,
            started_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
    }

    pub fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += self.clock.now().saturating_sub(started_at);
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = None;
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self.accumulated + self.clock.now().saturating_sub(started_at),
            None => self.accumulated,
        }
    }
}

impl core::fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stopwatch")
            .field("elapsed", &self.elapsed())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_only_while_running() {
        let clock = ManualClock::new();
        let mut stopwatch = Stopwatch::new(clock.clone());

        clock.advance(Duration::from_secs(5));
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);

        stopwatch.start();
        clock.advance(Duration::from_secs(2));
        assert_eq!(stopwatch.elapsed(), Duration::from_secs(2));

        stopwatch.stop();
        clock.advance(Duration::from_secs(10));
        assert_eq!(stopwatch.elapsed(), Duration::from_secs(2));

        stopwatch.start();
        clock.advance(Duration::from_millis(500));
        stopwatch.stop();
        assert_eq!(stopwatch.elapsed(), Duration::from_millis(2500));
    }

    #[test]
    fn restarting_a_running_stopwatch_keeps_its_start() {
        let clock = ManualClock::new();
        let mut stopwatch = Stopwatch::new(clock.clone());

        stopwatch.start();
        clock.advance(Duration::from_secs(1));
        stopwatch.start();
        clock.advance(Duration::from_secs(1));

        assert_eq!(stopwatch.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn reset_stops_and_zeroes() {
        let clock = ManualClock::new();
        let mut stopwatch = Stopwatch::new(clock.clone());
        stopwatch.start();
        clock.advance(Duration::from_secs(3));

        stopwatch.reset();
        clock.advance(Duration::from_secs(3));

        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
    }
}

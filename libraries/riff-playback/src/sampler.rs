//! Progress sampler
//!
//! Polls the engine on a fixed period while a resource is loaded. The timer
//! itself lives in the host ([`Scheduler`], `setInterval` in a browser);
//! the sampler only remembers which timer is armed. Ticks carrying any other
//! id are dropped, so stopping is synchronous: a tick that was already queued
//! when `stop` ran can no longer write state.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// Default sampling period
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Host timer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

/// Host timer service
pub trait Scheduler {
    /// Arm a repeating timer
    fn set_interval(&mut self, period: Duration) -> TimerId;

    /// Disarm a timer
    fn clear_interval(&mut self, id: TimerId);
}

/// Periodic progress sampler
#[derive(Debug, Clone)]
pub struct ProgressSampler {
    period: Duration,
    armed: Option<TimerId>,
}

impl ProgressSampler {
    /// Create a stopped sampler
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            armed: None,
        }
    }

    /// Arm the timer, replacing any previous one
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        self.stop(scheduler);
        let id = scheduler.set_interval(self.period);
        trace!(timer = id.0, period_ms = self.period.as_millis() as u64, "Sampler armed");
        self.armed = Some(id);
    }

    /// Disarm the timer, returns false if it was not running
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        match self.armed.take() {
            Some(id) => {
                scheduler.clear_interval(id);
                trace!(timer = id.0, "Sampler disarmed");
                true
            }
            None => false,
        }
    }

    /// Whether a tick with `id` should be processed
    pub fn accepts(&self, id: TimerId) -> bool {
        self.armed == Some(id)
    }

    /// Whether the timer is armed
    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    /// Sampling period
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for ProgressSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingScheduler {
        next: u64,
        active: Vec<TimerId>,
    }

    impl Scheduler for CountingScheduler {
        fn set_interval(&mut self, _period: Duration) -> TimerId {
            self.next += 1;
            let id = TimerId(self.next);
            self.active.push(id);
            id
        }

        fn clear_interval(&mut self, id: TimerId) {
            self.active.retain(|active| *active != id);
        }
    }

    #[test]
    fn restart_keeps_a_single_timer() {
        let mut scheduler = CountingScheduler::default();
        let mut sampler = ProgressSampler::default();

        sampler.start(&mut scheduler);
        sampler.start(&mut scheduler);

        assert_eq!(scheduler.active, vec![TimerId(2)]);
        assert!(!sampler.accepts(TimerId(1)));
        assert!(sampler.accepts(TimerId(2)));
    }

    #[test]
    fn stop_rejects_queued_ticks() {
        let mut scheduler = CountingScheduler::default();
        let mut sampler = ProgressSampler::default();

        sampler.start(&mut scheduler);
        assert!(sampler.stop(&mut scheduler));
        assert!(!sampler.stop(&mut scheduler));

        assert!(scheduler.active.is_empty());
        assert!(!sampler.accepts(TimerId(1)));
        assert!(!sampler.is_running());
    }

    #[test]
    fn default_period_is_half_a_second() {
        assert_eq!(ProgressSampler::default().period(), Duration::from_millis(500));
    }
}

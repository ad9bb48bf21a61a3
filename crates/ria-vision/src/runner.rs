use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::period_from_rate_hz;
use crate::ConfigError;

/// Fixed-rate cooperative loop.
///
/// The shutdown flag is checked between ticks only; a tick in progress is
/// never interrupted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickLoop {
    period: Duration,
}

impl TickLoop {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn from_rate_hz(rate_hz: f64) -> Result<Self, ConfigError> {
        period_from_rate_hz(rate_hz).map(Self::new)
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Call `tick` once per period until `shutdown` is set or `tick` breaks.
    ///
    /// Returns the number of ticks executed. Ticks that overrun the period
    /// are followed immediately by the next one.
    pub fn run<F>(&self, shutdown: &AtomicBool, mut tick: F) -> u64
    where
        F: FnMut(u64) -> ControlFlow<()>,
    {
        let mut ticks = 0u64;
        while !shutdown.load(Ordering::Acquire) {
            let started = Instant::now();
            let flow = tick(ticks);
            ticks += 1;
            if flow.is_break() {
                break;
            }
            let elapsed = started.elapsed();
            if elapsed < self.period {
                thread::sleep(self.period - elapsed);
            } else {
                log::trace!("tick {} overran period by {:?}", ticks - 1, elapsed - self.period);
            }
        }
        ticks
    }
}

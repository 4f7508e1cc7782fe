//! High-resolution pulse timer.
//!
//! [`SpinTimer`] waits on the monotonic clock. While more than the spin
//! threshold remains it yields the CPU with short sleeps; for the final
//! stretch it busy-spins. OS sleeps overshoot by tens to hundreds of
//! microseconds, which is more than a receiver tolerates on a 350 us edge.

use std::time::{Duration, Instant};

use kraken_core::line::PulseTimer;

/// Default remaining time below which the timer stops sleeping and spins.
pub const DEFAULT_SPIN_THRESHOLD: Duration = Duration::from_micros(200);

/// Longest single sleep, so aborts are noticed promptly during long syncs.
const MAX_SLEEP: Duration = Duration::from_millis(1);

/// Sleep-then-spin timer on [`Instant`].
#[derive(Debug, Clone)]
pub struct SpinTimer {
    spin_threshold: Duration,
}

impl SpinTimer {
    /// Create a timer with [`DEFAULT_SPIN_THRESHOLD`].
    pub fn new() -> Self {
        Self::with_spin_threshold(DEFAULT_SPIN_THRESHOLD)
    }

    /// Create a timer that spins once less than `threshold` remains.
    ///
    /// `Duration::ZERO` never spins; `Duration::MAX` never sleeps.
    pub fn with_spin_threshold(threshold: Duration) -> Self {
        SpinTimer {
            spin_threshold: threshold,
        }
    }

    /// The configured spin threshold.
    pub fn spin_threshold(&self) -> Duration {
        self.spin_threshold
    }
}

impl Default for SpinTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseTimer for SpinTimer {
    fn wait_until(
        &mut self,
        origin: Instant,
        offset: Duration,
        abort: &dyn Fn() -> bool,
    ) -> bool {
        let deadline = origin + offset;
        loop {
            if abort() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            let remaining = deadline - now;
            if remaining > self.spin_threshold {
                std::thread::sleep((remaining - self.spin_threshold).min(MAX_SLEEP));
            } else {
                std::hint::spin_loop();
            }
        }
    }
}

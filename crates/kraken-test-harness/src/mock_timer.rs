//! Zero-latency pulse timer for tests.
//!
//! [`InstantTimer`] never sleeps. It records each requested offset so tests
//! can check pulse widths exactly, and it honours `abort` the same way the
//! real timer does.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use kraken_core::line::PulseTimer;

/// A [`PulseTimer`] that returns immediately and records offsets.
#[derive(Debug, Clone, Default)]
pub struct InstantTimer {
    offsets: Arc<Mutex<Vec<Duration>>>,
}

impl InstantTimer {
    /// Create a timer with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every offset passed to `wait_until`, in call order.
    ///
    /// Offsets restart from zero at the beginning of each frame.
    pub fn offsets(&self) -> Vec<Duration> {
        self.offsets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Durations between consecutive waits within each frame.
    ///
    /// A drop in offset marks a new frame, whose first wait is measured from
    /// zero.
    pub fn intervals(&self) -> Vec<Duration> {
        let mut previous = Duration::ZERO;
        self.offsets()
            .into_iter()
            .map(|offset| {
                let start = if offset < previous { Duration::ZERO } else { previous };
                previous = offset;
                offset - start
            })
            .collect()
    }
}

impl PulseTimer for InstantTimer {
    fn wait_until(
        &mut self,
        _origin: Instant,
        offset: Duration,
        abort: &dyn Fn() -> bool,
    ) -> bool {
        if abort() {
            return false;
        }
        self.offsets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(offset);
        true
    }
}

//! Output line and pulse timing traits.
//!
//! The [`OutputLine`] trait is the only physical I/O boundary in kraken: a
//! single digital output wired to the data pin of a 433 MHz OOK transmitter
//! module. Implementations exist for sysfs GPIO (`kraken-gpio`) and for
//! deterministic testing (`MockLine` in `kraken-test-harness`).
//!
//! Both traits are synchronous. Pulses are a few hundred microseconds wide,
//! far below async scheduler granularity, so the transmitter drives them from
//! a dedicated thread.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::Result;

/// Logic level of the output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineLevel {
    Low,
    High,
}

impl LineLevel {
    /// The value written to a sysfs `value` file.
    pub fn as_bit(self) -> u8 {
        match self {
            LineLevel::Low => 0,
            LineLevel::High => 1,
        }
    }
}

impl fmt::Display for LineLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineLevel::Low => write!(f, "low"),
            LineLevel::High => write!(f, "high"),
        }
    }
}

/// A single digital output line driving the transmitter module.
pub trait OutputLine: Send {
    /// Claim the line and configure it as an output.
    ///
    /// Must be idempotent: activating an already-active line is a no-op.
    fn activate(&mut self) -> Result<()>;

    /// Drive the line to `level`.
    ///
    /// Hardware and permission failures are reported as
    /// [`Error::LineWriteFailed`](crate::Error::LineWriteFailed).
    fn set_line(&mut self, level: LineLevel) -> Result<()>;

    /// Release any resources held since [`activate`](Self::activate).
    fn release(&mut self) -> Result<()>;

    /// Whether [`activate`](Self::activate) has succeeded and the line has
    /// not been released since.
    fn is_active(&self) -> bool;
}

/// Blocking wait primitive used between line transitions.
pub trait PulseTimer: Send {
    /// Block until `origin + offset`.
    ///
    /// `offset` is cumulative from the start of the frame so rounding errors
    /// do not accumulate from pulse to pulse. Returns `false` as soon as
    /// `abort` reports `true`, `true` once the deadline has passed.
    fn wait_until(&mut self, origin: Instant, offset: Duration, abort: &dyn Fn() -> bool)
        -> bool;
}

impl<T: OutputLine + ?Sized> OutputLine for Box<T> {
    fn activate(&mut self) -> Result<()> {
        (**self).activate()
    }

    fn set_line(&mut self, level: LineLevel) -> Result<()> {
        (**self).set_line(level)
    }

    fn release(&mut self) -> Result<()> {
        (**self).release()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

//! Line driver implementations for kraken.
//!
//! This crate provides concrete implementations of the
//! [`OutputLine`](kraken_core::OutputLine) and
//! [`PulseTimer`](kraken_core::PulseTimer) traits from `kraken-core`:
//!
//! - [`SysfsLine`]: a GPIO pin driven through `/sys/class/gpio`
//! - [`SpinTimer`]: a sleep-then-spin wait on the monotonic clock
//!
//! # Example
//!
//! ```no_run
//! use std::time::{Duration, Instant};
//! use kraken_core::{LineLevel, OutputLine, PulseTimer};
//! use kraken_gpio::{SpinTimer, SysfsLine};
//!
//! # fn example() -> kraken_core::Result<()> {
//! let mut line = SysfsLine::new(17);
//! let mut timer = SpinTimer::new();
//! line.activate()?;
//!
//! // One 350 us mark followed by a 1050 us space.
//! let origin = Instant::now();
//! line.set_line(LineLevel::High)?;
//! timer.wait_until(origin, Duration::from_micros(350), &|| false);
//! line.set_line(LineLevel::Low)?;
//! timer.wait_until(origin, Duration::from_micros(1400), &|| false);
//! # Ok(())
//! # }
//! ```

pub mod sysfs;
pub mod timer;

pub use sysfs::{SysfsLine, DEFAULT_GPIO_ROOT};
pub use timer::{SpinTimer, DEFAULT_SPIN_THRESHOLD};

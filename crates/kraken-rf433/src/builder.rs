//! TransmitterBuilder -- fluent builder for constructing [`Transmitter`]
//! instances.
//!
//! Separates configuration from construction so that callers can pick the
//! GPIO pin, protocol and timing before the worker thread takes the line.
//!
//! # Example
//!
//! ```no_run
//! use kraken_core::Protocol;
//! use kraken_rf433::builder::TransmitterBuilder;
//!
//! # fn example() -> kraken_core::Result<()> {
//! let transmitter = TransmitterBuilder::new(Protocol::ONE)
//!     .pin(17)
//!     .repeat_count(8)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use kraken_core::error::{Error, Result};
use kraken_core::line::{OutputLine, PulseTimer};
use kraken_core::types::Protocol;
use kraken_gpio::{SpinTimer, SysfsLine, DEFAULT_GPIO_ROOT, DEFAULT_SPIN_THRESHOLD};

use crate::transmitter::{Transmitter, TransmitterConfig};

/// BCM pin most 433 MHz hats wire the transmitter data line to.
pub const DEFAULT_PIN: u32 = 17;

/// Longest spin phase accepted; anything above this burns a core for no
/// timing gain.
const MAX_SPIN_THRESHOLD: Duration = Duration::from_millis(5);

/// Fluent builder for [`Transmitter`].
///
/// All configuration has defaults derived from the [`Protocol`], so the
/// simplest usage is:
///
/// ```ignore
/// let transmitter = TransmitterBuilder::new(Protocol::ONE).build()?;
/// ```
#[derive(Debug, Clone)]
pub struct TransmitterBuilder {
    protocol: Protocol,
    pin: u32,
    gpio_root: PathBuf,
    pulse_length: Option<Duration>,
    repeat_count: u32,
    spin_threshold: Duration,
}

impl TransmitterBuilder {
    /// Create a new builder for the given protocol.
    pub fn new(protocol: Protocol) -> Self {
        TransmitterBuilder {
            protocol,
            pin: DEFAULT_PIN,
            gpio_root: PathBuf::from(DEFAULT_GPIO_ROOT),
            pulse_length: None,
            repeat_count: protocol.default_repeat(),
            spin_threshold: DEFAULT_SPIN_THRESHOLD,
        }
    }

    /// Set the GPIO pin number (default: 17).
    pub fn pin(mut self, pin: u32) -> Self {
        self.pin = pin;
        self
    }

    /// Set the sysfs GPIO root (default: `/sys/class/gpio`).
    pub fn gpio_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.gpio_root = root.into();
        self
    }

    /// Override the protocol's base pulse length.
    pub fn pulse_length(mut self, unit: Duration) -> Self {
        self.pulse_length = Some(unit);
        self
    }

    /// Set the number of frames per transmission (default: 10).
    pub fn repeat_count(mut self, n: u32) -> Self {
        self.repeat_count = n;
        self
    }

    /// Set how long before each deadline the timer stops sleeping and
    /// starts spinning (default: 200 us).
    pub fn spin_threshold(mut self, threshold: Duration) -> Self {
        self.spin_threshold = threshold;
        self
    }

    /// The configuration the transmitter will run with.
    pub fn config(&self) -> TransmitterConfig {
        TransmitterConfig {
            protocol: self.protocol,
            pulse_length: self.pulse_length,
            repeat_count: self.repeat_count,
        }
    }

    fn validate(&self) -> Result<()> {
        self.config().validate()?;
        if self.spin_threshold > MAX_SPIN_THRESHOLD {
            return Err(Error::InvalidParameter(format!(
                "spin_threshold must not exceed {} us",
                MAX_SPIN_THRESHOLD.as_micros()
            )));
        }
        Ok(())
    }

    /// Build a [`Transmitter`] with a caller-provided line and timer.
    ///
    /// This is the primary entry point for testing (pass a `MockLine` and
    /// an `InstantTimer` from `kraken-test-harness`) and for boards whose
    /// line is not reachable through sysfs.
    pub fn build_with_line<L, T>(self, line: L, timer: T) -> Result<Transmitter>
    where
        L: OutputLine + 'static,
        T: PulseTimer + 'static,
    {
        self.validate()?;
        Transmitter::spawn(line, timer, self.config())
    }

    /// Build a [`Transmitter`] on a sysfs GPIO pin.
    ///
    /// The pin is exported lazily, on the first transmission.
    pub fn build(self) -> Result<Transmitter> {
        self.validate()?;
        let line = SysfsLine::with_root(self.pin, &self.gpio_root);
        let timer = SpinTimer::with_spin_threshold(self.spin_threshold);
        Transmitter::spawn(line, timer, self.config())
    }
}

impl Default for TransmitterBuilder {
    fn default() -> Self {
        Self::new(Protocol::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kraken_core::Codeword;
    use kraken_test_harness::{InstantTimer, MockLine};

    #[test]
    fn builder_defaults() {
        let builder = TransmitterBuilder::default();
        assert_eq!(builder.pin, DEFAULT_PIN);
        assert_eq!(builder.gpio_root, PathBuf::from("/sys/class/gpio"));
        let config = builder.config();
        assert_eq!(config.protocol, Protocol::ONE);
        assert_eq!(config.pulse_length, None);
        assert_eq!(config.repeat_count, 10);
    }

    #[test]
    fn builder_overrides() {
        let config = TransmitterBuilder::new(Protocol::TWO)
            .pulse_length(Duration::from_micros(600))
            .repeat_count(4)
            .config();
        assert_eq!(config.protocol, Protocol::TWO);
        assert_eq!(config.pulse_length, Some(Duration::from_micros(600)));
        assert_eq!(config.repeat_count, 4);
    }

    #[test]
    fn rejects_zero_repeat() {
        let result = TransmitterBuilder::default()
            .repeat_count(0)
            .build_with_line(MockLine::new(), InstantTimer::new());
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn rejects_zero_pulse_length() {
        let result = TransmitterBuilder::default()
            .pulse_length(Duration::ZERO)
            .build_with_line(MockLine::new(), InstantTimer::new());
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn rejects_huge_pulse_length() {
        for unit in [Duration::from_millis(101), Duration::from_micros(u64::MAX)] {
            let result = TransmitterBuilder::default()
                .pulse_length(unit)
                .build_with_line(MockLine::new(), InstantTimer::new());
            assert!(matches!(result, Err(Error::InvalidParameter(_))));
        }
    }

    #[test]
    fn rejects_long_spin_threshold() {
        let result = TransmitterBuilder::default()
            .spin_threshold(Duration::from_millis(50))
            .build();
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn build_with_line_transmits() {
        let line = MockLine::new();
        let log = line.log();
        let transmitter = TransmitterBuilder::new(Protocol::THREE)
            .repeat_count(2)
            .build_with_line(line, InstantTimer::new())
            .unwrap();

        let codeword: Codeword = "0F".parse().unwrap();
        let report = transmitter.transmit(&codeword).await.unwrap();
        assert_eq!(report.frames, 2);
        assert_eq!(log.write_count(), 2 * (4 * 2 + 2));
    }
}

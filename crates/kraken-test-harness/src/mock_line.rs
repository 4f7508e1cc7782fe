//! Mock output line for deterministic testing of the transmitter.
//!
//! [`MockLine`] implements the [`OutputLine`] trait by recording every level
//! written into a shared [`LineLog`]. The log handle stays with the test
//! after the line itself has been moved into a transmitter, so the exact
//! write sequence can be asserted afterwards.
//!
//! # Example
//!
//! ```
//! use kraken_core::{LineLevel, OutputLine};
//! use kraken_test_harness::MockLine;
//!
//! let mut line = MockLine::new();
//! let log = line.log();
//! line.activate().unwrap();
//! line.set_line(LineLevel::High).unwrap();
//! assert_eq!(log.levels(), vec![LineLevel::High]);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use kraken_core::error::{Error, Result};
use kraken_core::line::{LineLevel, OutputLine};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct LogState {
    writes: Vec<LineLevel>,
    activations: u32,
    releases: u32,
}

/// Shared record of everything done to a [`MockLine`].
#[derive(Debug, Clone, Default)]
pub struct LineLog {
    inner: Arc<Mutex<LogState>>,
}

impl LineLog {
    fn lock(&self) -> MutexGuard<'_, LogState> {
        // A panicking test thread must not hide the log from the assertions.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All levels written, in order.
    pub fn levels(&self) -> Vec<LineLevel> {
        self.lock().writes.clone()
    }

    /// Number of `set_line` calls that succeeded.
    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// The most recent level written, if any.
    pub fn last_level(&self) -> Option<LineLevel> {
        self.lock().writes.last().copied()
    }

    /// Number of times the line went from inactive to active.
    pub fn activations(&self) -> u32 {
        self.lock().activations
    }

    /// Number of `release` calls on an active line.
    pub fn releases(&self) -> u32 {
        self.lock().releases
    }
}

/// A mock [`OutputLine`] for testing without hardware.
///
/// Optionally fails after a fixed number of successful writes, or cancels a
/// [`CancellationToken`] once a given write count is reached so aborts land
/// at a deterministic point in the waveform.
#[derive(Debug)]
pub struct MockLine {
    log: LineLog,
    active: bool,
    fail_after: Option<usize>,
    cancel_at: Option<(usize, CancellationToken)>,
}

impl MockLine {
    /// Create an inactive mock line with an empty log.
    pub fn new() -> Self {
        MockLine {
            log: LineLog::default(),
            active: false,
            fail_after: None,
            cancel_at: None,
        }
    }

    /// Return a handle to this line's log.
    pub fn log(&self) -> LineLog {
        self.log.clone()
    }

    /// Make every write after the first `n` fail with
    /// [`Error::LineWriteFailed`].
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Cancel `token` right after the `n`-th successful write.
    pub fn cancel_after(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_at = Some((n, token));
        self
    }
}

impl Default for MockLine {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputLine for MockLine {
    fn activate(&mut self) -> Result<()> {
        if !self.active {
            self.active = true;
            self.log.lock().activations += 1;
        }
        Ok(())
    }

    fn set_line(&mut self, level: LineLevel) -> Result<()> {
        if !self.active {
            return Err(Error::LineWriteFailed("mock line not activated".into()));
        }

        let written = {
            let mut state = self.log.lock();
            if let Some(limit) = self.fail_after {
                if state.writes.len() >= limit {
                    return Err(Error::LineWriteFailed(format!(
                        "mock line failure after {limit} writes"
                    )));
                }
            }
            state.writes.push(level);
            state.writes.len()
        };

        if let Some((n, token)) = &self.cancel_at {
            if written == *n {
                token.cancel();
            }
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            self.log.lock().releases += 1;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_writes_in_order() {
        let mut line = MockLine::new();
        let log = line.log();
        line.activate().unwrap();
        line.set_line(LineLevel::High).unwrap();
        line.set_line(LineLevel::Low).unwrap();
        assert_eq!(log.levels(), vec![LineLevel::High, LineLevel::Low]);
        assert_eq!(log.write_count(), 2);
        assert_eq!(log.last_level(), Some(LineLevel::Low));
    }

    #[test]
    fn activation_is_counted_once() {
        let mut line = MockLine::new();
        let log = line.log();
        line.activate().unwrap();
        line.activate().unwrap();
        assert_eq!(log.activations(), 1);
        assert!(line.is_active());
    }

    #[test]
    fn write_before_activate_fails() {
        let mut line = MockLine::new();
        assert!(matches!(
            line.set_line(LineLevel::High),
            Err(Error::LineWriteFailed(_))
        ));
    }

    #[test]
    fn fail_after_limit() {
        let mut line = MockLine::new().fail_after(1);
        let log = line.log();
        line.activate().unwrap();
        line.set_line(LineLevel::High).unwrap();
        assert!(matches!(
            line.set_line(LineLevel::Low),
            Err(Error::LineWriteFailed(_))
        ));
        assert_eq!(log.write_count(), 1);
    }

    #[test]
    fn cancel_after_fires_on_nth_write() {
        let token = CancellationToken::new();
        let mut line = MockLine::new().cancel_after(2, token.clone());
        line.activate().unwrap();
        line.set_line(LineLevel::High).unwrap();
        assert!(!token.is_cancelled());
        line.set_line(LineLevel::Low).unwrap();
        assert!(token.is_cancelled());
    }

    #[test]
    fn release_is_recorded() {
        let mut line = MockLine::new();
        let log = line.log();
        line.release().unwrap();
        assert_eq!(log.releases(), 0);
        line.activate().unwrap();
        line.release().unwrap();
        assert_eq!(log.releases(), 1);
        assert!(!line.is_active());
    }
}

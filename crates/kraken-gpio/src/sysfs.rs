//! Sysfs GPIO output line.
//!
//! This module provides [`SysfsLine`], which implements the [`OutputLine`]
//! trait on top of the legacy `/sys/class/gpio` interface. It is the usual
//! way to drive a 433 MHz transmitter module from a Raspberry Pi:
//!
//! - `export` the pin number to create `gpio<N>/`
//! - write `out` to `gpio<N>/direction`
//! - write `1` / `0` to `gpio<N>/value`
//!
//! The `value` file is kept open between writes so each transition is a
//! single `pwrite`, not an open/write/close round-trip.
//!
//! # Example
//!
//! ```no_run
//! use kraken_core::{LineLevel, OutputLine};
//! use kraken_gpio::SysfsLine;
//!
//! # fn example() -> kraken_core::Result<()> {
//! // GPIO17, physical pin 11 on the Raspberry Pi header
//! let mut line = SysfsLine::new(17);
//! line.activate()?;
//! line.set_line(LineLevel::High)?;
//! line.set_line(LineLevel::Low)?;
//! # Ok(())
//! # }
//! ```

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use kraken_core::error::{Error, Result};
use kraken_core::line::{LineLevel, OutputLine};

/// Default sysfs GPIO class directory.
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// How many times to retry configuring `direction` right after `export`.
///
/// udev applies group permissions to the new `gpio<N>/` directory
/// asynchronously, so the first writes can fail with `EACCES`.
const DIRECTION_RETRIES: u32 = 10;

/// Delay between `direction` retries.
const DIRECTION_RETRY_DELAY: Duration = Duration::from_millis(10);

/// A GPIO pin driven through sysfs.
pub struct SysfsLine {
    /// BCM pin number.
    pin: u32,
    /// The GPIO class directory (normally `/sys/class/gpio`).
    root: PathBuf,
    /// Open handle to `gpio<N>/value`, present while active.
    value: Option<File>,
}

impl SysfsLine {
    /// Create a line for `pin` under [`DEFAULT_GPIO_ROOT`].
    ///
    /// Nothing is touched until [`activate`](OutputLine::activate).
    pub fn new(pin: u32) -> Self {
        Self::with_root(pin, DEFAULT_GPIO_ROOT)
    }

    /// Create a line for `pin` under a custom GPIO class directory.
    pub fn with_root(pin: u32, root: impl AsRef<Path>) -> Self {
        SysfsLine {
            pin,
            root: root.as_ref().to_path_buf(),
            value: None,
        }
    }

    /// The BCM pin number.
    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// The `gpio<N>` directory for this pin.
    pub fn pin_dir(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.pin))
    }

    fn fail(&self, what: &str, e: std::io::Error) -> Error {
        tracing::error!(pin = self.pin, error = %e, "{}", what);
        Error::LineWriteFailed(format!("gpio{}: {}: {}", self.pin, what, e))
    }

    fn export(&self) -> Result<()> {
        let export = self.root.join("export");
        tracing::debug!(pin = self.pin, path = %export.display(), "Exporting GPIO pin");
        std::fs::write(&export, self.pin.to_string()).map_err(|e| self.fail("export", e))
    }

    fn configure_output(&self) -> Result<()> {
        let direction = self.pin_dir().join("direction");
        let mut attempt = 0;
        loop {
            match std::fs::write(&direction, "out") {
                Ok(()) => return Ok(()),
                Err(e) if attempt < DIRECTION_RETRIES => {
                    tracing::trace!(pin = self.pin, attempt, error = %e, "direction not writable yet");
                    attempt += 1;
                    std::thread::sleep(DIRECTION_RETRY_DELAY);
                }
                Err(e) => return Err(self.fail("set direction", e)),
            }
        }
    }
}

impl OutputLine for SysfsLine {
    fn activate(&mut self) -> Result<()> {
        if self.value.is_some() {
            return Ok(());
        }

        if !self.pin_dir().exists() {
            self.export()?;
        } else {
            tracing::debug!(pin = self.pin, "GPIO pin already exported");
        }
        self.configure_output()?;

        let value_path = self.pin_dir().join("value");
        let file = OpenOptions::new()
            .write(true)
            .open(&value_path)
            .map_err(|e| self.fail("open value", e))?;
        self.value = Some(file);

        tracing::info!(pin = self.pin, "GPIO output line activated");
        Ok(())
    }

    fn set_line(&mut self, level: LineLevel) -> Result<()> {
        let pin = self.pin;
        let file = self.value.as_mut().ok_or_else(|| {
            Error::LineWriteFailed(format!("gpio{pin}: line not activated"))
        })?;

        let byte = [b'0' + level.as_bit()];
        let result = file
            .seek(SeekFrom::Start(0))
            .and_then(|_| file.write_all(&byte));

        result.map_err(|e| self.fail("write value", e))
    }

    fn release(&mut self) -> Result<()> {
        if self.value.take().is_some() {
            tracing::debug!(pin = self.pin, "GPIO output line released");
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.value.is_some()
    }
}

impl Drop for SysfsLine {
    fn drop(&mut self) {
        if self.value.is_some() {
            tracing::debug!(pin = self.pin, "SysfsLine dropped, closing value file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Lay out a fake GPIO class directory with `gpio<N>/` already present.
    fn exported_root(pin: u32) -> TempDir {
        let dir = TempDir::new().unwrap();
        let pin_dir = dir.path().join(format!("gpio{pin}"));
        std::fs::create_dir(&pin_dir).unwrap();
        std::fs::write(pin_dir.join("direction"), "in").unwrap();
        std::fs::write(pin_dir.join("value"), "0").unwrap();
        dir
    }

    fn read(path: PathBuf) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn activate_configures_direction_and_skips_export() {
        let root = exported_root(17);
        let mut line = SysfsLine::with_root(17, root.path());
        assert!(!line.is_active());

        line.activate().unwrap();
        assert!(line.is_active());
        assert_eq!(read(line.pin_dir().join("direction")), "out");
        // The pin directory existed, so export was never written.
        assert!(!root.path().join("export").exists());
    }

    #[test]
    fn activate_is_idempotent() {
        let root = exported_root(4);
        let mut line = SysfsLine::with_root(4, root.path());
        line.activate().unwrap();
        std::fs::write(line.pin_dir().join("direction"), "in").unwrap();

        // Second activation must not touch the pin again.
        line.activate().unwrap();
        assert_eq!(read(line.pin_dir().join("direction")), "in");
    }

    #[test]
    fn set_line_writes_value() {
        let root = exported_root(17);
        let mut line = SysfsLine::with_root(17, root.path());
        line.activate().unwrap();

        line.set_line(LineLevel::High).unwrap();
        assert_eq!(read(line.pin_dir().join("value")), "1");

        line.set_line(LineLevel::Low).unwrap();
        assert_eq!(read(line.pin_dir().join("value")), "0");
    }

    #[test]
    fn set_line_before_activate_fails() {
        let root = exported_root(17);
        let mut line = SysfsLine::with_root(17, root.path());
        let err = line.set_line(LineLevel::High).unwrap_err();
        assert!(matches!(err, Error::LineWriteFailed(_)));
    }

    #[test]
    fn missing_gpio_class_fails_with_line_write_failed() {
        let dir = TempDir::new().unwrap();
        let mut line = SysfsLine::with_root(22, dir.path().join("missing"));
        let err = line.activate().unwrap_err();
        match err {
            Error::LineWriteFailed(msg) => assert!(msg.contains("gpio22")),
            other => panic!("expected LineWriteFailed, got {other:?}"),
        }
        assert!(!line.is_active());
    }

    #[test]
    fn release_deactivates() {
        let root = exported_root(17);
        let mut line = SysfsLine::with_root(17, root.path());
        line.activate().unwrap();
        line.release().unwrap();
        assert!(!line.is_active());
        assert!(line.set_line(LineLevel::High).is_err());
    }

    #[test]
    fn default_root() {
        let line = SysfsLine::new(17);
        assert_eq!(line.pin(), 17);
        assert_eq!(line.pin_dir(), PathBuf::from("/sys/class/gpio/gpio17"));
    }
}

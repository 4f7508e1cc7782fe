//! The `RemoteSwitch` trait -- a configured remote-controlled socket.
//!
//! Application code (a request router, a scheduler, the CLI) programs
//! against `dyn RemoteSwitch` without knowing which vendor encoding or which
//! output line is behind it.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Protocol, Status, TransmitReport, VendorFamily};

/// Static description of a configured switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchInfo {
    /// Radio interface name (e.g. `"433"`).
    pub interface: String,
    /// Vendor name as listed in the catalog (e.g. `"elro"`).
    pub vendor: String,
    /// Model name as listed in the catalog (e.g. `"ab440sc"`).
    pub model: String,
    /// Encoding rule for this device.
    pub family: VendorFamily,
    /// Timing scheme for this device.
    pub protocol: Protocol,
    /// Master (system) code as given by the caller.
    pub master: String,
    /// Slave (unit) code as given by the caller.
    pub slave: String,
}

/// Asynchronous interface to one remote-controlled switch.
///
/// RF switches act on "set to X" commands, so every method is idempotent and
/// can be retried after a failure.
#[async_trait]
pub trait RemoteSwitch: Send + Sync {
    /// Return the static description of this switch.
    fn info(&self) -> &SwitchInfo;

    /// Transmit the command for `status`. Returns once every repeat is on air.
    async fn set_status(&self, status: Status) -> Result<TransmitReport>;

    /// Switch on.
    async fn turn_on(&self) -> Result<TransmitReport> {
        self.set_status(Status::On).await
    }

    /// Switch off.
    async fn turn_off(&self) -> Result<TransmitReport> {
        self.set_status(Status::Off).await
    }
}

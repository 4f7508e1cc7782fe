//! # kraken -- 433 MHz remote-controlled socket control
//!
//! `kraken` drives cheap 433 MHz OOK transmitter modules to switch
//! remote-controlled sockets from Elro, Pollin, Intertechno and Dario. It
//! encodes a (vendor, master code, slave code, status) command into the
//! PT2262 tri-state line code and sends it as a timed pulse sequence on a
//! GPIO pin.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kraken::{RemoteSwitch, Protocol};
//! use kraken::rf433::{Catalog, Rf433Switch, TransmitterBuilder};
//!
//! #[tokio::main]
//! async fn main() -> kraken::Result<()> {
//!     let transmitter = Arc::new(TransmitterBuilder::new(Protocol::ONE).pin(17).build()?);
//!     let device = Catalog::builtin().resolve("433", "elro", "ab440sc")?;
//!     let socket = Rf433Switch::from_device(&device, "10000", "11110", transmitter)?;
//!     socket.turn_on().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! | Crate                 | Purpose                                          |
//! |-----------------------|--------------------------------------------------|
//! | `kraken-core`         | Tri-state types, protocols, errors, line traits  |
//! | `kraken-gpio`         | sysfs GPIO line and spin timer                   |
//! | `kraken-rf433`        | Catalog, encoders, waveform, transmitter         |
//! | `kraken-test-harness` | Mock line and instant timer                      |
//! | **`kraken`**          | This facade crate -- re-exports everything       |
//!
//! ## Feature Flags
//!
//! | Feature | Enables                                 | Default |
//! |---------|-----------------------------------------|---------|
//! | `rf433` | [`rf433`] module (encoders, transmitter) | yes     |
//! | `gpio`  | [`gpio`] module (sysfs line, timer)      | via `rf433` |

pub use kraken_core::*;

/// 433 MHz backend.
///
/// Provides the device [`Catalog`](rf433::Catalog), the per-vendor
/// encoders, the [`Transmitter`](rf433::Transmitter) and
/// [`Rf433Switch`](rf433::Rf433Switch).
#[cfg(feature = "rf433")]
pub mod rf433 {
    pub use kraken_rf433::*;
}

/// Line drivers.
///
/// Provides [`SysfsLine`](gpio::SysfsLine) and [`SpinTimer`](gpio::SpinTimer).
#[cfg(feature = "gpio")]
pub mod gpio {
    pub use kraken_gpio::*;
}

/// Returns a flat list of every device model in the built-in catalog.
///
/// # Example
///
/// ```
/// for device in kraken::supported_devices() {
///     println!("{}/{}/{} ({})", device.interface, device.vendor, device.model, device.protocol);
/// }
/// ```
#[cfg(feature = "rf433")]
pub fn supported_devices() -> Vec<rf433::ResolvedDevice> {
    rf433::Catalog::builtin().devices()
}

/// Encode a command from string inputs.
///
/// See [`rf433::encoder::encode_command`].
///
/// # Example
///
/// ```
/// let cmd = kraken::encode_command(1, "elro", "10000", "11110", "on").unwrap();
/// assert_eq!(cmd.codeword.to_string(), "0FFFF0000F0F");
/// ```
#[cfg(feature = "rf433")]
pub fn encode_command(
    protocol_id: u8,
    vendor: &str,
    master: &str,
    slave: &str,
    status: &str,
) -> Result<rf433::EncodedCommand> {
    rf433::encode_command(protocol_id, vendor, master, slave, status)
}

#[cfg(test)]
mod tests {
    #[cfg(feature = "rf433")]
    #[test]
    fn supported_devices_lists_catalog() {
        let devices = super::supported_devices();
        assert_eq!(devices.len(), 4);
        assert!(devices
            .iter()
            .all(|d| d.interface == "433" && d.protocol == super::Protocol::ONE));
    }
}

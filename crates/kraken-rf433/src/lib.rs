//! 433 MHz backend for kraken.
//!
//! This crate turns a switch command into radio pulses. It provides:
//!
//! - **Device catalog** ([`catalog`]) -- interface, vendor and model
//!   metadata that selects the protocol and encoding rule for a device.
//! - **Encoders** ([`encoder`], [`elro`], [`intertechno`], [`dario`]) --
//!   pure (family, master, slave, status) to tri-state codeword functions.
//! - **Waveform** ([`waveform`]) -- the pulse shapes of each symbol and of
//!   the frame sync.
//! - **Transmitter** ([`transmitter`]) -- a worker thread that owns the
//!   output line and emits repeated frames with microsecond timing.
//! - **Builder** ([`builder`]) -- fluent construction of a [`Transmitter`]
//!   on a sysfs GPIO pin or a caller-provided line.
//! - **Switch** ([`switch`]) -- [`Rf433Switch`], the
//!   [`RemoteSwitch`](kraken_core::RemoteSwitch) implementation.
//!
//! # Example
//!
//! ```
//! use kraken_core::Status;
//! use kraken_rf433::catalog::Catalog;
//! use kraken_rf433::encoder::encode;
//!
//! let device = Catalog::builtin().resolve("433", "intertechno", "itr1500").unwrap();
//! let codeword = encode(device.family, "A", "1", Status::On).unwrap();
//! assert_eq!(codeword.to_string(), "000000000FFF");
//! ```

pub mod builder;
pub mod catalog;
pub mod dario;
pub mod elro;
pub mod encoder;
pub mod intertechno;
pub mod switch;
pub mod transmitter;
pub mod waveform;

// Re-export the primary types for ergonomic `use kraken_rf433::*`.
pub use builder::TransmitterBuilder;
pub use catalog::{Catalog, ResolvedDevice};
pub use dario::DarioAction;
pub use encoder::{encode, encode_command, EncodedCommand};
pub use switch::Rf433Switch;
pub use transmitter::{TransmitOptions, Transmitter, TransmitterConfig};
pub use waveform::{Pulse, Segment, TransmitFrame};

//! kraken-core: Core traits, types, and error definitions for kraken.
//!
//! This crate defines the vendor-agnostic abstractions shared by the kraken
//! backends. Applications depend on these types without pulling in any
//! specific line driver.
//!
//! # Key types
//!
//! - [`TriState`] / [`Codeword`] -- the tri-state line code
//! - [`Protocol`] -- timing and sync scheme
//! - [`VendorFamily`] -- closed set of vendor encoding rules
//! - [`OutputLine`] / [`PulseTimer`] -- the physical I/O boundary
//! - [`RemoteSwitch`] -- a configured switch
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod events;
pub mod line;
pub mod switch;
pub mod types;

// Re-export key types at crate root for ergonomic `use kraken_core::*`.
pub use error::{Error, Result};
pub use events::TransmitEvent;
pub use line::{LineLevel, OutputLine, PulseTimer};
pub use switch::{RemoteSwitch, SwitchInfo};
pub use types::*;

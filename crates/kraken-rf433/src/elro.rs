//! Elro / Pollin / generic DIP switch encoding.
//!
//! These sockets carry two banks of five DIP switches: the system code
//! (master) and the unit code (slave). Each switch position becomes one
//! tri-state symbol, `0` (off) as Float and `1` (on) as Zero, followed by a
//! two-symbol status suffix:
//!
//! ```text
//! master (5)  slave (5)  status (2)
//! 0FFFF       0FFFF      0F          <- "10000", "10000", on
//! ```

use kraken_core::{Codeword, Result, Status, TriState};

use crate::encoder::dip_symbols;

/// Number of DIP switches per bank.
pub const ADDRESS_BITS: usize = 5;

/// Codeword length: two address banks plus the status suffix.
pub const CODEWORD_LEN: usize = 2 * ADDRESS_BITS + 2;

/// Status suffix for `on`.
const STATUS_ON: [TriState; 2] = [TriState::Zero, TriState::Float];
/// Status suffix for `off`.
const STATUS_OFF: [TriState; 2] = [TriState::Float, TriState::Zero];

/// Encode a 5+5 DIP switch address and status.
///
/// `master` and `slave` must each be exactly five `0`/`1` characters,
/// otherwise [`Error::UnsupportedAddress`](kraken_core::Error::UnsupportedAddress).
pub fn encode(master: &str, slave: &str, status: Status) -> Result<Codeword> {
    let mut symbols = Vec::with_capacity(CODEWORD_LEN);
    symbols.extend(dip_symbols(master, ADDRESS_BITS, "master")?);
    symbols.extend(dip_symbols(slave, ADDRESS_BITS, "slave")?);
    symbols.extend_from_slice(match status {
        Status::On => &STATUS_ON,
        Status::Off => &STATUS_OFF,
    });
    Ok(Codeword::new(symbols))
}

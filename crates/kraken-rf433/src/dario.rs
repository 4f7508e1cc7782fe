//! Dario encoding.
//!
//! Dario frames are 21 symbols: a leading Zero, six master bits and six slave
//! bits (mapped like the Elro DIP switches, `0` as Float and `1` as Zero),
//! then an eight-symbol action field:
//!
//! ```text
//! lead (1)  master (6)  slave (6)  action (8)
//! 0         0F0F0F      FFFFF0     0FFFFFFF    <- "101010", "000001", on
//! ```
//!
//! Only the on and off action patterns are built in. Other actions in the
//! vendor's action table (dimming, all-channel commands) can be sent with
//! [`DarioAction::Custom`] once their patterns are known.

use kraken_core::{Codeword, Result, Status, TriState};

use crate::encoder::dip_symbols;

const Z: TriState = TriState::Zero;
const F: TriState = TriState::Float;

/// Address bits per bank.
pub const ADDRESS_BITS: usize = 6;

/// Length of the action field.
pub const ACTION_LEN: usize = 8;

/// Codeword length: lead + two address banks + action.
pub const CODEWORD_LEN: usize = 1 + 2 * ADDRESS_BITS + ACTION_LEN;

const ACTION_ON: [TriState; ACTION_LEN] = [Z, F, F, F, F, F, F, F];
const ACTION_OFF: [TriState; ACTION_LEN] = [F, Z, F, F, F, F, F, F];

/// The action field of a Dario frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DarioAction {
    On,
    Off,
    /// A caller-supplied action pattern, sent verbatim.
    Custom([TriState; ACTION_LEN]),
}

impl DarioAction {
    /// The eight action symbols.
    pub fn pattern(&self) -> [TriState; ACTION_LEN] {
        match self {
            DarioAction::On => ACTION_ON,
            DarioAction::Off => ACTION_OFF,
            DarioAction::Custom(pattern) => *pattern,
        }
    }
}

impl From<Status> for DarioAction {
    fn from(status: Status) -> Self {
        match status {
            Status::On => DarioAction::On,
            Status::Off => DarioAction::Off,
        }
    }
}

/// Encode a 6+6 bit Dario address and action.
///
/// `master` and `slave` must each be exactly six `0`/`1` characters,
/// otherwise [`Error::UnsupportedAddress`](kraken_core::Error::UnsupportedAddress).
pub fn encode(master: &str, slave: &str, action: DarioAction) -> Result<Codeword> {
    let mut symbols = Vec::with_capacity(CODEWORD_LEN);
    symbols.push(TriState::Zero);
    symbols.extend(dip_symbols(master, ADDRESS_BITS, "master")?);
    symbols.extend(dip_symbols(slave, ADDRESS_BITS, "slave")?);
    symbols.extend_from_slice(&action.pattern());
    Ok(Codeword::new(symbols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kraken_core::Error;

    #[test]
    fn known_codewords() {
        assert_eq!(
            encode("101010", "000001", DarioAction::On).unwrap().to_string(),
            "00F0F0FFFFFF00FFFFFFF"
        );
        assert_eq!(
            encode("101010", "000001", DarioAction::Off).unwrap().to_string(),
            "00F0F0FFFFFF0F0FFFFFF"
        );
    }

    #[test]
    fn frame_layout() {
        let cw = encode("111111", "000000", DarioAction::On).unwrap();
        assert_eq!(cw.len(), CODEWORD_LEN);
        assert_eq!(cw.len(), 21);
        let text = cw.to_string();
        assert_eq!(&text[..1], "0");
        assert_eq!(&text[1..7], "000000");
        assert_eq!(&text[7..13], "FFFFFF");
        assert_eq!(&text[13..], "0FFFFFFF");
    }

    #[test]
    fn action_does_not_depend_on_address() {
        for (master, slave) in [("000000", "000000"), ("110011", "010101")] {
            let on = encode(master, slave, DarioAction::On).unwrap().to_string();
            let off = encode(master, slave, DarioAction::Off).unwrap().to_string();
            assert_eq!(&on[13..], "0FFFFFFF");
            assert_eq!(&off[13..], "F0FFFFFF");
            assert_eq!(on[..13], off[..13]);
        }
    }

    #[test]
    fn custom_action_is_sent_verbatim() {
        let pattern = [F, F, Z, F, F, F, F, TriState::One];
        let cw = encode("000000", "000000", DarioAction::Custom(pattern)).unwrap();
        assert_eq!(&cw.symbols()[13..], &pattern);
    }

    #[test]
    fn status_conversion() {
        assert_eq!(DarioAction::from(Status::On), DarioAction::On);
        assert_eq!(DarioAction::from(Status::Off), DarioAction::Off);
    }

    #[test]
    fn rejects_bad_addresses() {
        for (master, slave) in [("10101", "000001"), ("1010101", "000001"), ("101010", "00000x")] {
            assert!(matches!(
                encode(master, slave, DarioAction::On),
                Err(Error::UnsupportedAddress(_))
            ));
        }
    }
}

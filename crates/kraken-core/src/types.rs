//! Core types used throughout kraken.
//!
//! These types describe the PT2262-family tri-state line code shared by the
//! supported 433 MHz vendors: the symbol alphabet, immutable codewords, the
//! timing protocols, and the vendor families that select an encoding rule.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// One tri-state symbol.
///
/// `Float` is the high-impedance input state of the encoder IC. Each symbol
/// maps to a distinct pair of mark/space pulses on air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    /// Textual form `0`.
    Zero,
    /// Textual form `1`.
    One,
    /// Textual form `F`.
    Float,
}

impl TriState {
    /// The textual character for this symbol.
    pub fn as_char(self) -> char {
        match self {
            TriState::Zero => '0',
            TriState::One => '1',
            TriState::Float => 'F',
        }
    }

    /// Map one DIP switch bit to a symbol: `0` is Float, `1` is Zero.
    ///
    /// Returns `None` for anything other than `'0'` or `'1'`.
    pub fn from_dip_bit(bit: char) -> Option<TriState> {
        match bit {
            '0' => Some(TriState::Float),
            '1' => Some(TriState::Zero),
            _ => None,
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for TriState {
    type Error = ParseCodewordError;

    fn try_from(c: char) -> std::result::Result<Self, Self::Error> {
        match c {
            '0' => Ok(TriState::Zero),
            '1' => Ok(TriState::One),
            'F' => Ok(TriState::Float),
            other => Err(ParseCodewordError {
                position: 0,
                found: other,
            }),
        }
    }
}

/// Error returned when a string is not a valid tri-state codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCodewordError {
    /// Character index of the offending symbol.
    pub position: usize,
    /// The character that is not in `{0, 1, F}`.
    pub found: char,
}

impl fmt::Display for ParseCodewordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid tri-state symbol '{}' at position {}",
            self.found, self.position
        )
    }
}

impl std::error::Error for ParseCodewordError {}

impl From<ParseCodewordError> for Error {
    fn from(e: ParseCodewordError) -> Self {
        Error::InvalidParameter(e.to_string())
    }
}

/// An ordered, immutable sequence of tri-state symbols.
///
/// Produced fresh for each transmit request. The textual form over `{0,1,F}`
/// (e.g. `0FFFF0FFFF0F`) round-trips losslessly through [`FromStr`] and
/// [`Display`](fmt::Display).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Codeword(Vec<TriState>);

impl Codeword {
    /// Wrap a symbol sequence.
    pub fn new(symbols: Vec<TriState>) -> Self {
        Codeword(symbols)
    }

    /// The symbols in transmission order.
    pub fn symbols(&self) -> &[TriState] {
        &self.0
    }

    /// Number of symbols (the trailing sync is not part of the codeword).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the codeword has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the symbols.
    pub fn iter(&self) -> std::slice::Iter<'_, TriState> {
        self.0.iter()
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{}", symbol.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Codeword {
    type Err = ParseCodewordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| {
                TriState::try_from(c).map_err(|e| ParseCodewordError { position, ..e })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Codeword)
    }
}

impl FromIterator<TriState> for Codeword {
    fn from_iter<I: IntoIterator<Item = TriState>>(iter: I) -> Self {
        Codeword(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Codeword {
    type Item = &'a TriState;
    type IntoIter = std::slice::Iter<'a, TriState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Desired switch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    On,
    Off,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::On => write!(f, "on"),
            Status::Off => write!(f, "off"),
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" => Ok(Status::On),
            "off" => Ok(Status::Off),
            _ => Err(Error::InvalidParameter(format!("unknown status '{s}'"))),
        }
    }
}

/// Closed set of vendor encoding rules.
///
/// Resolved once from the device catalog; each variant has exactly one
/// encoding function in the `kraken-rf433` encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorFamily {
    /// Elro, Pollin and generic 5+5 DIP switch sockets.
    ElroPollin,
    /// Intertechno with 16 x 16 letter/number addressing.
    Intertechno,
    /// Intertechno PAR series (A-D / 1-3, uses the `1` symbol).
    IntertechnoPar,
    /// Dario 6+6 bit addressing with an 8-symbol action field.
    Dario,
}

impl fmt::Display for VendorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VendorFamily::ElroPollin => "elro-pollin",
            VendorFamily::Intertechno => "intertechno",
            VendorFamily::IntertechnoPar => "intertechno-par",
            VendorFamily::Dario => "dario",
        };
        write!(f, "{s}")
    }
}

impl FromStr for VendorFamily {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "elro" | "pollin" | "elro-pollin" => Ok(VendorFamily::ElroPollin),
            "intertechno" => Ok(VendorFamily::Intertechno),
            "intertechno-par" | "par" => Ok(VendorFamily::IntertechnoPar),
            "dario" => Ok(VendorFamily::Dario),
            _ => Err(Error::UnsupportedVendor(s.to_string())),
        }
    }
}

/// A timing/sync scheme.
///
/// Immutable; obtain one with [`Protocol::from_id`] or the associated
/// constants. The pulse length is the base unit every mark/space width is a
/// multiple of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Protocol {
    id: u8,
    pulse_length_us: u32,
    sync_low_units: u32,
    default_repeat: u32,
}

impl Protocol {
    /// Protocol 1: 350 us unit, sync 1:31. Fits most Elro, Pollin and Intertechno sockets.
    pub const ONE: Protocol = Protocol {
        id: 1,
        pulse_length_us: 350,
        sync_low_units: 31,
        default_repeat: 10,
    };

    /// Protocol 2: 650 us unit, sync 1:10.
    pub const TWO: Protocol = Protocol {
        id: 2,
        pulse_length_us: 650,
        sync_low_units: 10,
        default_repeat: 10,
    };

    /// Protocol 3: 100 us unit, sync 1:71.
    pub const THREE: Protocol = Protocol {
        id: 3,
        pulse_length_us: 100,
        sync_low_units: 71,
        default_repeat: 10,
    };

    /// Look up a protocol by its numeric id.
    pub fn from_id(id: u8) -> crate::Result<Protocol> {
        match id {
            1 => Ok(Protocol::ONE),
            2 => Ok(Protocol::TWO),
            3 => Ok(Protocol::THREE),
            other => Err(Error::UnsupportedProtocol(other)),
        }
    }

    /// All supported protocols in id order.
    pub fn all() -> [Protocol; 3] {
        [Protocol::ONE, Protocol::TWO, Protocol::THREE]
    }

    /// Numeric protocol id.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Base pulse unit.
    pub fn pulse_length(&self) -> Duration {
        Duration::from_micros(u64::from(self.pulse_length_us))
    }

    /// Length of the sync low period, in units.
    pub fn sync_low_units(&self) -> u32 {
        self.sync_low_units
    }

    /// Number of times a frame is sent unless overridden.
    pub fn default_repeat(&self) -> u32 {
        self.default_repeat
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::ONE
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "protocol {}", self.id)
    }
}

/// Outcome of a completed transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitReport {
    /// Frames (codeword + sync) fully emitted.
    pub frames: u32,
    /// Waveform segments emitted: `frames * (codeword length + 1)`.
    pub segments: u64,
    /// Individual line writes issued.
    pub writes: u64,
    /// Wall-clock time from first write to the end of the last sync.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tristate_chars() {
        assert_eq!(TriState::Zero.as_char(), '0');
        assert_eq!(TriState::One.as_char(), '1');
        assert_eq!(TriState::Float.as_char(), 'F');
    }

    #[test]
    fn dip_bit_mapping() {
        assert_eq!(TriState::from_dip_bit('0'), Some(TriState::Float));
        assert_eq!(TriState::from_dip_bit('1'), Some(TriState::Zero));
        assert_eq!(TriState::from_dip_bit('2'), None);
    }

    #[test]
    fn codeword_parse_and_display() {
        let cw: Codeword = "0FFFF0FFFF0F".parse().unwrap();
        assert_eq!(cw.len(), 12);
        assert_eq!(cw.symbols()[0], TriState::Zero);
        assert_eq!(cw.symbols()[1], TriState::Float);
        assert_eq!(cw.to_string(), "0FFFF0FFFF0F");
    }

    #[test]
    fn codeword_textual_form_round_trips() {
        for text in ["", "1", "01F", "F1FFF1FFFFFF", "00F0F0FFFFFF00FFFFFFF"] {
            let cw: Codeword = text.parse().unwrap();
            assert_eq!(cw.to_string(), text);
        }
    }

    #[test]
    fn codeword_parse_rejects_unknown_symbol() {
        let err = "0F0X".parse::<Codeword>().unwrap_err();
        assert_eq!(err.position, 3);
        assert_eq!(err.found, 'X');
        // Lowercase float is not part of the alphabet.
        assert!("0f".parse::<Codeword>().is_err());
    }

    #[test]
    fn parse_error_converts_to_invalid_parameter() {
        let err: Error = "S".parse::<Codeword>().unwrap_err().into();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn codeword_from_iterator() {
        let cw: Codeword = [TriState::One, TriState::Float].into_iter().collect();
        assert_eq!(cw.to_string(), "1F");
        assert!(!cw.is_empty());
    }

    #[test]
    fn status_parse() {
        assert_eq!("on".parse::<Status>().unwrap(), Status::On);
        assert_eq!("OFF".parse::<Status>().unwrap(), Status::Off);
        assert!(matches!(
            "dim".parse::<Status>(),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!(Status::On.to_string(), "on");
    }

    #[test]
    fn vendor_family_parse() {
        assert_eq!(
            "generic".parse::<VendorFamily>().unwrap(),
            VendorFamily::ElroPollin
        );
        assert_eq!(
            "Elro".parse::<VendorFamily>().unwrap(),
            VendorFamily::ElroPollin
        );
        assert_eq!(
            "intertechno".parse::<VendorFamily>().unwrap(),
            VendorFamily::Intertechno
        );
        assert_eq!(
            "intertechno-par".parse::<VendorFamily>().unwrap(),
            VendorFamily::IntertechnoPar
        );
        assert_eq!("dario".parse::<VendorFamily>().unwrap(), VendorFamily::Dario);
        match "acme".parse::<VendorFamily>() {
            Err(Error::UnsupportedVendor(v)) => assert_eq!(v, "acme"),
            other => panic!("expected UnsupportedVendor, got {other:?}"),
        }
    }

    #[test]
    fn vendor_family_display_parses_back() {
        for family in [
            VendorFamily::ElroPollin,
            VendorFamily::Intertechno,
            VendorFamily::IntertechnoPar,
            VendorFamily::Dario,
        ] {
            assert_eq!(family.to_string().parse::<VendorFamily>().unwrap(), family);
        }
    }

    #[test]
    fn protocol_table() {
        let p1 = Protocol::from_id(1).unwrap();
        assert_eq!(p1.pulse_length(), Duration::from_micros(350));
        assert_eq!(p1.sync_low_units(), 31);
        assert_eq!(p1.default_repeat(), 10);

        let p2 = Protocol::from_id(2).unwrap();
        assert_eq!(p2.pulse_length(), Duration::from_micros(650));
        assert_eq!(p2.sync_low_units(), 10);

        let p3 = Protocol::from_id(3).unwrap();
        assert_eq!(p3.pulse_length(), Duration::from_micros(100));
        assert_eq!(p3.sync_low_units(), 71);

        assert_eq!(Protocol::default(), Protocol::ONE);
    }

    #[test]
    fn protocol_unsupported_id() {
        assert!(matches!(
            Protocol::from_id(0),
            Err(Error::UnsupportedProtocol(0))
        ));
        assert!(matches!(
            Protocol::from_id(4),
            Err(Error::UnsupportedProtocol(4))
        ));
    }
}

//! Codeword encoder dispatch.
//!
//! Maps a (vendor family, master code, slave code, status) request onto the
//! encoding rule of that family. Every function here is pure: no I/O, no
//! shared state, safe to call concurrently from any number of tasks.
//!
//! | Family           | Master           | Slave            | Symbols |
//! |------------------|------------------|------------------|---------|
//! | `ElroPollin`     | 5-bit DIP string | 5-bit DIP string | 12      |
//! | `Intertechno`    | letter A-P       | 1-16             | 12      |
//! | `IntertechnoPar` | letter A-D       | 1-3              | 12      |
//! | `Dario`          | 6-bit string     | 6-bit string     | 21      |
//!
//! The trailing sync is not part of the codeword; the transmitter appends it
//! to every frame.

use kraken_core::{Codeword, Error, Protocol, Result, Status, TriState, VendorFamily};

use crate::{dario, elro, intertechno};

/// Encode a switch command for `family`.
///
/// `master` and `slave` are given in the textual form the family uses
/// (`"10000"`, `"C"`, `"12"`, ...). Fails with
/// [`Error::UnsupportedAddress`] when either code is outside the family's
/// table.
///
/// # Example
///
/// ```
/// use kraken_core::{Status, VendorFamily};
/// use kraken_rf433::encoder::encode;
///
/// let cw = encode(VendorFamily::ElroPollin, "10000", "10000", Status::On).unwrap();
/// assert_eq!(cw.to_string(), "0FFFF0FFFF0F");
/// ```
pub fn encode(family: VendorFamily, master: &str, slave: &str, status: Status) -> Result<Codeword> {
    let codeword = match family {
        VendorFamily::ElroPollin => elro::encode(master, slave, status)?,
        VendorFamily::Intertechno => {
            intertechno::encode(parse_letter(master)?, parse_unit(slave)?, status)?
        }
        VendorFamily::IntertechnoPar => {
            intertechno::encode_par(parse_letter(master)?, parse_unit(slave)?, status)?
        }
        VendorFamily::Dario => dario::encode(master, slave, status.into())?,
    };
    tracing::debug!(
        family = %family,
        master,
        slave,
        status = %status,
        codeword = %codeword,
        "Encoded codeword"
    );
    Ok(codeword)
}

/// A codeword together with the protocol it must be sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCommand {
    /// Timing scheme for the transmitter.
    pub protocol: Protocol,
    /// Encoding rule that produced the codeword.
    pub family: VendorFamily,
    /// The symbols to send.
    pub codeword: Codeword,
}

/// Encode from loosely-typed inputs (CLI arguments, request bodies).
///
/// Fails with [`Error::UnsupportedProtocol`] for an unknown protocol id,
/// [`Error::UnsupportedVendor`] for an unknown vendor family name,
/// [`Error::InvalidParameter`] for a status other than `on`/`off`, and
/// [`Error::UnsupportedAddress`] for codes outside the vendor table.
pub fn encode_command(
    protocol_id: u8,
    vendor: &str,
    master: &str,
    slave: &str,
    status: &str,
) -> Result<EncodedCommand> {
    let protocol = Protocol::from_id(protocol_id)?;
    let family: VendorFamily = vendor.parse()?;
    let status: Status = status.parse()?;
    let codeword = encode(family, master, slave, status)?;
    Ok(EncodedCommand {
        protocol,
        family,
        codeword,
    })
}

/// Map a DIP switch string bit by bit: `0` is Float, `1` is Zero.
///
/// The string must be exactly `bits` characters of `0`/`1`.
pub(crate) fn dip_symbols(code: &str, bits: usize, what: &str) -> Result<Vec<TriState>> {
    if code.chars().count() != bits {
        return Err(Error::UnsupportedAddress(format!(
            "{what} '{code}' must be {bits} binary digits"
        )));
    }
    code.chars()
        .map(|bit| {
            TriState::from_dip_bit(bit).ok_or_else(|| {
                Error::UnsupportedAddress(format!("{what} '{code}' is not a binary string"))
            })
        })
        .collect()
}

/// Parse a single address letter, case-insensitively.
fn parse_letter(code: &str) -> Result<char> {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(Error::UnsupportedAddress(format!(
            "master '{code}' is not a single letter"
        ))),
    }
}

/// Parse a unit number: one or more ASCII digits, nothing else.
fn parse_unit(code: &str) -> Result<u8> {
    let invalid = || Error::UnsupportedAddress(format!("slave '{code}' is not a unit number"));
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    code.parse().map_err(|_| invalid())
}

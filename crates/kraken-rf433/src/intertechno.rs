//! Intertechno encodings.
//!
//! Standard Intertechno sockets are addressed by a house code letter `A`-`P`
//! (master) and a unit number `1`-`16` (slave). Each maps to a fixed
//! four-symbol nibble from the same 16-entry table:
//!
//! ```text
//! master (4)  slave (4)  fixed (2)  status (2)
//! 0000        0000       0F         FF          <- A, 1, on
//! ```
//!
//! The PAR series uses a smaller, one-hot address space with the `1` symbol:
//! master `A`-`D` as four symbols, slave `1`-`3` as three symbols, then a
//! fixed `FFF` and the status pair.

use kraken_core::{Codeword, Error, Result, Status, TriState};

const Z: TriState = TriState::Zero;
const I: TriState = TriState::One;
const F: TriState = TriState::Float;

/// Codeword length for standard Intertechno: 4 + 4 + 2 + 2.
pub const CODEWORD_LEN: usize = 12;

/// Codeword length for the PAR series: 4 + 3 + 3 + 2.
pub const PAR_CODEWORD_LEN: usize = 12;

/// House code / unit nibbles, indexed by `letter - 'A'` or `unit - 1`.
const NIBBLES: [[TriState; 4]; 16] = [
    [Z, Z, Z, Z], // A / 1
    [F, Z, Z, Z], // B / 2
    [Z, F, Z, Z], // C / 3
    [F, F, Z, Z], // D / 4
    [Z, Z, F, Z], // E / 5
    [F, Z, F, Z], // F / 6
    [Z, F, F, Z], // G / 7
    [F, F, F, Z], // H / 8
    [Z, Z, Z, F], // I / 9
    [F, Z, Z, F], // J / 10
    [Z, F, Z, F], // K / 11
    [F, F, Z, F], // L / 12
    [Z, Z, F, F], // M / 13
    [F, Z, F, F], // N / 14
    [Z, F, F, F], // O / 15
    [F, F, F, F], // P / 16
];

const FIXED: [TriState; 2] = [Z, F];
const STATUS_ON: [TriState; 2] = [F, F];
const STATUS_OFF: [TriState; 2] = [F, Z];

const PAR_MASTERS: [[TriState; 4]; 4] = [
    [I, F, F, F], // A
    [F, I, F, F], // B
    [F, F, I, F], // C
    [F, F, F, I], // D
];

const PAR_SLAVES: [[TriState; 3]; 3] = [
    [I, F, F], // 1
    [F, I, F], // 2
    [F, F, I], // 3
];

const PAR_FIXED: [TriState; 3] = [F, F, F];
const PAR_STATUS_ON: [TriState; 2] = [F, F];
const PAR_STATUS_OFF: [TriState; 2] = [Z, Z];

fn letter_index(master: char, last: char) -> Result<usize> {
    let upper = master.to_ascii_uppercase();
    if ('A'..=last).contains(&upper) {
        Ok(upper as usize - 'A' as usize)
    } else {
        Err(Error::UnsupportedAddress(format!(
            "master '{master}' outside A-{last}"
        )))
    }
}

fn unit_index(slave: u8, last: u8) -> Result<usize> {
    if (1..=last).contains(&slave) {
        Ok(usize::from(slave - 1))
    } else {
        Err(Error::UnsupportedAddress(format!(
            "slave {slave} outside 1-{last}"
        )))
    }
}

/// Encode a standard Intertechno house code (`A`-`P`) and unit (`1`-`16`).
pub fn encode(master: char, slave: u8, status: Status) -> Result<Codeword> {
    let master = &NIBBLES[letter_index(master, 'P')?];
    let slave = &NIBBLES[unit_index(slave, 16)?];
    let status = match status {
        Status::On => &STATUS_ON,
        Status::Off => &STATUS_OFF,
    };

    let mut symbols = Vec::with_capacity(CODEWORD_LEN);
    symbols.extend_from_slice(master);
    symbols.extend_from_slice(slave);
    symbols.extend_from_slice(&FIXED);
    symbols.extend_from_slice(status);
    Ok(Codeword::new(symbols))
}

/// Encode an Intertechno PAR house code (`A`-`D`) and unit (`1`-`3`).
pub fn encode_par(master: char, slave: u8, status: Status) -> Result<Codeword> {
    let master = &PAR_MASTERS[letter_index(master, 'D')?];
    let slave = &PAR_SLAVES[unit_index(slave, 3)?];
    let status = match status {
        Status::On => &PAR_STATUS_ON,
        Status::Off => &PAR_STATUS_OFF,
    };

    let mut symbols = Vec::with_capacity(PAR_CODEWORD_LEN);
    symbols.extend_from_slice(master);
    symbols.extend_from_slice(slave);
    symbols.extend_from_slice(&PAR_FIXED);
    symbols.extend_from_slice(status);
    Ok(Codeword::new(symbols))
}

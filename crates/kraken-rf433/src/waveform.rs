//! Pulse waveforms for the tri-state line code.
//!
//! Every tri-state symbol is sent as two mark/space pulses, and every frame
//! ends with a sync pulse. Widths are in multiples of the protocol's base
//! unit:
//!
//! ```text
//!          _     _
//! Zero    | |___| |___        (1,3) (1,3)
//!          ___   ___
//! One     |   |_|   |_        (3,1) (3,1)
//!          _     ___
//! Float   | |___|   |_        (1,3) (3,1)
//!          _
//! Sync    | |_______________  (1,N)  N = 31 / 10 / 71 for protocol 1 / 2 / 3
//! ```
//!
//! Everything here is pure; the [`transmitter`](crate::transmitter) turns
//! pulses into line writes.

use std::time::Duration;

use kraken_core::{Codeword, Protocol, TriState};

/// One mark (high) followed by one space (low), in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pulse {
    /// Units the line is held high.
    pub high: u32,
    /// Units the line is held low.
    pub low: u32,
}

impl Pulse {
    /// Construct a pulse from high and low unit counts.
    pub const fn new(high: u32, low: u32) -> Self {
        Pulse { high, low }
    }

    /// Total width in units.
    pub fn units(&self) -> u32 {
        self.high + self.low
    }

    /// High and low durations for a given base unit.
    pub fn durations(&self, unit: Duration) -> (Duration, Duration) {
        (unit * self.high, unit * self.low)
    }
}

const SHORT: Pulse = Pulse::new(1, 3);
const LONG: Pulse = Pulse::new(3, 1);

/// One waveform segment of a frame: a symbol or the trailing sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Symbol(TriState),
    Sync,
}

/// The two pulses for a tri-state symbol.
pub fn symbol_pulses(symbol: TriState) -> [Pulse; 2] {
    match symbol {
        TriState::Zero => [SHORT, SHORT],
        TriState::One => [LONG, LONG],
        TriState::Float => [SHORT, LONG],
    }
}

/// The sync pulse for `protocol`: one unit high, then the protocol's sync
/// ratio low.
pub fn sync_pulse(protocol: &Protocol) -> Pulse {
    Pulse::new(1, protocol.sync_low_units())
}

/// The pulses making up one segment.
pub fn waveform_for(segment: Segment, protocol: &Protocol) -> Vec<Pulse> {
    match segment {
        Segment::Symbol(symbol) => symbol_pulses(symbol).to_vec(),
        Segment::Sync => vec![sync_pulse(protocol)],
    }
}

/// A codeword plus its trailing sync: the unit the transmitter repeats.
///
/// The pulse list is computed once and replayed for every repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitFrame {
    codeword: Codeword,
    protocol: Protocol,
    pulses: Vec<Pulse>,
}

impl TransmitFrame {
    /// Build the frame for `codeword` under `protocol`.
    pub fn new(codeword: Codeword, protocol: Protocol) -> Self {
        let mut pulses = Vec::with_capacity(codeword.len() * 2 + 1);
        for symbol in &codeword {
            pulses.extend(symbol_pulses(*symbol));
        }
        pulses.push(sync_pulse(&protocol));
        TransmitFrame {
            codeword,
            protocol,
            pulses,
        }
    }

    /// The codeword carried by this frame.
    pub fn codeword(&self) -> &Codeword {
        &self.codeword
    }

    /// The protocol the frame was built for.
    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// All pulses in transmission order, sync last.
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Segments per frame: one per symbol plus the sync.
    pub fn segment_count(&self) -> usize {
        self.codeword.len() + 1
    }

    /// Line writes per frame: a high and a low write per pulse.
    pub fn write_count(&self) -> usize {
        self.pulses.len() * 2
    }

    /// Total frame width in units.
    pub fn total_units(&self) -> u32 {
        self.pulses.iter().map(Pulse::units).sum()
    }

    /// Frame duration for a given base unit.
    pub fn duration(&self, unit: Duration) -> Duration {
        unit * self.total_units()
    }
}

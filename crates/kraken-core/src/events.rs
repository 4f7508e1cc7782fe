//! Transmitter lifecycle events.
//!
//! Events are emitted by the transmitter through a `tokio::sync::broadcast`
//! channel. Delivery is best-effort: a slow subscriber may miss events, and
//! the transmission itself never waits on subscribers.

use crate::types::Codeword;

/// An event emitted by the transmitter while it works through a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransmitEvent {
    /// A request has taken the line and is about to emit its first frame.
    Started {
        /// The codeword being sent.
        codeword: Codeword,
        /// Number of frames that will be sent.
        repeats: u32,
    },

    /// One frame (codeword + sync) has been fully emitted.
    FrameSent {
        /// Zero-based frame index.
        index: u32,
    },

    /// All frames were emitted.
    Finished {
        /// Number of frames sent.
        frames: u32,
    },

    /// The request stopped early.
    Aborted {
        /// Frames fully emitted before the stop.
        frames: u32,
        /// Display form of the error that ended the request.
        reason: String,
    },
}

//! Error types for kraken.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Encoder-side input errors, catalog
//! lookup failures, and hardware-boundary failures are all captured here.

/// The error type for all kraken operations.
///
/// Encoder errors (`Unsupported*`, `InvalidParameter`) are caller-input
/// errors and are never retried. `LineWriteFailed` and `Cancelled` come from
/// the transmitter; the caller decides whether to re-issue the transmission.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No encoding rule exists for the requested vendor family.
    #[error("unsupported vendor: {0}")]
    UnsupportedVendor(String),

    /// The protocol id has no timing/sync definition.
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(u8),

    /// The master or slave code falls outside the vendor's address table.
    #[error("unsupported address: {0}")]
    UnsupportedAddress(String),

    /// An invalid parameter was passed (bad status, empty codeword, zero repeats).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A catalog path segment is unknown, or `all` was used where a single
    /// entity is required.
    #[error("not found: {0}")]
    NotFound(String),

    /// The output line could not be driven (hardware or permission error).
    ///
    /// The current frame is abandoned at the failing write; frames already
    /// on air are not rolled back.
    #[error("line write failed: {0}")]
    LineWriteFailed(String),

    /// The transmission was aborted by the operator or by its hard timeout.
    #[error("transmission cancelled")]
    Cancelled,

    /// The transmitter worker is no longer running.
    #[error("not connected")]
    NotConnected,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unsupported_vendor() {
        let e = Error::UnsupportedVendor("brennenstuhl".into());
        assert_eq!(e.to_string(), "unsupported vendor: brennenstuhl");
    }

    #[test]
    fn error_display_unsupported_protocol() {
        let e = Error::UnsupportedProtocol(7);
        assert_eq!(e.to_string(), "unsupported protocol: 7");
    }

    #[test]
    fn error_display_unsupported_address() {
        let e = Error::UnsupportedAddress("intertechno master 'Q'".into());
        assert_eq!(e.to_string(), "unsupported address: intertechno master 'Q'");
    }

    #[test]
    fn error_display_not_found() {
        let e = Error::NotFound("vendor 'acme'".into());
        assert_eq!(e.to_string(), "not found: vendor 'acme'");
    }

    #[test]
    fn error_display_line_write_failed() {
        let e = Error::LineWriteFailed("gpio17: permission denied".into());
        assert_eq!(e.to_string(), "line write failed: gpio17: permission denied");
    }

    #[test]
    fn error_display_cancelled() {
        assert_eq!(Error::Cancelled.to_string(), "transmission cancelled");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("denied"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}

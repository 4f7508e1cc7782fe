//! kraken-test-harness: Test utilities for kraken.
//!
//! This crate provides [`MockLine`] for deterministic testing of the
//! transmitter without a GPIO pin, and [`InstantTimer`] for running whole
//! transmissions in microseconds while still checking pulse widths.

pub mod mock_line;
pub mod mock_timer;

pub use mock_line::{LineLog, MockLine};
pub use mock_timer::InstantTimer;

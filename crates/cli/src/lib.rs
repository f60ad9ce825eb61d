//! valstat command-line interface
//!
//! Argument parsing lives here so it can be tested without spawning the
//! binary.

pub mod args;

/// Exit code for invalid configuration
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Exit code for failures while building the report
pub const EXIT_FAILURE: u8 = 1;

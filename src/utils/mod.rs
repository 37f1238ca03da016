//! Utility functions module
//!
//! Output formatting helpers shared by the CLI commands.

pub mod format;

pub use format::*;

//! # pv-core
//!
//! Shared error type and version metadata for the ProbViz crates.

#![warn(missing_docs)]

pub mod error;

pub use error::{Error, Result};

/// Crate version reported by the server and the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

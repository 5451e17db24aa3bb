//! Core utilities and types for the Parley model compiler.
//!
//! This crate provides the file and format primitives shared by the
//! build pipeline and the platform backends.

mod file;
mod format;
mod utils;

// File operations
pub use file::{File, write_file};
// Structured formats
pub use format::{FileFormat, FormatError};
// Value utilities
pub use utils::{locale_prefix, toml_to_json};

//! Command-line interface module
//!
//! This module contains the implementations for the CLI subcommands.

pub mod check;
pub mod transform;

use crate::error::{Error, Result};
use crate::host::ConditionalSource;
use std::fs;
use std::path::Path;

/// Read and parse a JSON request file
pub fn read_request(path: &Path) -> Result<Vec<ConditionalSource>> {
    let json = fs::read_to_string(path).map_err(|err| {
        Error::Io(format!("Failed to read {}: {}", path.display(), err))
    })?;
    crate::batch::load_request(&json)
}

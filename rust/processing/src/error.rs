// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for mounting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the mounting pipeline
///
/// Everything here is an input-contract violation; boolean failures are
/// absorbed by the engine fallback and show up in reports instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Got {depths} depths for {positions} positions")]
    DepthCountMismatch { positions: usize, depths: usize },

    #[error("Slot {index} does not exist (grid has {count} slots)")]
    SlotIndexOutOfRange { index: usize, count: usize },

    #[error("Invalid slot selection '{input}': {reason}")]
    InvalidSelection { input: String, reason: String },

    #[error("Invalid insertion direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid dimension {name} = {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("Unknown {kind} '{value}'")]
    UnknownName { kind: &'static str, value: String },

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Geometry(#[from] pegmount_geometry::Error),
}

impl Error {
    /// Shorthand for a selection parse failure
    pub fn selection(input: &str, reason: impl Into<String>) -> Self {
        Error::InvalidSelection {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

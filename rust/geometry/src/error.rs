// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),

    #[error("Boolean {operation} failed in {engine}: {reason}")]
    BooleanFailed {
        engine: &'static str,
        operation: &'static str,
        reason: String,
    },

    #[error("{engine} cannot handle this operand: {reason}")]
    UnsupportedOperand {
        engine: &'static str,
        reason: String,
    },

    #[error("Hole filling failed: {0}")]
    HoleFillFailed(String),

    #[error("Invalid primitive parameters: {0}")]
    InvalidPrimitive(String),
}

impl Error {
    /// Shorthand for a failed boolean attempt
    pub fn boolean(engine: &'static str, operation: &'static str, reason: impl Into<String>) -> Self {
        Error::BooleanFailed {
            engine,
            operation,
            reason: reason.into(),
        }
    }
}

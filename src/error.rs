// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types of the metrics collector.
//!
//! Missing or fully invalid artifacts are not errors, they simply produce no metrics.

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reducing artifacts or persisting the metrics table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An artifact does not have the expected shape.
    #[error("Shape mismatch in {artifact}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Name of the faulty artifact (or artifact field).
        artifact: &'static str,
        /// Human readable expected shape.
        expected: String,
        /// Human readable actual shape.
        actual: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization or deserialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A table cell could not be parsed.
    #[error("Parsing error in column {column}: {value:?}")]
    Parse {
        /// Column of the faulty cell.
        column: String,
        /// Content of the faulty cell.
        value: String,
    },
}

impl Error {
    /// Shape mismatch between two 2D grids.
    pub fn grid_mismatch(
        artifact: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Error::ShapeMismatch {
            artifact,
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}

//! Errors raised while deriving the model index.
//!
//! Most of the crate reports errors through [`anyhow`]. The conditions here get their own type
//! so that callers can tell bad input data (which must be fixed upstream) from other failures.
use std::fmt::Debug;

/// A problem with the input tables found while building the model index
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    /// A price string does not start with a recognised number format
    #[display("Unrecognised number format in {input:?}")]
    Format {
        /// The text which could not be parsed
        input: String,
    },
    /// A key referenced while deriving tuples is missing from its table
    #[display("No entry in {table} table for {key}")]
    Lookup {
        /// Name of the table which was searched
        table: &'static str,
        /// Debug representation of the missing key
        key: String,
    },
    /// No support time frames were provided
    #[display("At least one support time frame is required")]
    EmptyHorizon,
}

impl ModelError {
    /// Create a [`ModelError::Lookup`] for the given table and key
    pub fn lookup<K: Debug>(table: &'static str, key: &K) -> Self {
        Self::Lookup {
            table,
            key: format!("{key:?}"),
        }
    }
}

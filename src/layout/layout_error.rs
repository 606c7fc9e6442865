//! Error type of the layout computation.

use std::error::Error;
use std::fmt;

// =#========================================================================#=
// LAYOUT ERROR
// =#========================================================================$=
/// Error raised by [TreeLayouter::layout](crate::layout::TreeLayouter::layout)
/// and by tree validation.
///
/// All variants are fatal for the layout; no partial layout is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Invalid layout parameters, e.g. `drag` outside `[0, 1]`
    Configuration(String),
    /// Leaf names of tree and coordinate source don't match
    /// (and `ignore_missing` is off), or nothing is left to lay out
    MissingData(String),
    /// Tree structure violates its invariants
    MalformedTree(String),
}

impl LayoutError {
    /// Convenience constructor for Configuration
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Convenience constructor for MissingData
    pub fn missing_data<S: Into<String>>(msg: S) -> Self {
        Self::MissingData(msg.into())
    }

    /// Convenience constructor for MalformedTree
    pub fn malformed_tree<S: Into<String>>(msg: S) -> Self {
        Self::MalformedTree(msg.into())
    }

    /// Get the message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration(msg) | Self::MissingData(msg) | Self::MalformedTree(msg) => msg,
        }
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Self::MissingData(msg) => write!(f, "Missing data: {msg}"),
            Self::MalformedTree(msg) => write!(f, "Malformed tree: {msg}"),
        }
    }
}

impl Error for LayoutError {}

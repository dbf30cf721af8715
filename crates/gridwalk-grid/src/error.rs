//! This module defines the error types used by the `gridwalk-grid` crate.

#![warn(missing_docs)]

/// Error type for grid operations.
///
/// This enum encapsulates the ways a grid configuration or sprite movement
/// request can be rejected. A rejected call never leaves partial state behind.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Error for invalid grid dimensions.
    /// This variant is returned when a row or column count is not positive.
    InvalidDimensions(&'static str),
    /// Error for a target cell outside the permitted row or column range.
    /// This variant is returned when wrapping is disabled and placement is not forced.
    OutOfRange(&'static str),
}

impl core::fmt::Display for GridError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GridError::InvalidDimensions(msg) => write!(f, "Invalid grid dimensions: {}", msg),
            GridError::OutOfRange(msg) => write!(f, "Cell out of range: {}", msg),
        }
    }
}

impl core::error::Error for GridError {}

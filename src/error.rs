//! Error handling for pcb_easy
//!
//! Core lookups and codecs return the typed [`PcbError`]; the board model and
//! the command line front-end use anyhow for context-rich propagation.

use anyhow::Context;

pub type Result<T> = anyhow::Result<T>;

/// Result type of the pure conversion and lookup functions
pub type PcbResult<T> = std::result::Result<T, PcbError>;

/// Extension trait for Results to add board-building context
pub trait ResultExt<T> {
    /// Add context naming the layer an operation was targeting
    fn with_layer_context(self, layer: &str) -> Result<T>;

    /// Add context naming the board item being created
    fn with_item_context(self, item: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error> + Send + Sync + 'static,
{
    fn with_layer_context(self, layer: &str) -> Result<T> {
        self.map_err(|e| e.into())
            .with_context(|| format!("Error resolving layer {}", layer))
    }

    fn with_item_context(self, item: &str) -> Result<T> {
        self.map_err(|e| e.into())
            .with_context(|| format!("Failed to add {}", item))
    }
}

/// Specific error types for pcb_easy operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PcbError {
    #[error("Unknown layer name: {name}")]
    UnknownLayer { name: String },

    #[error("Layer index {index} out of range (table has {count} layers)")]
    LayerIndexOutOfRange { index: usize, count: usize },

    #[error("Duplicate layer name in layer table: {name}")]
    DuplicateLayer { name: String },

    #[error("Layer sets sized for {left} and {right} layers cannot be combined")]
    LayerCountMismatch { left: usize, right: usize },

    #[error("Layer set hex string has width {found}, expected {expected}")]
    HexWidthMismatch { expected: usize, found: usize },

    #[error("Invalid hex digit {digit:?} in layer set")]
    InvalidHexDigit { digit: char },

    #[error("Unknown pad type: {name}")]
    UnknownPadType { name: String },

    #[error("Unknown pad shape: {name}")]
    UnknownPadShape { name: String },

    #[error("Invalid pad size: {reason}")]
    InvalidPadSize { reason: String },

    #[error("Invalid length value: {reason}")]
    InvalidLength { reason: String },

    #[error("Invalid coordinate: {input}")]
    InvalidCoordinate { input: String },
}

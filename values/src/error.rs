//! Error types for the value layer.

use thiserror::Error;

/// Result type for value operations.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised while interpreting widget values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The `type` field named a widget kind this service does not know.
    #[error("Unknown widget type: {0}")]
    UnknownWidgetKind(String),
}

//! Error types for matrix stack and transform operations.

use thiserror::Error;

use crate::stack::MatrixMode;

/// A rejected matrix operation.
///
/// None of these are fatal: the operation that produced one left the context
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlError {
    /// Push on a stack whose top is already the last slot.
    #[error("{mode} stack overflow: all {capacity} slots in use")]
    StackOverflow { mode: MatrixMode, capacity: usize },

    /// Pop on a stack holding only its floor matrix.
    #[error("{mode} stack underflow: only one matrix left")]
    StackUnderflow { mode: MatrixMode },

    /// Frustum or ortho planes that would make the projection singular.
    #[error("invalid projection parameters: {0}")]
    InvalidProjectionParameters(String),

    /// A vector that had to be normalized has (near) zero length.
    #[error("degenerate vector: {0}")]
    DegenerateVector(&'static str),
}

/// Result type for matrix operations.
pub type GlResult<T> = Result<T, GlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_stack() {
        let err = GlError::StackOverflow {
            mode: MatrixMode::Projection,
            capacity: 16,
        };
        assert_eq!(err.to_string(), "projection stack overflow: all 16 slots in use");

        let err = GlError::StackUnderflow {
            mode: MatrixMode::ModelView,
        };
        assert_eq!(err.to_string(), "model-view stack underflow: only one matrix left");
    }
}

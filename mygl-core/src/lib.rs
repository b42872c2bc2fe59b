//! MyGL Core Library - fixed-function matrix pipeline
//!
//! Per-mode stacks of 4x4 column-major matrices and the classic transform
//! and camera constructors (translate, rotate, scale, look-at, frustum,
//! perspective) that compose onto the active stack's top.

pub mod context;
pub mod error;
pub mod matrix;
pub mod projection;
pub mod stack;
pub mod transform;

// Re-export commonly used types
pub use context::GlContext;
pub use error::{GlError, GlResult};
pub use matrix::{cross, normalize, Matrix};
pub use projection::{Camera, Projection};
pub use stack::{MatrixMode, MatrixStack, GL_MODELVIEW, GL_PROJECTION, STACK_CAPACITY};
pub use transform::Transform;

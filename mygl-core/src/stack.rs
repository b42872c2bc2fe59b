//! Bounded matrix stacks, one per matrix mode
use std::fmt;

use crate::error::{GlError, GlResult};
use crate::matrix::Matrix;

/// Number of matrices a stack can hold, floor included.
pub const STACK_CAPACITY: usize = 16;

/// `GL_MODELVIEW` enumerant.
pub const GL_MODELVIEW: u32 = 0x1700;
/// `GL_PROJECTION` enumerant.
pub const GL_PROJECTION: u32 = 0x1701;

/// Which stack the transform operations act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    ModelView,
    Projection,
}

impl MatrixMode {
    /// Maps a GL enumerant to a mode; anything else is `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            GL_MODELVIEW => Some(MatrixMode::ModelView),
            GL_PROJECTION => Some(MatrixMode::Projection),
            _ => None,
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            MatrixMode::ModelView => GL_MODELVIEW,
            MatrixMode::Projection => GL_PROJECTION,
        }
    }
}

impl fmt::Display for MatrixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixMode::ModelView => f.write_str("model-view"),
            MatrixMode::Projection => f.write_str("projection"),
        }
    }
}

/// Fixed-size stack of matrices with a permanent floor at slot 0.
///
/// Push duplicates the current top, pop discards it. Slots above `top` hold
/// stale matrices and are never read.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    mode: MatrixMode,
    slots: [Matrix; STACK_CAPACITY],
    top: usize,
}

impl MatrixStack {
    pub fn new(mode: MatrixMode) -> Self {
        Self {
            mode,
            slots: [Matrix::IDENTITY; STACK_CAPACITY],
            top: 0,
        }
    }

    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    /// Index of the active slot.
    pub fn top_index(&self) -> usize {
        self.top
    }

    /// Matrices currently on the stack, floor included.
    pub fn depth(&self) -> usize {
        self.top + 1
    }

    pub fn is_full(&self) -> bool {
        self.top == STACK_CAPACITY - 1
    }

    pub fn top(&self) -> &Matrix {
        &self.slots[self.top]
    }

    pub fn top_mut(&mut self) -> &mut Matrix {
        &mut self.slots[self.top]
    }

    /// Copies the top into the next slot and makes that slot active.
    pub fn push(&mut self) -> GlResult<()> {
        if self.is_full() {
            return Err(GlError::StackOverflow {
                mode: self.mode,
                capacity: STACK_CAPACITY,
            });
        }
        self.slots[self.top + 1] = self.slots[self.top];
        self.top += 1;
        Ok(())
    }

    /// Discards the top, exposing the matrix below it. Slot 0 is never popped.
    pub fn pop(&mut self) -> GlResult<()> {
        if self.top == 0 {
            return Err(GlError::StackUnderflow { mode: self.mode });
        }
        self.top -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(v: f64) -> Matrix {
        let mut m = Matrix::identity();
        m.set(0, 3, v);
        m
    }

    #[test]
    fn test_new_stack_holds_identity_floor() {
        let stack = MatrixStack::new(MatrixMode::ModelView);
        assert_eq!(stack.top_index(), 0);
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Matrix::IDENTITY);
    }

    #[test]
    fn test_push_duplicates_top() {
        let mut stack = MatrixStack::new(MatrixMode::ModelView);
        *stack.top_mut() = marked(7.0);
        stack.push().unwrap();
        assert_eq!(stack.top_index(), 1);
        assert_eq!(*stack.top(), marked(7.0));
    }

    #[test]
    fn test_pop_exposes_previous_matrix() {
        let mut stack = MatrixStack::new(MatrixMode::Projection);
        *stack.top_mut() = marked(1.0);
        stack.push().unwrap();
        *stack.top_mut() = marked(2.0);
        stack.pop().unwrap();
        assert_eq!(*stack.top(), marked(1.0));
    }

    #[test]
    fn test_pop_at_floor_underflows() {
        let mut stack = MatrixStack::new(MatrixMode::Projection);
        for _ in 0..3 {
            assert_eq!(
                stack.pop(),
                Err(GlError::StackUnderflow {
                    mode: MatrixMode::Projection
                })
            );
            assert_eq!(stack.top_index(), 0);
        }
    }

    #[test]
    fn test_push_at_capacity_overflows() {
        let mut stack = MatrixStack::new(MatrixMode::ModelView);
        for i in 1..STACK_CAPACITY {
            stack.push().unwrap();
            *stack.top_mut() = marked(i as f64);
        }
        assert!(stack.is_full());
        assert_eq!(
            stack.push(),
            Err(GlError::StackOverflow {
                mode: MatrixMode::ModelView,
                capacity: STACK_CAPACITY
            })
        );
        assert_eq!(stack.top_index(), STACK_CAPACITY - 1);
        assert_eq!(*stack.top(), marked((STACK_CAPACITY - 1) as f64));
    }

    #[test]
    fn test_mode_enumerants() {
        assert_eq!(MatrixMode::from_raw(GL_MODELVIEW), Some(MatrixMode::ModelView));
        assert_eq!(MatrixMode::from_raw(GL_PROJECTION), Some(MatrixMode::Projection));
        assert_eq!(MatrixMode::from_raw(0x1702), None);
        assert_eq!(MatrixMode::Projection.to_raw(), GL_PROJECTION);
    }
}

//! The matrix stack engine: both stacks plus the active-mode selector.

use nalgebra::{Point3, Vector3};

use crate::error::{GlError, GlResult};
use crate::matrix::Matrix;
use crate::projection::Projection;
use crate::stack::{MatrixMode, MatrixStack};
use crate::transform::Transform;

/// Owns one model-view stack, one projection stack and the mode that picks
/// between them.
///
/// Every transform operation right-multiplies the active top: after
/// `translate` then `rotate`, a vertex is rotated first and translated
/// second. Rejected operations leave the context untouched, return the error
/// and park it in a sticky slot read by [`GlContext::take_error`].
#[derive(Debug, Clone)]
pub struct GlContext {
    mode: MatrixMode,
    model_view: MatrixStack,
    projection: MatrixStack,
    error: Option<GlError>,
}

impl GlContext {
    /// Model-view mode, both stacks holding a single identity matrix.
    pub fn new() -> Self {
        Self {
            mode: MatrixMode::ModelView,
            model_view: MatrixStack::new(MatrixMode::ModelView),
            projection: MatrixStack::new(MatrixMode::Projection),
            error: None,
        }
    }

    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
    }

    /// `glMatrixMode` with a raw enumerant. Unknown values keep the current
    /// mode and return `false`.
    pub fn set_mode_raw(&mut self, raw: u32) -> bool {
        match MatrixMode::from_raw(raw) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => {
                tracing::warn!("ignoring unknown matrix mode {raw:#06x}, staying in {}", self.mode);
                false
            }
        }
    }

    pub fn stack(&self, mode: MatrixMode) -> &MatrixStack {
        match mode {
            MatrixMode::ModelView => &self.model_view,
            MatrixMode::Projection => &self.projection,
        }
    }

    fn current_stack(&self) -> &MatrixStack {
        self.stack(self.mode)
    }

    fn current_stack_mut(&mut self) -> &mut MatrixStack {
        match self.mode {
            MatrixMode::ModelView => &mut self.model_view,
            MatrixMode::Projection => &mut self.projection,
        }
    }

    /// Matrices on the active stack, floor included.
    pub fn depth(&self) -> usize {
        self.current_stack().depth()
    }

    /// Copy of the active top matrix.
    pub fn top(&self) -> Matrix {
        *self.current_stack().top()
    }

    /// Active top narrowed to single precision (`glGetFloatv`).
    pub fn top_f32(&self) -> [f32; 16] {
        self.current_stack().top().to_f32_array()
    }

    pub fn load_identity(&mut self) {
        *self.current_stack_mut().top_mut() = Matrix::IDENTITY;
    }

    /// Replaces the active top with `values` (column-major) as given.
    pub fn load_matrix(&mut self, values: [f64; 16]) {
        *self.current_stack_mut().top_mut() = Matrix::from_array(values);
    }

    pub fn load_matrix_f32(&mut self, values: [f32; 16]) {
        *self.current_stack_mut().top_mut() = Matrix::from_f32_array(values);
    }

    /// Duplicates the active top. Fails without side effects when the stack
    /// is full.
    pub fn push(&mut self) -> GlResult<()> {
        let result = self.current_stack_mut().push();
        self.record(result)
    }

    /// Discards the active top. Fails without side effects at the floor.
    pub fn pop(&mut self) -> GlResult<()> {
        let result = self.current_stack_mut().pop();
        self.record(result)
    }

    /// `C = C * m` on the active top.
    pub fn multiply_top(&mut self, m: &Matrix) {
        let top = self.current_stack_mut().top_mut();
        *top = top.multiply(m);
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.multiply_top(&Transform::translation(x, y, z));
    }

    pub fn translate_f32(&mut self, x: f32, y: f32, z: f32) {
        self.translate(x.into(), y.into(), z.into());
    }

    /// Rotates `angle` degrees about `(x, y, z)`. A zero axis is rejected.
    pub fn rotate(&mut self, angle: f64, x: f64, y: f64, z: f64) -> GlResult<()> {
        let m = Transform::rotation(angle, x, y, z);
        self.compose(m)
    }

    pub fn rotate_f32(&mut self, angle: f32, x: f32, y: f32, z: f32) -> GlResult<()> {
        self.rotate(angle.into(), x.into(), y.into(), z.into())
    }

    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        self.multiply_top(&Transform::scale(x, y, z));
    }

    pub fn scale_f32(&mut self, x: f32, y: f32, z: f32) {
        self.scale(x.into(), y.into(), z.into());
    }

    #[allow(clippy::too_many_arguments)]
    pub fn look_at(
        &mut self,
        eye_x: f64,
        eye_y: f64,
        eye_z: f64,
        center_x: f64,
        center_y: f64,
        center_z: f64,
        up_x: f64,
        up_y: f64,
        up_z: f64,
    ) -> GlResult<()> {
        let m = Projection::look_at(
            &Point3::new(eye_x, eye_y, eye_z),
            &Point3::new(center_x, center_y, center_z),
            &Vector3::new(up_x, up_y, up_z),
        );
        self.compose(m)
    }

    pub fn frustum(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        z_near: f64,
        z_far: f64,
    ) -> GlResult<()> {
        let m = Projection::frustum(left, right, bottom, top, z_near, z_far);
        self.compose(m)
    }

    pub fn perspective(&mut self, fovy: f64, aspect: f64, z_near: f64, z_far: f64) -> GlResult<()> {
        let m = Projection::perspective(fovy, aspect, z_near, z_far);
        self.compose(m)
    }

    pub fn ortho(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        z_near: f64,
        z_far: f64,
    ) -> GlResult<()> {
        let m = Projection::ortho(left, right, bottom, top, z_near, z_far);
        self.compose(m)
    }

    /// Returns and clears the first error recorded since the last call
    /// (`glGetError`).
    pub fn take_error(&mut self) -> Option<GlError> {
        self.error.take()
    }

    fn compose(&mut self, m: GlResult<Matrix>) -> GlResult<()> {
        let m = self.record(m)?;
        self.multiply_top(&m);
        Ok(())
    }

    pub(crate) fn record<T>(&mut self, result: GlResult<T>) -> GlResult<T> {
        if let Err(err) = &result {
            tracing::warn!(mode = %self.mode, "{err}");
            if self.error.is_none() {
                self.error = Some(err.clone());
            }
        }
        result
    }
}

impl Default for GlContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{GL_PROJECTION, STACK_CAPACITY};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_initial_state() {
        let ctx = GlContext::new();
        assert_eq!(ctx.mode(), MatrixMode::ModelView);
        assert_eq!(ctx.depth(), 1);
        assert_eq!(ctx.top(), Matrix::IDENTITY);
        assert_eq!(*ctx.stack(MatrixMode::Projection).top(), Matrix::IDENTITY);
    }

    #[test]
    fn test_unknown_raw_mode_keeps_current() {
        let mut ctx = GlContext::new();
        assert!(ctx.set_mode_raw(GL_PROJECTION));
        assert_eq!(ctx.mode(), MatrixMode::Projection);
        assert!(!ctx.set_mode_raw(0xdead));
        assert_eq!(ctx.mode(), MatrixMode::Projection);
    }

    #[test]
    fn test_load_matrix_is_verbatim() {
        let mut ctx = GlContext::new();
        let singular = [0.0; 16];
        ctx.load_matrix(singular);
        assert_eq!(ctx.top().to_array(), singular);
        ctx.load_identity();
        assert_eq!(ctx.top(), Matrix::IDENTITY);
    }

    #[test]
    fn test_multiply_top_right_multiplies() {
        let mut ctx = GlContext::new();
        ctx.translate(1.0, 0.0, 0.0);
        ctx.scale(2.0, 2.0, 2.0);
        // scale applies first, then the translation
        let p = ctx.top().transform_point([1.0, 1.0, 1.0]);
        assert_eq!(p, [3.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_rejected_rotate_leaves_top_alone() {
        let mut ctx = GlContext::new();
        ctx.translate(1.0, 2.0, 3.0);
        let before = ctx.top();
        assert!(ctx.rotate(30.0, 0.0, 0.0, 0.0).is_err());
        assert_eq!(ctx.top(), before);
    }

    #[test]
    fn test_sticky_error_keeps_first() {
        let mut ctx = GlContext::new();
        assert_eq!(ctx.take_error(), None);

        let _ = ctx.pop();
        let _ = ctx.frustum(0.0, 0.0, -1.0, 1.0, 1.0, 2.0);
        assert_eq!(
            ctx.take_error(),
            Some(GlError::StackUnderflow {
                mode: MatrixMode::ModelView
            })
        );
        assert_eq!(ctx.take_error(), None);
    }

    #[test]
    fn test_overflow_reports_active_mode() {
        let mut ctx = GlContext::new();
        ctx.set_mode(MatrixMode::Projection);
        for _ in 1..STACK_CAPACITY {
            ctx.push().unwrap();
        }
        assert_eq!(
            ctx.push(),
            Err(GlError::StackOverflow {
                mode: MatrixMode::Projection,
                capacity: STACK_CAPACITY
            })
        );
        assert_eq!(ctx.depth(), STACK_CAPACITY);
    }

    #[test]
    fn test_f32_entry_points() {
        let mut ctx = GlContext::new();
        ctx.translate_f32(0.5, 0.25, -1.0);
        ctx.rotate_f32(90.0, 0.0, 0.0, 1.0).unwrap();
        ctx.scale_f32(2.0, 2.0, 2.0);
        let top = ctx.top_f32();
        assert_abs_diff_eq!(top[12], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(top[1], 2.0, epsilon = 1e-6);

        ctx.load_matrix_f32([1.0; 16]);
        assert_eq!(ctx.top().to_array(), [1.0; 16]);
    }
}

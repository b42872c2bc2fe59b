/// Camera and projection utilities
use nalgebra::{Point3, Vector3};

use crate::context::GlContext;
use crate::error::{GlError, GlResult};
use crate::matrix::{cross, normalize, Matrix};
use crate::stack::MatrixMode;

/// Builders for `gluLookAt`, `glFrustum`, `gluPerspective` and `glOrtho`
pub struct Projection;

impl Projection {
    /// Viewing matrix placing the camera at `eye`, looking at `center`.
    ///
    /// `center` must differ from `eye` and `up` must not be parallel to the
    /// view direction; otherwise the camera basis has no side vector and the
    /// call fails with [`GlError::DegenerateVector`]. Only direction matters,
    /// so `up` may be arbitrarily short.
    pub fn look_at(
        eye: &Point3<f64>,
        center: &Point3<f64>,
        up: &Vector3<f64>,
    ) -> GlResult<Matrix> {
        let forward = normalize(&(center - eye))
            .map_err(|_| GlError::DegenerateVector("look-at eye and center coincide"))?;
        // parallel is judged against |up|, not an absolute length
        let side = cross(&forward, up);
        if side.amax() <= f64::EPSILON * up.amax() {
            return Err(GlError::DegenerateVector(
                "look-at up vector is parallel to the view direction",
            ));
        }
        let side = normalize(&side).map_err(|_| {
            GlError::DegenerateVector("look-at up vector is parallel to the view direction")
        })?;
        let true_up = cross(&side, &forward);

        let e = eye.coords;
        Ok(Matrix::from_array([
            // Column 0
            side.x,
            true_up.x,
            -forward.x,
            0.0,
            // Column 1
            side.y,
            true_up.y,
            -forward.y,
            0.0,
            // Column 2
            side.z,
            true_up.z,
            -forward.z,
            0.0,
            // Column 3: basis applied to -eye
            -side.dot(&e),
            -true_up.dot(&e),
            forward.dot(&e),
            1.0,
        ]))
    }

    /// Perspective projection for the view volume bounded by the six planes.
    pub fn frustum(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        z_near: f64,
        z_far: f64,
    ) -> GlResult<Matrix> {
        check_finite(&[left, right, bottom, top, z_near, z_far])?;
        if z_near <= 0.0 || z_far <= 0.0 {
            return Err(GlError::InvalidProjectionParameters(format!(
                "near ({z_near}) and far ({z_far}) must be positive"
            )));
        }
        check_extents(left, right, bottom, top, z_near, z_far)?;

        let width = right - left;
        let height = top - bottom;
        let depth = z_far - z_near;

        Ok(Matrix::from_array([
            2.0 * z_near / width,
            0.0,
            0.0,
            0.0,
            //
            0.0,
            2.0 * z_near / height,
            0.0,
            0.0,
            //
            (right + left) / width,
            (top + bottom) / height,
            -(z_far + z_near) / depth,
            -1.0,
            //
            0.0,
            0.0,
            -2.0 * z_far * z_near / depth,
            0.0,
        ]))
    }

    /// Symmetric perspective from a vertical field of view in degrees.
    ///
    /// Only derives the planes; every check is [`Projection::frustum`]'s. A
    /// `fovy` outside `(0, 180)` gives a meaningless (or, at 0, rejected)
    /// projection.
    pub fn perspective(fovy: f64, aspect: f64, z_near: f64, z_far: f64) -> GlResult<Matrix> {
        let top = (fovy / 2.0).to_radians().tan() * z_near;
        let bottom = -top;
        let right = top * aspect;
        let left = -right;
        Self::frustum(left, right, bottom, top, z_near, z_far)
    }

    /// Parallel projection for the box bounded by the six planes.
    pub fn ortho(
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        z_near: f64,
        z_far: f64,
    ) -> GlResult<Matrix> {
        check_finite(&[left, right, bottom, top, z_near, z_far])?;
        check_extents(left, right, bottom, top, z_near, z_far)?;

        let width = right - left;
        let height = top - bottom;
        let depth = z_far - z_near;

        Ok(Matrix::from_array([
            2.0 / width,
            0.0,
            0.0,
            0.0,
            //
            0.0,
            2.0 / height,
            0.0,
            0.0,
            //
            0.0,
            0.0,
            -2.0 / depth,
            0.0,
            //
            -(right + left) / width,
            -(top + bottom) / height,
            -(z_far + z_near) / depth,
            1.0,
        ]))
    }
}

fn check_finite(planes: &[f64]) -> GlResult<()> {
    if planes.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(GlError::InvalidProjectionParameters(format!(
            "clip planes must be finite, got {planes:?}"
        )))
    }
}

fn check_extents(
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    z_near: f64,
    z_far: f64,
) -> GlResult<()> {
    if left == right {
        return Err(GlError::InvalidProjectionParameters(format!(
            "left and right are both {left}"
        )));
    }
    if bottom == top {
        return Err(GlError::InvalidProjectionParameters(format!(
            "bottom and top are both {bottom}"
        )));
    }
    if z_near == z_far {
        return Err(GlError::InvalidProjectionParameters(format!(
            "near and far are both {z_near}"
        )));
    }
    Ok(())
}

/// Camera configuration for a perspective view
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Point3<f64>,
    pub center: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in degrees.
    pub fovy: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f64 / height as f64,
            ..Self::default()
        }
    }

    /// Loads this camera into `ctx`: perspective onto a fresh projection
    /// matrix, look-at onto a fresh model-view matrix. Leaves `ctx` in
    /// model-view mode.
    ///
    /// Both matrices are built before `ctx` is touched, so a camera that
    /// fails either one leaves the mode and both stacks as they were.
    pub fn apply(&self, ctx: &mut GlContext) -> GlResult<()> {
        let projection =
            ctx.record(Projection::perspective(self.fovy, self.aspect, self.near, self.far))?;
        let view = ctx.record(Projection::look_at(&self.eye, &self.center, &self.up))?;

        ctx.set_mode(MatrixMode::Projection);
        ctx.load_matrix(projection.to_array());
        ctx.set_mode(MatrixMode::ModelView);
        ctx.load_matrix(view.to_array());
        Ok(())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 5.0),
            center: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fovy: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix4;

    #[test]
    fn test_look_at_matches_nalgebra() {
        let eye = Point3::new(3.0, 2.0, 7.0);
        let center = Point3::new(-1.0, 0.5, 0.0);
        let up = Vector3::new(0.0, 1.0, 0.0);
        let ours = Projection::look_at(&eye, &center, &up).unwrap();
        let theirs = Matrix4::look_at_rh(&eye, &center, &up);
        assert_abs_diff_eq!(ours, Matrix::from(theirs), epsilon = 1e-12);
    }

    #[test]
    fn test_look_at_rejects_parallel_up() {
        let result = Projection::look_at(
            &Point3::new(0.0, 5.0, 0.0),
            &Point3::origin(),
            &Vector3::new(0.0, 2.0, 0.0),
        );
        assert!(matches!(result, Err(GlError::DegenerateVector(_))));
    }

    #[test]
    fn test_look_at_accepts_short_up_vector() {
        let eye = Point3::new(0.0, 0.0, 5.0);
        let center = Point3::origin();
        let short = Projection::look_at(&eye, &center, &Vector3::new(0.0, 1e-13, 0.0)).unwrap();
        let unit = Projection::look_at(&eye, &center, &Vector3::y()).unwrap();
        assert_abs_diff_eq!(short, unit, epsilon = 1e-12);
    }

    #[test]
    fn test_look_at_rejects_coincident_eye_and_center() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let result = Projection::look_at(&p, &p, &Vector3::y());
        assert!(matches!(result, Err(GlError::DegenerateVector(_))));
    }

    #[test]
    fn test_perspective_matches_nalgebra() {
        let ours = Projection::perspective(60.0, 1.5, 0.5, 80.0).unwrap();
        let theirs = Matrix4::new_perspective(1.5, 60.0f64.to_radians(), 0.5, 80.0);
        assert_abs_diff_eq!(ours, Matrix::from(theirs), epsilon = 1e-12);
    }

    #[test]
    fn test_asymmetric_frustum_terms() {
        let m = Projection::frustum(-1.0, 3.0, -2.0, 2.0, 1.0, 11.0).unwrap();
        assert_abs_diff_eq!(m.get(0, 0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get(1, 1), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get(0, 2), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get(1, 2), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get(2, 2), -1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get(2, 3), -2.2, epsilon = 1e-12);
        assert_eq!(m.get(3, 2), -1.0);
        assert_eq!(m.get(3, 3), 0.0);
    }

    #[test]
    fn test_frustum_rejects_degenerate_planes() {
        let cases = [
            (-1.0, 1.0, -1.0, 1.0, 0.0, 10.0),
            (-1.0, 1.0, -1.0, 1.0, -1.0, 10.0),
            (-1.0, 1.0, -1.0, 1.0, 1.0, -10.0),
            (1.0, 1.0, -1.0, 1.0, 1.0, 10.0),
            (-1.0, 1.0, 2.0, 2.0, 1.0, 10.0),
            (-1.0, 1.0, -1.0, 1.0, 5.0, 5.0),
            (-1.0, f64::NAN, -1.0, 1.0, 1.0, 10.0),
        ];
        for (l, r, b, t, n, f) in cases {
            assert!(
                matches!(
                    Projection::frustum(l, r, b, t, n, f),
                    Err(GlError::InvalidProjectionParameters(_))
                ),
                "frustum({l}, {r}, {b}, {t}, {n}, {f}) was accepted"
            );
        }
    }

    #[test]
    fn test_zero_fovy_is_rejected_by_frustum() {
        assert!(Projection::perspective(0.0, 1.0, 1.0, 10.0).is_err());
    }

    #[test]
    fn test_ortho_matches_nalgebra() {
        let ours = Projection::ortho(-2.0, 4.0, -1.0, 3.0, -5.0, 5.0).unwrap();
        let theirs = Matrix4::new_orthographic(-2.0, 4.0, -1.0, 3.0, -5.0, 5.0);
        assert_abs_diff_eq!(ours, Matrix::from(theirs), epsilon = 1e-12);
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-12);
        assert_eq!(camera.fovy, 45.0);
    }

    #[test]
    fn test_camera_apply_loads_both_stacks() {
        let camera = Camera::new(640, 480);
        let mut ctx = GlContext::new();
        camera.apply(&mut ctx).unwrap();

        assert_eq!(ctx.mode(), MatrixMode::ModelView);
        let view = ctx.top();
        let eye = view.transform_point([0.0, 0.0, 5.0]);
        assert_abs_diff_eq!(eye[2], 0.0, epsilon = 1e-12);

        let projection = *ctx.stack(MatrixMode::Projection).top();
        let expected =
            Projection::perspective(45.0, 640.0 / 480.0, camera.near, camera.far).unwrap();
        assert_eq!(projection, expected);
    }

    #[test]
    fn test_failed_camera_leaves_context_untouched() {
        let mut ctx = GlContext::new();
        ctx.translate(1.0, 2.0, 3.0);
        ctx.push().unwrap();
        ctx.set_mode(MatrixMode::Projection);
        ctx.scale(2.0, 2.0, 2.0);
        ctx.set_mode(MatrixMode::ModelView);
        let before = ctx.clone();

        let bad_projection = Camera {
            near: 5.0,
            far: 5.0,
            ..Camera::default()
        };
        assert!(bad_projection.apply(&mut ctx).is_err());

        let bad_view = Camera {
            center: Point3::new(0.0, 0.0, 5.0),
            ..Camera::default()
        };
        assert!(matches!(
            bad_view.apply(&mut ctx),
            Err(GlError::DegenerateVector(_))
        ));

        assert_eq!(ctx.mode(), before.mode());
        assert_eq!(ctx.depth(), 2);
        assert_eq!(ctx.top(), before.top());
        assert_eq!(
            ctx.stack(MatrixMode::Projection).top(),
            before.stack(MatrixMode::Projection).top()
        );
        // first failure is the one reported
        assert!(matches!(
            ctx.take_error(),
            Some(GlError::InvalidProjectionParameters(_))
        ));
    }
}

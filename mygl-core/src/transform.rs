/// Model transforms: translation, axis-angle rotation and scale
use nalgebra::Vector3;

use crate::error::{GlError, GlResult};
use crate::matrix::{normalize, Matrix};

/// Builders for the matrices `glTranslate`, `glRotate` and `glScale` multiply
/// onto the current matrix
pub struct Transform;

impl Transform {
    /// Identity with `(x, y, z)` in the last column.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix {
        Matrix::from_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        ])
    }

    /// Rotation of `angle` degrees counter-clockwise about the axis `(x, y, z)`.
    ///
    /// The axis is normalized first, so its length does not matter; a zero
    /// axis has no direction and yields [`GlError::DegenerateVector`].
    pub fn rotation(angle: f64, x: f64, y: f64, z: f64) -> GlResult<Matrix> {
        let axis = normalize(&Vector3::new(x, y, z))
            .map_err(|_| GlError::DegenerateVector("rotation axis has zero length"))?;
        let (x, y, z) = (axis.x, axis.y, axis.z);

        let radians = angle.to_radians();
        let c = radians.cos();
        let s = radians.sin();
        let t = 1.0 - c;

        Ok(Matrix::from_array([
            // Column 0
            x * x * t + c,
            y * x * t + z * s,
            x * z * t - y * s,
            0.0,
            // Column 1
            x * y * t - z * s,
            y * y * t + c,
            y * z * t + x * s,
            0.0,
            // Column 2
            x * z * t + y * s,
            y * z * t - x * s,
            z * z * t + c,
            0.0,
            // Column 3
            0.0,
            0.0,
            0.0,
            1.0,
        ]))
    }

    /// `diag(x, y, z, 1)`. Zero factors are allowed and flatten that axis.
    pub fn scale(x: f64, y: f64, z: f64) -> Matrix {
        Matrix::from_array([
            x, 0.0, 0.0, 0.0, //
            0.0, y, 0.0, 0.0, //
            0.0, 0.0, z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}

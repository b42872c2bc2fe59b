//! 4x4 homogeneous matrices in column-major layout
//!
//! Element `(row, col)` lives at flat index `4 * col + row`, the layout
//! OpenGL's `glLoadMatrix` and `glGetDoublev` use.

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Matrix4, Vector3};

use crate::error::{GlError, GlResult};

/// A 4x4 homogeneous transform stored as 16 column-major `f64`s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    values: [f64; 16],
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        values: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Wraps 16 column-major values verbatim. Nothing is validated.
    pub const fn from_array(values: [f64; 16]) -> Self {
        Self { values }
    }

    pub fn from_f32_array(values: [f32; 16]) -> Self {
        Self {
            values: values.map(f64::from),
        }
    }

    pub const fn to_array(&self) -> [f64; 16] {
        self.values
    }

    /// Narrows every element to `f32` for consumers that upload single precision.
    pub fn to_f32_array(&self) -> [f32; 16] {
        self.values.map(|v| v as f32)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub const fn get(&self, row: usize, col: usize) -> f64 {
        self.values[4 * col + row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[4 * col + row] = value;
    }

    pub fn column(&self, col: usize) -> [f64; 4] {
        let base = 4 * col;
        [
            self.values[base],
            self.values[base + 1],
            self.values[base + 2],
            self.values[base + 3],
        ]
    }

    /// Returns `self * other`.
    ///
    /// The product is accumulated in a fresh buffer, so `m.multiply(&m)` is
    /// the true square of `m`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let mut result = [0.0f64; 16];

        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.values[4 * k + row] * other.values[4 * col + k];
                }
                result[4 * col + row] = sum;
            }
        }

        Matrix { values: result }
    }

    /// Applies the matrix to the homogeneous point `(x, y, z, 1)`.
    pub fn transform_point(&self, point: [f64; 3]) -> [f64; 4] {
        let p = [point[0], point[1], point[2], 1.0];
        let mut out = [0.0f64; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..4).map(|col| self.get(row, col) * p[col]).sum();
        }
        out
    }

    /// Applies the upper 3x3 block to a direction; translation is ignored.
    pub fn transform_vector(&self, v: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0f64; 3];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = (0..3).map(|col| self.get(row, col) * v[col]).sum();
        }
        out
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Matrix) -> Matrix {
        self.multiply(&rhs)
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        self.multiply(rhs)
    }
}

impl From<Matrix4<f64>> for Matrix {
    fn from(m: Matrix4<f64>) -> Self {
        // nalgebra stores its 4x4 matrices column-major as well
        let mut values = [0.0f64; 16];
        values.copy_from_slice(m.as_slice());
        Self { values }
    }
}

impl From<Matrix> for Matrix4<f64> {
    fn from(m: Matrix) -> Self {
        Matrix4::from_column_slice(&m.values)
    }
}

impl AbsDiffEq for Matrix {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

/// Returns the unit vector pointing the same way as `v`.
///
/// Any finite non-zero vector normalizes, however short. The zero vector
/// has no direction and non-finite components have no length; both fail
/// with [`GlError::DegenerateVector`].
pub fn normalize(v: &Vector3<f64>) -> GlResult<Vector3<f64>> {
    // divide by the largest component first so tiny inputs don't underflow
    let largest = v.amax();
    if largest == 0.0 || !v.iter().all(|c| c.is_finite()) {
        return Err(GlError::DegenerateVector("zero-length vector"));
    }
    let scaled = v / largest;
    Ok(scaled / scaled.norm())
}

/// Returns `b × c`.
pub fn cross(b: &Vector3<f64>, c: &Vector3<f64>) -> Vector3<f64> {
    b.cross(c)
}

//! 4x4 fixed-point transformation matrix using column-vector convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - Right-handed: the camera looks down `-Z`, `+Y` is up
//!
//! Every element of a product is a 4-term dot product accumulated exactly in
//! 64 bits and rounded once.
//!
//! # Example
//! ```ignore
//! let mvp = projection * view * model;  // model applied first
//! let clip = mvp * Vec4::point(vertex);
//! ```

use std::ops::Mul;

use super::fixed::Fixed;
use super::vec3::Vec3;
use super::vec4::Vec4;

/// Side vectors (unit forward x unit up) shorter than this make a look-at
/// basis degenerate.
pub const MIN_BASIS_LENGTH: Fixed = Fixed::from_raw(64);

/// 4x4 matrix stored as `data[row][col]` with column-vector convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mat4 {
    data: [[Fixed; 4]; 4],
}

const O: Fixed = Fixed::ZERO;
const I: Fixed = Fixed::ONE;

impl Mat4 {
    pub const fn new(data: [[Fixed; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub const fn identity() -> Self {
        Mat4::new([[I, O, O, O], [O, I, O, O], [O, O, I, O], [O, O, O, I]])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-vector convention).
    pub const fn translation(t: Vec3) -> Self {
        Mat4::new([[I, O, O, t.x], [O, I, O, t.y], [O, O, I, t.z], [O, O, O, I]])
    }

    /// Creates a scale matrix.
    pub const fn scaling(s: Vec3) -> Self {
        Mat4::new([[s.x, O, O, O], [O, s.y, O, O], [O, O, s.z, O], [O, O, O, I]])
    }

    /// Rotation around the X axis; positive angles turn +Y toward +Z.
    pub fn rotation_x(angle: Fixed) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([[I, O, O, O], [O, c, -s, O], [O, s, c, O], [O, O, O, I]])
    }

    /// Rotation around the Y axis; positive angles turn +Z toward +X.
    pub fn rotation_y(angle: Fixed) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([[c, O, s, O], [O, I, O, O], [-s, O, c, O], [O, O, O, I]])
    }

    /// Rotation around the Z axis; positive angles turn +X toward +Y.
    pub fn rotation_z(angle: Fixed) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([[c, -s, O, O], [s, c, O, O], [O, O, I, O], [O, O, O, I]])
    }

    /// Creates a right-handed view matrix.
    ///
    /// ```text
    /// f = normalize(target - eye)
    /// s = normalize(f x up)
    /// u = s x f
    /// ```
    ///
    /// Returns `None` when `eye == target`, `up` is zero, or `up` is parallel
    /// to the viewing direction.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let forward = (target - eye).normalize()?;
        let side = forward.cross(up.normalize()?);
        if side.length() < MIN_BASIS_LENGTH {
            return None;
        }
        let side = side.normalize()?;
        let up = side.cross(forward);

        Some(Self::new([
            [side.x, side.y, side.z, -side.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [-forward.x, -forward.y, -forward.z, forward.dot(eye)],
            [O, O, O, I],
        ]))
    }

    /// Creates a right-handed perspective matrix with OpenGL depth range.
    ///
    /// View depth `-near..-far` maps to NDC `-1..1`, and `w = -z_view`.
    /// Parameters are assumed valid (see [`crate::projection::Projection`]).
    pub fn perspective_rh_gl(fov_y: Fixed, aspect_ratio: Fixed, near: Fixed, far: Fixed) -> Self {
        let f = (fov_y * Fixed::HALF).tan().recip();
        let depth = near - far;
        let a = (far + near) / depth;
        let b = Fixed::from_int(2) * far * near / depth;
        Mat4::new([
            [f / aspect_ratio, O, O, O],
            [O, f, O, O],
            [O, O, a, b],
            [O, O, -I, O],
        ])
    }

    /// Transform a position (w = 1) into homogeneous coordinates.
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec4 {
        *self * Vec4::point(p)
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Fixed {
        self.data[row][col]
    }

    #[inline]
    fn row_dot(&self, row: usize, v: [Fixed; 4]) -> Fixed {
        let r = &self.data[row];
        Fixed::from_wide(
            r[0].mul_wide(v[0]) + r[1].mul_wide(v[1]) + r[2].mul_wide(v[2]) + r[3].mul_wide(v[3]),
        )
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-vector convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[O; 4]; 4];
        for (row, cols) in result.iter_mut().enumerate() {
            for (col, value) in cols.iter_mut().enumerate() {
                let column = [
                    rhs.data[0][col],
                    rhs.data[1][col],
                    rhs.data[2][col],
                    rhs.data[3][col],
                ];
                *value = self.row_dot(row, column);
            }
        }
        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let column = [v.x, v.y, v.z, v.w];
        Vec4::new(
            self.row_dot(0, column),
            self.row_dot(1, column),
            self.row_dot(2, column),
            self.row_dot(3, column),
        )
    }
}

// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Mat3` and `Mat4` types and the transforms built from them.

use super::{Vec3, Vec4, EPSILON};
use std::ops::Mul;

// --- Mat3 ---

/// A 3x3 column-major matrix, used for rotation blocks and normal transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// The columns of the matrix.
    pub cols: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Creates a new matrix from three column vectors.
    #[inline]
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Extracts the upper-left 3x3 block of a `Mat4`.
    #[inline]
    pub fn from_mat4(m: &Mat4) -> Self {
        Self::from_cols(m.cols[0].truncate(), m.cols[1].truncate(), m.cols[2].truncate())
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        let [a, b, c] = self.cols;
        a.dot(b.cross(c))
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        let [a, b, c] = self.cols;
        Self::from_cols(
            Vec3::new(a.x, b.x, c.x),
            Vec3::new(a.y, b.y, c.y),
            Vec3::new(a.z, b.z, c.z),
        )
    }

    /// Returns the inverse, or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return None;
        }
        let [a, b, c] = self.cols;
        // Rows of the inverse are the cross products of column pairs.
        let r0 = b.cross(c) / det;
        let r1 = c.cross(a) / det;
        let r2 = a.cross(b) / det;
        Some(Self::from_cols(r0, r1, r2).transpose())
    }
}

impl Default for Mat3 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Mat3;
    #[inline]
    fn mul(self, rhs: Mat3) -> Mat3 {
        Mat3::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

// --- Mat4 ---

/// A 4x4 column-major matrix for affine transforms (camera-to-world, object-to-world).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[3]` holds the translation.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Builds an affine matrix from a 3x3 linear block and a translation.
    #[inline]
    pub fn from_mat3_translation(m: Mat3, translation: Vec3) -> Self {
        Self::from_cols(
            Vec4::from_vec3(m.cols[0], 0.0),
            Vec4::from_vec3(m.cols[1], 0.0),
            Vec4::from_vec3(m.cols[2], 0.0),
            Vec4::from_vec3(translation, 1.0),
        )
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0].get(index),
            self.cols[1].get(index),
            self.cols[2].get(index),
            self.cols[3].get(index),
        )
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        Self::from_mat3_translation(Mat3::IDENTITY, v)
    }

    /// Creates a non-uniform scaling matrix.
    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_mat3_translation(
            Mat3::from_cols(
                Vec3::new(scale.x, 0.0, 0.0),
                Vec3::new(0.0, scale.y, 0.0),
                Vec3::new(0.0, 0.0, scale.z),
            ),
            Vec3::ZERO,
        )
    }

    /// Rotation around the X axis.
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_mat3_translation(
            Mat3::from_cols(Vec3::X, Vec3::new(0.0, c, s), Vec3::new(0.0, -s, c)),
            Vec3::ZERO,
        )
    }

    /// Rotation around the Y axis.
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_mat3_translation(
            Mat3::from_cols(Vec3::new(c, 0.0, -s), Vec3::Y, Vec3::new(s, 0.0, c)),
            Vec3::ZERO,
        )
    }

    /// Rotation around the Z axis.
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_mat3_translation(
            Mat3::from_cols(Vec3::new(c, s, 0.0), Vec3::new(-s, c, 0.0), Vec3::Z),
            Vec3::ZERO,
        )
    }

    /// Rotation from XYZ euler angles, applied X first then Y then Z.
    #[inline]
    pub fn from_euler_xyz(euler: Vec3) -> Self {
        Self::from_rotation_z(euler.z) * Self::from_rotation_y(euler.y) * Self::from_rotation_x(euler.x)
    }

    /// The translation part of an affine matrix.
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Transforms a point (w = 1).
    #[inline]
    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(p, 1.0)).truncate()
    }

    /// Transforms a direction (w = 0), ignoring translation.
    #[inline]
    pub fn transform_vector3(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).truncate()
    }

    /// Inverse of an affine matrix, or `None` when its linear block is singular.
    pub fn affine_inverse(&self) -> Option<Self> {
        let inv = Mat3::from_mat4(self).inverse()?;
        let t = -(inv * self.translation());
        Some(Self::from_mat3_translation(inv, t))
    }

    /// Row-major `[[f32; 4]; 4]`, the layout used in JSON manifests.
    pub fn to_rows_array(&self) -> [[f32; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            let v = self.get_row(r);
            *row = [v.x, v.y, v.z, v.w];
        }
        rows
    }

    /// Inverse of [`Mat4::to_rows_array`].
    pub fn from_rows_array(rows: &[[f32; 4]; 4]) -> Self {
        let col = |c: usize| Vec4::new(rows[0][c], rows[1][c], rows[2][c], rows[3][c]);
        Self::from_cols(col(0), col(1), col(2), col(3))
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Mat4) -> Self {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

//! Common math types used across meshforge
//!
//! Small value types only; anything host-application specific stays out.

use serde::{Deserialize, Serialize};

/// 2D vector (UV coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 3D vector (position, normal)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Self::ZERO
        }
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

/// 4x3 local-to-world transform: four columns of three floats each.
///
/// Columns 0..3 are the basis vectors, column 3 is the origin. There is
/// no projective row; the homogeneous row of a full 4x4 is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4x3 {
    pub cols: [[f32; 3]; 4],
}

impl Mat4x3 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ],
    };

    /// Column-major flattening, 12 floats, the on-disk transform order
    pub fn to_flat(&self) -> [f32; 12] {
        let mut out = [0.0f32; 12];
        for (i, col) in self.cols.iter().enumerate() {
            out[i * 3..i * 3 + 3].copy_from_slice(col);
        }
        out
    }

    /// Get translation component (the fourth column)
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }
}

impl Default for Mat4x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_cross() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);

        let z = x.cross(&y);
        assert_eq!(z, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_vec3_normalize_zero() {
        assert_eq!(Vec3::ZERO.normalize(), Vec3::ZERO);
    }

    #[test]
    fn test_mat4x3_flat_order() {
        let m = Mat4x3 {
            cols: [
                [1.0, 2.0, 3.0],
                [4.0, 5.0, 6.0],
                [7.0, 8.0, 9.0],
                [10.0, 11.0, 12.0],
            ],
        };

        let flat = m.to_flat();
        assert_eq!(flat[0..3], [1.0, 2.0, 3.0]);
        assert_eq!(flat[9..12], [10.0, 11.0, 12.0]);
        assert_eq!(m.translation(), Vec3::new(10.0, 11.0, 12.0));
    }

    #[test]
    fn test_mat4x3_identity_translation() {
        assert_eq!(Mat4x3::IDENTITY.translation(), Vec3::ZERO);
    }
}

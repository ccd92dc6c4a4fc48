//! Three-component vector algebra.
//!
//! [`Vector`] is nalgebra's `Vector3<f64>`, so the usual operators come for
//! free: `+`, `-`, `*`/`/` by a scalar, unary `-`, `+=`, `dot`, `cross`,
//! `norm`, `norm_squared`, `normalize`, `inf` and `sup`. The extra queries
//! the mesh core relies on live in [`VectorExt`].
//!
//! Normalizing a null vector is not checked anywhere: the result is NaN.

use nalgebra::Vector3;

/// A vector (or point) in three dimensions.
pub type Vector = Vector3<f64>;

/// Null vector.
pub const NULL: Vector = Vector::new(0.0, 0.0, 0.0);
/// Unit vector along the x axis.
pub const X: Vector = Vector::new(1.0, 0.0, 0.0);
/// Unit vector along the y axis.
pub const Y: Vector = Vector::new(0.0, 1.0, 0.0);
/// Unit vector along the z axis.
pub const Z: Vector = Vector::new(0.0, 0.0, 1.0);

/// Vector with all three coordinates set to `a`.
pub fn splat(a: f64) -> Vector {
    Vector::new(a, a, a)
}

/// Linear interpolation `a + t * (b - a)`.
pub fn lerp(a: &Vector, b: &Vector, t: f64) -> Vector {
    a + (b - a) * t
}

/// Bilinear interpolation between four vectors given in counter-clockwise
/// order (`a00`, `a10`, `a11`, `a01`).
pub fn bilinear(a00: &Vector, a10: &Vector, a11: &Vector, a01: &Vector, u: f64, v: f64) -> Vector {
    a00 * ((1.0 - u) * (1.0 - v)) + a01 * ((1.0 - u) * v) + a10 * (u * (1.0 - v)) + a11 * (u * v)
}

/// Geometric queries on top of nalgebra's vector type.
pub trait VectorExt {
    /// True if every coordinate is strictly lower than in `other`.
    fn all_lt(&self, other: &Self) -> bool;
    /// True if every coordinate is strictly greater than in `other`.
    fn all_gt(&self, other: &Self) -> bool;
    /// True if every coordinate is lower than or equal to `other`'s.
    fn all_le(&self, other: &Self) -> bool;
    /// True if every coordinate is greater than or equal to `other`'s.
    fn all_ge(&self, other: &Self) -> bool;

    /// Componentwise product.
    fn scaled(&self, other: &Self) -> Self;
    /// Componentwise reciprocal.
    fn inverse(&self) -> Self;

    /// A vector orthogonal to `self`.
    ///
    /// The two coordinates with the largest magnitude are swapped and one
    /// of them negated, the third is zeroed. The choice is deterministic
    /// and never relies on a near-zero pair.
    fn orthogonal(&self) -> Self;

    /// Two vectors `(x, y)` such that `(x, y, self / |self|)` is a
    /// right-handed orthonormal basis. `self` must not be null.
    fn orthonormal(&self) -> (Self, Self)
    where
        Self: Sized;
}

impl VectorExt for Vector {
    fn all_lt(&self, other: &Self) -> bool {
        self.x < other.x && self.y < other.y && self.z < other.z
    }

    fn all_gt(&self, other: &Self) -> bool {
        self.x > other.x && self.y > other.y && self.z > other.z
    }

    fn all_le(&self, other: &Self) -> bool {
        self.x <= other.x && self.y <= other.y && self.z <= other.z
    }

    fn all_ge(&self, other: &Self) -> bool {
        self.x >= other.x && self.y >= other.y && self.z >= other.z
    }

    fn scaled(&self, other: &Self) -> Self {
        self.component_mul(other)
    }

    fn inverse(&self) -> Self {
        self.map(|c| 1.0 / c)
    }

    fn orthogonal(&self) -> Self {
        let a = self.abs();
        let (i, j) = if a.x > a.y {
            if a.z > a.y {
                (0, 2)
            } else {
                (0, 1)
            }
        } else if a.x > a.z {
            (1, 0)
        } else {
            (1, 2)
        };

        let mut o = NULL;
        o[i] = self[j];
        o[j] = -self[i];
        o
    }

    fn orthonormal(&self) -> (Self, Self) {
        let x = self.orthogonal().normalize();
        let y = self.cross(&x).normalize();
        (x, y)
    }
}

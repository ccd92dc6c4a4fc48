//! Axis-aligned bounding boxes.

use std::fmt;

use crate::vector::{self, Vector, VectorExt};

/// An axis-aligned box stored as its lower and upper corners.
///
/// Constructors taking raw corners trust the caller: `lo` should be lower
/// than `hi` on every axis. Only [`BoundingBox::from_points`] orders the
/// coordinates itself. Equality is exact, without tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    lo: Vector,
    hi: Vector,
}

impl BoundingBox {
    /// Tolerance for callers comparing box geometry; equality ignores it.
    pub const EPSILON: f64 = 1.0e-5;

    /// Degenerate box reduced to the origin.
    pub const NULL: BoundingBox = BoundingBox {
        lo: vector::NULL,
        hi: vector::NULL,
    };

    /// Corner indices of the twelve edges, two per edge, grouped by axis.
    pub const EDGES: [usize; 24] = [
        0, 1, 2, 3, 4, 5, 6, 7, //
        0, 2, 1, 3, 4, 6, 5, 7, //
        0, 4, 1, 5, 2, 6, 3, 7,
    ];

    /// Outward face normals: -x, -y, -z, +x, +y, +z.
    pub const NORMALS: [Vector; 6] = [
        Vector::new(-1.0, 0.0, 0.0),
        Vector::new(0.0, -1.0, 0.0),
        Vector::new(0.0, 0.0, -1.0),
        Vector::new(1.0, 0.0, 0.0),
        Vector::new(0.0, 1.0, 0.0),
        Vector::new(0.0, 0.0, 1.0),
    ];

    /// Create a box from two opposite corners, `lo <= hi` assumed.
    pub fn new(lo: Vector, hi: Vector) -> Self {
        Self { lo, hi }
    }

    /// Cube centered at the origin with half side length `r`.
    pub fn cube(r: f64) -> Self {
        Self::centered(vector::NULL, r)
    }

    /// Cube centered at `c` with half side length `r`.
    pub fn centered(c: Vector, r: f64) -> Self {
        let r = vector::splat(r);
        Self {
            lo: c - r,
            hi: c + r,
        }
    }

    /// Tight box of a point set. An empty set yields [`BoundingBox::NULL`].
    pub fn from_points(points: &[Vector]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::NULL;
        };

        rest.iter().fold(Self::new(*first, *first), |mut bb, p| {
            bb.extend(p);
            bb
        })
    }

    /// Smallest box enclosing both boxes.
    pub fn union(a: &Self, b: &Self) -> Self {
        Self {
            lo: a.lo.inf(&b.lo),
            hi: a.hi.sup(&b.hi),
        }
    }

    /// Overlap of two boxes; invalid (`lo > hi` somewhere) if they are disjoint.
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            lo: self.lo.sup(&other.lo),
            hi: self.hi.inf(&other.hi),
        }
    }

    pub fn lo(&self) -> Vector {
        self.lo
    }

    pub fn hi(&self) -> Vector {
        self.hi
    }

    /// Lower corner for `i == 0`, upper corner otherwise.
    pub fn corner(&self, i: usize) -> Vector {
        if i == 0 {
            self.lo
        } else {
            self.hi
        }
    }

    pub fn center(&self) -> Vector {
        (self.lo + self.hi) * 0.5
    }

    pub fn diagonal(&self) -> Vector {
        self.hi - self.lo
    }

    /// Width, length and height; same as [`BoundingBox::diagonal`].
    pub fn size(&self) -> Vector {
        self.hi - self.lo
    }

    /// Half the length of the diagonal.
    pub fn radius(&self) -> f64 {
        0.5 * self.diagonal().norm()
    }

    pub fn volume(&self) -> f64 {
        let side = self.size();
        side.x * side.y * side.z
    }

    /// Surface area.
    pub fn area(&self) -> f64 {
        let side = self.size();
        2.0 * (side.x * side.y + side.x * side.z + side.y * side.z)
    }

    /// The k-th corner: bits 0, 1 and 2 of `k` select the upper coordinate
    /// on x, y and z respectively.
    pub fn vertex(&self, k: usize) -> Vector {
        Vector::new(
            if k & 1 != 0 { self.hi.x } else { self.lo.x },
            if k & 2 != 0 { self.hi.y } else { self.lo.y },
            if k & 4 != 0 { self.hi.z } else { self.lo.z },
        )
    }

    /// End points of the i-th edge, `i` in `[0, 12)`.
    pub fn edge(&self, i: usize) -> (Vector, Vector) {
        (
            self.vertex(Self::EDGES[2 * i]),
            self.vertex(Self::EDGES[2 * i + 1]),
        )
    }

    /// Sub-box in octant `n`, split at the center. Bits of `n` select the
    /// upper half on each axis, as in [`BoundingBox::vertex`].
    pub fn sub(&self, n: usize) -> Self {
        let c = self.center();
        Self {
            lo: Vector::new(
                if n & 1 != 0 { c.x } else { self.lo.x },
                if n & 2 != 0 { c.y } else { self.lo.y },
                if n & 4 != 0 { c.z } else { self.lo.z },
            ),
            hi: Vector::new(
                if n & 1 != 0 { self.hi.x } else { c.x },
                if n & 2 != 0 { self.hi.y } else { c.y },
                if n & 4 != 0 { self.hi.z } else { c.z },
            ),
        }
    }

    /// Strict containment: a point on the boundary is outside.
    pub fn inside(&self, p: &Vector) -> bool {
        self.lo.all_lt(p) && self.hi.all_gt(p)
    }

    /// Strict containment of another box.
    pub fn inside_box(&self, other: &Self) -> bool {
        self.lo.all_lt(&other.lo) && self.hi.all_gt(&other.hi)
    }

    /// Squared distance between `p` and the box, zero inside.
    pub fn r(&self, p: &Vector) -> f64 {
        self.normal(p).norm_squared()
    }

    /// Vector from the nearest point of the box to `p`, null inside.
    pub fn normal(&self, p: &Vector) -> Vector {
        let mut n = vector::NULL;
        for i in 0..3 {
            if p[i] < self.lo[i] {
                n[i] = p[i] - self.lo[i];
            } else if p[i] > self.hi[i] {
                n[i] = p[i] - self.hi[i];
            }
        }
        n
    }

    /// Grow the box so that it contains `p`.
    pub fn extend(&mut self, p: &Vector) {
        self.lo = self.lo.inf(p);
        self.hi = self.hi.sup(p);
    }

    /// Copy grown by `r` on every side.
    pub fn extended(&self, r: f64) -> Self {
        let r = vector::splat(r);
        Self {
            lo: self.lo - r,
            hi: self.hi + r,
        }
    }

    pub fn translate(&mut self, t: &Vector) {
        self.lo += t;
        self.hi += t;
    }

    pub fn translated(&self, t: &Vector) -> Self {
        Self {
            lo: self.lo + t,
            hi: self.hi + t,
        }
    }

    /// Uniform scale about the origin. A negative factor swaps the corners
    /// so that `lo <= hi` still holds.
    pub fn scale(&mut self, s: f64) {
        self.lo *= s;
        self.hi *= s;
        if s < 0.0 {
            std::mem::swap(&mut self.lo, &mut self.hi);
        }
    }

    pub fn scaled(&self, s: f64) -> Self {
        let mut bb = *self;
        bb.scale(s);
        bb
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Box(({}, {}, {}), ({}, {}, {}))",
            self.lo.x, self.lo.y, self.lo.z, self.hi.x, self.hi.y, self.hi.z
        )
    }
}

//! Triangle primitive: geometry, shape quality and ray intersection.

use std::fmt;
use std::ops::Index;

use crate::bounding_box::BoundingBox;
use crate::ray::Ray;
use crate::vector::Vector;

/// Parameters of a ray/triangle intersection.
///
/// `t` is the signed ray parameter and may be negative: the intersection
/// test works on the supporting line, forward hits need `t >= 0`.
/// `(u, v)` are the barycentric coordinates of the hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayTriangleHit {
    pub t: f64,
    pub u: f64,
    pub v: f64,
}

/// A triangle stored as its three vertices. The normal is computed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    p: [Vector; 3],
}

impl Triangle {
    /// Determinant threshold below which a ray counts as parallel.
    pub const EPSILON: f64 = 1.0e-7;

    pub fn new(a: Vector, b: Vector, c: Vector) -> Self {
        Self { p: [a, b, c] }
    }

    pub fn vertices(&self) -> [Vector; 3] {
        self.p
    }

    /// Point `p0 + u * (p1 - p0) + v * (p2 - p0)` of the supporting plane.
    /// Not clamped to the triangle.
    pub fn point(&self, u: f64, v: f64) -> Vector {
        self.p[0] + (self.p[1] - self.p[0]) * u + (self.p[2] - self.p[0]) * v
    }

    /// Unit normal. NaN for a degenerate triangle.
    pub fn normal(&self) -> Vector {
        self.edge_cross().normalize()
    }

    /// Normal scaled by the area of the triangle.
    ///
    /// Cheaper than [`Triangle::normal`]; used as the weight of a face when
    /// averaging vertex normals.
    pub fn area_normal(&self) -> Vector {
        self.edge_cross() * 0.5
    }

    /// Barycenter.
    pub fn center(&self) -> Vector {
        (self.p[0] + self.p[1] + self.p[2]) / 3.0
    }

    pub fn area(&self) -> f64 {
        0.5 * (self.p[0] - self.p[1]).cross(&(self.p[2] - self.p[0])).norm()
    }

    /// Aspect ratio in `[0, 1]`: twice the inscribed radius over the
    /// circumscribed radius, computed from the side lengths alone.
    /// One for an equilateral triangle, tends to zero for needles.
    pub fn aspect(&self) -> f64 {
        let ab = (self.p[1] - self.p[0]).norm();
        let bc = (self.p[2] - self.p[1]).norm();
        let ca = (self.p[0] - self.p[2]).norm();

        let s = 0.5 * (ab + bc + ca);
        let u = (s - ab) * (s - bc) * (s - ca);

        8.0 * u / (ab * bc * ca)
    }

    /// Radius of the inscribed circle: twice the area over the perimeter.
    pub fn inscribed_radius(&self) -> f64 {
        let u = self.p[0] - self.p[1];
        let v = self.p[2] - self.p[0];
        let w = self.p[1] - self.p[2];
        let perimeter = u.norm() + v.norm() + w.norm();
        u.cross(&v).norm() / perimeter
    }

    /// Radius of the circumscribed circle.
    pub fn circumscribed_radius(&self) -> f64 {
        let u = (self.p[0] - self.p[1]).norm();
        let v = (self.p[1] - self.p[2]).norm();
        let w = (self.p[2] - self.p[0]).norm();
        u * v * w / ((u + v + w) * (-u + v + w) * (u - v + w) * (u + v - w)).sqrt()
    }

    /// Möller–Trumbore intersection with the default [`Triangle::EPSILON`].
    pub fn intersect(&self, ray: &Ray) -> Option<RayTriangleHit> {
        self.intersect_with_epsilon(ray, Self::EPSILON)
    }

    /// Möller–Trumbore intersection.
    ///
    /// Returns `None` when the ray is parallel to the plane (determinant
    /// within `epsilon`) or when the hit falls outside the triangle. The
    /// direction of the ray is not checked, see [`RayTriangleHit`].
    pub fn intersect_with_epsilon(&self, ray: &Ray, epsilon: f64) -> Option<RayTriangleHit> {
        let e0 = self.p[1] - self.p[0];
        let e1 = self.p[2] - self.p[0];

        let d = ray.direction();
        let pvec = d.cross(&e1);

        // Near zero: the ray lies in the plane of the triangle
        let det = e0.dot(&pvec);
        if det > -epsilon && det < epsilon {
            return None;
        }
        let inv = 1.0 / det;

        let tvec = ray.origin() - self.p[0];

        let u = tvec.dot(&pvec) * inv;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&e0);
        let v = d.dot(&qvec) * inv;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e1.dot(&qvec) * inv;
        Some(RayTriangleHit { t, u, v })
    }

    pub fn translate(&mut self, t: &Vector) {
        for p in &mut self.p {
            *p += t;
        }
    }

    /// Tight axis-aligned box.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.p[0].inf(&self.p[1]).inf(&self.p[2]),
            self.p[0].sup(&self.p[1]).sup(&self.p[2]),
        )
    }

    fn edge_cross(&self) -> Vector {
        (self.p[1] - self.p[0]).cross(&(self.p[2] - self.p[0]))
    }
}

impl Index<usize> for Triangle {
    type Output = Vector;

    fn index(&self, i: usize) -> &Vector {
        &self.p[i]
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Triangle(")?;
        for (i, p) in self.p.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {}, {})", p.x, p.y, p.z)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{X, Z};
    use approx::assert_relative_eq;

    fn right() -> Triangle {
        Triangle::new(
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(0.0, 1.0, 0.0),
        )
    }

    fn equilateral() -> Triangle {
        Triangle::new(
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(0.5, 3.0_f64.sqrt() / 2.0, 0.0),
        )
    }

    #[test]
    fn test_ray_hits_inside() {
        let ray = Ray::new(Vector::new(0.1, 0.1, -1.0), Z);
        let hit = right().intersect(&ray).expect("ray should hit");
        assert_relative_eq!(hit.t, 1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.u, 0.1, epsilon = 1e-12);
        assert_relative_eq!(hit.v, 0.1, epsilon = 1e-12);
        assert_relative_eq!(ray.at(hit.t), right().point(hit.u, hit.v), epsilon = 1e-12);
    }

    #[test]
    fn test_ray_misses_outside() {
        let ray = Ray::new(Vector::new(2.0, 2.0, -1.0), Z);
        assert!(right().intersect(&ray).is_none());

        // Outside across the hypotenuse only (u, v >= 0 but u + v > 1).
        let ray = Ray::new(Vector::new(0.6, 0.6, -1.0), Z);
        assert!(right().intersect(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vector::new(-1.0, 0.2, 0.0), X);
        assert!(right().intersect(&ray).is_none());
    }

    #[test]
    fn test_hit_behind_origin_has_negative_t() {
        let ray = Ray::new(Vector::new(0.25, 0.25, 2.0), Z);
        let hit = right().intersect(&ray).expect("line should hit");
        assert_relative_eq!(hit.t, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_epsilon() {
        // Nearly grazing ray: determinant is tiny.
        let ray = Ray::new(Vector::new(-0.7, 0.2, 1e-4), Vector::new(1.0, 0.0, -1e-4).normalize());
        assert!(right().intersect(&ray).is_some());
        assert!(right().intersect_with_epsilon(&ray, 1e-3).is_none());
    }

    #[test]
    fn test_normals() {
        assert_relative_eq!(right().normal(), Z);
        assert_relative_eq!(right().area_normal(), Z * 0.5);
        assert_relative_eq!(right().area_normal().norm(), right().area());

        let degenerate = Triangle::new(X, X, X);
        assert!(degenerate.normal().x.is_nan());
    }

    #[test]
    fn test_area_and_center() {
        assert_relative_eq!(right().area(), 0.5);
        assert_relative_eq!(right().center(), Vector::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
        assert_relative_eq!(equilateral().area(), 3.0_f64.sqrt() / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_aspect_of_known_shapes() {
        assert_relative_eq!(equilateral().aspect(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(right().aspect(), 2.0 * (2.0_f64.sqrt() - 1.0), epsilon = 1e-12);

        let needle = Triangle::new(
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(0.5, 1e-4, 0.0),
        );
        assert!(needle.aspect() < 1e-3);
    }

    #[test]
    fn test_aspect_matches_radius_ratio() {
        for t in [right(), equilateral()] {
            let ratio = 2.0 * t.inscribed_radius() / t.circumscribed_radius();
            assert_relative_eq!(t.aspect(), ratio, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_radii() {
        assert_relative_eq!(right().inscribed_radius(), 1.0 / (2.0 + 2.0_f64.sqrt()), epsilon = 1e-12);
        assert_relative_eq!(right().circumscribed_radius(), 2.0_f64.sqrt() / 2.0, epsilon = 1e-12);
        assert_relative_eq!(equilateral().circumscribed_radius(), 1.0 / 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_point_is_not_clamped() {
        assert_eq!(right().point(0.0, 0.0), right()[0]);
        assert_eq!(right().point(1.0, 0.0), right()[1]);
        assert_eq!(right().point(2.0, 2.0), Vector::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_translate_and_box() {
        let mut t = right();
        t.translate(&Vector::new(1.0, 1.0, 1.0));
        assert_eq!(t[0], Vector::new(1.0, 1.0, 1.0));

        let b = t.bounding_box();
        assert_eq!(b.lo(), Vector::new(1.0, 1.0, 1.0));
        assert_eq!(b.hi(), Vector::new(2.0, 2.0, 1.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(right().to_string(), "Triangle((0, 0, 0), (1, 0, 0), (0, 1, 0))");
    }
}

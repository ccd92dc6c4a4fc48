//! Rays for picking and intersection queries.

use std::fmt;

use crate::vector::Vector;

/// A half-line `origin + t * direction`.
///
/// The direction is expected to be unit length but this is not enforced.
/// Nothing clips `t`: callers restrict it themselves (for instance to
/// `t >= 0` for forward hits).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vector,
    direction: Vector,
}

impl Ray {
    pub fn new(origin: Vector, direction: Vector) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> Vector {
        self.origin
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> Vector {
        self.origin + self.direction * t
    }

    /// Specular reflection at `point` about a unit `normal`.
    pub fn reflect(&self, point: Vector, normal: &Vector) -> Ray {
        let d = self.direction - normal * (2.0 * self.direction.dot(normal));
        Ray::new(point, d)
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (o, d) = (self.origin, self.direction);
        write!(f, "Ray(({}, {}, {}), ({}, {}, {}))", o.x, o.y, o.z, d.x, d.y, d.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{X, Y, Z};
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluation() {
        let ray = Ray::new(Vector::new(1.0, 0.0, 0.0), Y);
        assert_eq!(ray.at(0.0), ray.origin());
        assert_eq!(ray.at(2.5), Vector::new(1.0, 2.5, 0.0));
        assert_eq!(ray.at(-1.0), Vector::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_reflect_mirrors_across_normal() {
        let d = Vector::new(1.0, -1.0, 0.0).normalize();
        let ray = Ray::new(Vector::new(-1.0, 1.0, 0.0), d);
        let hit = Vector::new(0.0, 0.0, 0.0);
        let reflected = ray.reflect(hit, &Y);

        assert_eq!(reflected.origin(), hit);
        assert_relative_eq!(reflected.direction(), Vector::new(1.0, 1.0, 0.0).normalize(), epsilon = 1e-12);
        assert_relative_eq!(reflected.direction().norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reflect_head_on() {
        let ray = Ray::new(Vector::new(0.0, 0.0, 5.0), -Z);
        let reflected = ray.reflect(Vector::new(0.0, 0.0, 0.0), &Z);
        assert_eq!(reflected.direction(), Z);

        // Grazing ray is unchanged.
        let grazing = Ray::new(Vector::new(0.0, 0.0, 0.0), X).reflect(Vector::new(3.0, 0.0, 0.0), &Z);
        assert_eq!(grazing.direction(), X);
    }

    #[test]
    fn test_display() {
        let ray = Ray::new(Vector::new(0.0, 1.0, 2.0), Z);
        assert_eq!(ray.to_string(), "Ray((0, 1, 2), (0, 0, 1))");
    }
}

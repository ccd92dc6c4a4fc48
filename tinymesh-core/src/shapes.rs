//! Analytic shapes and their tessellation into meshes.

use std::f64::consts::{PI, TAU};
use std::fmt;

use tracing::debug;

use crate::bounding_box::BoundingBox;
use crate::mesh::Mesh;
use crate::vector::{self, Vector, VectorExt};

/// Sphere given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vector,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Vector, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Vector {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::centered(self.center, self.radius)
    }
}

/// Cylinder spanning the segment `ab` with radius `r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    a: Vector,
    b: Vector,
    radius: f64,
}

impl Cylinder {
    pub fn new(a: Vector, b: Vector, radius: f64) -> Self {
        Self { a, b, radius }
    }

    /// Center of the first end disc.
    pub fn a(&self) -> Vector {
        self.a
    }

    /// Center of the second end disc.
    pub fn b(&self) -> Vector {
        self.b
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Unit axis from `a` to `b`. NaN when the end points coincide.
    pub fn axis(&self) -> Vector {
        (self.b - self.a).normalize()
    }

    pub fn height(&self) -> f64 {
        (self.b - self.a).norm()
    }

    pub fn translate(&mut self, t: &Vector) {
        self.a += t;
        self.b += t;
    }

    /// Scale about the origin. A negative factor swaps the end points.
    pub fn scale(&mut self, s: f64) {
        self.a *= s;
        self.b *= s;
        self.radius *= s.abs();

        if s < 0.0 {
            std::mem::swap(&mut self.a, &mut self.b);
        }
    }

    /// Conservative box: the box of the end points grown by the radius.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&[self.a, self.b]).extended(self.radius)
    }
}

impl fmt::Display for Cylinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = (self.a, self.b);
        write!(
            f,
            "Cylinder(({}, {}, {}), ({}, {}, {}), {})",
            a.x, a.y, a.z, b.x, b.y, b.z, self.radius
        )
    }
}

impl Mesh {
    /// UV sphere with smooth normals.
    ///
    /// `slices` is the number of meridians (at least 3), `stacks` the
    /// number of latitude bands (at least 2). Vertex `0` is the north pole
    /// (`+Z`), the last vertex the south pole. Normal `i` belongs to
    /// vertex `i`.
    pub fn sphere(sphere: &Sphere, slices: usize, stacks: usize) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);
        let rings = stacks - 1;

        let mut mesh = Self::new();
        let nv = 2 + slices * rings;
        let ni = 6 * slices * rings;
        mesh.reserve(nv, nv, ni, ni);

        let push = |mesh: &mut Self, dir: Vector| {
            mesh.push_normal(dir);
            mesh.push_vertex(sphere.center() + dir * sphere.radius())
        };

        let north = push(&mut mesh, vector::Z);
        for j in 1..stacks {
            let phi = PI * j as f64 / stacks as f64;
            for i in 0..slices {
                let theta = TAU * i as f64 / slices as f64;
                push(
                    &mut mesh,
                    Vector::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()),
                );
            }
        }
        let south = push(&mut mesh, -vector::Z);

        let ring = |j: usize, i: usize| 1 + j * slices + i % slices;

        for i in 0..slices {
            let (a, b) = (ring(0, i), ring(0, i + 1));
            mesh.add_smooth_triangle(north, north, a, a, b, b);
        }

        for j in 0..rings - 1 {
            for i in 0..slices {
                mesh.add_quadrangle(ring(j, i), ring(j + 1, i), ring(j + 1, i + 1), ring(j, i + 1));
            }
        }

        for i in 0..slices {
            let (a, b) = (ring(rings - 1, i + 1), ring(rings - 1, i));
            mesh.add_smooth_triangle(south, south, a, a, b, b);
        }

        debug!(slices, stacks, triangles = mesh.triangle_count(), "tessellated sphere");
        mesh
    }

    /// Cylinder with a smooth side and flat caps, `slices` (at least 3)
    /// segments around the axis.
    ///
    /// Vertices: the ring around `a`, the ring around `b`, then the two cap
    /// centers. Normals: one radial normal per segment, then `-axis` and
    /// `+axis`.
    pub fn cylinder(cylinder: &Cylinder, slices: usize) -> Self {
        let n = slices.max(3);
        let axis = cylinder.axis();
        let (x, y) = axis.orthonormal();

        let mut mesh = Self::new();
        mesh.reserve(2 * n + 2, n + 2, 12 * n, 12 * n);

        let radial: Vec<Vector> = (0..n)
            .map(|i| {
                let theta = TAU * i as f64 / n as f64;
                x * theta.cos() + y * theta.sin()
            })
            .collect();

        for end in [cylinder.a(), cylinder.b()] {
            for dir in &radial {
                mesh.push_vertex(end + dir * cylinder.radius());
            }
        }
        let bottom = mesh.push_vertex(cylinder.a());
        let top = mesh.push_vertex(cylinder.b());

        for dir in &radial {
            mesh.push_normal(*dir);
        }
        let down = mesh.push_normal(-axis);
        let up = mesh.push_normal(axis);

        for i in 0..n {
            let j = (i + 1) % n;
            mesh.add_smooth_quadrangle(i, i, j, j, n + j, j, n + i, i);
            mesh.add_triangle(bottom, j, i, down);
            mesh.add_triangle(top, n + i, n + j, up);
        }

        debug!(slices = n, triangles = mesh.triangle_count(), "tessellated cylinder");
        mesh
    }
}

impl From<&Sphere> for Mesh {
    fn from(sphere: &Sphere) -> Self {
        Self::sphere(sphere, 24, 12)
    }
}

impl From<&Cylinder> for Mesh {
    fn from(cylinder: &Cylinder) -> Self {
        Self::cylinder(cylinder, 24)
    }
}

//! Camera, projection and picking rays

use std::f64::consts::PI;

use nalgebra::{Matrix4, Point3, Rotation3, Unit};

use crate::bounding_box::BoundingBox;
use crate::ray::Ray;
use crate::vector::{self, Vector};

/// Closest angle, in radians, `orbit` lets the eye get to the up axis.
const MIN_POLAR: f64 = 1.0e-2;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for viewing and picking.
///
/// `fov` is the vertical field of view in radians, `aspect` the width over
/// height of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector,
    pub at: Vector,
    pub up: Vector,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Vector::new(0.0, 0.0, 5.0),
            at: vector::NULL,
            up: vector::Y,
            fov: PI / 4.0, // 45 degrees
            aspect: width as f64 / height.max(1) as f64,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&Point3::from(self.eye), &Point3::from(self.at), &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let (half_width, half_height) = self.ortho_extent();
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a world-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `(0, 0)` the top-left corner and depth in
    /// normalized device coordinates, or `None` when the point is behind the
    /// near plane or outside the viewport.
    pub fn project_to_screen(
        &self,
        point: &Vector,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let view = self.view_matrix().transform_point(&Point3::from(*point));
        if view.z > -self.near {
            return None;
        }

        let ndc = self.projection_matrix().transform_point(&view);
        if !(-1.0..=1.0).contains(&ndc.x) || !(-1.0..=1.0).contains(&ndc.y) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f64;

        Some((screen_x, screen_y, ndc.z))
    }

    /// Ray through pixel `(px, py)` of a `width` by `height` viewport.
    ///
    /// Perspective rays start at the eye; orthographic rays start on the
    /// eye plane and all share the view direction. The direction is unit
    /// length.
    pub fn pixel_to_ray(&self, px: f64, py: f64, width: u32, height: u32) -> Ray {
        let (view, horizontal, vertical) = self.basis();

        let half_w = width as f64 / 2.0;
        let half_h = height as f64 / 2.0;
        let x = (px - half_w) / half_w;
        let y = (half_h - py) / half_h;

        match self.mode {
            ProjectionMode::Perspective => {
                let v_length = (self.fov / 2.0).tan();
                let h_length = v_length * self.aspect;
                let direction =
                    (view + horizontal * (h_length * x) + vertical * (v_length * y)).normalize();
                Ray::new(self.eye, direction)
            }
            ProjectionMode::Orthographic => {
                let (half_width, half_height) = self.ortho_extent();
                let origin = self.eye + horizontal * (half_width * x) + vertical * (half_height * y);
                Ray::new(origin, view)
            }
        }
    }

    /// Rotate the eye around the target: `yaw` about the up vector, then
    /// `pitch` toward it. The eye never crosses the up axis.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        let up = Unit::new_normalize(self.up);
        let offset = Rotation3::from_axis_angle(&up, yaw) * (self.eye - self.at);

        let polar = offset.angle(up.as_ref());
        let target = (polar - pitch).clamp(MIN_POLAR, PI - MIN_POLAR);

        let offset = match Unit::try_new(up.cross(&offset), f64::EPSILON) {
            Some(side) => Rotation3::from_axis_angle(&side, target - polar) * offset,
            None => offset,
        };

        self.eye = self.at + offset;
    }

    /// Move the eye along `factor` times its distance to the target.
    pub fn zoom(&mut self, factor: f64) {
        self.eye = self.at + (self.eye - self.at) * factor;
    }

    /// Aim at the center of `b` and back off until a sphere around the box
    /// fits the field of view. The viewing direction is kept.
    pub fn frame(&mut self, b: &BoundingBox) {
        let radius = b.radius().max(f64::EPSILON);

        let half_v = self.fov / 2.0;
        let half_h = (half_v.tan() * self.aspect).atan();
        let distance = radius / half_v.min(half_h).sin();

        let mut direction = (self.eye - self.at).normalize();
        if !direction.iter().all(|c| c.is_finite()) {
            direction = vector::Z;
        }

        self.at = b.center();
        self.eye = self.at + direction * distance;
        self.far = self.far.max(distance + 2.0 * radius);
    }

    /// Unit view direction, right and true up vectors.
    fn basis(&self) -> (Vector, Vector, Vector) {
        let view = (self.at - self.eye).normalize();
        let horizontal = view.cross(&self.up).normalize();
        let vertical = horizontal.cross(&view).normalize();
        (view, horizontal, vertical)
    }

    fn ortho_extent(&self) -> (f64, f64) {
        let half_height = (self.eye - self.at).norm() / 2.0;
        (half_height * self.aspect, half_height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

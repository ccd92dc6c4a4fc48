//! ASCII rasterizer for terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use tinymesh_core::{Camera, RenderBuffers, Vector};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Lowest ramp index used for a covered cell, so unlit faces stay visible.
const MIN_SHADE: usize = 1;

/// One projected triangle corner: screen position, depth and brightness.
#[derive(Debug, Clone, Copy)]
struct Corner {
    x: f32,
    y: f32,
    depth: f32,
    light: f32,
}

/// ASCII renderer that rasterizes mesh render buffers into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    highlight_buffer: Vec<bool>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            highlight_buffer: vec![false; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate the buffers for a new terminal size.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.highlight_buffer.fill(false);
    }

    /// Character at cell `(x, y)`.
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// True if cell `(x, y)` shows the highlighted triangle.
    pub fn is_highlighted(&self, x: usize, y: usize) -> bool {
        self.highlight_buffer[y * self.width + x]
    }

    /// Rasterize every triangle of `buffers` as seen from `camera`.
    ///
    /// Shading uses a head-light: the brightness of a corner is the cosine
    /// between its normal and the direction back to the eye, interpolated
    /// across the triangle. Triangle `highlight` is flagged for drawing in
    /// a distinct colour.
    pub fn render_mesh(&mut self, buffers: &RenderBuffers, camera: &Camera, highlight: Option<usize>) {
        let light = (camera.eye - camera.at).normalize();

        for (t, tri) in buffers.indices.chunks_exact(3).enumerate() {
            let corners = [tri[0], tri[1], tri[2]]
                .map(|i| self.project_corner(buffers, i as usize, camera, &light));

            // Triangle is clipped
            let [Some(c0), Some(c1), Some(c2)] = corners else {
                continue;
            };

            self.rasterize_triangle(&[c0, c1, c2], highlight == Some(t));
        }
    }

    fn project_corner(
        &self,
        buffers: &RenderBuffers,
        i: usize,
        camera: &Camera,
        light: &Vector,
    ) -> Option<Corner> {
        let [px, py, pz] = buffers.positions[i];
        let [nx, ny, nz] = buffers.normals[i];

        let position = Vector::new(px as f64, py as f64, pz as f64);
        let (x, y, depth) =
            camera.project_to_screen(&position, self.width as u32, self.height as u32)?;

        let normal = Vector::new(nx as f64, ny as f64, nz as f64);
        Some(Corner {
            x: x as f32,
            y: y as f32,
            depth: depth as f32,
            light: normal.dot(light).max(0.0) as f32,
        })
    }

    fn rasterize_triangle(&mut self, corners: &[Corner; 3], highlighted: bool) {
        let [v0, v1, v2] = *corners;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p)
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let light = w0 * v0.light + w1 * v1.light + w2 * v2.light;
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = shade(light);
                    self.highlight_buffer[idx] = highlighted;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = if self.highlight_buffer[idx] {
                    Color::Magenta
                } else {
                    match c {
                        ' ' | '.' | ':' => Color::DarkGrey,
                        '-' | '=' => Color::Grey,
                        '+' | '*' => Color::White,
                        '#' | '%' | '@' => Color::Cyan,
                        _ => Color::White,
                    }
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a brightness in `[0, 1]` to a ramp character.
fn shade(light: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (light.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(MIN_SHADE, last)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinymesh_core::{BoundingBox, Mesh};

    fn cube_view(width: usize, height: usize) -> (RenderBuffers, Camera) {
        let mesh = Mesh::from_box(&BoundingBox::cube(1.0));
        let mut camera = Camera::new(width as u32, height as u32);
        camera.frame(&mesh.bounding_box());
        (mesh.render_buffers(), camera)
    }

    #[test]
    fn test_cube_covers_center() {
        let (buffers, camera) = cube_view(40, 20);
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_mesh(&buffers, &camera, None);

        // Front face looks straight at the head-light.
        assert_eq!(renderer.cell(18, 10), '@');
        assert_eq!(renderer.cell(0, 0), ' ');
        assert!(!renderer.is_highlighted(18, 10));
    }

    #[test]
    fn test_highlight_marks_triangle_cells() {
        let (buffers, camera) = cube_view(40, 20);
        let mut renderer = AsciiRenderer::new(40, 20);

        // Triangles 2 and 3 form the +Z face, which faces the camera.
        renderer.render_mesh(&buffers, &camera, Some(2));
        let marked = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.is_highlighted(x, y))
            .count();
        assert!(marked > 0);

        renderer.clear();
        assert_eq!(renderer.cell(18, 10), ' ');
        assert!(!renderer.is_highlighted(18, 10));
    }

    #[test]
    fn test_resize() {
        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.resize(10, 5);
        assert_eq!((renderer.width(), renderer.height()), (10, 5));
        assert_eq!(renderer.cell(9, 4), ' ');
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
    }

    #[test]
    fn test_shade_ramp() {
        assert_eq!(shade(1.0), '@');
        assert_eq!(shade(0.0), LUMINOSITY_RAMP[MIN_SHADE]);
        assert_eq!(shade(2.0), '@');
    }

    #[test]
    fn test_barycentric() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 0.5).abs() < 1e-6);
        assert!((w1 - 0.25).abs() < 1e-6);
        assert!((w2 - 0.25).abs() < 1e-6);

        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 0.0)).is_none());
    }
}

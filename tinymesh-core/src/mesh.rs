//! Indexed triangle mesh.
//!
//! Vertices and normals are indexed independently: corner `i` of the
//! flattened triangle list uses `vertices[vertex_indices[i]]` and
//! `normals[normal_indices[i]]`. A flat triangle gives its three corners
//! the same normal index, a smooth one does not.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::bounding_box::BoundingBox;
use crate::error::{MeshError, MeshResult};
use crate::obj;
use crate::ray::Ray;
use crate::triangle::Triangle;
use crate::vector::{self, Vector};

/// Nearest forward intersection of a ray with a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    /// Index of the triangle that was hit.
    pub triangle: usize,
    /// Ray parameter, never negative.
    pub t: f64,
    pub u: f64,
    pub v: f64,
}

/// Index-expanded arrays ready for a vertex buffer: one entry per triangle
/// corner, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Sequential element indices `0..positions.len()`.
    pub indices: Vec<u32>,
}

impl RenderBuffers {
    /// Number of triangles described by the buffers.
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// A triangle mesh with separately indexed vertices and normals.
///
/// Both index arrays have the same length, a multiple of three, and every
/// index is in range of its target array. The builders keep these
/// invariants; indices handed to [`Mesh::from_parts`] are trusted, use
/// [`Mesh::validate`] to check them.
///
/// Accessors return copies ([`Triangle`], [`Vector`], the `to_*` arrays) or
/// borrowed slices; nothing hands out a live reference that outlives a
/// mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vector>,
    normals: Vec<Vector>,
    vertex_indices: Vec<usize>,
    normal_indices: Vec<usize>,
}

impl Mesh {
    /// Empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh from vertices and triangle indices. Every vertex gets its own
    /// `+Z` normal, referenced with the vertex's own index.
    pub fn from_vertices(vertices: Vec<Vector>, indices: Vec<usize>) -> Self {
        let normals = vec![vector::Z; vertices.len()];
        Self {
            vertices,
            normals,
            normal_indices: indices.clone(),
            vertex_indices: indices,
        }
    }

    /// Mesh from all four arrays, taken as they are.
    pub fn from_parts(
        vertices: Vec<Vector>,
        normals: Vec<Vector>,
        vertex_indices: Vec<usize>,
        normal_indices: Vec<usize>,
    ) -> Self {
        Self {
            vertices,
            normals,
            vertex_indices,
            normal_indices,
        }
    }

    /// Faceted box: 8 corner vertices, 6 face normals, 12 flat triangles.
    pub fn from_box(b: &BoundingBox) -> Self {
        let mut mesh = Self::new();
        mesh.reserve(8, 6, 36, 36);

        mesh.vertices.extend((0..8).map(|k| b.vertex(k)));
        mesh.normals.extend([
            Vector::new(-1.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(0.0, -1.0, 0.0),
            Vector::new(0.0, 1.0, 0.0),
            Vector::new(0.0, 0.0, -1.0),
            Vector::new(0.0, 0.0, 1.0),
        ]);

        mesh.add_triangle(0, 2, 1, 4);
        mesh.add_triangle(1, 2, 3, 4);

        mesh.add_triangle(4, 5, 6, 5);
        mesh.add_triangle(5, 7, 6, 5);

        mesh.add_triangle(0, 4, 2, 0);
        mesh.add_triangle(4, 6, 2, 0);

        mesh.add_triangle(1, 3, 5, 1);
        mesh.add_triangle(3, 7, 5, 1);

        mesh.add_triangle(0, 1, 5, 2);
        mesh.add_triangle(0, 5, 4, 2);

        mesh.add_triangle(3, 2, 7, 3);
        mesh.add_triangle(6, 7, 2, 3);

        mesh
    }

    /// Import an OBJ file, surfacing I/O failures.
    ///
    /// Bytes that are not valid UTF-8 are replaced before parsing, so a stray
    /// Latin-1 comment or group name only affects its own line.
    pub fn read_obj(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| MeshError::read(path, e))?;
        let mesh = obj::parse(&String::from_utf8_lossy(&bytes));
        debug!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "loaded OBJ"
        );
        Ok(mesh)
    }

    /// Replace the mesh with the contents of an OBJ file.
    ///
    /// The previous contents are dropped first, so a file that cannot be
    /// read leaves an empty mesh; the failure is only logged. Use
    /// [`Mesh::read_obj`] to get the error.
    pub fn load(&mut self, path: impl AsRef<Path>) {
        *self = Self::new();
        match Self::read_obj(path) {
            Ok(mesh) => *self = mesh,
            Err(err) => warn!(error = %err, "OBJ import skipped"),
        }
    }

    /// Export as OBJ with group name `name`, surfacing I/O failures.
    pub fn write_obj(&self, path: impl AsRef<Path>, name: &str) -> MeshResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| MeshError::write(path, e))?;
        let mut writer = BufWriter::new(file);
        obj::write(&mut writer, self, name)
            .and_then(|()| writer.flush())
            .map_err(|e| MeshError::write(path, e))?;
        debug!(path = %path.display(), triangles = self.triangle_count(), "saved OBJ");
        Ok(())
    }

    /// Export as OBJ, ignoring failures beyond logging them.
    pub fn save_obj(&self, path: impl AsRef<Path>, name: &str) {
        if let Err(err) = self.write_obj(path, name) {
            warn!(error = %err, "OBJ export skipped");
        }
    }

    /// Reserve room for vertices, normals, vertex indices and normal indices.
    pub fn reserve(&mut self, nv: usize, nn: usize, nvi: usize, nni: usize) {
        self.vertices.reserve(nv);
        self.normals.reserve(nn);
        self.vertex_indices.reserve(nvi);
        self.normal_indices.reserve(nni);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_indices.is_empty()
    }

    pub fn vertex(&self, i: usize) -> Vector {
        self.vertices[i]
    }

    pub fn normal(&self, i: usize) -> Vector {
        self.normals[i]
    }

    /// Vertex `k` (0, 1 or 2) of triangle `t`.
    pub fn corner(&self, t: usize, k: usize) -> Vector {
        self.vertices[self.vertex_indices[t * 3 + k]]
    }

    pub fn vertex_index(&self, t: usize, k: usize) -> usize {
        self.vertex_indices[t * 3 + k]
    }

    pub fn normal_index(&self, t: usize, k: usize) -> usize {
        self.normal_indices[t * 3 + k]
    }

    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector] {
        &self.normals
    }

    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    pub fn normal_indices(&self) -> &[usize] {
        &self.normal_indices
    }

    /// Owned copy of the vertex array.
    pub fn to_vertices(&self) -> Vec<Vector> {
        self.vertices.to_vec()
    }

    /// Owned copy of the normal array.
    pub fn to_normals(&self) -> Vec<Vector> {
        self.normals.to_vec()
    }

    pub fn to_vertex_indices(&self) -> Vec<usize> {
        self.vertex_indices.to_vec()
    }

    pub fn to_normal_indices(&self) -> Vec<usize> {
        self.normal_indices.to_vec()
    }

    /// Copy of triangle `i`. Changing it does not affect the mesh.
    pub fn triangle(&self, i: usize) -> Triangle {
        Triangle::new(self.corner(i, 0), self.corner(i, 1), self.corner(i, 2))
    }

    /// Copies of all triangles, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |i| self.triangle(i))
    }

    /// True if the corners of triangle `i` do not all share one normal
    /// index. Normal values are not compared.
    pub fn is_smooth(&self, i: usize) -> bool {
        let n = &self.normal_indices[i * 3..i * 3 + 3];
        !(n[0] == n[1] && n[0] == n[2])
    }

    /// Tight box of all vertices, referenced or not. An empty mesh yields
    /// [`BoundingBox::NULL`].
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Ray-parity point containment.
    ///
    /// Casts a ray along `+X` and counts forward crossings. Only meaningful
    /// for closed meshes; a ray through an edge or a vertex is counted once
    /// per triangle it touches.
    pub fn inside(&self, p: &Vector) -> bool {
        let ray = Ray::new(*p, vector::X);
        self.triangles()
            .filter_map(|tri| tri.intersect(&ray))
            .filter(|hit| hit.t >= 0.0)
            .count()
            % 2
            == 1
    }

    /// Nearest forward hit of `ray` among all triangles.
    pub fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        self.triangles()
            .enumerate()
            .filter_map(|(i, tri)| {
                tri.intersect(ray).filter(|hit| hit.t >= 0.0).map(|hit| MeshHit {
                    triangle: i,
                    t: hit.t,
                    u: hit.u,
                    v: hit.v,
                })
            })
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    pub fn translate(&mut self, t: &Vector) {
        for v in &mut self.vertices {
            *v += t;
        }
    }

    /// Scale all vertices by `s`. A negative factor also negates the
    /// normals; triangle winding is left as it is.
    pub fn scale(&mut self, s: f64) {
        for v in &mut self.vertices {
            *v *= s;
        }

        if s < 0.0 {
            for n in &mut self.normals {
                *n = -*n;
            }
        }
    }

    /// Replace the normals with area-weighted vertex normals.
    ///
    /// Afterwards there is one normal per vertex and the normal indices
    /// equal the vertex indices. A vertex no triangle contributes to ends
    /// up with a NaN normal.
    pub fn smooth_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.vertices.len(), vector::NULL);
        self.normal_indices.clone_from(&self.vertex_indices);

        for tri in self.vertex_indices.chunks_exact(3) {
            let n = Triangle::new(
                self.vertices[tri[0]],
                self.vertices[tri[1]],
                self.vertices[tri[2]],
            )
            .area_normal();
            for &i in tri {
                self.normals[i] += n;
            }
        }

        for n in &mut self.normals {
            *n = n.normalize();
        }

        debug!(
            vertices = self.vertices.len(),
            triangles = self.triangle_count(),
            "smoothed normals"
        );
    }

    /// Check that the index arrays are paired, hold whole triangles and
    /// stay in range.
    pub fn validate(&self) -> MeshResult<()> {
        if self.vertex_indices.len() != self.normal_indices.len() {
            return Err(MeshError::UnpairedIndices {
                vertex: self.vertex_indices.len(),
                normal: self.normal_indices.len(),
            });
        }
        if self.vertex_indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(self.vertex_indices.len()));
        }

        for (corner, (&vi, &ni)) in self
            .vertex_indices
            .iter()
            .zip(&self.normal_indices)
            .enumerate()
        {
            if vi >= self.vertices.len() {
                return Err(MeshError::VertexIndexOutOfRange {
                    corner,
                    index: vi,
                    len: self.vertices.len(),
                });
            }
            if ni >= self.normals.len() {
                return Err(MeshError::NormalIndexOutOfRange {
                    corner,
                    index: ni,
                    len: self.normals.len(),
                });
            }
        }
        Ok(())
    }

    /// Expand the indexed arrays into per-corner buffers.
    pub fn render_buffers(&self) -> RenderBuffers {
        let to_f32 = |v: &Vector| [v.x as f32, v.y as f32, v.z as f32];

        let positions = self
            .vertex_indices
            .iter()
            .map(|&i| to_f32(&self.vertices[i]))
            .collect::<Vec<_>>();
        let normals = self
            .normal_indices
            .iter()
            .map(|&i| to_f32(&self.normals[i]))
            .collect();
        let indices = (0..positions.len() as u32).collect();

        RenderBuffers {
            positions,
            normals,
            indices,
        }
    }

    /// Append a flat triangle: all three corners use normal `n`.
    pub(crate) fn add_triangle(&mut self, a: usize, b: usize, c: usize, n: usize) {
        self.add_smooth_triangle(a, n, b, n, c, n);
    }

    /// Append a triangle with one normal index per corner.
    pub(crate) fn add_smooth_triangle(
        &mut self,
        a: usize,
        na: usize,
        b: usize,
        nb: usize,
        c: usize,
        nc: usize,
    ) {
        self.vertex_indices.extend([a, b, c]);
        self.normal_indices.extend([na, nb, nc]);
    }

    /// Append the quadrangle `abcd` as triangles `abc` and `acd`, each
    /// vertex index doubling as its normal index.
    pub(crate) fn add_quadrangle(&mut self, a: usize, b: usize, c: usize, d: usize) {
        self.add_smooth_quadrangle(a, a, b, b, c, c, d, d);
    }

    /// Append the quadrangle `abcd` as smooth triangles `abc` and `acd`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn add_smooth_quadrangle(
        &mut self,
        a: usize,
        na: usize,
        b: usize,
        nb: usize,
        c: usize,
        nc: usize,
        d: usize,
        nd: usize,
    ) {
        self.add_smooth_triangle(a, na, b, nb, c, nc);
        self.add_smooth_triangle(a, na, c, nc, d, nd);
    }

    /// Append a vertex, returning its index.
    pub(crate) fn push_vertex(&mut self, p: Vector) -> usize {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    /// Append a normal, returning its index.
    pub(crate) fn push_normal(&mut self, n: Vector) -> usize {
        self.normals.push(n);
        self.normals.len() - 1
    }
}

impl From<&BoundingBox> for Mesh {
    fn from(b: &BoundingBox) -> Self {
        Self::from_box(b)
    }
}

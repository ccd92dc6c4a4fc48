//! Error types for mesh I/O and validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors surfaced by the `Result` flavours of mesh I/O and by
/// [`Mesh::validate`](crate::Mesh::validate).
///
/// Geometric preconditions (null normals, parallel rays) are not errors:
/// they produce NaN or `None`.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The OBJ file could not be opened or read.
    #[error("failed to read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OBJ file could not be created or written.
    #[error("failed to write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Vertex and normal index arrays are not paired.
    #[error("index arrays are not paired: {vertex} vertex indices, {normal} normal indices")]
    UnpairedIndices { vertex: usize, normal: usize },

    /// The index arrays do not describe whole triangles.
    #[error("index array length {0} is not a multiple of three")]
    IncompleteTriangle(usize),

    /// A vertex index points past the vertex array.
    #[error("vertex index {index} at corner {corner} is out of range ({len} vertices)")]
    VertexIndexOutOfRange { corner: usize, index: usize, len: usize },

    /// A normal index points past the normal array.
    #[error("normal index {index} at corner {corner} is out of range ({len} normals)")]
    NormalIndexOutOfRange { corner: usize, index: usize, len: usize },
}

impl MeshError {
    /// Create a read error for `path`.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for `path`.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

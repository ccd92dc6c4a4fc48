//! TinyMesh Core Library - Geometry primitives and triangle meshes
//!
//! This library provides the stateless core of the viewer: vector algebra,
//! boxes, rays, triangles, indexed meshes with OBJ import/export, shape
//! tessellation, and the camera used for projection and picking.

pub mod bounding_box;
pub mod camera;
pub mod error;
pub mod mesh;
pub mod obj;
pub mod ray;
pub mod shapes;
pub mod triangle;
pub mod vector;

// Re-export commonly used types
pub use bounding_box::BoundingBox;
pub use camera::{Camera, ProjectionMode};
pub use error::{MeshError, MeshResult};
pub use mesh::{Mesh, MeshHit, RenderBuffers};
pub use ray::Ray;
pub use shapes::{Cylinder, Sphere};
pub use triangle::{RayTriangleHit, Triangle};
pub use vector::{Vector, VectorExt};

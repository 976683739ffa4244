//! Half-edge mesh connectivity and quadric error metric primitives.
//!
//! This is the connectivity and geometry core of a triangle-mesh
//! decimator: it holds vertex positions/normals and a half-edge topology,
//! and exposes edge collapse, vertex-fan iteration, compaction, and normal
//! recomputation. It has no notion of decimation policy -- that lives in
//! the `decimate` crate built on top of it.

pub mod half_edge;
pub mod quadric;
pub mod soup;

pub use half_edge::{EdgeFan, Face, HalfEdge, HalfEdgeMesh, MeshError, MeshIndex, Vertex, BOUNDARY_PENALTY};
pub use quadric::{Quadric, SymMat3, SINGULARITY_THRESHOLD};
pub use soup::{ExportedMesh, TriangleSoup};

#[cfg(any(test, feature = "testing"))]
pub mod test_fixtures;

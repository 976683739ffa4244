//! Type definitions for the half-edge mesh data structure.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Index into the mesh's vertex, half-edge, or face arrays.
///
/// All three index spaces share this one type, following the sentinel
/// convention used throughout the connectivity algorithms: a half-edge's
/// `face` is compared against [`MeshIndex::INVALID`] to test for a mesh
/// boundary, a vertex's `edge` against it to test for a deleted vertex, and
/// so on. Indices are dense positions into the mesh's arrays and are only
/// stable between calls to [`crate::HalfEdgeMesh::cleanup_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshIndex(pub u32);

impl MeshIndex {
    /// Sentinel marking the absence of a reference.
    pub const INVALID: MeshIndex = MeshIndex(u32::MAX);

    /// `true` unless this is the [`MeshIndex::INVALID`] sentinel.
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl Default for MeshIndex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Display for MeshIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "INVALID")
        }
    }
}

/// A directed half-edge.
///
/// Boundary half-edges have `face == MeshIndex::INVALID` and
/// `next == prev == MeshIndex::INVALID`; every other field is always valid.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// Vertex this half-edge originates from.
    pub from: MeshIndex,
    /// Face bordered by this half-edge, or `INVALID` on a boundary.
    pub face: MeshIndex,
    /// The other half-edge of this edge, always valid.
    pub opposite: MeshIndex,
    /// Next half-edge walking CCW around `face`.
    pub next: MeshIndex,
    /// Previous half-edge walking CW around `face`.
    pub prev: MeshIndex,
}

impl HalfEdge {
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }

    pub(crate) fn is_deleted(&self) -> bool {
        !self.from.is_valid()
    }
}

/// A triangular face, referenced by one of its three bordering half-edges.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub edge: MeshIndex,
}

impl Face {
    pub(crate) fn is_deleted(&self) -> bool {
        !self.edge.is_valid()
    }
}

/// A vertex: position, normal, and one outgoing half-edge.
///
/// If the vertex lies on a mesh boundary, `edge` MUST reference the
/// boundary half-edge (the one with `face == INVALID`) originating at this
/// vertex, never an interior one.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub edge: MeshIndex,
}

impl Vertex {
    pub(crate) fn is_deleted(&self) -> bool {
        !self.edge.is_valid()
    }
}

/// Errors from constructing, mutating, or validating a half-edge mesh.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("index buffer length {0} is not a multiple of 3")]
    MalformedIndexBuffer(usize),

    #[error("directed edge {0} -> {1} appears twice; input is not a manifold soup")]
    DuplicateDirectedEdge(MeshIndex, MeshIndex),

    #[error("invalid mesh topology: {0}")]
    InvalidTopology(String),

    #[error("edge fan starting at {start} exceeded {limit} iterations; topology is corrupted")]
    FanIterationOverflow { start: MeshIndex, limit: u32 },
}

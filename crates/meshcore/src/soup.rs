//! Import/export boundary types.
//!
//! These are the only shapes that cross into or out of a
//! [`crate::HalfEdgeMesh`] -- a flat triangle soup in, the same data plus a
//! name and material index back out after decimation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A raw, un-indexed-by-topology triangle mesh, as handed to
/// [`crate::HalfEdgeMesh::from_triangle_soup`].
///
/// `indices` is a flat buffer of vertex indices, three per triangle;
/// `positions` and `normals` are parallel arrays indexed by those values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleSoup {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriangleSoup {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// The exported form of a mesh after decimation: the same flat soup shape,
/// plus the name and material index carried through from the original
/// import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedMesh {
    pub name: String,
    pub material_index: u32,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

//! Half-edge mesh data structure: connectivity queries and mutation
//! (collapse, compaction) on top of a plain vertex/half-edge/face soup.

mod construction;
mod contract;
mod export;
mod fan;
mod modification;
mod quadrics;
mod topology;
mod types;
mod validation;

pub use quadrics::BOUNDARY_PENALTY;

pub use fan::EdgeFan;
pub use types::{Face, HalfEdge, MeshError, MeshIndex, Vertex};

use crate::soup::TriangleSoup;

/// A triangle mesh with explicit half-edge connectivity.
///
/// Arrays are append-only between calls to [`HalfEdgeMesh::cleanup_data`]:
/// `collapse_edge` invalidates entries (by setting their index fields to
/// [`MeshIndex::INVALID`]) rather than removing them, so indices handed out
/// before a collapse remain valid pointers into the (possibly now-deleted)
/// record. `cleanup_data` compacts the arrays and is the only point at
/// which indices are renumbered.
///
/// There is deliberately no persisted vertex-pair -> half-edge map: such a
/// map goes stale the moment `collapse_edge` reparents a fan, so
/// `connecting_edge` always resolves by walking the smaller of the two
/// fans instead.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,

    pub(crate) live_vertex_count: usize,
    pub(crate) live_half_edge_count: usize,
    pub(crate) live_face_count: usize,

    /// Counts as they stood immediately after construction, before any
    /// decimation. `reset()` always returns the live counts to these.
    pub(crate) imported_vertex_count: usize,
    pub(crate) imported_half_edge_count: usize,
    pub(crate) imported_face_count: usize,

    /// The soup this mesh was built from, kept so [`HalfEdgeMesh::reset`]
    /// can rebuild from scratch.
    pub(crate) source: TriangleSoup,
    pub(crate) material_index: u32,
}

impl HalfEdgeMesh {
    /// Number of vertices not yet deleted by a collapse.
    pub fn vertex_count(&self) -> usize {
        self.live_vertex_count
    }

    /// Number of faces not yet deleted by a collapse.
    pub fn face_count(&self) -> usize {
        self.live_face_count
    }

    /// Number of undirected edges (`half_edge_count() / 2`).
    pub fn edge_count(&self) -> usize {
        self.live_half_edge_count / 2
    }

    /// Number of live half-edges, always even.
    pub fn half_edge_count(&self) -> usize {
        self.live_half_edge_count
    }

    pub fn material_index(&self) -> u32 {
        self.material_index
    }

    pub fn set_material_index(&mut self, material_index: u32) {
        self.material_index = material_index;
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    /// Vertex count immediately after construction, before any collapse.
    pub fn imported_vertex_count(&self) -> usize {
        self.imported_vertex_count
    }

    /// Half-edge count immediately after construction, before any collapse.
    pub fn imported_half_edge_count(&self) -> usize {
        self.imported_half_edge_count
    }

    /// Face count immediately after construction, before any collapse.
    pub fn imported_face_count(&self) -> usize {
        self.imported_face_count
    }

    pub fn vertex(&self, id: MeshIndex) -> Option<&Vertex> {
        self.vertices.get(id.idx())
    }

    pub fn vertex_mut(&mut self, id: MeshIndex) -> Option<&mut Vertex> {
        self.vertices.get_mut(id.idx())
    }

    pub fn half_edge(&self, id: MeshIndex) -> Option<&HalfEdge> {
        self.half_edges.get(id.idx())
    }

    pub fn half_edge_mut(&mut self, id: MeshIndex) -> Option<&mut HalfEdge> {
        self.half_edges.get_mut(id.idx())
    }

    pub fn face(&self, id: MeshIndex) -> Option<&Face> {
        self.faces.get(id.idx())
    }

    pub fn face_mut(&mut self, id: MeshIndex) -> Option<&mut Face> {
        self.faces.get_mut(id.idx())
    }

    /// All vertex slots, including deleted ones. Prefer
    /// [`HalfEdgeMesh::live_vertices`] when iterating for decimation or
    /// export.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Iterate over `(index, vertex)` for vertices not deleted by a
    /// collapse.
    pub fn live_vertices(&self) -> impl Iterator<Item = (MeshIndex, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_deleted())
            .map(|(i, v)| (MeshIndex(i as u32), v))
    }

    /// Iterate over `(index, face)` for faces not deleted by a collapse.
    pub fn live_faces(&self) -> impl Iterator<Item = (MeshIndex, &Face)> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_deleted())
            .map(|(i, f)| (MeshIndex(i as u32), f))
    }

    /// The three vertices of a face, in winding order.
    pub fn face_vertices(&self, face: MeshIndex) -> Option<[MeshIndex; 3]> {
        let f = self.face(face)?;
        let e0 = f.edge;
        let e1 = self.half_edge(e0)?.next;
        let e2 = self.half_edge(e1)?.next;
        Some([
            self.half_edge(e0)?.from,
            self.half_edge(e1)?.from,
            self.half_edge(e2)?.from,
        ])
    }
}

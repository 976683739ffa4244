//! Edge collapse, compaction, and normal recomputation.

use glam::Vec3;

use super::types::MeshError;
use super::{HalfEdgeMesh, MeshIndex};

impl HalfEdgeMesh {
    /// Contract `e = (v0 -> v1)`, merging `v1` into `v0` at `new_pos` and
    /// removing the (up to two) incident triangles.
    ///
    /// The caller must have established contractability via
    /// `is_pair_contractable` first -- this performs no topological checks
    /// of its own, per the contract of `collapseEdge` it's grounded on.
    /// Returns the number of faces removed (0, 1, or 2).
    pub fn collapse_edge(&mut self, e: MeshIndex, new_pos: Vec3) -> Result<u32, MeshError> {
        let v0 = self.half_edge(e).expect("valid half-edge").from;
        let v1 = self.destination(e);

        let new_anchor = self.select_new_anchor(v0, e);

        self.vertices[v0.idx()].edge = new_anchor;
        self.vertices[v0.idx()].position = new_pos;

        let v1_anchor = self.vertex(v1).expect("valid vertex").edge;
        if v1_anchor.is_valid() {
            for he in self.edge_fan_vec(v1_anchor)? {
                self.half_edges[he.idx()].from = v0;
            }
        }

        let opposite_e = self.half_edge(e).expect("valid half-edge").opposite;
        let mut removed = 0u32;
        if self.collapse_triangle_on(e) {
            removed += 1;
        }
        if self.collapse_triangle_on(opposite_e) {
            removed += 1;
        }

        self.vertices[v1.idx()].edge = MeshIndex::INVALID;
        self.live_vertex_count -= 1;

        Ok(removed)
    }

    /// The anchor-reassignment ladder from the collapse algorithm, applied
    /// before anything about `v0`'s connectivity changes.
    fn select_new_anchor(&self, v0: MeshIndex, e: MeshIndex) -> MeshIndex {
        let v1 = self.destination(e);
        let v0_boundary = self.is_boundary_vertex(v0);
        let v1_boundary = self.is_boundary_vertex(v1);
        let v0_edge = self.vertex(v0).expect("valid vertex").edge;
        let v1_edge = self.vertex(v1).expect("valid vertex").edge;
        let he = self.half_edge(e).expect("valid half-edge");

        if !v0_boundary && v1_boundary {
            return v1_edge;
        }

        if v0_edge == e {
            return if he.is_boundary() {
                v1_edge
            } else {
                self.half_edge(he.prev).expect("valid prev").opposite
            };
        }

        let opposite = self.half_edge(he.opposite).expect("valid opposite");
        if !opposite.is_boundary() && v0_edge == opposite.next {
            let anchor_opposite = self.half_edge(v0_edge).expect("valid anchor").opposite;
            return self.half_edge(anchor_opposite).expect("valid anchor opposite").next;
        }

        v0_edge
    }

    /// If `x` borders a live face, stitch the two outer edges of that
    /// triangle together and invalidate it. Returns whether a face was
    /// removed.
    fn collapse_triangle_on(&mut self, x: MeshIndex) -> bool {
        let he_x = *self.half_edge(x).expect("valid half-edge");
        if he_x.is_boundary() {
            return false;
        }

        let pe = he_x.prev;
        let ne = he_x.next;
        let peo = self.half_edge(pe).expect("valid prev").opposite;
        let neo = self.half_edge(ne).expect("valid next").opposite;
        let from_pe = self.half_edge(pe).expect("valid prev").from;

        self.half_edges[peo.idx()].opposite = neo;
        self.half_edges[neo.idx()].opposite = peo;

        if self.vertex(from_pe).expect("valid vertex").edge == pe {
            self.vertices[from_pe.idx()].edge = neo;
        }

        self.faces[he_x.face.idx()].edge = MeshIndex::INVALID;
        self.invalidate_half_edge(x);
        self.invalidate_half_edge(pe);
        self.invalidate_half_edge(ne);

        self.live_face_count -= 1;
        self.live_half_edge_count -= 3;
        true
    }

    fn invalidate_half_edge(&mut self, idx: MeshIndex) {
        let he = &mut self.half_edges[idx.idx()];
        he.from = MeshIndex::INVALID;
        he.face = MeshIndex::INVALID;
        he.opposite = MeshIndex::INVALID;
        he.next = MeshIndex::INVALID;
        he.prev = MeshIndex::INVALID;
    }

    /// Compact vertices, half-edges, and faces, dropping every entry
    /// invalidated since the last compaction and fixing up every
    /// cross-reference accordingly. Indices are renumbered; any index held
    /// from before this call is no longer valid.
    pub fn cleanup_data(&mut self) {
        let vertex_map = Self::compaction_map(self.vertices.iter().map(|v| !v.is_deleted()));
        let half_edge_map = Self::compaction_map(self.half_edges.iter().map(|h| !h.is_deleted()));
        let face_map = Self::compaction_map(self.faces.iter().map(|f| !f.is_deleted()));

        self.vertices = self
            .vertices
            .iter()
            .zip(vertex_map.iter())
            .filter_map(|(v, m)| m.map(|_| *v))
            .map(|mut v| {
                v.edge = Self::remap(half_edge_map.as_slice(), v.edge);
                v
            })
            .collect();

        self.faces = self
            .faces
            .iter()
            .zip(face_map.iter())
            .filter_map(|(f, m)| m.map(|_| *f))
            .map(|mut f| {
                f.edge = Self::remap(half_edge_map.as_slice(), f.edge);
                f
            })
            .collect();

        self.half_edges = self
            .half_edges
            .iter()
            .zip(half_edge_map.iter())
            .filter_map(|(h, m)| m.map(|_| *h))
            .map(|mut h| {
                h.from = Self::remap(vertex_map.as_slice(), h.from);
                h.face = Self::remap(face_map.as_slice(), h.face);
                h.opposite = Self::remap(half_edge_map.as_slice(), h.opposite);
                h.next = Self::remap(half_edge_map.as_slice(), h.next);
                h.prev = Self::remap(half_edge_map.as_slice(), h.prev);
                h
            })
            .collect();

        self.live_vertex_count = self.vertices.len();
        self.live_half_edge_count = self.half_edges.len();
        self.live_face_count = self.faces.len();
    }

    /// `Some(new_index)` for each kept slot, in order; `None` for dropped
    /// slots.
    fn compaction_map(keep: impl Iterator<Item = bool>) -> Vec<Option<u32>> {
        let mut next = 0u32;
        keep.map(|k| {
            if k {
                let idx = next;
                next += 1;
                Some(idx)
            } else {
                None
            }
        })
        .collect()
    }

    fn remap(map: &[Option<u32>], idx: MeshIndex) -> MeshIndex {
        if !idx.is_valid() {
            return MeshIndex::INVALID;
        }
        match map[idx.idx()] {
            Some(new_idx) => MeshIndex(new_idx),
            None => MeshIndex::INVALID,
        }
    }

    /// Recompute every vertex normal as the normalized sum of the face
    /// normals of its non-boundary incident faces.
    pub fn recompute_normals(&mut self) -> Result<(), MeshError> {
        let ids: Vec<MeshIndex> = self.live_vertices().map(|(id, _)| id).collect();
        for v in ids {
            let mut sum = Vec3::ZERO;
            for face in self.vertex_faces(v)? {
                sum += self.face_normal(face);
            }
            self.vertices[v.idx()].normal = sum.normalize_or_zero();
        }
        Ok(())
    }

    /// The geometric normal of a face's plane, via its first two edges.
    pub fn face_normal(&self, face: MeshIndex) -> Vec3 {
        let [v0, v1, v2] = self.face_vertices(face).expect("valid face");
        let p0 = self.vertex(v0).expect("valid vertex").position;
        let p1 = self.vertex(v1).expect("valid vertex").position;
        let p2 = self.vertex(v2).expect("valid vertex").position;
        (p1 - p0).cross(p2 - p0).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures;

    #[test]
    fn collapsing_tetrahedron_edge_removes_two_faces() {
        let mut mesh = test_fixtures::tetrahedron();
        let (v0, v1, _, _) = test_fixtures::tetrahedron_vertices(&mesh);
        let e = mesh.connecting_edge(v0, v1).unwrap().unwrap();
        let midpoint = (mesh.vertex(v0).unwrap().position + mesh.vertex(v1).unwrap().position) / 2.0;
        let removed = mesh.collapse_edge(e, midpoint).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn cleanup_compacts_and_preserves_validity() {
        let mut mesh = test_fixtures::tetrahedron();
        let (v0, v1, _, _) = test_fixtures::tetrahedron_vertices(&mesh);
        let e = mesh.connecting_edge(v0, v1).unwrap().unwrap();
        let midpoint = (mesh.vertex(v0).unwrap().position + mesh.vertex(v1).unwrap().position) / 2.0;
        mesh.collapse_edge(e, midpoint).unwrap();
        mesh.cleanup_data();

        assert_eq!(mesh.vertices().len(), mesh.vertex_count());
        assert_eq!(mesh.half_edges().len(), mesh.half_edge_count());
        assert_eq!(mesh.faces().len(), mesh.face_count());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn recompute_normals_points_outward_on_planar_grid() {
        let (mut mesh, _, _) = test_fixtures::planar_grid(3, 3);
        mesh.recompute_normals().unwrap();
        for (_, v) in mesh.live_vertices() {
            assert!((v.normal.length() - 1.0).abs() < 1e-4);
        }
    }
}

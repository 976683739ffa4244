//! Read-only connectivity queries built on [`super::EdgeFan`].

use super::{HalfEdgeMesh, MeshError, MeshIndex};

impl HalfEdgeMesh {
    /// Number of half-edges originating at a vertex (its valence).
    pub fn valence(&self, vertex: MeshIndex) -> Result<usize, MeshError> {
        let start = self.vertex(vertex).map(|v| v.edge).unwrap_or(MeshIndex::INVALID);
        if !start.is_valid() {
            return Ok(0);
        }
        Ok(self.edge_fan_vec(start)?.len())
    }

    /// The vertices one edge away from `vertex`, in fan order.
    pub fn adjacent_vertices(&self, vertex: MeshIndex) -> Result<Vec<MeshIndex>, MeshError> {
        let start = match self.vertex(vertex) {
            Some(v) if v.edge.is_valid() => v.edge,
            _ => return Ok(Vec::new()),
        };
        self.edge_fan(start)
            .map(|r| r.map(|e| self.destination(e)))
            .collect()
    }

    /// The faces incident to `vertex`, in fan order, omitting boundary gaps.
    pub fn vertex_faces(&self, vertex: MeshIndex) -> Result<Vec<MeshIndex>, MeshError> {
        let start = match self.vertex(vertex) {
            Some(v) if v.edge.is_valid() => v.edge,
            _ => return Ok(Vec::new()),
        };
        let mut faces = Vec::new();
        for e in self.edge_fan(start) {
            let e = e?;
            let face = self.half_edge(e).expect("valid fan entry").face;
            if face.is_valid() {
                faces.push(face);
            }
        }
        Ok(faces)
    }

    /// The destination vertex of a half-edge (the origin of its `next`, or
    /// of its opposite's origin for a boundary half-edge).
    pub fn destination(&self, half_edge: MeshIndex) -> MeshIndex {
        let he = self.half_edge(half_edge).expect("valid half-edge index");
        if he.next.is_valid() {
            self.half_edge(he.next).expect("valid next index").from
        } else {
            self.half_edge(he.opposite).expect("valid opposite index").from
        }
    }

    pub fn is_boundary_vertex(&self, vertex: MeshIndex) -> bool {
        self.vertex(vertex)
            .map(|v| v.edge.is_valid() && self.half_edge(v.edge).unwrap().is_boundary())
            .unwrap_or(false)
    }

    pub fn is_boundary_half_edge(&self, half_edge: MeshIndex) -> bool {
        self.half_edge(half_edge).map(|he| he.is_boundary()).unwrap_or(true)
    }

    /// The half-edge directed from `v0` to `v1`, if `v0` and `v1` are
    /// connected by an edge.
    ///
    /// Resolved by walking `v0`'s fan rather than a cached map, since a
    /// collapse reparents fans without updating any such cache.
    pub fn connecting_edge(&self, v0: MeshIndex, v1: MeshIndex) -> Result<Option<MeshIndex>, MeshError> {
        let start = match self.vertex(v0) {
            Some(v) if v.edge.is_valid() => v.edge,
            _ => return Ok(None),
        };
        for e in self.edge_fan(start) {
            let e = e?;
            if self.destination(e) == v1 {
                return Ok(Some(e));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures;

    #[test]
    fn single_triangle_valence_is_two() {
        let mesh = test_fixtures::single_triangle();
        let (v0, _, _) = test_fixtures::single_triangle_vertices(&mesh);
        assert_eq!(mesh.valence(v0).unwrap(), 2);
    }

    #[test]
    fn tetrahedron_every_vertex_is_interior() {
        let mesh = test_fixtures::tetrahedron();
        for (id, _) in mesh.live_vertices() {
            assert!(!mesh.is_boundary_vertex(id));
            assert_eq!(mesh.valence(id).unwrap(), 3);
        }
    }

    #[test]
    fn planar_grid_corner_is_boundary() {
        let (mesh, corner, _) = test_fixtures::planar_grid(3, 3);
        assert!(mesh.is_boundary_vertex(corner));
    }
}

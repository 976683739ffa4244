//! Per-vertex quadric accumulation (spec: the plane-sum QEM at a vertex).

use super::types::MeshError;
use super::{HalfEdgeMesh, MeshIndex};
use crate::quadric::Quadric;

/// Weight applied to the imaginary crease plane added at boundary edges,
/// keeping boundary loops from eroding faster than the interior.
pub const BOUNDARY_PENALTY: f32 = 100.0;

impl HalfEdgeMesh {
    /// The accumulated quadric at `v`: one plane per incident non-boundary
    /// face, plus a boundary-crease plane for every boundary edge touching
    /// `v`, weighted by [`BOUNDARY_PENALTY`].
    pub fn vertex_quadric(&self, v: MeshIndex) -> Result<Quadric, MeshError> {
        self.vertex_quadric_with_penalty(v, BOUNDARY_PENALTY)
    }

    /// As [`HalfEdgeMesh::vertex_quadric`], but with a caller-supplied
    /// boundary-crease weight instead of the default [`BOUNDARY_PENALTY`].
    pub fn vertex_quadric_with_penalty(
        &self,
        v: MeshIndex,
        boundary_penalty: f32,
    ) -> Result<Quadric, MeshError> {
        let vertex = self.vertex(v).expect("valid vertex");
        if !vertex.edge.is_valid() {
            return Ok(Quadric::ZERO);
        }
        let position = vertex.position;
        let mut q = Quadric::ZERO;

        for e in self.edge_fan_vec(vertex.edge)? {
            let he = *self.half_edge(e).expect("valid fan entry");

            if !he.is_boundary() {
                let n = self.face_normal(he.face);
                q += Quadric::from_plane_point(n, position);
            }

            let opposite = *self.half_edge(he.opposite).expect("valid opposite");
            if he.is_boundary() || opposite.is_boundary() {
                let crease = if he.is_boundary() { he.opposite } else { e };
                let crease_he = *self.half_edge(crease).expect("valid crease edge");
                let n = self.face_normal(crease_he.face);
                let from_pos = self.vertex(crease_he.from).expect("valid vertex").position;
                let to_pos = self
                    .vertex(self.destination(crease))
                    .expect("valid vertex")
                    .position;
                let plane_normal = (to_pos - from_pos).cross(n).normalize_or_zero();
                q += Quadric::from_plane_point(plane_normal, position) * boundary_penalty;
            }
        }

        Ok(q)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures;

    #[test]
    fn interior_tetrahedron_vertex_quadric_is_not_singular() {
        let mesh = test_fixtures::tetrahedron();
        let (v0, _, _, _) = test_fixtures::tetrahedron_vertices(&mesh);
        let q = mesh.vertex_quadric(v0).unwrap();
        assert!(q.optimum().is_some());
    }

    #[test]
    fn planar_grid_interior_vertex_has_rank_deficient_quadric() {
        let (mesh, _, center) = test_fixtures::planar_grid(5, 5);
        let q = mesh.vertex_quadric(center).unwrap();
        // a perfectly flat neighborhood's quadric is singular along the plane's normal.
        assert!(q.optimum().is_none());
    }

    #[test]
    fn boundary_penalty_scales_the_crease_plane() {
        let (mesh, corner, _) = test_fixtures::planar_grid(5, 5);
        let light = mesh.vertex_quadric_with_penalty(corner, 1.0).unwrap();
        let heavy = mesh.vertex_quadric_with_penalty(corner, 1000.0).unwrap();
        assert!(heavy.a.m11.abs() > light.a.m11.abs());
    }
}

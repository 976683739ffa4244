//! The pair-contractability test: topological and geometric checks a
//! candidate collapse must pass before `collapse_edge` may be called.

use glam::Vec3;

use super::types::MeshError;
use super::{HalfEdgeMesh, MeshIndex};

impl HalfEdgeMesh {
    /// Whether contracting `v0 -> v1` to `new_pos` would produce a valid,
    /// non-degenerate, non-flipping mesh. `collapse_edge` trusts this has
    /// already been checked and performs no verification of its own.
    pub fn is_pair_contractable(
        &self,
        v0: MeshIndex,
        v1: MeshIndex,
        new_pos: Vec3,
    ) -> Result<bool, MeshError> {
        let Some(e0) = self.connecting_edge(v0, v1)? else {
            return Ok(false);
        };
        let e1 = self.half_edge(e0).expect("valid edge").opposite;

        if !self.topological_phase(v0, v1, e0, e1)? {
            return Ok(false);
        }
        self.geometric_phase(v0, v1, e0, e1, new_pos)
    }

    fn topological_phase(
        &self,
        v0: MeshIndex,
        v1: MeshIndex,
        e0: MeshIndex,
        e1: MeshIndex,
    ) -> Result<bool, MeshError> {
        let v0_boundary = self.is_boundary_vertex(v0);
        let v1_boundary = self.is_boundary_vertex(v1);
        let bc = v0_boundary as u32 + v1_boundary as u32;

        match bc {
            0 if self.vertex_count() <= 4 => return Ok(false),
            1 if self.vertex_count() <= 3 => return Ok(false),
            2 if !self.is_boundary_half_edge(e0) && !self.is_boundary_half_edge(e1) => {
                return Ok(false);
            }
            _ => {}
        }

        if self.valence(v0)? <= 3 && self.valence(v1)? <= 3 {
            return Ok(false);
        }

        let neighbors_v0 = self.adjacent_vertices(v0)?;
        let neighbors_v1 = self.adjacent_vertices(v1)?;
        for &v2 in &neighbors_v0 {
            if v2 == v1 || !neighbors_v1.contains(&v2) {
                continue;
            }
            if self.is_boundary_vertex(v2) {
                let anchor = self.vertex(v2).expect("valid vertex").edge;
                let other_end = self.destination(anchor);
                let closes_via_v0 = other_end == v0 && self.is_boundary_half_edge(e0);
                let closes_via_v1 = other_end == v1 && self.is_boundary_half_edge(e1);
                if closes_via_v0 || closes_via_v1 {
                    return Ok(false);
                }
            }
            if self.valence(v2)? <= 3 {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn geometric_phase(
        &self,
        v0: MeshIndex,
        v1: MeshIndex,
        e0: MeshIndex,
        e1: MeshIndex,
        new_pos: Vec3,
    ) -> Result<bool, MeshError> {
        let e0n = self.half_edge(e0).expect("valid edge").next;
        let e1n = if self.is_boundary_half_edge(e1) {
            MeshIndex::INVALID
        } else {
            self.half_edge(e1).expect("valid edge").next
        };
        let excluded = [e0, e1, e0n, e1n];

        for v in [v0, v1] {
            let anchor = self.vertex(v).expect("valid vertex").edge;
            if !anchor.is_valid() {
                continue;
            }
            for e in self.edge_fan_vec(anchor)? {
                if excluded.contains(&e) {
                    continue;
                }
                let he = self.half_edge(e).expect("valid fan entry");
                if he.is_boundary() {
                    continue;
                }

                let n_old = self.face_normal(he.face);

                let b = self.destination(e);
                let c = self.destination(he.next);
                let b_pos = self.vertex(b).expect("valid vertex").position;
                let c_pos = self.vertex(c).expect("valid vertex").position;
                let n_new = (b_pos - new_pos).cross(c_pos - new_pos).normalize_or_zero();

                if n_old.dot(n_new) < 0.0 {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures;

    #[test]
    fn tetrahedron_pairs_are_never_contractable() {
        let mesh = test_fixtures::tetrahedron();
        let (v0, v1, v2, v3) = test_fixtures::tetrahedron_vertices(&mesh);
        for (a, b) in [(v0, v1), (v1, v2), (v2, v3), (v3, v0), (v0, v2), (v1, v3)] {
            let pos = mesh.vertex(a).unwrap().position;
            assert!(!mesh.is_pair_contractable(a, b, pos).unwrap());
        }
    }

    #[test]
    fn single_triangle_has_no_interior_vertex_to_contract() {
        let mesh = test_fixtures::single_triangle();
        let (v0, v1, _) = test_fixtures::single_triangle_vertices(&mesh);
        let pos = mesh.vertex(v0).unwrap().position;
        assert!(!mesh.is_pair_contractable(v0, v1, pos).unwrap());
    }

    #[test]
    fn fan_center_to_boundary_pair_is_contractable() {
        let mesh = test_fixtures::triangle_fan(6);
        let center = test_fixtures::triangle_fan_center(&mesh);
        let rim = mesh.adjacent_vertices(center).unwrap()[0];
        let pos = mesh.vertex(rim).unwrap().position;
        assert!(mesh.is_pair_contractable(center, rim, pos).unwrap());
    }
}

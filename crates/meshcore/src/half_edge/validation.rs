//! Checks for the seven global invariants every live mesh must satisfy
//! between top-level operations.

use super::types::MeshError;
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    /// Check every global invariant, returning the first violation found.
    pub fn validate(&self) -> Result<(), MeshError> {
        for (idx, he) in self.half_edges.iter().enumerate() {
            if he.is_deleted() {
                continue;
            }
            let id = super::MeshIndex(idx as u32);

            let opposite = self
                .half_edge(he.opposite)
                .ok_or_else(|| MeshError::InvalidTopology(format!("{id}: dangling opposite")))?;
            if opposite.opposite != id {
                return Err(MeshError::InvalidTopology(format!(
                    "{id}: opposite({}) = {} but opposite({}) = {}",
                    he.opposite, opposite.opposite, he.opposite, id
                )));
            }

            if !he.is_boundary() {
                if self.next_cycle_length(id)? != 3 {
                    return Err(MeshError::InvalidTopology(format!(
                        "{id}: face cycle is not a triangle"
                    )));
                }
                if self.prev_cycle_length(id)? != 3 {
                    return Err(MeshError::InvalidTopology(format!(
                        "{id}: reverse face cycle is not a triangle"
                    )));
                }
            }
        }

        for (idx, face) in self.faces.iter().enumerate() {
            if face.is_deleted() {
                continue;
            }
            let id = super::MeshIndex(idx as u32);
            let mut current = face.edge;
            for _ in 0..3 {
                let he = self
                    .half_edge(current)
                    .ok_or_else(|| MeshError::InvalidTopology(format!("face {id}: dangling edge")))?;
                if he.face != id {
                    return Err(MeshError::InvalidTopology(format!(
                        "face {id}: bordering half-edge {current} claims face {}",
                        he.face
                    )));
                }
                current = he.next;
            }
        }

        for (vid, vertex) in self.live_vertices() {
            for e in self.edge_fan_vec(vertex.edge)? {
                let he = self.half_edge(e).expect("valid fan entry");
                if he.from != vid {
                    return Err(MeshError::InvalidTopology(format!(
                        "vertex {vid}: fan entry {e} has from = {}",
                        he.from
                    )));
                }
            }

            if self.is_boundary_vertex(vid) && !self.half_edge(vertex.edge).unwrap().is_boundary() {
                return Err(MeshError::InvalidTopology(format!(
                    "vertex {vid}: boundary vertex's anchor is not a boundary half-edge"
                )));
            }

            if !self.is_boundary_vertex(vid) && self.valence(vid)? < 3 {
                return Err(MeshError::InvalidTopology(format!(
                    "interior vertex {vid} has valence < 3"
                )));
            }
        }

        if self.live_half_edge_count % 2 != 0 {
            return Err(MeshError::InvalidTopology(
                "half-edge count is odd".to_string(),
            ));
        }
        if self.edge_count() < (3 * self.face_count()) / 2 {
            return Err(MeshError::InvalidTopology(
                "edge count below 3/2 * face count".to_string(),
            ));
        }

        Ok(())
    }

    fn next_cycle_length(&self, start: super::MeshIndex) -> Result<u32, MeshError> {
        let mut current = self.half_edge(start).unwrap().next;
        let mut count = 1u32;
        while current != start {
            count += 1;
            if count > 3 {
                return Ok(count);
            }
            current = self
                .half_edge(current)
                .ok_or_else(|| MeshError::InvalidTopology("dangling next".into()))?
                .next;
        }
        Ok(count)
    }

    fn prev_cycle_length(&self, start: super::MeshIndex) -> Result<u32, MeshError> {
        let mut current = self.half_edge(start).unwrap().prev;
        let mut count = 1u32;
        while current != start {
            count += 1;
            if count > 3 {
                return Ok(count);
            }
            current = self
                .half_edge(current)
                .ok_or_else(|| MeshError::InvalidTopology("dangling prev".into()))?
                .prev;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures;

    #[test]
    fn fresh_tetrahedron_is_valid() {
        let mesh = test_fixtures::tetrahedron();
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn fresh_planar_grid_is_valid() {
        let (mesh, _, _) = test_fixtures::planar_grid(5, 5);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn bowtie_split_mesh_is_valid() {
        let mesh = test_fixtures::bowtie();
        assert!(mesh.validate().is_ok());
    }
}

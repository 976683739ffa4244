//! Export boundary: turning a (possibly decimated) mesh back into a flat
//! triangle soup for the exporter.

use super::HalfEdgeMesh;
use crate::soup::ExportedMesh;

impl HalfEdgeMesh {
    /// Produce the exported triangle soup: faces are enumerated in
    /// current face-array order, each recording the three `from` vertices
    /// of `edge, next(edge), next(next(edge))`.
    pub fn make_export_mesh(&self) -> ExportedMesh {
        let positions: Vec<_> = self.live_vertices().map(|(_, v)| v.position).collect();
        let normals: Vec<_> = self.live_vertices().map(|(_, v)| v.normal).collect();

        // Dense re-numbering from live vertex slot -> export position,
        // since cleanup_data may not yet have been run.
        let mut remap = vec![u32::MAX; self.vertices.len()];
        for (new_idx, (old_idx, _)) in self.live_vertices().enumerate() {
            remap[old_idx.idx()] = new_idx as u32;
        }

        let mut indices = Vec::with_capacity(self.live_face_count * 3);
        for (face_id, _) in self.live_faces() {
            let [v0, v1, v2] = self
                .face_vertices(face_id)
                .expect("live face has a valid triangle");
            indices.push(remap[v0.idx()]);
            indices.push(remap[v1.idx()]);
            indices.push(remap[v2.idx()]);
        }

        ExportedMesh {
            name: self.name().to_string(),
            material_index: self.material_index,
            positions,
            normals,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures;

    #[test]
    fn export_round_trips_through_construction() {
        let mesh = test_fixtures::tetrahedron();
        let exported = mesh.make_export_mesh();
        assert_eq!(exported.positions.len(), mesh.vertex_count());
        assert_eq!(exported.indices.len(), mesh.face_count() * 3);

        let soup = crate::TriangleSoup {
            name: exported.name,
            positions: exported.positions,
            normals: exported.normals,
            indices: exported.indices,
        };
        let rebuilt = super::HalfEdgeMesh::from_triangle_soup(soup).unwrap();
        assert_eq!(rebuilt.vertex_count(), mesh.vertex_count());
        assert_eq!(rebuilt.face_count(), mesh.face_count());
        assert_eq!(rebuilt.half_edge_count(), mesh.half_edge_count());
    }
}

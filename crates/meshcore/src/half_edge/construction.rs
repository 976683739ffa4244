//! Construction of a half-edge mesh from a triangle soup.
//!
//! Three passes: emit one half-edge per triangle edge (checking directed
//! edges are unique), resolve opposites across the edge map (synthesizing
//! boundary half-edges for anything left unmatched), then split any vertex
//! whose incident half-edges don't form a single fan (a bowtie) into one
//! vertex per fan.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::types::{Face, HalfEdge, MeshError, Vertex};
use super::{HalfEdgeMesh, MeshIndex};
use crate::soup::TriangleSoup;

impl HalfEdgeMesh {
    /// Build a half-edge mesh from an imported triangle soup.
    ///
    /// Fails without producing a mesh if the index buffer isn't a multiple
    /// of 3, or if a directed edge appears twice (the soup isn't a
    /// manifold-orientable triangle set).
    pub fn from_triangle_soup(soup: TriangleSoup) -> Result<Self, MeshError> {
        let mut mesh = Self::build(&soup)?;
        mesh.source = soup;
        Ok(mesh)
    }

    /// Rebuild from the originally imported soup, discarding all
    /// decimation performed so far.
    pub fn reset(&mut self) -> Result<(), MeshError> {
        let soup = self.source.clone();
        let material_index = self.material_index;
        let mut rebuilt = Self::build(&soup)?;
        rebuilt.source = soup;
        rebuilt.material_index = material_index;
        *self = rebuilt;
        Ok(())
    }

    fn build(soup: &TriangleSoup) -> Result<Self, MeshError> {
        if soup.indices.len() % 3 != 0 {
            return Err(MeshError::MalformedIndexBuffer(soup.indices.len()));
        }

        let mut vertices: Vec<Vertex> = soup
            .positions
            .iter()
            .zip(soup.normals.iter())
            .map(|(&position, &normal)| Vertex {
                position,
                normal,
                edge: MeshIndex::INVALID,
            })
            .collect();

        let mut half_edges: Vec<HalfEdge> = Vec::with_capacity(soup.indices.len());
        let mut faces: Vec<Face> = Vec::with_capacity(soup.triangle_count());
        let mut edge_map: HashMap<(MeshIndex, MeshIndex), MeshIndex> = HashMap::new();
        let mut outgoing: Vec<Vec<MeshIndex>> = vec![Vec::new(); vertices.len()];

        // Pass 1: one half-edge per triangle edge.
        for tri in soup.indices.chunks_exact(3) {
            let [ia, ib, ic] = [tri[0], tri[1], tri[2]];
            let verts = [MeshIndex(ia), MeshIndex(ib), MeshIndex(ic)];

            let face_idx = MeshIndex(faces.len() as u32);
            let base = half_edges.len() as u32;
            let he_idx = [MeshIndex(base), MeshIndex(base + 1), MeshIndex(base + 2)];

            for k in 0..3 {
                let from = verts[k];
                let to = verts[(k + 1) % 3];
                let key = (from, to);
                if edge_map.contains_key(&key) {
                    return Err(MeshError::DuplicateDirectedEdge(from, to));
                }
                edge_map.insert(key, he_idx[k]);
                outgoing[from.idx()].push(he_idx[k]);

                half_edges.push(HalfEdge {
                    from,
                    face: face_idx,
                    opposite: MeshIndex::INVALID,
                    next: he_idx[(k + 1) % 3],
                    prev: he_idx[(k + 2) % 3],
                });
            }

            faces.push(Face { edge: he_idx[0] });
        }

        // Pass 2: resolve opposites, synthesizing boundary half-edges for
        // directed edges with no match in the other direction.
        let interior_count = half_edges.len();
        for i in 0..interior_count {
            if half_edges[i].opposite.is_valid() {
                continue;
            }
            let from = half_edges[i].from;
            let to = half_edges[half_edges[i].next.idx()].from;

            if let Some(&twin) = edge_map.get(&(to, from)) {
                half_edges[i].opposite = twin;
                half_edges[twin.idx()].opposite = MeshIndex(i as u32);
            } else {
                let boundary_idx = MeshIndex(half_edges.len() as u32);
                half_edges.push(HalfEdge {
                    from: to,
                    face: MeshIndex::INVALID,
                    opposite: MeshIndex(i as u32),
                    next: MeshIndex::INVALID,
                    prev: MeshIndex::INVALID,
                });
                half_edges[i].opposite = boundary_idx;
                edge_map.insert((to, from), boundary_idx);
                outgoing[to.idx()].push(boundary_idx);
            }
        }

        debug!(
            vertices = vertices.len(),
            faces = faces.len(),
            half_edges = half_edges.len(),
            "constructed half-edge mesh, resolving non-manifold vertices"
        );

        let mut mesh = HalfEdgeMesh {
            vertices,
            half_edges,
            faces,
            live_vertex_count: 0,
            live_half_edge_count: 0,
            live_face_count: 0,
            imported_vertex_count: 0,
            imported_half_edge_count: 0,
            imported_face_count: 0,
            source: soup.clone(),
            material_index: 0,
        };

        mesh.split_non_manifold_vertices(&mut outgoing);
        mesh.assign_vertex_anchors(&outgoing);

        mesh.live_vertex_count = mesh.vertices.len();
        mesh.live_half_edge_count = mesh.half_edges.len();
        mesh.live_face_count = mesh.faces.len();
        mesh.imported_vertex_count = mesh.live_vertex_count;
        mesh.imported_half_edge_count = mesh.live_half_edge_count;
        mesh.imported_face_count = mesh.live_face_count;

        Ok(mesh)
    }

    /// Split any vertex whose incident half-edges span more than one fan
    /// (a bowtie) into one vertex per fan, duplicating position/normal.
    fn split_non_manifold_vertices(&mut self, outgoing: &mut Vec<Vec<MeshIndex>>) {
        let original_vertex_count = outgoing.len();

        for v in 0..original_vertex_count {
            let v_idx = MeshIndex(v as u32);
            let mut remaining: HashSet<MeshIndex> = outgoing[v].iter().copied().collect();
            if remaining.len() <= 1 {
                continue;
            }

            let mut first = true;
            while let Some(&start) = remaining.iter().next() {
                let fan = self
                    .edge_fan_vec(start)
                    .expect("construction: freshly built mesh cannot overflow the fan guard");
                for e in &fan {
                    remaining.remove(e);
                }

                if first {
                    first = false;
                    continue;
                }

                let new_idx = MeshIndex(self.vertices.len() as u32);
                let clone = self.vertices[v_idx.idx()];
                self.vertices.push(clone);
                outgoing.push(Vec::new());

                for &e in &fan {
                    self.half_edges[e.idx()].from = new_idx;
                    outgoing[new_idx.idx()].push(e);
                }
                outgoing[v].retain(|e| !fan.contains(e));
            }
        }
    }

    fn assign_vertex_anchors(&mut self, outgoing: &[Vec<MeshIndex>]) {
        for (v, edges) in outgoing.iter().enumerate() {
            let anchor = edges
                .iter()
                .find(|&&e| self.half_edges[e.idx()].is_boundary())
                .or_else(|| edges.first())
                .copied()
                .unwrap_or(MeshIndex::INVALID);
            self.vertices[v].edge = anchor;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn unit_triangle_soup() -> TriangleSoup {
        TriangleSoup {
            name: "triangle".into(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.5, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn single_triangle_has_three_boundary_half_edges() {
        let mesh = HalfEdgeMesh::from_triangle_soup(unit_triangle_soup()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.half_edge_count(), 6);
        assert_eq!(
            mesh.half_edges().iter().filter(|he| he.is_boundary()).count(),
            3
        );
    }

    #[test]
    fn malformed_index_buffer_is_rejected() {
        let mut soup = unit_triangle_soup();
        soup.indices.push(0);
        let err = HalfEdgeMesh::from_triangle_soup(soup).unwrap_err();
        assert!(matches!(err, MeshError::MalformedIndexBuffer(4)));
    }

    #[test]
    fn duplicate_directed_edge_is_rejected() {
        let mut soup = unit_triangle_soup();
        soup.positions.push(Vec3::new(0.3, 0.3, 1.0));
        soup.normals.push(Vec3::Z);
        // second triangle (0, 1, 3) repeats the directed edge 0->1
        soup.indices.extend_from_slice(&[0, 1, 3]);
        let err = HalfEdgeMesh::from_triangle_soup(soup).unwrap_err();
        assert!(matches!(err, MeshError::DuplicateDirectedEdge(_, _)));
    }

    #[test]
    fn bowtie_vertex_is_split_into_two() {
        // two triangles sharing only a single vertex at the origin.
        let soup = TriangleSoup {
            name: "bowtie".into(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 5],
            indices: vec![0, 1, 2, 0, 3, 4],
        };
        let mesh = HalfEdgeMesh::from_triangle_soup(soup).unwrap();
        assert_eq!(mesh.vertex_count(), 6, "the shared vertex is split in two");
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn reset_restores_imported_counts_after_a_collapse() {
        let mut mesh = crate::test_fixtures::tetrahedron();
        let (imported_v, imported_e, imported_f) = (
            mesh.imported_vertex_count(),
            mesh.imported_half_edge_count(),
            mesh.imported_face_count(),
        );

        let (v0, v1, _, _) = crate::test_fixtures::tetrahedron_vertices(&mesh);
        let e = mesh.connecting_edge(v0, v1).unwrap().unwrap();
        let midpoint = (mesh.vertex(v0).unwrap().position + mesh.vertex(v1).unwrap().position) / 2.0;
        mesh.collapse_edge(e, midpoint).unwrap();
        assert_ne!(mesh.vertex_count(), imported_v);

        mesh.reset().unwrap();
        assert_eq!(mesh.vertex_count(), imported_v);
        assert_eq!(mesh.half_edge_count(), imported_e);
        assert_eq!(mesh.face_count(), imported_f);
        assert_eq!(mesh.imported_vertex_count(), imported_v);
    }
}

//! Vertex fan iteration: walking every half-edge that originates at a
//! vertex, in order around the vertex.

use super::types::MeshError;
use super::{HalfEdgeMesh, MeshIndex};

/// Guard against a corrupted mesh sending the walk in circles forever.
pub const MAX_FAN_ITERATIONS: u32 = 1000;

/// Iterator over the half-edges originating at a vertex.
///
/// Starting from some outgoing half-edge `e_start`, each step computes
/// `e_next = next(opposite(e_current))`. The walk stops after yielding the
/// current edge if `opposite(e_current)` is a boundary half-edge (no more
/// faces to cross), or before yielding `e_next` if it equals `e_start`
/// (the fan closed its loop). Every item after the first is wrapped in a
/// `Result` so a corrupted topology -- caught by [`MAX_FAN_ITERATIONS`] --
/// surfaces as an error at the call site instead of spinning forever.
pub struct EdgeFan<'a> {
    mesh: &'a HalfEdgeMesh,
    start: MeshIndex,
    next: Option<MeshIndex>,
    iterations: u32,
    done: bool,
}

impl<'a> EdgeFan<'a> {
    pub(crate) fn new(mesh: &'a HalfEdgeMesh, start: MeshIndex) -> Self {
        EdgeFan {
            mesh,
            start,
            next: Some(start),
            iterations: 0,
            done: false,
        }
    }
}

impl<'a> Iterator for EdgeFan<'a> {
    type Item = Result<MeshIndex, MeshError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.next?;

        self.iterations += 1;
        if self.iterations > MAX_FAN_ITERATIONS {
            self.done = true;
            return Some(Err(MeshError::FanIterationOverflow {
                start: self.start,
                limit: MAX_FAN_ITERATIONS,
            }));
        }

        let he = self.mesh.half_edge(current).expect("fan: dangling half-edge index");
        let opposite = self
            .mesh
            .half_edge(he.opposite)
            .expect("fan: dangling opposite index");

        if opposite.is_boundary() {
            self.next = None;
            self.done = true;
        } else {
            let candidate = opposite.next;
            if candidate == self.start {
                self.next = None;
                self.done = true;
            } else {
                self.next = Some(candidate);
            }
        }

        Some(Ok(current))
    }
}

impl HalfEdgeMesh {
    /// Iterate the half-edges originating at `start`'s vertex, starting
    /// from `start` itself.
    pub fn edge_fan(&self, start: MeshIndex) -> EdgeFan<'_> {
        EdgeFan::new(self, start)
    }

    /// Collect a vertex's fan into a `Vec`, or the `MeshError` that aborted
    /// the walk.
    pub fn edge_fan_vec(&self, start: MeshIndex) -> Result<Vec<MeshIndex>, MeshError> {
        self.edge_fan(start).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_fixtures;

    #[test]
    fn single_triangle_fan_has_one_boundary_entry() {
        let mesh = test_fixtures::single_triangle();
        let (v0, _, _) = test_fixtures::single_triangle_vertices(&mesh);
        let fan = mesh.edge_fan_vec(mesh.vertex(v0).unwrap().edge).unwrap();
        assert_eq!(fan.len(), 1);
    }

    #[test]
    fn tetrahedron_interior_vertex_fan_is_closed() {
        let mesh = test_fixtures::tetrahedron();
        for (_, v) in mesh.live_vertices() {
            let fan = mesh.edge_fan_vec(v.edge).unwrap();
            assert_eq!(fan.len(), 3, "every tetrahedron vertex has valence 3");
        }
    }
}

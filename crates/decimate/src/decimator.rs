//! The pair-contraction main loop.

use std::collections::{BinaryHeap, HashMap, HashSet};

use meshcore::{HalfEdgeMesh, MeshIndex, Quadric};
use tracing::{debug, info, trace, warn};

use crate::config::{DecimateConfig, DecimateError};
use crate::pair::{HeapEntry, OrderedCost, PairIndex, VertexPair};

/// The outcome of a single [`Decimator::iterate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A contraction attempt happened (successful or not); call `iterate`
    /// again.
    Continue,
    /// Either the target was reached, or the queue drained twice with no
    /// progress. The caller should stop calling `iterate`.
    Done,
}

/// Quadric-error-metric pair-contraction state for one decimation run.
///
/// Built once per run via [`Decimator::new`]; `iterate` is then called
/// repeatedly by [`crate::driver::Driver`] until it reports
/// [`StepOutcome::Done`].
pub struct Decimator {
    config: DecimateConfig,

    quadrics: Vec<Quadric>,
    pairs: Vec<VertexPair>,
    pairs_by_cost: BinaryHeap<HeapEntry>,
    pairs_by_vertex: HashMap<MeshIndex, Vec<PairIndex>>,

    target_face_count: u32,
    old_face_count: u32,
    current_face_count: u32,
    last_attempt_face_count: u32,
}

impl Decimator {
    /// Compute initial quadrics and pairs for `mesh`, targeting
    /// `config.target_face_count` triangles.
    pub fn new(mesh: &HalfEdgeMesh, config: DecimateConfig) -> Result<Self, DecimateError> {
        let face_count = mesh.face_count() as u32;
        let mut decimator = Decimator {
            config,
            quadrics: Vec::new(),
            pairs: Vec::new(),
            pairs_by_cost: BinaryHeap::new(),
            pairs_by_vertex: HashMap::new(),
            target_face_count: config.target_face_count,
            old_face_count: face_count,
            current_face_count: face_count,
            last_attempt_face_count: face_count,
        };
        decimator.compute_quadrics(mesh)?;
        decimator.init_pairs(mesh)?;
        Ok(decimator)
    }

    pub fn current_face_count(&self) -> u32 {
        self.current_face_count
    }

    /// Progress fraction, `1 - (current - target) / (old - target)`,
    /// clamped to `1.0` once `current` dips below `target`.
    pub fn progress(&self) -> f32 {
        let start_diff = self.old_face_count.saturating_sub(self.target_face_count);
        if start_diff == 0 {
            return 1.0;
        }
        let diff = self.current_face_count.saturating_sub(self.target_face_count);
        1.0 - (diff as f32 / start_diff as f32)
    }

    fn compute_quadrics(&mut self, mesh: &HalfEdgeMesh) -> Result<(), DecimateError> {
        self.quadrics = Vec::with_capacity(mesh.vertices().len());
        for i in 0..mesh.vertices().len() {
            self.quadrics.push(
                mesh.vertex_quadric_with_penalty(MeshIndex(i as u32), self.config.boundary_penalty)?,
            );
        }
        Ok(())
    }

    fn init_pairs(&mut self, mesh: &HalfEdgeMesh) -> Result<(), DecimateError> {
        self.pairs.clear();
        self.pairs_by_cost.clear();
        self.pairs_by_vertex.clear();

        let mut skip = vec![false; mesh.half_edges().len()];
        for (e_idx, he) in mesh.half_edges().iter().enumerate() {
            if !he.from.is_valid() || skip[e_idx] {
                continue;
            }
            skip[he.opposite.0 as usize] = true;

            let e = MeshIndex(e_idx as u32);
            let v0 = he.from;
            let v1 = mesh.destination(e);

            let pair_idx = self.pairs.len();
            self.pairs.push(VertexPair::new(v0, v1));
            self.pairs_by_vertex.entry(v0).or_default().push(pair_idx);
            self.pairs_by_vertex.entry(v1).or_default().push(pair_idx);
            self.compute_pair_cost(pair_idx, mesh);
        }
        debug!(pairs = self.pairs.len(), "initialized decimation pairs");
        Ok(())
    }

    /// Recompute a pair's optimal position and cost, bumping its
    /// generation and, if it's still in the heap, pushing a fresh entry
    /// (the stale one is discarded lazily at pop time).
    fn compute_pair_cost(&mut self, pair_idx: PairIndex, mesh: &HalfEdgeMesh) {
        let (v0, v1) = {
            let p = &self.pairs[pair_idx];
            (p.v0, p.v1)
        };
        let q = self.quadrics[v0.0 as usize] + self.quadrics[v1.0 as usize];

        let (new_pos, cost) = match q.optimum_with_threshold(self.config.singularity_threshold) {
            Some(result) => result,
            None => {
                let p0 = mesh.vertex(v0).expect("valid vertex").position;
                let p1 = mesh.vertex(v1).expect("valid vertex").position;
                let pm = (p0 + p1) * 0.5;
                [p0, p1, pm]
                    .into_iter()
                    .map(|p| (p, q.eval(p)))
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .expect("three fallback candidates")
            }
        };

        let pair = &mut self.pairs[pair_idx];
        pair.new_pos = new_pos;
        pair.cost = cost;
        pair.generation += 1;

        if !pair.removed {
            self.pairs_by_cost.push(HeapEntry {
                cost: OrderedCost(cost),
                pair: pair_idx,
                generation: pair.generation,
            });
        }
    }

    /// Drop invalidated pairs from the flat array (§4.8 step 1's
    /// `cleanupPairs`).
    fn cleanup_pairs(&mut self) {
        self.pairs.retain(|p| p.is_valid());
    }

    /// Rebuild `pairs_by_vertex` and the heap from the (already
    /// compacted) surviving pairs (§4.8 step 1's `initHelpers`).
    fn init_helpers(&mut self) {
        self.pairs_by_cost.clear();
        self.pairs_by_vertex.clear();
        for (idx, pair) in self.pairs.iter_mut().enumerate() {
            if !pair.is_valid() {
                continue;
            }
            pair.removed = false;
            pair.generation += 1;
            self.pairs_by_cost.push(HeapEntry {
                cost: OrderedCost(pair.cost),
                pair: idx,
                generation: pair.generation,
            });
        }
        // Second pass: multimap entries need the final indices, but
        // borrowing pairs mutably above and the map at once would alias.
        for (idx, pair) in self.pairs.iter().enumerate() {
            if !pair.is_valid() {
                continue;
            }
            self.pairs_by_vertex.entry(pair.v0).or_default().push(idx);
            self.pairs_by_vertex.entry(pair.v1).or_default().push(idx);
        }
    }

    /// Perform one contraction attempt.
    pub fn iterate(&mut self, mesh: &mut HalfEdgeMesh) -> Result<StepOutcome, DecimateError> {
        if self.pairs_by_cost.is_empty() {
            if self.current_face_count == self.last_attempt_face_count {
                return Ok(StepOutcome::Done);
            }
            self.last_attempt_face_count = self.current_face_count;
            info!(
                current = self.current_face_count,
                target = self.target_face_count,
                "pair queue drained, rebuilding from survivors"
            );
            self.cleanup_pairs();
            self.init_helpers();
            if self.pairs_by_cost.is_empty() {
                warn!("no contractable pairs survived rebuild, stopping");
                return Ok(StepOutcome::Done);
            }
        }

        let pair_idx = loop {
            let Some(entry) = self.pairs_by_cost.pop() else {
                return Ok(StepOutcome::Done);
            };
            if self.pairs[entry.pair].generation != entry.generation {
                continue;
            }
            break entry.pair;
        };
        self.pairs[pair_idx].removed = true;

        let (v0, v1, new_pos) = {
            let p = &self.pairs[pair_idx];
            (p.v0, p.v1, p.new_pos)
        };

        if !self.pairs[pair_idx].is_valid() || !mesh.is_pair_contractable(v0, v1, new_pos)? {
            trace!(v0 = ?v0, v1 = ?v1, "pair rejected, no contraction this step");
            return Ok(StepOutcome::Continue);
        }

        let e = mesh
            .connecting_edge(v0, v1)?
            .expect("a contractable pair has a connecting edge");
        let removed_faces = mesh.collapse_edge(e, new_pos)?;
        self.current_face_count -= removed_faces;
        trace!(
            v0 = ?v0, v1 = ?v1, removed_faces, remaining = self.current_face_count,
            "contracted pair"
        );

        // Step 5: rewire every other pair indexed by v1 onto v0.
        if let Some(v1_pairs) = self.pairs_by_vertex.remove(&v1) {
            for pi in v1_pairs {
                if pi == pair_idx {
                    continue;
                }
                let pair = &mut self.pairs[pi];
                if !pair.is_valid() {
                    continue;
                }
                if pair.v0 == v1 {
                    pair.v0 = v0;
                } else {
                    pair.v1 = v0;
                }
                self.pairs_by_vertex.entry(v0).or_default().push(pi);
            }
        }

        self.pairs[pair_idx].invalidate();
        self.quadrics[v0.0 as usize] += self.quadrics[v1.0 as usize];

        // Steps 8-9: dedup pairs now indexed by v0, recompute surviving
        // costs, and lazily revive any removed-but-now-contractable pair
        // touching the same other endpoint.
        let v0_pairs = self.pairs_by_vertex.get(&v0).cloned().unwrap_or_default();
        let mut seen_others = HashSet::new();
        for pi in v0_pairs {
            let (valid, other) = {
                let pair = &self.pairs[pi];
                if !pair.is_valid() {
                    (false, MeshIndex::INVALID)
                } else {
                    let other = if pair.v0 == v0 { pair.v1 } else { pair.v0 };
                    (true, other)
                }
            };
            if !valid {
                continue;
            }

            if !seen_others.insert(other) {
                self.pairs[pi].invalidate();
            } else {
                self.compute_pair_cost(pi, mesh);
            }

            if let Some(other_pairs) = self.pairs_by_vertex.get(&other).cloned() {
                for opi in other_pairs {
                    let (removed, valid, ov0, ov1, opos) = {
                        let p = &self.pairs[opi];
                        (p.removed, p.is_valid(), p.v0, p.v1, p.new_pos)
                    };
                    if valid && removed && mesh.is_pair_contractable(ov0, ov1, opos)? {
                        let pair = &mut self.pairs[opi];
                        pair.removed = false;
                        pair.generation += 1;
                        self.pairs_by_cost.push(HeapEntry {
                            cost: OrderedCost(pair.cost),
                            pair: opi,
                            generation: pair.generation,
                        });
                    }
                }
            }
        }

        if self.current_face_count <= self.target_face_count {
            return Ok(StepOutcome::Done);
        }
        Ok(StepOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshcore::test_fixtures;

    #[test]
    fn tetrahedron_decimation_makes_no_progress() {
        let mut mesh = test_fixtures::tetrahedron();
        let config = DecimateConfig::new(0);
        let mut decimator = Decimator::new(&mesh, config).unwrap();

        let mut steps = 0;
        loop {
            match decimator.iterate(&mut mesh).unwrap() {
                StepOutcome::Continue => {
                    steps += 1;
                    assert!(steps < 100, "tetrahedron should never make progress");
                }
                StepOutcome::Done => break,
            }
        }
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn planar_grid_decimates_toward_target() {
        let (mut mesh, _, _) = test_fixtures::planar_grid(10, 10);
        let initial_faces = mesh.face_count();
        let target = initial_faces / 4;
        let config = DecimateConfig::new(target as u32);
        let mut decimator = Decimator::new(&mesh, config).unwrap();

        loop {
            match decimator.iterate(&mut mesh).unwrap() {
                StepOutcome::Continue => {}
                StepOutcome::Done => break,
            }
        }

        mesh.cleanup_data();
        assert!(mesh.face_count() <= initial_faces);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn progress_reaches_one_when_target_met() {
        let mesh = test_fixtures::tetrahedron();
        let mut config = DecimateConfig::new(4);
        config.target_face_count = 4;
        let decimator = Decimator::new(&mesh, config).unwrap();
        assert_eq!(decimator.progress(), 1.0);
    }
}

//! The contractable-pair record and its priority-queue ordering.

use std::cmp::Ordering;

use glam::Vec3;
use meshcore::MeshIndex;

/// A total order over `f32` costs via [`f32::total_cmp`]. Costs produced by
/// [`crate::decimator::Decimator`] are never NaN for well-posed inputs, so
/// this never needs to fall back to anything looser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedCost(pub f32);

impl Eq for OrderedCost {}

impl PartialOrd for OrderedCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A candidate vertex-pair contraction.
///
/// `generation` increments every time the pair's cost is recomputed
/// (main-loop step 8). A [`HeapEntry`] popped with a stale generation no
/// longer describes this pair's current state and is discarded rather than
/// acted on -- the lazy-deletion half of the mutable-key priority queue the
/// loop needs (spec: "binary heap with lazy deletion, ignore stale pops
/// keyed by a version counter").
#[derive(Debug, Clone, Copy)]
pub struct VertexPair {
    pub v0: MeshIndex,
    pub v1: MeshIndex,
    pub new_pos: Vec3,
    pub cost: f32,
    /// Popped from the heap and rejected or not yet re-pushed. A removed
    /// pair stays in `pairs[]` and `pairsByVertex` -- it may be revived by
    /// a later contraction (main-loop step 9).
    pub removed: bool,
    pub generation: u32,
}

impl VertexPair {
    pub fn new(v0: MeshIndex, v1: MeshIndex) -> Self {
        Self {
            v0,
            v1,
            new_pos: Vec3::ZERO,
            cost: 0.0,
            removed: false,
            generation: 0,
        }
    }

    /// Whether both endpoints are still live (neither end of a collapse
    /// this pair was attached to).
    pub fn is_valid(&self) -> bool {
        self.v0.is_valid() && self.v1.is_valid()
    }

    pub fn invalidate(&mut self) {
        self.v0 = MeshIndex::INVALID;
        self.v1 = MeshIndex::INVALID;
    }
}

/// An index into [`crate::decimator::Decimator`]'s flat `pairs` array.
pub type PairIndex = usize;

/// A heap entry: orders ascending by cost (smallest cost first), with
/// `pair`/`generation` as a tie-break and staleness check respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapEntry {
    pub cost: OrderedCost,
    pub pair: PairIndex,
    pub generation: u32,
}

/// `BinaryHeap` is a max-heap; `Ord` is reversed here so pushing `HeapEntry`
/// values directly pops ascending by cost, without a `Reverse` wrapper at
/// every call site.
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.pair.cmp(&self.pair))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_lowest_cost_first() {
        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry { cost: OrderedCost(3.0), pair: 0, generation: 0 });
        heap.push(HeapEntry { cost: OrderedCost(1.0), pair: 1, generation: 0 });
        heap.push(HeapEntry { cost: OrderedCost(2.0), pair: 2, generation: 0 });

        assert_eq!(heap.pop().unwrap().pair, 1);
        assert_eq!(heap.pop().unwrap().pair, 2);
        assert_eq!(heap.pop().unwrap().pair, 0);
    }

    #[test]
    fn invalidated_pair_is_not_valid() {
        let mut p = VertexPair::new(MeshIndex(0), MeshIndex(1));
        assert!(p.is_valid());
        p.invalidate();
        assert!(!p.is_valid());
    }
}

// Viterbi search for the cheapest fingering path.
//
// Each playable note contributes one layer of candidate positions. The
// search walks the layers in time order keeping, for every candidate, the
// cheapest total cost of any path that ends there and the candidate in the
// previous layer that path came from. Backtracking from the cheapest final
// candidate recovers the whole path.
//
// Cost tables live in a flat arena: all layers' entries are stored end to
// end in one `Vec<f64>` (and one `Vec<u8>` of backpointers), with a
// per-layer offset. Candidates are addressed by their index in the layer,
// which is ascending string order, so "first minimum wins" is the same
// thing as "lowest string wins" on ties. No hashing is involved anywhere,
// so the result is bit-for-bit reproducible.
//
// Cost: O(N * P^2) for N layers of at most P candidates, with P bounded by
// the string count.

use crate::cost::CostModel;
use crate::tuning::{Position, Positions};

/// One decision layer: the candidate positions for a note, plus the silence
/// (seconds) between the end of the previous layer's note and the start of
/// this one. The gap of the first layer is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub candidates: Positions,
    pub gap: f64,
}

/// The chosen position for every layer, and the total cost of that path.
#[derive(Debug, Clone, PartialEq)]
pub struct FingeringPath {
    pub positions: Vec<Position>,
    pub cost: f64,
}

/// Flat DP tables for all layers.
struct Trellis {
    /// `offsets[i]..offsets[i + 1]` is layer `i`'s slice of `cost`/`back`.
    offsets: Vec<usize>,
    /// Best total cost of any path ending at each candidate.
    cost: Vec<f64>,
    /// Index (within the previous layer) of the predecessor on that path.
    back: Vec<u8>,
}

impl Trellis {
    fn new(layers: &[Layer]) -> Self {
        let mut offsets = Vec::with_capacity(layers.len() + 1);
        let mut total = 0;
        offsets.push(0);
        for layer in layers {
            total += layer.candidates.len();
            offsets.push(total);
        }
        Trellis {
            offsets,
            cost: vec![f64::INFINITY; total],
            back: vec![0; total],
        }
    }

    fn span(&self, layer: usize) -> std::ops::Range<usize> {
        self.offsets[layer]..self.offsets[layer + 1]
    }
}

/// Find the minimum-cost path through `layers`.
///
/// Returns `None` when there are no layers or any layer has no candidates;
/// unplayable notes must be filtered out before calling this.
pub fn optimal_path(layers: &[Layer], model: &CostModel) -> Option<FingeringPath> {
    let first = layers.first()?;
    if layers.iter().any(|layer| layer.candidates.is_empty()) {
        return None;
    }
    debug_assert!(layers.iter().all(|l| l.candidates.len() <= usize::from(u8::MAX) + 1));

    let mut trellis = Trellis::new(layers);

    for (k, &pos) in first.candidates.iter().enumerate() {
        trellis.cost[k] = model.position_cost(pos);
    }

    for i in 1..layers.len() {
        let prev = &layers[i - 1];
        let curr = &layers[i];
        let prev_span = trellis.span(i - 1);
        let curr_start = trellis.offsets[i];

        for (j, &pos) in curr.candidates.iter().enumerate() {
            let mut best = f64::INFINITY;
            let mut best_k = 0usize;
            for (k, &prev_pos) in prev.candidates.iter().enumerate() {
                let total = trellis.cost[prev_span.start + k]
                    + model.transition_cost(prev_pos, pos, curr.gap);
                // Strict comparison: the earliest (lowest-string) candidate
                // keeps ties.
                if total < best {
                    best = total;
                    best_k = k;
                }
            }
            trellis.cost[curr_start + j] = best + model.position_cost(pos);
            trellis.back[curr_start + j] = best_k as u8;
        }
    }

    let last = layers.len() - 1;
    let last_span = trellis.span(last);
    let (mut idx, cost) = trellis.cost[last_span]
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::INFINITY), |(best_idx, best), (k, c)| {
            if c < best { (k, c) } else { (best_idx, best) }
        });

    let mut positions = Vec::with_capacity(layers.len());
    for i in (0..layers.len()).rev() {
        positions.push(layers[i].candidates[idx]);
        idx = usize::from(trellis.back[trellis.offsets[i] + idx]);
    }
    positions.reverse();

    Some(FingeringPath { positions, cost })
}

/// Total cost of a specific path through `layers`, using the same cost terms
/// as `optimal_path`. `positions` must have one entry per layer.
pub fn path_cost(layers: &[Layer], positions: &[Position], model: &CostModel) -> f64 {
    debug_assert_eq!(layers.len(), positions.len());
    let mut total = 0.0;
    for (i, &pos) in positions.iter().enumerate() {
        if i > 0 {
            total += model.transition_cost(positions[i - 1], pos, layers[i].gap);
        }
        total += model.position_cost(pos);
    }
    total
}

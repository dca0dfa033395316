// Fingering cost model.
//
// Two pure functions drive the optimizer:
//
// - Position cost: how awkward it is to fret a note at a given place,
//   independent of context. High frets get a linear penalty above the 12th
//   fret; on bass, low frets on the two lowest strings are discouraged
//   (open strings excepted).
// - Transition cost: how awkward it is to move from one position to the
//   next given the silence between the notes. Fret shifts and string
//   crossings cost proportionally. Quick same-string moves of one or two
//   frets are rewarded because they can be played legato, and quick string
//   skips are penalized.
//
// Lower is better; costs may go negative thanks to the legato reward. All
// weights and thresholds live in `CostWeights` so callers can retune them
// from config.
//
// Consumed by viterbi.rs.

use serde::{Deserialize, Serialize};

use crate::tuning::{Instrument, Position};

/// Weights and thresholds for the cost model. Tunable parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    // Position cost
    /// Frets above this one are penalized.
    pub high_fret_threshold: u8,
    /// Penalty per fret above `high_fret_threshold`.
    pub high_fret_weight: f64,
    /// Bass only: flat penalty for a fretted (non-open) note low on a low string.
    pub bass_low_position_penalty: f64,
    /// Bass only: strings with index below this count as low strings.
    pub bass_low_strings: u8,
    /// Bass only: frets strictly below this count as low frets.
    pub bass_low_fret_bound: u8,

    // Transition cost
    /// Cost per fret of hand movement.
    pub fret_distance_weight: f64,
    /// Cost per string crossed.
    pub string_change_weight: f64,
    /// Added for a fast same-string move of a legato-sized interval. Negative = reward.
    pub legato_bonus: f64,
    /// Largest fret move that still earns the legato bonus.
    pub legato_max_frets: u8,
    /// Added for a fast move that skips over at least one string.
    pub string_skip_penalty: f64,
    /// Gaps (seconds) shorter than this count as fast for legato and skip terms.
    pub fast_gap: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        CostWeights {
            high_fret_threshold: 12,
            high_fret_weight: 0.3,
            bass_low_position_penalty: 2.0,
            bass_low_strings: 2,
            bass_low_fret_bound: 5,

            fret_distance_weight: 1.5,
            string_change_weight: 2.0,
            legato_bonus: -5.0,
            legato_max_frets: 2,
            string_skip_penalty: 5.0,
            fast_gap: 0.2,
        }
    }
}

/// Cost model for one instrument. Stateless apart from its configuration,
/// so one instance can be shared freely between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    pub weights: CostWeights,
    pub instrument: Instrument,
}

impl CostModel {
    pub fn new(weights: CostWeights, instrument: Instrument) -> Self {
        CostModel {
            weights,
            instrument,
        }
    }

    /// Standalone cost of fretting a note at `pos`.
    pub fn position_cost(&self, pos: Position) -> f64 {
        let w = &self.weights;
        let mut cost = 0.0;

        let above = pos.fret.saturating_sub(w.high_fret_threshold);
        cost += f64::from(above) * w.high_fret_weight;

        if self.instrument.is_bass()
            && pos.string < w.bass_low_strings
            && pos.fret > 0
            && pos.fret < w.bass_low_fret_bound
        {
            cost += w.bass_low_position_penalty;
        }

        cost
    }

    /// Cost of moving from `prev` to `curr` when `gap` seconds separate the
    /// end of the previous note from the start of the current one.
    pub fn transition_cost(&self, prev: Position, curr: Position, gap: f64) -> f64 {
        let w = &self.weights;
        let fret_dist = curr.fret_distance(prev);
        let string_dist = curr.string_distance(prev);

        let mut cost = f64::from(fret_dist) * w.fret_distance_weight
            + f64::from(string_dist) * w.string_change_weight;

        let fast = gap < w.fast_gap;
        if fast && string_dist == 0 && (1..=w.legato_max_frets).contains(&fret_dist) {
            cost += w.legato_bonus;
        }
        if fast && string_dist > 1 {
            cost += w.string_skip_penalty;
        }

        cost
    }
}

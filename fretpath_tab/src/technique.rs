// Playing-technique annotation.
//
// After the optimizer has fixed a position for every note, a single forward
// pass compares each note with the one before it. A quick move of one to
// three frets along the same string is played legato: upward by one fret is
// a hammer-on, upward by more is a slide, and any downward move is a
// pull-off. Everything else, including the first note, is picked.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tuning::Position;

/// How a note is sounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    #[default]
    Pick,
    Slide,
    Hammer,
    Pull,
}

impl Technique {
    pub const ALL: [Technique; 4] = [
        Technique::Pick,
        Technique::Slide,
        Technique::Hammer,
        Technique::Pull,
    ];

    /// Single-letter tablature suffix (`s`, `h`, `p`). Picked notes have none.
    pub fn suffix(self) -> Option<char> {
        match self {
            Technique::Pick => None,
            Technique::Slide => Some('s'),
            Technique::Hammer => Some('h'),
            Technique::Pull => Some('p'),
        }
    }

    pub fn is_legato(self) -> bool {
        self != Technique::Pick
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Technique::Pick => "pick",
            Technique::Slide => "slide",
            Technique::Hammer => "hammer",
            Technique::Pull => "pull",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits for recognising a legato transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechniqueThresholds {
    /// Gaps (seconds) shorter than this can be legato.
    pub max_gap: f64,
    /// Largest fret move (either direction) that can be legato.
    pub max_fret_span: u8,
}

impl Default for TechniqueThresholds {
    fn default() -> Self {
        TechniqueThresholds {
            max_gap: 0.15,
            max_fret_span: 3,
        }
    }
}

/// Label the move from `prev` to `curr`, given the gap between the end of
/// the previous note and the start of the current one.
pub fn classify_transition(
    prev: Position,
    curr: Position,
    gap: f64,
    thresholds: &TechniqueThresholds,
) -> Technique {
    let quick = gap < thresholds.max_gap;
    if curr.string != prev.string || !quick {
        return Technique::Pick;
    }
    let fret_diff = i16::from(curr.fret) - i16::from(prev.fret);
    if !(1..=i16::from(thresholds.max_fret_span)).contains(&fret_diff.abs()) {
        return Technique::Pick;
    }
    match fret_diff {
        d if d > 1 => Technique::Slide,
        1 => Technique::Hammer,
        _ => Technique::Pull,
    }
}

/// Label a whole path. `timing[i]` is the `(start, end)` of the note played
/// at `positions[i]`; both slices must be the same length.
pub fn classify_path(
    positions: &[Position],
    timing: &[(f64, f64)],
    thresholds: &TechniqueThresholds,
) -> Vec<Technique> {
    debug_assert_eq!(positions.len(), timing.len());
    let transitions = positions
        .windows(2)
        .zip(timing.windows(2))
        .map(|(pos, time)| classify_transition(pos[0], pos[1], time[1].0 - time[0].1, thresholds));
    std::iter::once(Technique::Pick)
        .chain(transitions)
        .take(positions.len())
        .collect()
}

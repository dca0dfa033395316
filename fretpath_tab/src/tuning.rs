// Instrument tuning and fretboard position enumeration.
//
// A tuning is the list of open-string pitches ordered from the lowest string
// to the highest, plus the highest playable fret. Everything downstream
// (candidate enumeration, the bass low-string penalty, tie-breaking in the
// optimizer) assumes string index grows with pitch, so construction rejects
// tunings whose open pitches are not strictly ascending.
//
// This module provides:
// - `Instrument`: the category tag that switches bass-only cost terms
// - `Position`: a (string, fret) pair on the neck
// - `Tuning`: validated open pitches + fret limit, and `positions(pitch)`
// - `TuningPreset`: the standard guitar and bass tunings, looked up by name
//
// Used by cost.rs (positions are what gets costed), viterbi.rs (candidate
// layers), and tab.rs (building generators from config).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Result, TabError};
use crate::note::MIDI_MAX;

/// Fret limit used when a config doesn't name one.
pub const DEFAULT_FRET_LIMIT: u8 = 24;

/// Candidate positions for one pitch. Inline capacity covers up to
/// eight-string instruments without allocating.
pub type Positions = SmallVec<[Position; 8]>;

/// Instrument category. Only affects which cost terms apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    #[default]
    Guitar,
    Bass,
}

impl Instrument {
    /// Open pitches used when no tuning is configured: standard six-string
    /// guitar (E2 A2 D3 G3 B3 E4) or five-string bass (B0 E1 A1 D2 G2).
    pub fn default_pitches(self) -> &'static [u8] {
        match self {
            Instrument::Guitar => &[40, 45, 50, 55, 59, 64],
            Instrument::Bass => &[23, 28, 33, 38, 43],
        }
    }

    pub fn is_bass(self) -> bool {
        self == Instrument::Bass
    }
}

/// A place on the neck: string index (0 = lowest string) and fret (0 = open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub string: u8,
    pub fret: u8,
}

impl Position {
    pub fn new(string: u8, fret: u8) -> Self {
        Position { string, fret }
    }

    /// Absolute string distance to another position.
    pub fn string_distance(self, other: Position) -> u8 {
        self.string.abs_diff(other.string)
    }

    /// Absolute fret distance to another position.
    pub fn fret_distance(self, other: Position) -> u8 {
        self.fret.abs_diff(other.fret)
    }
}

/// A validated tuning. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    open_pitches: Vec<u8>,
    fret_limit: u8,
}

impl Tuning {
    /// Build a tuning from open pitches (lowest string first) and a fret limit.
    ///
    /// Fails if there are no strings, if any open pitch is outside the MIDI
    /// range, or if the pitches are not strictly ascending.
    pub fn new(open_pitches: Vec<u8>, fret_limit: u8) -> Result<Self> {
        if open_pitches.is_empty() {
            return Err(TabError::InvalidTuning(
                "tuning needs at least one string".to_string(),
            ));
        }
        if open_pitches.len() > usize::from(u8::MAX) {
            return Err(TabError::InvalidTuning(format!(
                "{} strings is more than any instrument supports",
                open_pitches.len()
            )));
        }
        if let Some((string, &pitch)) = open_pitches
            .iter()
            .enumerate()
            .find(|&(_, &p)| p > MIDI_MAX)
        {
            return Err(TabError::InvalidTuning(format!(
                "string {string} has open pitch {pitch}, above {MIDI_MAX}"
            )));
        }
        if let Some(string) = open_pitches.windows(2).position(|w| w[1] <= w[0]) {
            return Err(TabError::InvalidTuning(format!(
                "open pitches must ascend from low to high string, but string {} ({}) is not above string {} ({})",
                string + 1,
                open_pitches[string + 1],
                string,
                open_pitches[string],
            )));
        }
        Ok(Tuning {
            open_pitches,
            fret_limit,
        })
    }

    /// The default tuning for an instrument category.
    pub fn for_instrument(instrument: Instrument, fret_limit: u8) -> Result<Self> {
        Tuning::new(instrument.default_pitches().to_vec(), fret_limit)
    }

    pub fn num_strings(&self) -> usize {
        self.open_pitches.len()
    }

    pub fn fret_limit(&self) -> u8 {
        self.fret_limit
    }

    pub fn open_pitches(&self) -> &[u8] {
        &self.open_pitches
    }

    /// Open pitch of a string, or `None` if the index is past the last string.
    pub fn open_pitch(&self, string: usize) -> Option<u8> {
        self.open_pitches.get(string).copied()
    }

    /// The pitch sounded at a position, or `None` if the position is off the neck.
    pub fn pitch_at(&self, position: Position) -> Option<u8> {
        if position.fret > self.fret_limit {
            return None;
        }
        let open = self.open_pitch(usize::from(position.string))?;
        let pitch = u16::from(open) + u16::from(position.fret);
        u8::try_from(pitch).ok()
    }

    /// Every position that sounds `pitch`, in ascending string order.
    ///
    /// The order is load-bearing: the optimizer breaks cost ties in favour of
    /// the earliest candidate, so it must never depend on anything but the
    /// string index. Empty when the pitch is unplayable.
    pub fn positions(&self, pitch: u8) -> Positions {
        self.open_pitches
            .iter()
            .enumerate()
            .filter_map(|(string, &open)| {
                let fret = i16::from(pitch) - i16::from(open);
                if (0..=i16::from(self.fret_limit)).contains(&fret) {
                    // Both casts are in range: string count is capped at
                    // u8::MAX in `new`, fret is within 0..=fret_limit.
                    Some(Position::new(string as u8, fret as u8))
                } else {
                    None
                }
            })
            .collect()
    }

    /// True if at least one position sounds `pitch`.
    pub fn is_playable(&self, pitch: u8) -> bool {
        self.open_pitches.iter().any(|&open| {
            pitch >= open && pitch - open <= self.fret_limit
        })
    }
}

/// A named standard tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningPreset {
    /// Lookup key, e.g. "guitar_drop_d".
    pub key: &'static str,
    /// Display name, e.g. "Guitar (Drop D)".
    pub name: &'static str,
    pub instrument: Instrument,
    pub open_pitches: &'static [u8],
}

impl TuningPreset {
    pub const ALL: [TuningPreset; 5] = [
        TuningPreset {
            key: "guitar_standard",
            name: "Guitar (Standard)",
            instrument: Instrument::Guitar,
            open_pitches: &[40, 45, 50, 55, 59, 64], // E2 A2 D3 G3 B3 E4
        },
        TuningPreset {
            key: "guitar_drop_d",
            name: "Guitar (Drop D)",
            instrument: Instrument::Guitar,
            open_pitches: &[38, 45, 50, 55, 59, 64], // D2 A2 D3 G3 B3 E4
        },
        TuningPreset {
            key: "guitar_half_step_down",
            name: "Guitar (Half Step Down)",
            instrument: Instrument::Guitar,
            open_pitches: &[39, 44, 49, 54, 58, 63], // Eb2 Ab2 Db3 Gb3 Bb3 Eb4
        },
        TuningPreset {
            key: "bass_4_string",
            name: "Bass (4-String)",
            instrument: Instrument::Bass,
            open_pitches: &[28, 33, 38, 43], // E1 A1 D2 G2
        },
        TuningPreset {
            key: "bass_5_string",
            name: "Bass (5-String)",
            instrument: Instrument::Bass,
            open_pitches: &[23, 28, 33, 38, 43], // B0 E1 A1 D2 G2
        },
    ];

    /// Find a preset by key or display name. Case-insensitive; spaces become
    /// underscores and parentheses are ignored, so "Guitar Drop D" and
    /// "guitar_drop_d" both match.
    pub fn lookup(name: &str) -> Result<&'static TuningPreset> {
        let key: String = name
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '(' | ')'))
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        Self::ALL
            .iter()
            .find(|preset| preset.key == key)
            .ok_or_else(|| TabError::UnknownTuning(name.to_string()))
    }

    /// Instantiate this preset with a fret limit.
    pub fn tuning(&self, fret_limit: u8) -> Result<Tuning> {
        Tuning::new(self.open_pitches.to_vec(), fret_limit)
    }
}

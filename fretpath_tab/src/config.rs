// Generator configuration.
//
// Everything a `TabGenerator` needs, in one serde-friendly struct: the
// instrument category, the tuning (explicit pitches, a named preset, or the
// instrument's default), the fret limit, cost weights, technique thresholds,
// and what to do about unplayable notes. Every field has a default, so a
// config file only needs to mention what it changes:
//
//   { "instrument": "bass", "tuning_name": "bass_4_string",
//     "weights": { "legato_bonus": -3.0 } }

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cost::CostWeights;
use crate::error::Result;
use crate::technique::TechniqueThresholds;
use crate::tuning::{DEFAULT_FRET_LIMIT, Instrument, Tuning, TuningPreset};

/// What to do with a note that has no position on the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnplayablePolicy {
    /// Drop the note and carry on; its neighbours become adjacent.
    #[default]
    Skip,
    /// Fail the whole generation on the first unplayable note.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabConfig {
    pub instrument: Instrument,
    /// Open pitches, lowest string first. Takes precedence over `tuning_name`.
    pub tuning: Option<Vec<u8>>,
    /// Named preset from `TuningPreset::ALL`, used when `tuning` is absent.
    pub tuning_name: Option<String>,
    pub fret_limit: u8,
    pub weights: CostWeights,
    pub techniques: TechniqueThresholds,
    pub unplayable: UnplayablePolicy,
}

impl Default for TabConfig {
    fn default() -> Self {
        TabConfig {
            instrument: Instrument::Guitar,
            tuning: None,
            tuning_name: None,
            fret_limit: DEFAULT_FRET_LIMIT,
            weights: CostWeights::default(),
            techniques: TechniqueThresholds::default(),
            unplayable: UnplayablePolicy::Skip,
        }
    }
}

impl TabConfig {
    /// Defaults for an instrument category.
    pub fn for_instrument(instrument: Instrument) -> Self {
        TabConfig {
            instrument,
            ..TabConfig::default()
        }
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        TabConfig::from_json(&data)
    }

    /// Build the validated tuning this config describes.
    pub fn resolve_tuning(&self) -> Result<Tuning> {
        if let Some(pitches) = &self.tuning {
            return Tuning::new(pitches.clone(), self.fret_limit);
        }
        if let Some(name) = &self.tuning_name {
            return TuningPreset::lookup(name)?.tuning(self.fret_limit);
        }
        Tuning::for_instrument(self.instrument, self.fret_limit)
    }
}

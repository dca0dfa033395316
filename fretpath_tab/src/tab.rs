// Tab generation: the full note-stream-to-tablature pipeline.
//
// Pipeline for one call:
//   1. Sort notes by onset (stable, so simultaneous onsets keep input order).
//   2. Enumerate candidate positions per note; notes with none are dropped
//      (or fail the call under the strict policy) and their neighbours become
//      adjacent for both costing and technique detection.
//   3. Run the Viterbi search (viterbi.rs) over the surviving notes.
//   4. Label techniques along the chosen path (technique.rs).
//
// `TabGenerator` holds only immutable configuration, so a single instance can
// serve any number of concurrent calls. `generate_batch` uses that to process
// several stems in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{TabConfig, UnplayablePolicy};
use crate::cost::{CostModel, CostWeights};
use crate::error::{Result, TabError};
use crate::note::{Note, pitch_name};
use crate::technique::{Technique, TechniqueThresholds, classify_path};
use crate::tuning::{Instrument, Position, Tuning};
use crate::viterbi::{Layer, optimal_path};

/// A note placed on the fretboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabNote {
    /// String index (0 = lowest string).
    pub string: u8,
    /// Fret number (0 = open).
    pub fret: u8,
    /// Onset time in seconds, copied from the source note.
    pub start: f64,
    /// Release time in seconds, copied from the source note.
    pub end: f64,
    pub technique: Technique,
    /// Pitch of the source note. Always equals the tuning's pitch at
    /// (string, fret).
    pub pitch: u8,
}

impl TabNote {
    pub fn position(&self) -> Position {
        Position::new(self.string, self.fret)
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A note that was left out of the tab because nothing on the neck plays it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DroppedNote {
    /// Index of the note in the caller's input slice.
    pub index: usize,
    pub pitch: u8,
    pub start: f64,
}

/// Result of one generation call, with diagnostics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabReport {
    pub notes: Vec<TabNote>,
    /// Unplayable notes, in time order.
    pub dropped: Vec<DroppedNote>,
    /// Total cost of the chosen fingering (0 when no notes were placed).
    pub cost: f64,
}

impl TabReport {
    /// True when every input note made it into the tab.
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Converts note streams into tablature for one instrument configuration.
#[derive(Debug, Clone)]
pub struct TabGenerator {
    tuning: Tuning,
    cost: CostModel,
    techniques: TechniqueThresholds,
    policy: UnplayablePolicy,
}

impl TabGenerator {
    /// Generator with default weights, thresholds, and the skip policy.
    pub fn new(tuning: Tuning, instrument: Instrument) -> Self {
        TabGenerator {
            tuning,
            cost: CostModel::new(CostWeights::default(), instrument),
            techniques: TechniqueThresholds::default(),
            policy: UnplayablePolicy::Skip,
        }
    }

    pub fn from_config(config: &TabConfig) -> Result<Self> {
        let tuning = config.resolve_tuning()?;
        debug!(
            "Tab generator: {:?}, {} strings {:?}, {} frets, unplayable={:?}",
            config.instrument,
            tuning.num_strings(),
            tuning.open_pitches(),
            tuning.fret_limit(),
            config.unplayable,
        );
        Ok(TabGenerator {
            tuning,
            cost: CostModel::new(config.weights.clone(), config.instrument),
            techniques: config.techniques.clone(),
            policy: config.unplayable,
        })
    }

    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.cost.weights = weights;
        self
    }

    pub fn with_thresholds(mut self, techniques: TechniqueThresholds) -> Self {
        self.techniques = techniques;
        self
    }

    pub fn with_policy(mut self, policy: UnplayablePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    pub fn instrument(&self) -> Instrument {
        self.cost.instrument
    }

    pub fn policy(&self) -> UnplayablePolicy {
        self.policy
    }

    /// Generate tablature, dropping unplayable notes.
    ///
    /// Never fails: this always uses the skip policy, whatever the generator
    /// was configured with. Output is sorted by onset and has at most as
    /// many entries as the input.
    pub fn generate_tab(&self, notes: &[Note]) -> Vec<TabNote> {
        match self.run(notes, UnplayablePolicy::Skip) {
            Ok(report) => report.notes,
            // The skip policy has no failure path.
            Err(_) => Vec::new(),
        }
    }

    /// Generate tablature, failing on the first unplayable note (in time order).
    pub fn generate_tab_strict(&self, notes: &[Note]) -> Result<Vec<TabNote>> {
        Ok(self.run(notes, UnplayablePolicy::Strict)?.notes)
    }

    /// Generate tablature under the configured policy, with diagnostics.
    pub fn generate_report(&self, notes: &[Note]) -> Result<TabReport> {
        self.run(notes, self.policy)
    }

    /// Generate one report per stem, in parallel. Output order matches input
    /// order; under the strict policy the first failing stem's error is
    /// returned.
    pub fn generate_batch(&self, stems: &[Vec<Note>]) -> Result<Vec<TabReport>> {
        stems
            .par_iter()
            .map(|notes| self.generate_report(notes))
            .collect()
    }

    fn run(&self, notes: &[Note], policy: UnplayablePolicy) -> Result<TabReport> {
        if notes.is_empty() {
            return Ok(TabReport::default());
        }

        let mut order: Vec<usize> = (0..notes.len()).collect();
        order.sort_by(|&a, &b| notes[a].start.total_cmp(&notes[b].start));

        let mut layers = Vec::with_capacity(notes.len());
        let mut placed: Vec<&Note> = Vec::with_capacity(notes.len());
        let mut dropped = Vec::new();

        for index in order {
            let note = &notes[index];
            let candidates = self.tuning.positions(note.pitch);
            if candidates.is_empty() {
                if policy == UnplayablePolicy::Strict {
                    return Err(TabError::UnplayableNote {
                        index,
                        pitch: note.pitch,
                    });
                }
                warn!(
                    "Note {} ({}) at {:.3}s is unplayable on this tuning, skipping",
                    note.pitch,
                    pitch_name(note.pitch),
                    note.start,
                );
                dropped.push(DroppedNote {
                    index,
                    pitch: note.pitch,
                    start: note.start,
                });
                continue;
            }
            let gap = placed.last().map_or(0.0, |prev| note.start - prev.end);
            layers.push(Layer { candidates, gap });
            placed.push(note);
        }

        let Some(path) = optimal_path(&layers, &self.cost) else {
            debug!("No playable notes among {}", notes.len());
            return Ok(TabReport {
                notes: Vec::new(),
                dropped,
                cost: 0.0,
            });
        };

        let timing: Vec<(f64, f64)> = placed.iter().map(|n| (n.start, n.end)).collect();
        let techniques = classify_path(&path.positions, &timing, &self.techniques);

        let tab: Vec<TabNote> = placed
            .iter()
            .zip(&path.positions)
            .zip(techniques)
            .map(|((note, pos), technique)| TabNote {
                string: pos.string,
                fret: pos.fret,
                start: note.start,
                end: note.end,
                technique,
                pitch: note.pitch,
            })
            .collect();

        debug!(
            "Generated {} tab notes from {} input notes ({} dropped, cost {:.2})",
            tab.len(),
            notes.len(),
            dropped.len(),
            path.cost,
        );

        Ok(TabReport {
            notes: tab,
            dropped,
            cost: path.cost,
        })
    }
}

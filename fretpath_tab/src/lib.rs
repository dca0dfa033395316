// Fretpath tab generator
//
// Turns a stream of transcribed note events into a playable fingering on a
// fretted, multi-string instrument (guitar or bass), with per-note technique
// labels (pick, slide, hammer-on, pull-off). A pitch can usually be fretted
// in several places; the generator picks the sequence of places that keeps
// hand shifts and string crossings cheap and favours legato where the timing
// allows it.
//
// Architecture:
// - note.rs: Input note events, validation, pitch naming
// - tuning.rs: Tunings, instrument categories, fretboard positions, named presets
// - cost.rs: Position and transition costs, with tunable weights
// - viterbi.rs: Arena-backed Viterbi search for the cheapest fingering path
// - technique.rs: Forward pass labelling slides, hammer-ons, and pull-offs
// - tab.rs: TabGenerator pipeline (sort, enumerate, optimize, label) and reports
// - config.rs: JSON-loadable generator configuration
// - error.rs: Error type
//
// Output is fully deterministic: the same notes and configuration always
// produce the same tab.

pub mod config;
pub mod cost;
pub mod error;
pub mod note;
pub mod tab;
pub mod technique;
pub mod tuning;
pub mod viterbi;

pub use config::{TabConfig, UnplayablePolicy};
pub use error::{Result, TabError};
pub use note::Note;
pub use tab::{DroppedNote, TabGenerator, TabNote, TabReport};
pub use technique::Technique;
pub use tuning::{Instrument, Position, Tuning, TuningPreset};

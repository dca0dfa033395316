//! Property-based tests for tab generation using proptest.
//!
//! These check the guarantees every tab must satisfy for arbitrary note
//! streams: positions reproduce their pitches, nothing is invented, output
//! is time-ordered and deterministic, technique labels follow the legato
//! rule, and the chosen fingering is optimal on short phrases.
//!
//! ```bash
//! cargo test -p fretpath_tab --test properties
//! ```

use proptest::prelude::*;

use fretpath_tab::cost::{CostModel, CostWeights};
use fretpath_tab::technique::{TechniqueThresholds, classify_transition};
use fretpath_tab::viterbi::{Layer, path_cost};
use fretpath_tab::{Instrument, Note, Position, TabGenerator, Technique, Tuning};

fn guitar() -> TabGenerator {
    TabGenerator::new(
        Tuning::new(vec![40, 45, 50, 55, 59, 64], 24).unwrap(),
        Instrument::Guitar,
    )
}

fn bass() -> TabGenerator {
    TabGenerator::new(
        Tuning::new(vec![23, 28, 33, 38, 43], 20).unwrap(),
        Instrument::Bass,
    )
}

/// Notes with pitches that run past both ends of a guitar's range (and past
/// the MIDI range), arbitrary onsets in any order, and short durations.
fn arbitrary_notes(max_len: usize) -> impl Strategy<Value = Vec<Note>> {
    prop::collection::vec(
        (0u8..=140, 0.0f64..30.0, 0.0f64..1.0, 0u8..=127).prop_map(
            |(pitch, start, duration, velocity)| Note {
                pitch,
                start,
                end: start + duration,
                velocity,
            },
        ),
        0..max_len,
    )
}

/// Monophonic phrases within a guitar's range, already in time order.
fn playable_phrase(max_len: usize) -> impl Strategy<Value = Vec<Note>> {
    prop::collection::vec((40u8..=88, 0.0f64..0.4, 0.05f64..0.5), 1..max_len).prop_map(
        |steps| {
            let mut t = 0.0;
            steps
                .into_iter()
                .map(|(pitch, gap, duration)| {
                    let start = t + gap;
                    t = start + duration;
                    Note {
                        pitch,
                        start,
                        end: t,
                        velocity: 80,
                    }
                })
                .collect()
        },
    )
}

/// Exhaustive minimum cost over every path through `layers`.
fn brute_force_cost(layers: &[Layer], model: &CostModel) -> f64 {
    let mut best = f64::INFINITY;
    let mut chosen: Vec<Position> = Vec::with_capacity(layers.len());
    let mut cursor = vec![0usize; layers.len()];
    loop {
        chosen.clear();
        chosen.extend(cursor.iter().zip(layers).map(|(&k, l)| l.candidates[k]));
        best = best.min(path_cost(layers, &chosen, model));

        // Odometer increment.
        let mut i = layers.len();
        loop {
            if i == 0 {
                return best;
            }
            i -= 1;
            cursor[i] += 1;
            if cursor[i] < layers[i].candidates.len() {
                break;
            }
            cursor[i] = 0;
        }
    }
}

proptest! {
    /// Every tab note sounds exactly the pitch it was generated from.
    #[test]
    fn positions_reproduce_pitch(notes in arbitrary_notes(60)) {
        for generator in [guitar(), bass()] {
            for tab in generator.generate_tab(&notes) {
                prop_assert_eq!(
                    generator.tuning().pitch_at(tab.position()),
                    Some(tab.pitch)
                );
            }
        }
    }

    /// Output never grows, and only shrinks by the unplayable notes.
    #[test]
    fn cardinality_matches_playable_count(notes in arbitrary_notes(60)) {
        let generator = guitar();
        let tab = generator.generate_tab(&notes);
        let playable = notes
            .iter()
            .filter(|n| generator.tuning().is_playable(n.pitch))
            .count();
        prop_assert!(tab.len() <= notes.len());
        prop_assert_eq!(tab.len(), playable);

        let report = generator.generate_report(&notes).unwrap();
        prop_assert_eq!(report.notes.len() + report.dropped.len(), notes.len());
        prop_assert_eq!(report.is_complete(), tab.len() == notes.len());
    }

    /// Same input, same configuration, same output.
    #[test]
    fn generation_is_deterministic(notes in arbitrary_notes(60)) {
        let generator = guitar();
        let first = generator.generate_tab(&notes);
        let second = generator.generate_tab(&notes);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, guitar().generate_tab(&notes));
    }

    /// Output is sorted by onset whatever the input order.
    #[test]
    fn output_is_time_ordered(notes in arbitrary_notes(60)) {
        let tab = guitar().generate_tab(&notes);
        for pair in tab.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }

        let mut reversed = notes.clone();
        reversed.reverse();
        let from_reversed = guitar().generate_tab(&reversed);
        let starts: Vec<f64> = tab.iter().map(|t| t.start).collect();
        let reversed_starts: Vec<f64> = from_reversed.iter().map(|t| t.start).collect();
        prop_assert_eq!(starts, reversed_starts);
    }

    /// The first note is picked and every later label follows the legato rule
    /// applied to its immediate predecessor in the output.
    #[test]
    fn techniques_follow_legato_rule(notes in playable_phrase(40)) {
        let tab = guitar().generate_tab(&notes);
        prop_assert_eq!(tab[0].technique, Technique::Pick);
        let thresholds = TechniqueThresholds::default();
        for pair in tab.windows(2) {
            let expected = classify_transition(
                pair[0].position(),
                pair[1].position(),
                pair[1].start - pair[0].end,
                &thresholds,
            );
            prop_assert_eq!(pair[1].technique, expected);
        }
    }

    /// On short phrases the Viterbi path matches exhaustive search.
    #[test]
    fn fingering_is_optimal(notes in playable_phrase(6)) {
        let generator = guitar();
        let report = generator.generate_report(&notes).unwrap();
        let model = CostModel::new(CostWeights::default(), Instrument::Guitar);
        let layers: Vec<Layer> = notes
            .iter()
            .enumerate()
            .map(|(i, n)| Layer {
                candidates: generator.tuning().positions(n.pitch),
                gap: if i == 0 { 0.0 } else { n.start - notes[i - 1].end },
            })
            .collect();
        let exhaustive = brute_force_cost(&layers, &model);
        prop_assert!((report.cost - exhaustive).abs() < 1e-9,
            "viterbi {} vs exhaustive {}", report.cost, exhaustive);
    }
}

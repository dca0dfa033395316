// Transcribed note events: the input side of tab generation.
//
// A `Note` is what the upstream transcription stage hands us: a MIDI pitch,
// onset and release times in seconds, and a velocity. Notes are plain `Copy`
// values. The pipeline sorts and filters copies of them but never rewrites
// one, so timing quantization or cleanup has to happen before the notes
// reach `TabGenerator`.
//
// Fields are public so that raw upstream data (including pitches outside the
// MIDI range) can be carried through and reported as unplayable. Callers that
// want validation at the boundary should build notes with `Note::new`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabError};

/// Highest valid MIDI pitch or velocity value.
pub const MIDI_MAX: u8 = 127;

/// Velocity used when the transcription stage does not report one.
pub const DEFAULT_VELOCITY: u8 = 80;

/// A single pitched note event from transcription.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch number (0-127 for well-formed input).
    pub pitch: u8,
    /// Onset time in seconds.
    pub start: f64,
    /// Release time in seconds, never before `start`.
    pub end: f64,
    /// MIDI velocity (0-127).
    pub velocity: u8,
}

impl Note {
    /// Create a validated note.
    pub fn new(pitch: u8, start: f64, end: f64, velocity: u8) -> Result<Self> {
        if pitch > MIDI_MAX {
            return Err(TabError::InvalidNote(format!(
                "pitch must be 0-{MIDI_MAX}, got {pitch}"
            )));
        }
        if velocity > MIDI_MAX {
            return Err(TabError::InvalidNote(format!(
                "velocity must be 0-{MIDI_MAX}, got {velocity}"
            )));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(TabError::InvalidNote(format!(
                "times must be finite, got start={start} end={end}"
            )));
        }
        if start < 0.0 {
            return Err(TabError::InvalidNote(format!(
                "start time must be non-negative, got {start}"
            )));
        }
        if end < start {
            return Err(TabError::InvalidNote(format!(
                "end time ({end}) must be >= start time ({start})"
            )));
        }
        Ok(Note {
            pitch,
            start,
            end,
            velocity,
        })
    }

    /// Create a validated note with the default velocity.
    pub fn with_default_velocity(pitch: u8, start: f64, end: f64) -> Result<Self> {
        Note::new(pitch, start, end, DEFAULT_VELOCITY)
    }

    /// Sounding length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Convert a MIDI pitch to a note name with octave, e.g. 40 -> "E2", 60 -> "C4".
///
/// Pitches above 127 have no name and come back as "??".
pub fn pitch_name(pitch: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
    ];
    if pitch > MIDI_MAX {
        return "??".to_string();
    }
    let octave = i16::from(pitch / 12) - 1;
    format!("{}{}", NAMES[usize::from(pitch % 12)], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_note() {
        let note = Note::new(45, 0.0, 0.5, 90).unwrap();
        assert_eq!(note.pitch, 45);
        assert_eq!(note.velocity, 90);
        assert!((note.duration() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_default_velocity() {
        let note = Note::with_default_velocity(60, 1.0, 1.25).unwrap();
        assert_eq!(note.velocity, DEFAULT_VELOCITY);
    }

    #[test]
    fn test_zero_length_note_allowed() {
        assert!(Note::new(60, 2.0, 2.0, 64).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_pitch_and_velocity() {
        assert!(matches!(Note::new(128, 0.0, 1.0, 64), Err(TabError::InvalidNote(_))));
        assert!(matches!(Note::new(60, 0.0, 1.0, 200), Err(TabError::InvalidNote(_))));
    }

    #[test]
    fn test_rejects_bad_timing() {
        assert!(Note::new(60, -0.1, 1.0, 64).is_err());
        assert!(Note::new(60, 1.0, 0.5, 64).is_err());
        assert!(Note::new(60, f64::NAN, 1.0, 64).is_err());
        assert!(Note::new(60, 0.0, f64::INFINITY, 64).is_err());
    }

    #[test]
    fn test_pitch_names() {
        assert_eq!(pitch_name(40), "E2");
        assert_eq!(pitch_name(60), "C4");
        assert_eq!(pitch_name(23), "B0");
        assert_eq!(pitch_name(0), "C-1");
        assert_eq!(pitch_name(127), "G9");
        assert_eq!(pitch_name(200), "??");
    }
}

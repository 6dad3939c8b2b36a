//! Equal-tempered note table and nearest-note lookup
//!
//! 85 notes from C0 to C8, A4 = 440 Hz.

use once_cell::sync::Lazy;
use std::fmt;

/// A named note and its equal-tempered frequency
#[derive(Debug, Clone)]
pub struct Note {
    /// Note name (e.g., "A4", "C#3")
    pub name: String,
    /// Frequency in Hz
    pub frequency: f64,
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Number of entries in the table (C0..=C8)
pub const NOTE_COUNT: usize = 85;

/// Semitone index of A4 counted from C0
const A4_INDEX: i32 = 57;

/// Computed once, read-only afterwards.
static NOTES: Lazy<Vec<Note>> = Lazy::new(|| {
    (0..NOTE_COUNT)
        .map(|i| Note {
            name: format!("{}{}", NOTE_NAMES[i % 12], i / 12),
            frequency: 440.0 * 2.0_f64.powf((i as i32 - A4_INDEX) as f64 / 12.0),
        })
        .collect()
});

/// The full note table, C0 first
pub fn notes() -> &'static [Note] {
    &NOTES
}

/// Nearest note to a frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteMatch {
    pub name: &'static str,

    /// Reference frequency of the note
    pub frequency: f64,

    /// Signed deviation, positive = sharp
    pub cents: f64,
}

impl NoteMatch {
    pub fn in_tune(&self) -> bool {
        self.cents.abs() < 1.0
    }
}

impl fmt::Display for NoteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.in_tune() {
            write!(f, "{} (in tune)", self.name)
        } else {
            write!(f, "{} ({:+.0} cents)", self.name, self.cents)
        }
    }
}

/// Deviation of `freq` from `reference` in cents
pub fn cents_between(freq: f64, reference: f64) -> f64 {
    1200.0 * (freq / reference).log2()
}

/// Find the note with the smallest absolute cents deviation
///
/// Returns `None` for frequencies that are not positive and finite.
pub fn nearest_note(freq: f64) -> Option<NoteMatch> {
    if !(freq.is_finite() && freq > 0.0) {
        return None;
    }

    NOTES
        .iter()
        .map(|note| (note, cents_between(freq, note.frequency)))
        .min_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(note, cents)| NoteMatch {
            name: note.name.as_str(),
            frequency: note.frequency,
            cents,
        })
}

//! Timed pitch events and harmonic spans.

use serde::{Deserialize, Serialize};

/// A single timed pitch event, the atomic output unit of every generated
/// stream (melody, keyboard, bass, pad, drums).
///
/// `pitch` is an integer MIDI number (or a General MIDI percussion key for
/// drum streams). Times are absolute seconds from the start of the piece;
/// `end` is always strictly greater than `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    pub velocity: u8,
    pub start: f64,
    pub end: f64,
}

impl NoteEvent {
    pub fn new(pitch: u8, velocity: u8, start: f64, end: f64) -> Self {
        Self {
            pitch,
            velocity,
            start,
            end,
        }
    }

    /// Sounding length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One bar's harmonic context: the voiced chord tones and the time span
/// they govern. Spans produced for a piece tile it exactly, bar-aligned,
/// with no gaps or overlaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSpan {
    /// Chord-tone MIDI pitches, ascending.
    pub pitches: Vec<u8>,
    pub start: f64,
    pub end: f64,
}

impl ChordSpan {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A named accompaniment stream together with its General MIDI assignment,
/// ready for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentPart {
    pub name: String,
    /// General MIDI program number (ignored for drum parts).
    pub program: u8,
    /// Drum parts address the GM percussion map instead of a program.
    pub is_drums: bool,
    pub events: Vec<NoteEvent>,
}

//! Chord progression selection, voicing, and keyboard figuration.
//!
//! The two decisions taken here - which catalog progression to use and
//! whether a bar's triad gets seventh coloring - are the engine's only
//! random choices. Both draw from the caller-supplied generator, so a
//! composition is reproducible from its seed.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tunesmith_spec::{ChordSpan, NoteEvent};

use crate::theory::{self, ChordQuality};

/// Probability that a bar's plain triad is colored to a seventh chord.
pub const SEVENTH_PROBABILITY: f64 = 0.25;

// Release gaps keeping figuration notes off the next onset.
const BLOCK_RELEASE: f64 = 0.05;
const BROKEN_RELEASE: f64 = 0.04;

/// A bar-aligned chord sequence with one symbol per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSequence {
    pub spans: Vec<ChordSpan>,
    /// Chord symbols parallel to `spans`, e.g. "Am7".
    pub symbols: Vec<String>,
}

/// Pick a progression appropriate for the style from the catalog.
pub fn select_progression(style: &str, rng: &mut Pcg32) -> &'static [usize] {
    let candidates = theory::progression_candidates(style);
    candidates[rng.gen_range(0..candidates.len())]
}

/// Build one chord per bar for an N-bar piece.
///
/// Each bar takes the progression degree `bar mod len`, mapped to the
/// diatonic chord quality of the major scale. With probability
/// [`SEVENTH_PROBABILITY`] per bar (independent draws) a major triad
/// becomes maj7 and a minor triad m7. Chords are voiced one octave below
/// the key's mid-register root so they sit under the melody.
pub fn build_chord_sequence(
    key: &str,
    style: &str,
    bars: u32,
    bpm: f64,
    rng: &mut Pcg32,
) -> ChordSequence {
    let root_midi = theory::key_root_midi(key, 4) as i32;
    let major = theory::scale_intervals("major");
    let progression = select_progression(style, rng);
    let seconds_per_bar = (60.0 / bpm) * 4.0;

    let mut spans = Vec::with_capacity(bars as usize);
    let mut symbols = Vec::with_capacity(bars as usize);
    for bar in 0..bars as usize {
        let degree = progression[bar % progression.len()];
        let chord_root = root_midi + major[degree % 7];
        let mut quality = theory::DIATONIC_QUALITIES[degree % 7];

        // Occasionally add a 7th for color
        let colored = rng.gen::<f64>() < SEVENTH_PROBABILITY;
        if colored && matches!(quality, ChordQuality::Major | ChordQuality::Minor) {
            quality = quality.with_seventh();
        }

        let pitches = theory::chord_pitches(chord_root - 12, quality);
        symbols.push(format!(
            "{}{}",
            theory::NOTE_NAMES[chord_root.rem_euclid(12) as usize],
            quality.symbol_suffix()
        ));
        spans.push(ChordSpan {
            pitches,
            start: bar as f64 * seconds_per_bar,
            end: (bar + 1) as f64 * seconds_per_bar,
        });
    }

    ChordSequence { spans, symbols }
}

/// How the keyboard part spells out each bar's chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardPattern {
    /// All chord tones struck together for the full bar.
    Block,
    /// Tones spread evenly across the bar, ascending.
    Arpeggiated,
    /// Alberti-style low-high-mid-high cycle in quarter notes.
    Broken,
}

/// The keyboard pattern a style favors.
pub fn keyboard_pattern_for_style(style: &str) -> KeyboardPattern {
    match style {
        "ballad" => KeyboardPattern::Broken,
        _ => KeyboardPattern::Arpeggiated,
    }
}

/// Render a chord sequence into keyboard note events.
pub fn render_keyboard(
    spans: &[ChordSpan],
    pattern: KeyboardPattern,
    velocity: u8,
) -> Vec<NoteEvent> {
    let mut events = Vec::new();

    for span in spans {
        let duration = span.duration();
        let mut tones = span.pitches.clone();
        tones.sort_unstable();
        if tones.is_empty() {
            continue;
        }

        match pattern {
            KeyboardPattern::Block => {
                for &pitch in &tones {
                    events.push(NoteEvent::new(
                        pitch,
                        velocity,
                        span.start,
                        span.end - BLOCK_RELEASE,
                    ));
                }
            }
            KeyboardPattern::Arpeggiated => {
                let step = duration / tones.len() as f64;
                for (i, &pitch) in tones.iter().enumerate() {
                    events.push(NoteEvent::new(
                        pitch,
                        velocity,
                        span.start + i as f64 * step,
                        span.end - BLOCK_RELEASE,
                    ));
                }
            }
            KeyboardPattern::Broken => {
                let beat = duration / 4.0;
                // low, high, mid, high; fewer than 3 tones just repeat
                let cycle: Vec<u8> = if tones.len() >= 3 {
                    vec![
                        tones[0],
                        tones[tones.len() - 1],
                        tones[1],
                        tones[tones.len() - 1],
                    ]
                } else {
                    tones.iter().copied().cycle().take(4).collect()
                };
                for (i, &pitch) in cycle.iter().take(4).enumerate() {
                    let start = span.start + i as f64 * beat;
                    events.push(NoteEvent::new(
                        pitch,
                        velocity.saturating_sub(5),
                        start,
                        start + beat - BROKEN_RELEASE,
                    ));
                }
            }
        }
    }

    events
}

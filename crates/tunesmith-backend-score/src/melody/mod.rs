//! Theory-driven melody composition.
//!
//! Four rule layers turn an analysis result into a melody:
//! [`MotifDeveloper`] transforms the seed motif across bars, the tension
//! cycle controls the target register per bar, [`CadenceFormula`] places
//! half/authentic cadences at structural points, and
//! [`VoiceLeadingEngine`] smooths note-to-note motion over the whole
//! piece.

use tunesmith_spec::{AnalysisResult, NoteEvent};

use crate::analysis::FALLBACK_MOTIF;
use crate::theory::{self, ScaleContext};

mod cadence;
mod motif;
mod voice_leading;

#[cfg(test)]
mod tests;

pub use cadence::CadenceFormula;
pub use motif::MotifDeveloper;
pub use voice_leading::VoiceLeadingEngine;

/// Vocal register band (A3..C6) the melody stays inside.
pub const VOCAL_RANGE: (u8, u8) = (57, 84);

const BEATS_PER_BAR: f64 = 4.0;
const MELODY_VELOCITY: u8 = 80;

// Repeating 8-bar tension cycle; higher values push the register up.
const TENSION_CYCLE: [u8; 8] = [2, 3, 4, 5, 6, 7, 9, 2];

fn tension(bar: usize) -> u8 {
    TENSION_CYCLE[bar % TENSION_CYCLE.len()]
}

/// Target register centre for a tension level.
fn register_centre(level: u8) -> u8 {
    match level {
        1 => 60,
        2 => 62,
        3 => 64,
        4 => 65,
        5 => 67,
        6 => 69,
        7 => 71,
        8 => 72,
        9 => 74,
        10 => 76,
        _ => 65,
    }
}

/// Scale pitches for the melody: the style scale restricted to the vocal
/// band, falling back to the unrestricted major scale when the restriction
/// leaves nothing.
pub(crate) fn build_scale_context(root: u8, scale_name: &str) -> ScaleContext {
    let (lo, hi) = VOCAL_RANGE;
    let mut pitches = theory::scale_pitches(root, scale_name);
    pitches.retain(|p| (lo..=hi).contains(p));
    if pitches.is_empty() {
        pitches = theory::scale_pitches(root, "major");
    }
    ScaleContext::from_pitches(root, pitches)
}

/// Compose the melody for `bars` bars of 4/4 at `bpm`.
///
/// The full pipeline, in order: build the scale context, normalize the
/// motif, plan one motif variant per bar, fit each bar to its tension
/// register and apply cadence overrides, assign rhythm, smooth the whole
/// pitch sequence, and lay the notes out contiguously in seconds.
pub fn compose_melody(
    analysis: &AnalysisResult,
    bars: u32,
    bpm: f64,
    style: &str,
) -> Vec<NoteEvent> {
    let beat_sec = 60.0 / bpm;
    let bars = bars as usize;

    let root_pc = theory::note_name_to_pc(&analysis.key).unwrap_or(0);
    let root = 60 + root_pc;
    let scale_name = theory::scale_for_style(style).unwrap_or(&analysis.scale);
    let scale = build_scale_context(root, scale_name);

    let seed = clip_or_pad(&analysis.motif_notes);
    let developer = MotifDeveloper::new(seed, &scale);
    let smoother = VoiceLeadingEngine::new(&scale);
    let cadence = CadenceFormula::new(&scale);

    let bar_motifs = developer.plan(bars, root);
    let style_rhythm = theory::rhythm_pattern(style);
    let motif_rhythm = &analysis.motif_rhythm;

    let mut all_pitches: Vec<u8> = Vec::new();
    let mut all_beats: Vec<f64> = Vec::new();

    for bar in 0..bars {
        let centre = register_centre(tension(bar));
        let mut bar_pitches = fit_to_register(&bar_motifs[bar], &scale, centre);

        if let Some(target) = cadence.cadence_pitch(bar, bars) {
            if let Some(last) = bar_pitches.last_mut() {
                *last = target;
            }
        }

        let bar_beats = if !motif_rhythm.is_empty() && motif_rhythm.len() >= bar_pitches.len() {
            // Recorded rhythm, rescaled so the bar sums to 4 beats
            let prefix = &motif_rhythm[..bar_pitches.len()];
            let total: f64 = prefix.iter().sum();
            let factor = BEATS_PER_BAR / total.max(0.01);
            prefix.iter().map(|d| d * factor).collect()
        } else {
            fit_rhythm(style_rhythm, bar_pitches.len())
        };

        all_pitches.extend(bar_pitches);
        all_beats.extend(bar_beats);
    }

    let all_pitches = smoother.smooth(&all_pitches);

    let mut events = Vec::with_capacity(all_pitches.len());
    let mut t = 0.0;
    for (pitch, beats) in all_pitches.into_iter().zip(all_beats) {
        let end = t + beats * beat_sec;
        events.push(NoteEvent::new(pitch, MELODY_VELOCITY, t, end));
        t = end;
    }
    events
}

/// Normalize a motif to 4-8 pitches: truncate long motifs to the first 8,
/// cycle short ones out to 8, and substitute the fixed fallback for an
/// empty one.
fn clip_or_pad(pitches: &[u8]) -> Vec<u8> {
    if pitches.is_empty() {
        return FALLBACK_MOTIF.to_vec();
    }
    if pitches.len() >= 4 {
        pitches.iter().copied().take(8).collect()
    } else {
        pitches.iter().copied().cycle().take(8).collect()
    }
}

/// Transpose a bar's pitches by whole octaves so their mean lands near
/// `centre`, then snap every pitch onto the scale.
fn fit_to_register(pitches: &[u8], scale: &ScaleContext, centre: u8) -> Vec<u8> {
    if pitches.is_empty() || scale.is_empty() {
        return pitches.to_vec();
    }
    let mean: f64 = pitches.iter().map(|&p| p as f64).sum::<f64>() / pitches.len() as f64;
    let centre = centre as f64;
    let shift: i32 = if mean < centre - 6.0 {
        12
    } else if mean > centre + 6.0 {
        -12
    } else {
        0
    };
    pitches
        .iter()
        .map(|&p| scale.nearest(p as i32 + shift))
        .collect()
}

/// A rhythm of `note_count` beat values summing to one 4/4 bar, cycled
/// from the style template and floored at a sixteenth.
fn fit_rhythm(pattern: &[f64], note_count: usize) -> Vec<f64> {
    if note_count == 0 {
        return Vec::new();
    }
    let extended: Vec<f64> = pattern.iter().copied().cycle().take(note_count).collect();
    let total: f64 = extended.iter().sum();
    let factor = BEATS_PER_BAR / total.max(0.01);
    extended.iter().map(|d| (d * factor).max(0.25)).collect()
}

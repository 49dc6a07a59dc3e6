//! Seed analysis: key detection and motif segmentation.
//!
//! The audio front-end hands over a voiced pitch contour plus a tempo
//! estimate; this module turns them into the [`AnalysisResult`] the
//! composition stages consume. Decoding, pitch tracking, and beat tracking
//! themselves happen outside this crate.

use tunesmith_spec::{AnalysisResult, AnalysisSource, PitchContour};

use crate::theory::{self, freq_to_midi, NOTE_NAMES};

mod key;
mod motif;


pub use key::{detect_key, major_profile_at, minor_profile_at};
pub use motif::{segment_motif, FALLBACK_MOTIF, MIN_NOTE_SECONDS};

/// Below this key confidence the analysis is tagged low-confidence and the
/// request's own settings win.
pub const MIN_CONFIDENCE: f64 = 0.4;

/// Below this key confidence the melody falls back to the pentatonic
/// major scale, which stays consonant over an uncertain key.
const PENTATONIC_CONFIDENCE: f64 = 0.55;

/// Run the full feature analysis over a pitch contour.
///
/// Builds a pitch-class histogram from the voiced frames, detects the key,
/// segments the motif, and tags the result with a source reflecting how
/// trustworthy the detection was. A contour without any usable voiced
/// frame yields the fixed default result with source
/// [`AnalysisSource::NoPitch`].
pub fn analyze_features(contour: &PitchContour, tempo_bpm: f64) -> AnalysisResult {
    let voiced_pitches: Vec<u8> = contour
        .voiced
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v)
        .filter_map(|(i, _)| contour.f0_hz.get(i).copied().flatten())
        .filter(|f| f.is_finite() && *f > 0.0)
        .map(freq_to_midi)
        .collect();

    if voiced_pitches.is_empty() {
        return AnalysisResult {
            key: "C".to_string(),
            scale: "major".to_string(),
            bpm: 120.0,
            motif_notes: vec![60, 62, 64, 65, 67],
            motif_rhythm: vec![0.5; 5],
            confidence: 0.0,
            source: AnalysisSource::NoPitch,
            notes: "No pitch detected, using defaults".to_string(),
        };
    }

    let mut histogram = [0.0f64; 12];
    for &pitch in &voiced_pitches {
        histogram[(pitch % 12) as usize] += 1.0;
    }

    let estimate = detect_key(&histogram);
    let key_name = NOTE_NAMES[estimate.root_pc as usize];
    let scale = if estimate.confidence < PENTATONIC_CONFIDENCE {
        "pentatonic_major"
    } else {
        estimate.mode.scale_name()
    };

    let (motif_notes, motif_rhythm) = segment_motif(contour);

    let source = if estimate.confidence >= MIN_CONFIDENCE {
        AnalysisSource::Recording
    } else {
        AnalysisSource::LowConfidence
    };
    let motif_desc: Vec<String> = motif_notes
        .iter()
        .map(|&m| theory::midi_to_note_name(m))
        .collect();
    let notes = format!(
        "Key: {} {} (confidence {:.0}%), BPM: {}, motif: {}",
        key_name,
        estimate.mode.scale_name(),
        estimate.confidence * 100.0,
        tempo_bpm,
        motif_desc.join(", "),
    );

    AnalysisResult {
        key: key_name.to_string(),
        scale: scale.to_string(),
        bpm: tempo_bpm,
        motif_notes,
        motif_rhythm,
        confidence: estimate.confidence,
        source,
        notes,
    }
}

/// Analysis result to use when no recording is provided: a style-specific
/// default motif template transposed to the requested key.
pub fn default_analysis(key: &str, bpm: f64, style: &str) -> AnalysisResult {
    // Default motif contours around middle C
    let template: &[u8] = match style {
        // gentle stepwise
        "ballad" => &[60, 62, 64, 62, 60, 59, 57, 60],
        // pentatonic rise
        "cpop" => &[60, 62, 64, 67, 69, 67, 64, 62],
        // arching phrase
        _ => &[60, 64, 65, 67, 65, 64, 62, 60],
    };

    let root_offset = theory::note_name_to_pc(key).unwrap_or(0);
    let motif: Vec<u8> = template
        .iter()
        .map(|&n| ((n as u32 + root_offset as u32) % 128) as u8)
        .collect();
    let rhythm = vec![0.5; motif.len()];

    AnalysisResult {
        key: key.to_string(),
        scale: "major".to_string(),
        bpm,
        motif_notes: motif,
        motif_rhythm: rhythm,
        confidence: 0.0,
        source: AnalysisSource::Default,
        notes: format!("Default motif template (style: {})", style),
    }
}

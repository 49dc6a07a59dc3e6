//! Tests for the melody composer and its rule layers.

use pretty_assertions::assert_eq;
use tunesmith_spec::{AnalysisResult, AnalysisSource};

use super::{build_scale_context, compose_melody, CadenceFormula, MotifDeveloper, VoiceLeadingEngine};
use crate::analysis::default_analysis;
use crate::theory::ScaleContext;

fn c_major() -> ScaleContext {
    build_scale_context(60, "major")
}

fn c_pentatonic() -> ScaleContext {
    build_scale_context(60, "pentatonic_major")
}

#[test]
fn identity_returns_seed() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![60, 64, 67], &scale);
    assert_eq!(dev.identity(), vec![60, 64, 67]);
}

#[test]
fn transpose_stays_in_scale() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![60, 62, 64], &scale);
    for &p in &dev.transpose(5) {
        assert!(scale.pitches().contains(&p), "pitch {} off-scale", p);
    }
}

#[test]
fn inversion_mirrors_around_first_note() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![60, 64, 67], &scale);
    // Mirrored pre-snap values are [60, 56, 53]; the vocal band starts at
    // 57, so both low notes snap up to A3.
    let inverted = dev.inversion();
    assert_eq!(inverted, vec![60, 57, 57]);
    for &p in &inverted {
        assert!(scale.pitches().contains(&p));
    }
}

#[test]
fn inversion_of_single_note_is_identity() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![64], &scale);
    assert_eq!(dev.inversion(), vec![64]);
}

#[test]
fn sequence_down_shifts_scale_positions() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![64, 65, 67], &scale);
    // Two scale steps below E4, F4, G4 in C major: C4, D4, E4
    assert_eq!(dev.sequence_down(2), vec![60, 62, 64]);
}

#[test]
fn resolution_walks_toward_tonic() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![60, 62, 64, 65, 67], &scale);
    let resolved = dev.resolution(60);
    assert_eq!(resolved.len(), 5);
    // Starts from the last seed note and descends stepwise
    assert_eq!(resolved, vec![67, 65, 64, 62, 60]);
}

#[test]
fn plan_assigns_stages_to_bar_groups() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![60, 62, 64, 65], &scale);
    let plan = dev.plan(10, 60);
    assert_eq!(plan.len(), 10);
    // 10 bars / 5 stages = 2 bars per stage
    assert_eq!(plan[0], plan[1]);
    assert_eq!(plan[0], dev.identity());
    assert_eq!(plan[2], dev.transpose(5));
    assert_eq!(plan[8], dev.resolution(60));
}

#[test]
fn plan_repeats_resolution_past_fifth_group() {
    let scale = c_major();
    let dev = MotifDeveloper::new(vec![60, 62, 64, 65], &scale);
    let plan = dev.plan(4, 60);
    // bars_per_stage clamps to 1, so bars 0-3 walk the first four stages
    assert_eq!(plan.len(), 4);
    assert_eq!(plan[0], dev.identity());
    assert_eq!(plan[3], dev.inversion());

    let long_plan = dev.plan(12, 60);
    // 12 / 5 = 2 bars per stage; bars 10 and 11 stay on resolution
    assert_eq!(long_plan[10], dev.resolution(60));
    assert_eq!(long_plan[11], dev.resolution(60));
}

#[test]
fn smooth_steps_back_after_large_leap() {
    let scale = c_major();
    let engine = VoiceLeadingEngine::new(&scale);
    // Octave drop from C5 to C4 must not pass through unchanged
    let out = engine.smooth(&[72, 60]);
    assert_eq!(out[0], 72);
    assert_ne!(out[1], 60);
    // One scale step back up from C4 is D4
    assert_eq!(out[1], 62);
}

#[test]
fn smooth_resolves_seventh_scale_position_to_tonic() {
    let scale = c_major();
    let engine = VoiceLeadingEngine::new(&scale);
    let seventh = scale.pitch_at(6);
    let out = engine.smooth(&[seventh, 64]);
    // The tonic octave nearest E4 is C4
    assert_eq!(out[1], 60);
}

#[test]
fn smooth_bridges_augmented_second() {
    let scale = c_pentatonic();
    let engine = VoiceLeadingEngine::new(&scale);
    // E4 to G4 is 3 semitones across adjacent pentatonic steps
    let out = engine.smooth(&[64, 67]);
    assert_eq!(out, vec![64, 69]);
}

#[test]
fn smooth_keeps_stepwise_motion() {
    let scale = c_major();
    let engine = VoiceLeadingEngine::new(&scale);
    let input = vec![60, 62, 64, 65];
    assert_eq!(engine.smooth(&input), input);
}

#[test]
fn smooth_short_sequences_unchanged() {
    let scale = c_major();
    let engine = VoiceLeadingEngine::new(&scale);
    assert_eq!(engine.smooth(&[]), Vec::<u8>::new());
    assert_eq!(engine.smooth(&[71]), vec![71]);
}

#[test]
fn cadence_fires_only_at_structural_bars() {
    let scale = c_major();
    let cadence = CadenceFormula::new(&scale);
    for bar in 0..8 {
        let pitch = cadence.cadence_pitch(bar, 8);
        match bar {
            // Half cadence lands on the dominant
            3 => assert_eq!(pitch, Some(67)),
            // Authentic cadence lands on the tonic
            7 => assert_eq!(pitch, Some(60)),
            _ => assert_eq!(pitch, None, "bar {}", bar),
        }
    }
}

#[test]
fn compose_melody_is_contiguous_and_spans_piece() {
    let analysis = default_analysis("C", 120.0, "pop");
    let events = compose_melody(&analysis, 8, 120.0, "pop");
    assert!(!events.is_empty());

    for pair in events.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
    // 8 bars * 4 beats * 0.5 s/beat
    let total = events.last().unwrap().end;
    assert!((total - 16.0).abs() < 1e-9, "span {}", total);
}

#[test]
fn compose_melody_stays_near_vocal_band() {
    let analysis = default_analysis("D", 100.0, "cpop");
    let events = compose_melody(&analysis, 16, 100.0, "cpop");
    for event in &events {
        // Register fitting keeps bars inside A3..C6; smoothing may nudge a
        // resolved tonic one step past the edge, never further.
        assert!(
            (48..=96).contains(&event.pitch),
            "pitch {} far out of band",
            event.pitch
        );
        assert!(event.end > event.start);
    }
}

#[test]
fn compose_melody_uses_request_tempo() {
    let analysis = default_analysis("C", 90.0, "ballad");
    let events = compose_melody(&analysis, 4, 90.0, "ballad");
    let total = events.last().unwrap().end;
    // 4 bars * 4 beats * (60/90) s/beat
    assert!((total - 4.0 * 4.0 * (60.0 / 90.0)).abs() < 1e-9);
}

#[test]
fn compose_melody_handles_empty_motif() {
    let analysis = AnalysisResult {
        key: "C".to_string(),
        scale: "major".to_string(),
        bpm: 120.0,
        motif_notes: vec![],
        motif_rhythm: vec![],
        confidence: 0.0,
        source: AnalysisSource::Request,
        notes: String::new(),
    };
    let events = compose_melody(&analysis, 8, 120.0, "pop");
    assert!(!events.is_empty());
    for pair in events.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

#[test]
fn compose_melody_pads_short_motif() {
    let analysis = AnalysisResult {
        key: "C".to_string(),
        scale: "major".to_string(),
        bpm: 120.0,
        motif_notes: vec![60, 64],
        motif_rhythm: vec![0.5, 0.5],
        confidence: 0.0,
        source: AnalysisSource::Request,
        notes: String::new(),
    };
    let events = compose_melody(&analysis, 2, 120.0, "pop");
    // Two seed notes are cycled out to 8 per bar
    assert_eq!(events.len(), 16);
}

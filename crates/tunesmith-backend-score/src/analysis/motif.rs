//! Motif segmentation from a voiced pitch contour.
//!
//! Groups consecutive voiced frames at the same rounded pitch into note
//! events, then normalizes the result to a 4-8 note motif with quantized
//! beat durations.

use tunesmith_spec::PitchContour;

use crate::theory::freq_to_midi;

/// Minimum sustained duration for a frame run to count as a note.
pub const MIN_NOTE_SECONDS: f64 = 0.1;

/// Motif returned when segmentation finds no notes at all.
pub const FALLBACK_MOTIF: [u8; 4] = [60, 62, 64, 65];

const FALLBACK_BEATS: f64 = 0.5;

/// Segment a voiced contour into motif pitches and beat durations.
///
/// A running accumulator tracks the current rounded MIDI pitch and its
/// accumulated duration; a pitch change or a voicing drop closes the note
/// when it lasted at least [`MIN_NOTE_SECONDS`]. The note list is then
/// clipped to the first 8 entries, or cycled out to 8 when fewer than 4
/// survived, and durations are quantized to the quarter-beat grid.
pub fn segment_motif(contour: &PitchContour) -> (Vec<u8>, Vec<f64>) {
    let frame_dur = contour.frame_duration();

    let mut notes: Vec<(u8, f64)> = Vec::new();
    let mut current: Option<u8> = None;
    let mut dur = 0.0;

    for (i, &voiced) in contour.voiced.iter().enumerate() {
        let freq = contour.f0_hz.get(i).copied().flatten();
        match freq {
            Some(f) if voiced && f.is_finite() && f > 0.0 => {
                let midi = freq_to_midi(f);
                if current == Some(midi) {
                    dur += frame_dur;
                } else {
                    if let Some(pitch) = current {
                        if dur >= MIN_NOTE_SECONDS {
                            notes.push((pitch, dur));
                        }
                    }
                    current = Some(midi);
                    dur = frame_dur;
                }
            }
            _ => {
                if let Some(pitch) = current {
                    if dur >= MIN_NOTE_SECONDS {
                        notes.push((pitch, dur));
                    }
                }
                current = None;
                dur = 0.0;
            }
        }
    }
    if let Some(pitch) = current {
        if dur >= MIN_NOTE_SECONDS {
            notes.push((pitch, dur));
        }
    }

    if notes.is_empty() {
        return (
            FALLBACK_MOTIF.to_vec(),
            vec![FALLBACK_BEATS; FALLBACK_MOTIF.len()],
        );
    }

    let notes = clip_or_cycle(notes);

    let pitches = notes.iter().map(|&(p, _)| p).collect();
    let rhythms = normalize_durations(notes.iter().map(|&(_, d)| d));
    (pitches, rhythms)
}

/// Keep the first 8 notes; short lists below 4 notes are cycled out to 8
/// so even a one-note hum yields a usable motif.
fn clip_or_cycle(notes: Vec<(u8, f64)>) -> Vec<(u8, f64)> {
    if notes.len() >= 4 {
        notes.into_iter().take(8).collect()
    } else {
        notes.iter().copied().cycle().take(8).collect()
    }
}

/// Normalize note durations in seconds to quantized beat fractions:
/// relative to the longest note (floored at 0.25 s), snapped to the
/// quarter-beat grid, and clamped to [0.25, 2.0] beats.
fn normalize_durations(durations: impl Iterator<Item = f64>) -> Vec<f64> {
    let durations: Vec<f64> = durations.collect();
    let longest = durations.iter().cloned().fold(0.0f64, f64::max);
    let beat_scale = 1.0 / longest.max(0.25);
    durations
        .iter()
        .map(|d| ((d * beat_scale * 4.0).round() / 4.0).clamp(0.25, 2.0))
        .collect()
}

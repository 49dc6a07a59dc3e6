//! Accompaniment arrangement: keyboard, pad, bass, and drum streams.
//!
//! Every stream follows the bar-aligned chord sequence with a
//! style-specific rhythmic template. Event times and velocities are fixed
//! per pattern; the chord sequence itself is the only seeded input.

use rand_pcg::Pcg32;
use tunesmith_spec::{ChordSpan, InstrumentPart, NoteEvent};

use crate::harmony::{self, ChordSequence};
use crate::theory::gm;

/// Keyboard figuration velocity.
const KEYBOARD_VELOCITY: u8 = 62;

/// Length of one drum hit in seconds.
const DRUM_HIT_SECONDS: f64 = 0.08;

/// Bass line following the chord roots, one octave below the voicing.
pub fn bass_line(spans: &[ChordSpan], style: &str, bpm: f64) -> Vec<NoteEvent> {
    let spb = 60.0 / bpm;
    let half_bar = spb * 2.0;
    let mut events = Vec::new();

    for span in spans {
        let Some(&lowest) = span.pitches.iter().min() else {
            continue;
        };
        let root = lowest.saturating_sub(12);
        let fifth = root + 7;

        match style {
            "ballad" => {
                // Simple whole-bar root
                events.push(NoteEvent::new(root, 75, span.start, span.end - 0.1));
            }
            "cpop" => {
                // Root + 5th split at half-bar
                events.push(NoteEvent::new(
                    root,
                    82,
                    span.start,
                    span.start + half_bar - 0.05,
                ));
                events.push(NoteEvent::new(
                    fifth,
                    72,
                    span.start + half_bar,
                    span.end - 0.05,
                ));
            }
            _ => {
                // Beat 1 root, fifth pushed onto the off-beat after beat 3
                events.push(NoteEvent::new(
                    root,
                    85,
                    span.start,
                    span.start + spb - 0.05,
                ));
                let offbeat = span.start + spb * 2.5;
                events.push(NoteEvent::new(fifth, 72, offbeat, offbeat + spb - 0.05));
            }
        }
    }

    events
}

/// Drum part on the General MIDI percussion map.
pub fn drum_pattern(bars: u32, bpm: f64, style: &str) -> Vec<NoteEvent> {
    let spb = 60.0 / bpm;
    let eighth = spb / 2.0;
    let sixteenth = spb / 4.0;
    let mut events = Vec::new();

    let mut hit = |key: u8, time: f64, velocity: u8| {
        events.push(NoteEvent::new(key, velocity, time, time + DRUM_HIT_SECONDS));
    };

    for bar in 0..bars as usize {
        let bs = bar as f64 * spb * 4.0;

        match style {
            "ballad" => {
                // Soft: kick on 1, snare on 2 and 4, light 8th hats
                hit(gm::KICK, bs, 75);
                hit(gm::SNARE, bs + spb, 60);
                hit(gm::SNARE, bs + spb * 3.0, 65);
                for i in 0..8 {
                    hit(gm::HIHAT_CLOSED, bs + i as f64 * eighth, 40);
                }
                if bar % 4 == 0 {
                    hit(gm::CRASH, bs, 80);
                }
            }
            "cpop" => {
                // Double kick, strong snare, 16th hats
                hit(gm::KICK, bs, 90);
                hit(gm::KICK, bs + spb * 2.0, 80);
                hit(gm::SNARE, bs + spb, 78);
                hit(gm::SNARE, bs + spb * 3.0, 82);
                for i in 0..16 {
                    let vel = if i % 2 == 0 { 55 } else { 38 };
                    hit(gm::HIHAT_CLOSED, bs + i as f64 * sixteenth, vel);
                }
                if bar % 4 == 0 {
                    hit(gm::CRASH, bs, 90);
                }
            }
            _ => {
                // Standard pop with a syncopated kick
                hit(gm::KICK, bs, 92);
                hit(gm::KICK, bs + spb * 2.5, 75);
                hit(gm::SNARE, bs + spb, 82);
                hit(gm::SNARE, bs + spb * 3.0, 85);
                for i in 0..8 {
                    let vel = if i % 2 == 0 { 62 } else { 48 };
                    hit(gm::HIHAT_CLOSED, bs + i as f64 * eighth, vel);
                }
                // Open hat on the up-beat of every second bar
                if bar % 2 == 1 {
                    hit(gm::HIHAT_OPEN, bs + spb * 1.5, 50);
                }
                if bar % 4 == 0 {
                    hit(gm::CRASH, bs, 88);
                }
            }
        }
    }

    events
}

/// Sustained pad an octave above the chord voicing, with a slight attack
/// delay and early release so onsets never collide with the keyboard.
pub fn string_pad(spans: &[ChordSpan], style: &str) -> Vec<NoteEvent> {
    let velocity = if style == "ballad" { 50 } else { 42 };
    let mut events = Vec::new();

    for span in spans {
        for &pitch in &span.pitches {
            let upper = pitch + 12;
            if upper <= 84 {
                events.push(NoteEvent::new(
                    upper,
                    velocity,
                    span.start + 0.15,
                    span.end - 0.08,
                ));
            }
        }
    }

    events
}

/// Assemble the full accompaniment: keyboard, pad, bass, and drum parts
/// over one seeded chord sequence.
pub fn build_accompaniment(
    key: &str,
    style: &str,
    bars: u32,
    bpm: f64,
    rng: &mut Pcg32,
) -> (Vec<InstrumentPart>, ChordSequence) {
    let chords = harmony::build_chord_sequence(key, style, bars, bpm, rng);

    let keyboard_pattern = harmony::keyboard_pattern_for_style(style);
    let keyboard = harmony::render_keyboard(&chords.spans, keyboard_pattern, KEYBOARD_VELOCITY);

    let parts = vec![
        InstrumentPart {
            name: "keyboard".to_string(),
            program: gm::PIANO,
            is_drums: false,
            events: keyboard,
        },
        InstrumentPart {
            name: "pad".to_string(),
            program: gm::STRING_ENSEMBLE,
            is_drums: false,
            events: string_pad(&chords.spans, style),
        },
        InstrumentPart {
            name: "bass".to_string(),
            program: gm::ELECTRIC_BASS,
            is_drums: false,
            events: bass_line(&chords.spans, style, bpm),
        },
        InstrumentPart {
            name: "drums".to_string(),
            program: 0,
            is_drums: true,
            events: drum_pattern(bars, bpm, style),
        },
    ];

    (parts, chords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::component_rng;
    use pretty_assertions::assert_eq;

    fn chords(style: &str, bars: u32) -> ChordSequence {
        let mut rng = component_rng(9, "harmony");
        harmony::build_chord_sequence("C", style, bars, 120.0, &mut rng)
    }

    #[test]
    fn ballad_bass_holds_whole_bars() {
        let seq = chords("ballad", 4);
        let events = bass_line(&seq.spans, "ballad", 120.0);
        assert_eq!(events.len(), 4);
        for (event, span) in events.iter().zip(&seq.spans) {
            assert_eq!(event.pitch, span.pitches.iter().min().unwrap() - 12);
            assert_eq!(event.velocity, 75);
            assert_eq!(event.start, span.start);
            assert!((event.end - (span.end - 0.1)).abs() < 1e-9);
        }
    }

    #[test]
    fn pop_bass_adds_offbeat_fifth() {
        let seq = chords("pop", 2);
        let events = bass_line(&seq.spans, "pop", 120.0);
        assert_eq!(events.len(), 4);
        let root = events[0].pitch;
        assert_eq!(events[1].pitch, root + 7);
        // Fifth lands on the off-beat after beat 3 (2.5 beats in)
        assert!((events[1].start - 2.5 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn cpop_bass_splits_at_half_bar() {
        let seq = chords("cpop", 1);
        let events = bass_line(&seq.spans, "cpop", 120.0);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].pitch, events[0].pitch + 7);
        assert!((events[1].start - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pop_drums_have_kick_snare_hats_and_crash() {
        let events = drum_pattern(4, 120.0, "pop");
        let at_zero: Vec<u8> = events
            .iter()
            .filter(|e| e.start == 0.0)
            .map(|e| e.pitch)
            .collect();
        assert!(at_zero.contains(&gm::KICK));
        assert!(at_zero.contains(&gm::CRASH));
        assert!(at_zero.contains(&gm::HIHAT_CLOSED));

        // Snares on beats 2 and 4 of every bar
        let snares = events.iter().filter(|e| e.pitch == gm::SNARE).count();
        assert_eq!(snares, 8);

        // Open hat only on odd bars
        let open_hats: Vec<f64> = events
            .iter()
            .filter(|e| e.pitch == gm::HIHAT_OPEN)
            .map(|e| e.start)
            .collect();
        assert_eq!(open_hats.len(), 2);
        assert!((open_hats[0] - (2.0 + 1.5 * 0.5)).abs() < 1e-9);
    }

    #[test]
    fn crash_accents_every_fourth_bar() {
        for style in ["pop", "ballad", "cpop"] {
            let events = drum_pattern(8, 120.0, style);
            let crashes: Vec<f64> = events
                .iter()
                .filter(|e| e.pitch == gm::CRASH)
                .map(|e| e.start)
                .collect();
            assert_eq!(crashes, vec![0.0, 8.0], "style {}", style);
        }
    }

    #[test]
    fn drum_hits_are_uniform_length() {
        let events = drum_pattern(2, 100.0, "cpop");
        for event in &events {
            assert!((event.duration() - DRUM_HIT_SECONDS).abs() < 1e-12);
        }
    }

    #[test]
    fn pad_sits_an_octave_up_with_soft_edges() {
        let seq = chords("ballad", 4);
        let events = string_pad(&seq.spans, "ballad");
        assert!(!events.is_empty());
        for event in &events {
            assert!(event.pitch <= 84);
            assert_eq!(event.velocity, 50);
        }
        // Attack delay and early release within the first bar
        let first = &events[0];
        assert!((first.start - 0.15).abs() < 1e-9);
        assert!((first.end - (seq.spans[0].end - 0.08)).abs() < 1e-9);
    }

    #[test]
    fn accompaniment_has_four_parts() {
        let mut rng = component_rng(21, "harmony");
        let (parts, chords) = build_accompaniment("G", "pop", 8, 110.0, &mut rng);
        assert_eq!(parts.len(), 4);
        assert_eq!(
            parts.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["keyboard", "pad", "bass", "drums"]
        );
        assert!(parts.iter().all(|p| !p.events.is_empty()));
        assert!(parts[3].is_drums);
        assert_eq!(chords.spans.len(), 8);
        assert_eq!(chords.symbols.len(), 8);
    }
}

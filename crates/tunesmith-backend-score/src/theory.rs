//! Music theory reference tables and conversion utilities.
//!
//! Static catalogs (scales, chord types, progressions, rhythm patterns,
//! General MIDI numbers) plus the pitch-name and frequency conversions the
//! rest of the engine builds on. Everything here is read-only data; the
//! composition stages own all decisions.

use serde::{Deserialize, Serialize};

/// Note names by pitch class (sharps).
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Parse a note name ("C", "F#", "Bb") into a pitch class 0-11.
pub fn note_name_to_pc(name: &str) -> Option<u8> {
    let pc = match name {
        "C" => 0,
        "C#" | "Db" => 1,
        "D" => 2,
        "D#" | "Eb" => 3,
        "E" => 4,
        "F" => 5,
        "F#" | "Gb" => 6,
        "G" => 7,
        "G#" | "Ab" => 8,
        "A" => 9,
        "A#" | "Bb" => 10,
        "B" => 11,
        _ => return None,
    };
    Some(pc)
}

/// Convert a note name plus octave to a MIDI number. Middle C (C4) = 60.
/// Unknown names fall back to C.
pub fn note_name_to_midi(name: &str, octave: i32) -> u8 {
    let pc = note_name_to_pc(name).unwrap_or(0) as i32;
    ((octave + 1) * 12 + pc).clamp(0, 127) as u8
}

/// MIDI number for the root of a key in the given octave.
pub fn key_root_midi(key: &str, octave: i32) -> u8 {
    note_name_to_midi(key, octave)
}

/// Convert a MIDI note number to a note name (e.g., 60 -> "C4").
pub fn midi_to_note_name(midi: u8) -> String {
    let octave = (midi / 12) as i32 - 1;
    let note_idx = (midi % 12) as usize;
    format!("{}{}", NOTE_NAMES[note_idx], octave)
}

/// Convert a frequency in Hz to the nearest MIDI note number.
///
/// Uses the standard formula n = 69 + 12 * log2(f / 440).
pub fn freq_to_midi(freq: f64) -> u8 {
    let note = 69.0 + 12.0 * (freq / 440.0).log2();
    note.round().clamp(0.0, 127.0) as u8
}

/// Semitone intervals from the root for each scale in the catalog.
/// Unknown names resolve to major.
pub fn scale_intervals(name: &str) -> &'static [i32] {
    match name {
        "minor" => &[0, 2, 3, 5, 7, 8, 10],
        "pentatonic_major" => &[0, 2, 4, 7, 9],
        "pentatonic_minor" => &[0, 3, 5, 7, 10],
        // Major pentatonic, very common in C-pop
        "cpop" => &[0, 2, 4, 7, 9],
        _ => &[0, 2, 4, 5, 7, 9, 11],
    }
}

/// Scale name preferred by a style, or `None` for styles outside the
/// catalog (callers then keep the analysis scale).
pub fn scale_for_style(style: &str) -> Option<&'static str> {
    match style {
        "ballad" | "pop" => Some("major"),
        "cpop" => Some("cpop"),
        _ => None,
    }
}

/// Melodic rhythm template for a style, in beats (quarter note = 1.0).
/// Unknown styles get the pop pattern.
pub fn rhythm_pattern(style: &str) -> &'static [f64] {
    match style {
        "ballad" => &[2.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 2.0],
        "cpop" => &[1.0, 0.5, 0.5, 1.0, 1.0, 0.5, 0.5, 1.0],
        _ => &[
            0.5, 0.5, 1.0, 0.5, 0.5, 0.5, 0.5, 1.0, 0.5, 0.5, 1.0, 0.5, 0.5,
        ],
    }
}

/// Chord quality, mapping to a fixed interval stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
    Sus4,
}

impl ChordQuality {
    /// Semitone intervals from the chord root.
    pub fn intervals(self) -> &'static [i32] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Sus4 => &[0, 5, 7],
        }
    }

    /// Chord symbol suffix, e.g. "" for major, "m7" for minor seventh.
    pub fn symbol_suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Sus4 => "sus4",
        }
    }

    /// The seventh-chord coloring of a plain triad; other qualities are
    /// returned unchanged.
    pub fn with_seventh(self) -> ChordQuality {
        match self {
            ChordQuality::Major => ChordQuality::Major7,
            ChordQuality::Minor => ChordQuality::Minor7,
            other => other,
        }
    }
}

/// Chord quality for each degree of the major scale (I ii iii IV V7 vi vii).
pub const DIATONIC_QUALITIES: [ChordQuality; 7] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Minor,
    ChordQuality::Major,
    ChordQuality::Dominant7,
    ChordQuality::Minor,
    ChordQuality::Diminished,
];

/// Common chord progressions as 0-indexed scale degrees.
pub const PROGRESSION_CATALOG: [(&str, &[usize]); 5] = [
    // Most popular pop
    ("I_V_vi_IV", &[0, 4, 5, 3]),
    // Emotional / ballad
    ("vi_IV_I_V", &[5, 3, 0, 4]),
    // C-pop common
    ("I_IV_vi_V", &[0, 3, 5, 4]),
    // Classic pop
    ("I_vi_IV_V", &[0, 5, 3, 4]),
    // Simple cadence
    ("I_IV_V_I", &[0, 3, 4, 0]),
];

fn progression_by_name(name: &str) -> Option<&'static [usize]> {
    PROGRESSION_CATALOG
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, degrees)| *degrees)
}

/// Candidate progressions for a style, in preference order. Unknown styles
/// get the whole catalog.
pub fn progression_candidates(style: &str) -> Vec<&'static [usize]> {
    let names: &[&str] = match style {
        "ballad" => &["vi_IV_I_V", "I_V_vi_IV"],
        "cpop" => &["I_IV_vi_V", "I_V_vi_IV", "vi_IV_I_V"],
        "pop" => &[
            "I_V_vi_IV",
            "vi_IV_I_V",
            "I_IV_vi_V",
            "I_vi_IV_V",
            "I_IV_V_I",
        ],
        _ => {
            return PROGRESSION_CATALOG
                .iter()
                .map(|(_, degrees)| *degrees)
                .collect()
        }
    };
    names.iter().filter_map(|n| progression_by_name(n)).collect()
}

/// All MIDI pitches of a scale across octaves -2..+4 relative to the root,
/// ascending and deduplicated, clamped to the MIDI range.
pub fn scale_pitches(root_midi: u8, scale_name: &str) -> Vec<u8> {
    let intervals = scale_intervals(scale_name);
    let mut pitches = Vec::new();
    for oct_offset in -2..4i32 {
        for &interval in intervals {
            let midi = root_midi as i32 + interval + oct_offset * 12;
            if (0..=127).contains(&midi) {
                pitches.push(midi as u8);
            }
        }
    }
    pitches.sort_unstable();
    pitches.dedup();
    pitches
}

/// MIDI pitches for a chord built on `root`, clamped to the MIDI range.
pub fn chord_pitches(root: i32, quality: ChordQuality) -> Vec<u8> {
    quality
        .intervals()
        .iter()
        .map(|&i| (root + i).clamp(0, 127) as u8)
        .collect()
}

/// General MIDI program and percussion key numbers used by the arranger.
pub mod gm {
    /// Acoustic Grand Piano.
    pub const PIANO: u8 = 0;
    /// String Ensemble 1, used for the sustained pad part.
    pub const STRING_ENSEMBLE: u8 = 48;
    /// Electric Bass (finger).
    pub const ELECTRIC_BASS: u8 = 33;

    // GM percussion map (channel 10)
    pub const KICK: u8 = 36;
    pub const SNARE: u8 = 38;
    pub const HIHAT_CLOSED: u8 = 42;
    pub const HIHAT_OPEN: u8 = 46;
    pub const CRASH: u8 = 49;
}

/// The key root plus the scale pitches available within a fixed register.
/// Built once per composition run and read-only afterwards; all melodic
/// rule layers snap their output through it.
#[derive(Debug, Clone)]
pub struct ScaleContext {
    root: u8,
    pitches: Vec<u8>,
}

impl ScaleContext {
    /// Wrap an already-filtered ascending pitch list.
    pub fn from_pitches(root: u8, pitches: Vec<u8>) -> Self {
        Self { root, pitches }
    }

    pub fn root(&self) -> u8 {
        self.root
    }

    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Scale pitch at `index`, clamped to the valid range. Falls back to
    /// the root for an empty context.
    pub fn pitch_at(&self, index: isize) -> u8 {
        if self.pitches.is_empty() {
            return self.root;
        }
        let clamped = index.clamp(0, self.pitches.len() as isize - 1) as usize;
        self.pitches[clamped]
    }

    /// The scale pitch nearest to `pitch` by absolute distance; ties go to
    /// the lower candidate. An empty context returns the input clamped to
    /// the MIDI range.
    pub fn nearest(&self, pitch: i32) -> u8 {
        let mut best: Option<(i32, u8)> = None;
        for &p in &self.pitches {
            let dist = (p as i32 - pitch).abs();
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, p));
            }
        }
        match best {
            Some((_, p)) => p,
            None => pitch.clamp(0, 127) as u8,
        }
    }

    /// Index of the scale pitch nearest to `pitch`; 0 for an empty context.
    pub fn index_of_nearest(&self, pitch: i32) -> usize {
        let nearest = self.nearest(pitch);
        self.pitches
            .iter()
            .position(|&p| p == nearest)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_note_name_to_midi() {
        assert_eq!(note_name_to_midi("C", 4), 60);
        assert_eq!(note_name_to_midi("A", 4), 69);
        assert_eq!(note_name_to_midi("Bb", 3), 58);
        assert_eq!(note_name_to_midi("F#", 4), 66);
        // Unknown names fall back to C
        assert_eq!(note_name_to_midi("H", 4), 60);
    }

    #[test]
    fn test_midi_to_note_name() {
        assert_eq!(midi_to_note_name(60), "C4");
        assert_eq!(midi_to_note_name(69), "A4");
        assert_eq!(midi_to_note_name(61), "C#4");
    }

    #[test]
    fn test_freq_to_midi() {
        assert_eq!(freq_to_midi(440.0), 69);
        assert_eq!(freq_to_midi(261.626), 60);
        assert_eq!(freq_to_midi(220.0), 57);
    }

    #[test]
    fn test_scale_pitches_sorted_and_in_key() {
        let pitches = scale_pitches(60, "major");
        assert!(pitches.windows(2).all(|w| w[0] < w[1]));
        // Every pitch is a major-scale member relative to C
        for &p in &pitches {
            let pc = (p as i32 - 60).rem_euclid(12);
            assert!([0, 2, 4, 5, 7, 9, 11].contains(&pc), "pc {} off-scale", pc);
        }
    }

    #[test]
    fn test_scale_intervals_unknown_is_major() {
        assert_eq!(scale_intervals("no_such_scale"), scale_intervals("major"));
    }

    #[test]
    fn test_chord_pitches() {
        assert_eq!(chord_pitches(60, ChordQuality::Major), vec![60, 64, 67]);
        assert_eq!(
            chord_pitches(57, ChordQuality::Minor7),
            vec![57, 60, 64, 67]
        );
    }

    #[test]
    fn test_diatonic_qualities() {
        assert_eq!(DIATONIC_QUALITIES[0], ChordQuality::Major);
        assert_eq!(DIATONIC_QUALITIES[4], ChordQuality::Dominant7);
        assert_eq!(DIATONIC_QUALITIES[6], ChordQuality::Diminished);
    }

    #[test]
    fn test_progression_candidates_per_style() {
        assert_eq!(progression_candidates("ballad").len(), 2);
        assert_eq!(progression_candidates("cpop").len(), 3);
        assert_eq!(progression_candidates("pop").len(), 5);
        // Unknown style gets the whole catalog
        assert_eq!(progression_candidates("jazz").len(), 5);
    }

    #[test]
    fn test_rhythm_pattern_unknown_style_is_pop() {
        assert_eq!(rhythm_pattern("unknown"), rhythm_pattern("pop"));
    }

    #[test]
    fn test_nearest_ties_go_low() {
        let ctx = ScaleContext::from_pitches(60, vec![60, 62, 64]);
        // 61 is equidistant from 60 and 62
        assert_eq!(ctx.nearest(61), 60);
        assert_eq!(ctx.nearest(63), 62);
        assert_eq!(ctx.nearest(100), 64);
    }

    #[test]
    fn test_pitch_at_clamps() {
        let ctx = ScaleContext::from_pitches(60, vec![60, 62, 64]);
        assert_eq!(ctx.pitch_at(-3), 60);
        assert_eq!(ctx.pitch_at(10), 64);
        assert_eq!(ctx.pitch_at(1), 62);
    }

    #[test]
    fn test_empty_context_falls_back() {
        let ctx = ScaleContext::from_pitches(60, vec![]);
        assert_eq!(ctx.nearest(72), 72);
        assert_eq!(ctx.pitch_at(5), 60);
        assert_eq!(ctx.index_of_nearest(72), 0);
    }
}

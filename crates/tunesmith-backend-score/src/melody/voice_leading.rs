//! Voice-leading smoothing over a pitch sequence.

use crate::theory::ScaleContext;

/// Interval at or above which a melodic move counts as a leap (major sixth).
const LEAP_SEMITONES: i32 = 9;

/// Smooths note-to-note motion according to tonal voice-leading rules.
pub struct VoiceLeadingEngine<'a> {
    scale: &'a ScaleContext,
}

impl<'a> VoiceLeadingEngine<'a> {
    pub fn new(scale: &'a ScaleContext) -> Self {
        Self { scale }
    }

    /// Process pitches left to right. Each decision sees only the previous
    /// output pitch; the first matching rule wins and its result becomes
    /// the next "previous".
    pub fn smooth(&self, pitches: &[u8]) -> Vec<u8> {
        if pitches.len() <= 1 {
            return pitches.to_vec();
        }
        let mut out = Vec::with_capacity(pitches.len());
        out.push(pitches[0]);
        for &cur in &pitches[1..] {
            let prev = *out.last().unwrap();
            out.push(self.apply_rules(prev, cur));
        }
        out
    }

    fn apply_rules(&self, prev: u8, cur: u8) -> u8 {
        // Rule 1: leading-tone resolution. The seventh scale position pulls
        // to the tonic octave nearest the current pitch.
        if self.scale.len() >= 7 {
            let leading = self.scale.pitch_at(6);
            if prev == leading {
                let cur_i = cur as i32;
                let mut target = self.scale.root() as i32;
                while target < cur_i - 6 {
                    target += 12;
                }
                while target > cur_i + 6 {
                    target -= 12;
                }
                return target.clamp(0, 127) as u8;
            }
        }

        // Rule 2: after a large leap, step back in the opposite direction
        let leap = cur as i32 - prev as i32;
        if leap.abs() >= LEAP_SEMITONES {
            let direction: isize = if cur > prev { -1 } else { 1 };
            let idx = self.scale.index_of_nearest(cur as i32) as isize;
            return self.scale.pitch_at(idx + direction);
        }

        // Rule 3: bridge an augmented second between adjacent scale steps
        let idx_prev = self.scale.index_of_nearest(prev as i32);
        let idx_cur = self.scale.index_of_nearest(cur as i32);
        if idx_prev.abs_diff(idx_cur) == 1 && leap.abs() == 3 {
            let direction: isize = if cur > prev { 1 } else { -1 };
            return self.scale.pitch_at(idx_cur as isize + direction);
        }

        cur
    }
}

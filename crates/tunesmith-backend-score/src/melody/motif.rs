//! Motif development: five transformations of a seed motif.

use crate::theory::ScaleContext;

/// Transforms a seed motif through five development stages. Operators are
/// pure: each returns a fresh pitch sequence and leaves the seed untouched.
pub struct MotifDeveloper<'a> {
    motif: Vec<u8>,
    scale: &'a ScaleContext,
}

impl<'a> MotifDeveloper<'a> {
    pub fn new(motif: Vec<u8>, scale: &'a ScaleContext) -> Self {
        Self { motif, scale }
    }

    fn snap(&self, pitch: i32) -> u8 {
        self.scale.nearest(pitch)
    }

    /// The seed unchanged.
    pub fn identity(&self) -> Vec<u8> {
        self.motif.clone()
    }

    /// Exact transposition, snapped back onto the scale.
    pub fn transpose(&self, semitones: i32) -> Vec<u8> {
        self.motif
            .iter()
            .map(|&p| self.snap(p as i32 + semitones))
            .collect()
    }

    /// Each note shifted down by `step` scale positions.
    pub fn sequence_down(&self, step: usize) -> Vec<u8> {
        self.motif
            .iter()
            .map(|&p| {
                let idx = self.scale.index_of_nearest(p as i32) as isize;
                self.scale.pitch_at(idx - step as isize)
            })
            .collect()
    }

    /// Mirror intervals around the first note, snapped onto the scale.
    /// Seeds shorter than two notes come back unchanged.
    pub fn inversion(&self) -> Vec<u8> {
        if self.motif.len() < 2 {
            return self.motif.clone();
        }
        let root = self.motif[0] as i32;
        self.motif
            .iter()
            .map(|&p| self.snap(root - (p as i32 - root)))
            .collect()
    }

    /// Stepwise walk from the seed's last note toward the tonic, one scale
    /// position per output note, emitting the pitch before each step.
    pub fn resolution(&self, tonic: u8) -> Vec<u8> {
        let start = self.motif.last().copied().unwrap_or(tonic);
        let mut cur = self.snap(start as i32);
        let mut out = Vec::with_capacity(self.motif.len());
        for _ in &self.motif {
            out.push(cur);
            let idx = self.scale.index_of_nearest(cur as i32) as isize;
            if cur > tonic {
                cur = self.scale.pitch_at(idx - 1);
            } else if cur < tonic {
                cur = self.scale.pitch_at(idx + 1);
            }
        }
        out
    }

    /// One motif variant per bar, walking the five stages in order:
    /// identity, transpose up a fourth, sequence down, inversion,
    /// resolution. Bars beyond the fifth group repeat the resolution.
    pub fn plan(&self, bars: usize, tonic: u8) -> Vec<Vec<u8>> {
        let stages = [
            self.identity(),
            self.transpose(5),
            self.sequence_down(2),
            self.inversion(),
            self.resolution(tonic),
        ];
        let bars_per_stage = (bars / stages.len()).max(1);
        (0..bars)
            .map(|bar| stages[(bar / bars_per_stage).min(stages.len() - 1)].clone())
            .collect()
    }
}

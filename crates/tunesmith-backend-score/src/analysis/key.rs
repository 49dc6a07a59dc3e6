//! Krumhansl-Schmuckler key detection.
//!
//! Correlates a 12-bin pitch-class histogram against the fixed
//! perceptual-stability profiles at every rotation and keeps the best of
//! the 24 candidates.

use tunesmith_spec::{KeyEstimate, Mode};

// Krumhansl (1990), Cognitive Foundations of Musical Pitch.
// Perceptual stability of each pitch class relative to the tonic.
const MAJOR_PROFILE: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];
const MINOR_PROFILE: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Pearson correlation between two 12-bin vectors. Returns 0.0 when either
/// side has zero variance, so degenerate inputs never produce NaN.
fn pearson(a: &[f64; 12], b: &[f64; 12]) -> f64 {
    let mean_a = a.iter().sum::<f64>() / 12.0;
    let mean_b = b.iter().sum::<f64>() / 12.0;

    let mut num = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..12 {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        num += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let den = (var_a * var_b).sqrt();
    if den == 0.0 {
        return 0.0;
    }
    num / den
}

/// Detect the key of a pitch-class histogram (index 0 = C).
///
/// Tries all 12 tonic rotations against both profiles, major before minor,
/// and keeps the first candidate with the strictly best correlation. The
/// winning correlation r maps to confidence (r + 1) / 2. An all-zero
/// histogram short-circuits to C major with confidence 0.
pub fn detect_key(histogram: &[f64; 12]) -> KeyEstimate {
    if histogram.iter().sum::<f64>() == 0.0 {
        return KeyEstimate {
            root_pc: 0,
            mode: Mode::Major,
            confidence: 0.0,
        };
    }

    let mut best_r = -2.0;
    let mut best_pc = 0u8;
    let mut best_mode = Mode::Major;

    for pc in 0..12usize {
        // Rotate the histogram so `pc` aligns with the profile's tonic
        let rotated: [f64; 12] = std::array::from_fn(|i| histogram[(i + pc) % 12]);

        let r_major = pearson(&rotated, &MAJOR_PROFILE);
        let r_minor = pearson(&rotated, &MINOR_PROFILE);

        if r_major > best_r {
            best_r = r_major;
            best_pc = pc as u8;
            best_mode = Mode::Major;
        }
        if r_minor > best_r {
            best_r = r_minor;
            best_pc = pc as u8;
            best_mode = Mode::Minor;
        }
    }

    KeyEstimate {
        root_pc: best_pc,
        mode: best_mode,
        confidence: ((best_r + 1.0) / 2.0).clamp(0.0, 1.0),
    }
}

/// The major profile, rotated so pitch class `pc` is the tonic. Test
/// fixture builder, also useful to synthesize reference histograms.
pub fn major_profile_at(pc: usize) -> [f64; 12] {
    std::array::from_fn(|i| MAJOR_PROFILE[(i + 12 - pc % 12) % 12])
}

/// The minor profile, rotated so pitch class `pc` is the tonic.
pub fn minor_profile_at(pc: usize) -> [f64; 12] {
    std::array::from_fn(|i| MINOR_PROFILE[(i + 12 - pc % 12) % 12])
}

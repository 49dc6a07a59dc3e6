//! Analysis types: what the audio front-end hands to the composition engine.

use serde::{Deserialize, Serialize};

/// Mode of a detected key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// The scale catalog name matching this mode.
    pub fn scale_name(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

/// Result of key detection over a pitch-class histogram. Immutable;
/// produced once per analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEstimate {
    /// Tonic pitch class, 0-11 with 0 = C.
    pub root_pc: u8,
    pub mode: Mode,
    /// Detection confidence in [0, 1].
    pub confidence: f64,
}

/// Where an analysis result came from, which gates how much the engine
/// trusts it over the request's own key/tempo settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Confident detection from a recording.
    Recording,
    /// A recording was analyzed but key confidence was poor.
    LowConfidence,
    /// The recording carried no voiced frames at all.
    NoPitch,
    /// No recording; style-default motif template.
    Default,
    /// Built directly from a composition request.
    Request,
}

/// Everything the composition engine needs from the analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Key root note name, e.g. "G".
    pub key: String,
    /// Scale catalog name, e.g. "major" or "pentatonic_major".
    pub scale: String,
    /// Tempo in beats per minute, already folded into range by the
    /// front-end.
    pub bpm: f64,
    /// Motif pitches as MIDI numbers.
    pub motif_notes: Vec<u8>,
    /// Beat duration for each motif note (quarter note = 1.0).
    pub motif_rhythm: Vec<f64>,
    /// Key-detection confidence in [0, 1].
    pub confidence: f64,
    pub source: AnalysisSource,
    /// Human-readable summary for the presentation layer.
    #[serde(default)]
    pub notes: String,
}

/// Per-frame voiced pitch contour from the audio front-end, the raw
/// material for motif segmentation. `voiced` and `f0_hz` are parallel;
/// unvoiced frames may carry `None` (or a non-finite value) in `f0_hz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchContour {
    pub voiced: Vec<bool>,
    pub f0_hz: Vec<Option<f64>>,
    pub sample_rate: u32,
    pub hop_length: u32,
}

impl PitchContour {
    /// Duration of one analysis frame in seconds.
    pub fn frame_duration(&self) -> f64 {
        self.hop_length as f64 / self.sample_rate as f64
    }
}

//! Composition request and result types.

use serde::{Deserialize, Serialize};

use crate::event::{InstrumentPart, NoteEvent};
use crate::report::ProductionLog;

/// A request for one composition run. Style and key are free-form names;
/// engines resolve unknown values to catalog defaults rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositionRequest {
    /// Key root note name, e.g. "C", "F#", "Bb".
    pub key: String,
    /// Tempo in beats per minute.
    pub bpm: f64,
    /// Style name: "pop", "ballad", or "cpop".
    pub style: String,
    /// Number of 4/4 bars to compose.
    pub bars: u32,
    /// Seed motif pitches, when the caller already has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif_notes: Option<Vec<u8>>,
    /// Beat durations parallel to `motif_notes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motif_rhythm: Option<Vec<f64>>,
}

/// Stem level decisions handed to the mixing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixSettings {
    /// Melody stem offset in dB (reference level 0).
    pub melody_db: f64,
    /// Accompaniment stem offset in dB.
    pub accompaniment_db: f64,
}

/// Everything one composition run produces: the melody stream, the
/// accompaniment parts, the chord symbols per bar, mix decisions, and the
/// production log for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionResult {
    pub melody: Vec<NoteEvent>,
    pub parts: Vec<InstrumentPart>,
    /// One chord symbol per bar, e.g. "Am7".
    pub chord_symbols: Vec<String>,
    pub mix: MixSettings,
    pub log: ProductionLog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_roundtrip() {
        let req = CompositionRequest {
            key: "G".to_string(),
            bpm: 96.0,
            style: "ballad".to_string(),
            bars: 8,
            motif_notes: Some(vec![67, 69, 71]),
            motif_rhythm: Some(vec![1.0, 0.5, 0.5]),
        };
        let json = serde_json::to_string(&req).unwrap();
        let back: CompositionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, back);
    }

    #[test]
    fn test_request_optional_motif_omitted() {
        let req: CompositionRequest =
            serde_json::from_str(r#"{"key":"C","bpm":120.0,"style":"pop","bars":4}"#).unwrap();
        assert_eq!(req.motif_notes, None);
        assert_eq!(req.motif_rhythm, None);
    }
}

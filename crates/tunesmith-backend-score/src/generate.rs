//! Main entry point for score generation.
//!
//! [`Composer`] is the capability contract every engine variant
//! implements: produce a [`CompositionResult`] from a
//! [`CompositionRequest`] and a seed. [`ComposerRegistry`] is an explicit
//! name-to-engine map the caller constructs and passes around; there is no
//! process-wide registry. [`TheoryComposer`] is the deterministic
//! theory-driven engine.

use std::collections::HashMap;

use thiserror::Error;

use tunesmith_spec::{
    AnalysisResult, AnalysisSource, CompositionRequest, CompositionResult, MixSettings,
    ProductionLog, StageError,
};

use crate::analysis::default_analysis;
use crate::arrange;
use crate::melody::compose_melody;
use crate::rng::component_rng;

/// Error type for score generation.
#[derive(Debug, Error)]
pub enum ProduceError {
    /// The request asked for an empty piece.
    #[error("bar count must be at least 1")]
    EmptyPiece,

    /// Tempo is zero, negative, or not finite.
    #[error("tempo must be a positive number of beats per minute, got {0}")]
    InvalidTempo(f64),

    /// No engine registered under the requested name.
    #[error("unknown composition engine '{0}'")]
    UnknownEngine(String),
}

impl StageError for ProduceError {
    fn code(&self) -> &'static str {
        match self {
            ProduceError::EmptyPiece => "SCORE_001",
            ProduceError::InvalidTempo(_) => "SCORE_002",
            ProduceError::UnknownEngine(_) => "SCORE_003",
        }
    }

    fn stage(&self) -> &'static str {
        "score"
    }
}

/// Capability contract for composition engines: turn a request (plus an
/// optional analysis of a recorded seed) into a full composition.
pub trait Composer {
    /// Engine identifier, e.g. "theory_v1".
    fn name(&self) -> &'static str;

    /// Version string, e.g. "1.0.0".
    fn version(&self) -> &'static str;

    /// Engine description.
    fn description(&self) -> String {
        format!("{} v{}", self.name(), self.version())
    }

    /// Execute composition. `analysis` carries the analyzed recording when
    /// one exists; engines fall back to style defaults without it.
    fn compose(
        &self,
        request: &CompositionRequest,
        analysis: Option<AnalysisResult>,
        seed: u32,
    ) -> Result<CompositionResult, ProduceError>;
}

/// Explicit name-to-engine map, constructed by the caller and handed to
/// whatever orchestrates composition.
#[derive(Default)]
pub struct ComposerRegistry {
    engines: HashMap<&'static str, Box<dyn Composer>>,
}

impl ComposerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with the built-in engines.
    pub fn with_default_engines() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TheoryComposer));
        registry
    }

    pub fn register(&mut self, engine: Box<dyn Composer>) {
        self.engines.insert(engine.name(), engine);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Composer> {
        self.engines.get(name).map(|e| e.as_ref())
    }

    /// Look an engine up, failing with a coded error for unknown names.
    pub fn require(&self, name: &str) -> Result<&dyn Composer, ProduceError> {
        self.get(name)
            .ok_or_else(|| ProduceError::UnknownEngine(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.engines.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Deterministic theory-driven composition engine: motif development,
/// tension-curve register control, voice leading, and cadence placement
/// over a style-appropriate chord progression.
pub struct TheoryComposer;

impl Composer for TheoryComposer {
    fn name(&self) -> &'static str {
        "theory_v1"
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn description(&self) -> String {
        "Deterministic theory-based composer with motif development".to_string()
    }

    fn compose(
        &self,
        request: &CompositionRequest,
        analysis: Option<AnalysisResult>,
        seed: u32,
    ) -> Result<CompositionResult, ProduceError> {
        if request.bars == 0 {
            return Err(ProduceError::EmptyPiece);
        }
        if !(request.bpm.is_finite() && request.bpm > 0.0) {
            return Err(ProduceError::InvalidTempo(request.bpm));
        }

        let mut log = ProductionLog::new();
        let mut analysis = self.resolve_analysis(request, analysis, &mut log);

        // Low-trust analysis defers to the request's own settings
        if matches!(
            analysis.source,
            AnalysisSource::Default | AnalysisSource::NoPitch | AnalysisSource::LowConfidence
        ) {
            analysis.bpm = request.bpm;
            if matches!(
                analysis.source,
                AnalysisSource::Default | AnalysisSource::NoPitch
            ) {
                analysis.key = request.key.clone();
            }
        }
        let bpm = if analysis.source == AnalysisSource::Recording {
            analysis.bpm
        } else {
            request.bpm
        };
        let key = analysis.key.clone();
        let bars = request.bars;

        // Melody
        let melody = compose_melody(&analysis, bars, bpm, &request.style);
        log.add_for_bars(
            "Melody Composer",
            format!("Theory-based composition, {} bars", bars),
            describe_development(bars),
            format!("1-{}", bars),
        );

        // Harmony + accompaniment
        let mut rng = component_rng(seed, "harmony");
        let (parts, chords) = arrange::build_accompaniment(&key, &request.style, bars, bpm, &mut rng);
        log.add_for_bars(
            "Arranger",
            "Multi-track accompaniment",
            format!(
                "Keyboard / Pad / Bass / Drums; style {}; {} bars; opening {}",
                request.style, bars, chords.symbols[0],
            ),
            format!("1-{}", bars),
        );

        // Producer mix decisions
        let mix = mix_settings(&request.style, &analysis);
        let peak_bar = bars * 3 / 4;
        log.add(
            "Producer",
            "Mix decisions",
            format!(
                "Melody {:+.0} dB, Accompaniment {:+.0} dB; dynamic peak bar {}",
                mix.melody_db, mix.accompaniment_db, peak_bar,
            ),
        );

        Ok(CompositionResult {
            melody,
            parts,
            chord_symbols: chords.symbols,
            mix,
            log,
        })
    }
}

impl TheoryComposer {
    /// Resolve the analysis the melody will build on, logging how it was
    /// obtained. Without a supplied analysis, a request motif is promoted
    /// directly, and failing that the style default template steps in.
    fn resolve_analysis(
        &self,
        request: &CompositionRequest,
        analysis: Option<AnalysisResult>,
        log: &mut ProductionLog,
    ) -> AnalysisResult {
        if let Some(analysis) = analysis {
            let confidence_pct = format!("{:.0}%", analysis.confidence * 100.0);
            if analysis.confidence >= crate::analysis::MIN_CONFIDENCE {
                log.add(
                    "Audio Analyst",
                    "Analyze recording",
                    format!(
                        "Detected {} {}, BPM {}, confidence {}",
                        analysis.key, analysis.scale, analysis.bpm, confidence_pct,
                    ),
                );
            } else {
                log.add(
                    "Audio Analyst",
                    "Analyze recording (low confidence)",
                    format!(
                        "Detected {} {}, confidence {}, deferring to request key {}",
                        analysis.key, analysis.scale, confidence_pct, request.key,
                    ),
                );
            }
            return analysis;
        }

        if let Some(motif_notes) = &request.motif_notes {
            if !motif_notes.is_empty() {
                log.add(
                    "Audio Analyst",
                    "Motif supplied with request",
                    format!("{} seed notes in {}", motif_notes.len(), request.key),
                );
                let motif_rhythm = request
                    .motif_rhythm
                    .clone()
                    .unwrap_or_else(|| vec![0.5; motif_notes.len()]);
                return AnalysisResult {
                    key: request.key.clone(),
                    scale: "major".to_string(),
                    bpm: request.bpm,
                    motif_notes: motif_notes.clone(),
                    motif_rhythm,
                    confidence: 0.0,
                    source: AnalysisSource::Request,
                    notes: String::new(),
                };
            }
        }

        log.add(
            "Audio Analyst",
            "No recording input",
            format!(
                "Using request settings: {} major, {} BPM, style {}",
                request.key, request.bpm, request.style,
            ),
        );
        default_analysis(&request.key, request.bpm, &request.style)
    }
}

/// Stem level decisions: the melody is the reference stem, pushed up a
/// touch when the seed recording was confidently analyzed; the
/// accompaniment sits a few dB behind it.
fn mix_settings(style: &str, analysis: &AnalysisResult) -> MixSettings {
    let melody_db = if analysis.confidence >= 0.7 { 1.0 } else { 0.0 };
    let accompaniment_db = if style == "ballad" { -3.0 } else { -2.0 };
    MixSettings {
        melody_db,
        accompaniment_db,
    }
}

/// Human-readable summary of the motif development arc across the piece.
fn describe_development(bars: u32) -> String {
    let half = bars / 2;
    format!(
        "Original motif (bars 1-{}) -> transpose up a 4th (bars {}-{}) -> \
         sequence down (bars {}-{}) -> inversion (bars {}-{}) -> resolution (bar {}); \
         half cadence bar {}; authentic cadence bar {}",
        (bars / 5).max(1),
        bars / 5 + 1,
        half.max(1),
        half + 1,
        bars * 3 / 4,
        bars * 3 / 4 + 1,
        bars.saturating_sub(1).max(1),
        bars,
        half.max(1),
        bars,
    )
}

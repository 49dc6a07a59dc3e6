//! Tunesmith Score Backend - Deterministic Melody and Accompaniment Generation
//!
//! This crate turns a short musical seed (key, tempo, motif, style) into a
//! structured multi-bar melody plus matching accompaniment, expressed as
//! timed pitch events ready for an external rendering layer.
//!
//! # Pipeline
//!
//! - **Analysis**: Krumhansl-Schmuckler key detection over a pitch-class
//!   histogram, and segmentation of a voiced pitch contour into motif notes
//! - **Melody**: motif development across bars, tension-driven register
//!   control, cadence placement, and voice-leading smoothing
//! - **Harmony**: style-appropriate chord progression selection, voicing,
//!   and keyboard figuration
//! - **Arrangement**: bass, drum, and pad streams keyed by style
//!
//! # Determinism
//!
//! Every operation is deterministic given the same request and seed. The
//! only random decisions - progression selection and chord coloring - draw
//! from a PCG32 generator seeded via BLAKE3 derivation from the request's
//! `u32` seed, so identical inputs produce identical output.
//!
//! # Example
//!
//! ```ignore
//! use tunesmith_backend_score::generate::ComposerRegistry;
//! use tunesmith_spec::CompositionRequest;
//!
//! let request = CompositionRequest {
//!     key: "C".to_string(),
//!     bpm: 120.0,
//!     style: "pop".to_string(),
//!     bars: 8,
//!     motif_notes: None,
//!     motif_rhythm: None,
//! };
//!
//! let registry = ComposerRegistry::with_default_engines();
//! let composer = registry.get("theory_v1").unwrap();
//! let result = composer.compose(&request, None, 42)?;
//! println!("{} melody notes", result.melody.len());
//! ```
//!
//! # Module Structure
//!
//! - [`theory`]: static reference tables (scales, chords, progressions,
//!   rhythm patterns, General MIDI numbers)
//! - [`analysis`]: key detection and motif segmentation
//! - [`melody`]: the melody composer and its rule layers
//! - [`harmony`]: chord progression engine and keyboard figuration
//! - [`arrange`]: bass, drum, and pad generators
//! - [`generate`]: the composer contract, registry, and pipeline entry
//! - [`rng`]: seeded RNG construction

pub mod analysis;
pub mod arrange;
pub mod generate;
pub mod harmony;
pub mod melody;
pub mod rng;
pub mod theory;

// Re-export main types
pub use generate::{Composer, ComposerRegistry, ProduceError, TheoryComposer};

/// Crate version for backend identification.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend identifier for cache keys.
pub const BACKEND_ID: &str = "tunesmith-backend-score";

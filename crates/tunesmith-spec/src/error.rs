//! The error contract implemented by composition engine errors.

/// Implemented by every engine error type so callers can map failures to
/// stable machine-readable codes without matching on concrete variants.
pub trait StageError: std::error::Error {
    /// Stable error code, e.g. "SCORE_001".
    fn code(&self) -> &'static str;

    /// Pipeline stage the error belongs to, e.g. "score".
    fn stage(&self) -> &'static str;
}

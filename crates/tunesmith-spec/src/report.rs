//! Structured production log.
//!
//! Each pipeline stage appends one entry describing what it decided. The
//! log is purely descriptive output for the presentation layer; no
//! composition logic ever reads it back.

use serde::{Deserialize, Serialize};

/// One production decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogStep {
    /// Pipeline stage, e.g. "Melody Composer".
    pub stage: String,
    /// What was done.
    pub action: String,
    /// Outcome summary.
    pub outcome: String,
    /// Affected bar range, e.g. "1-8"; "all" when the whole piece.
    pub bars: String,
}

/// Ordered list of production decisions for one composition run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionLog {
    pub steps: Vec<LogStep>,
}

impl ProductionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step affecting the whole piece.
    pub fn add(
        &mut self,
        stage: impl Into<String>,
        action: impl Into<String>,
        outcome: impl Into<String>,
    ) {
        self.add_for_bars(stage, action, outcome, "all");
    }

    /// Append a step affecting a specific bar range.
    pub fn add_for_bars(
        &mut self,
        stage: impl Into<String>,
        action: impl Into<String>,
        outcome: impl Into<String>,
        bars: impl Into<String>,
    ) {
        self.steps.push(LogStep {
            stage: stage.into(),
            action: action.into(),
            outcome: outcome.into(),
            bars: bars.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

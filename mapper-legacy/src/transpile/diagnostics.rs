/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Shared warning accumulator threaded through every transpiler tier
//! (§4.7, §9: "each stage ... appends to a shared warning list").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub line: usize,
    pub original: String,
    pub message: String,
    pub severity: Severity,
}

/// Accumulates warnings across pipeline stages and derives the result's
/// confidence score (§4.7: starts at 1, −0.15 per error, −0.05 per warning,
/// clamped to `[0, 1]`).
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
    residual_pattern_hits: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push_info(&mut self, line: usize, original: impl Into<String>, message: impl Into<String>) {
        self.push(line, original, message, Severity::Info);
    }

    pub fn push_warning(&mut self, line: usize, original: impl Into<String>, message: impl Into<String>) {
        self.push(line, original, message, Severity::Warning);
    }

    pub fn push_error(&mut self, line: usize, original: impl Into<String>, message: impl Into<String>) {
        self.push(line, original, message, Severity::Error);
    }

    fn push(&mut self, line: usize, original: impl Into<String>, message: impl Into<String>, severity: Severity) {
        self.warnings.push(Warning { line, original: original.into(), message: message.into(), severity });
    }

    /// Registers that `count` occurrences of a residual source-dialect
    /// pattern survived the pipeline (§4.7 "further reduced by residual
    /// source-dialect patterns (each −0.05)").
    pub fn record_residual_patterns(&mut self, count: usize) {
        self.residual_pattern_hits += count;
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    pub fn confidence(&self) -> f64 {
        let mut score = 1.0;
        for warning in &self.warnings {
            score -= match warning.severity {
                Severity::Error => 0.15,
                Severity::Warning => 0.05,
                Severity::Info => 0.0,
            };
        }
        score -= self.residual_pattern_hits as f64 * 0.05;
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_starts_at_one_and_decrements_by_severity() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.confidence(), 1.0);
        diagnostics.push_warning(1, "x", "warn");
        assert!((diagnostics.confidence() - 0.95).abs() < f64::EPSILON);
        diagnostics.push_error(2, "y", "err");
        assert!((diagnostics.confidence() - 0.80).abs() < 1e-9);
    }

    #[test]
    fn confidence_clamps_at_zero() {
        let mut diagnostics = Diagnostics::new();
        for i in 0..20 {
            diagnostics.push_error(i, "x", "err");
        }
        assert_eq!(diagnostics.confidence(), 0.0);
    }

    #[test]
    fn residual_patterns_further_reduce_confidence() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record_residual_patterns(2);
        assert!((diagnostics.confidence() - 0.90).abs() < 1e-9);
    }
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Orchestrates the four-stage legacy-dialect pipeline and shapes the
//! public result (§4.7, §6 "Legacy transpile result").

use serde::{Deserialize, Serialize};

use super::diagnostics::{Diagnostics, Warning};
use super::{tier1, tier2, tier3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranspileResult {
    pub code: String,
    pub warnings: Vec<Warning>,
    pub confidence: f64,
}

/// Runs `preprocess -> tier1 -> tier2 -> tier3 -> postprocess` over one
/// fragment of legacy-dialect source and returns the translated code plus
/// the accumulated warnings and confidence score.
pub fn transpile_groovy_to_js(input: &str) -> TranspileResult {
    let mut diagnostics = Diagnostics::new();
    let code = preprocess(input);
    let code = tier1::apply(&code, &mut diagnostics);
    let code = tier2::apply(&code, &mut diagnostics);
    let code = tier3::apply(&code, &mut diagnostics);
    let code = postprocess(&code);
    record_residual_patterns(&code, &mut diagnostics);
    let confidence = diagnostics.confidence();
    TranspileResult { code, warnings: diagnostics.into_warnings(), confidence }
}

fn preprocess(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    normalized
        .lines()
        .filter(|line| !line.trim_start().starts_with("import "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn postprocess(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut blank_run = 0;
    for line in input.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 2 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

/// Patterns that tiers 1-3 intentionally leave untouched because they carry
/// no mechanical rewrite; their survival still reduces confidence (§4.7).
const RESIDUAL_MARKERS: &[&str] = &["metaClass", "Eval.me(", "GroovyShell", "@groovy"];

fn record_residual_patterns(code: &str, diagnostics: &mut Diagnostics) {
    let count = RESIDUAL_MARKERS.iter().filter(|marker| code.contains(*marker)).count();
    if count > 0 {
        diagnostics.record_residual_patterns(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_strips_imports_and_normalises_line_endings() {
        let out = preprocess("import java.util.Date\r\ndef x = 1\r\n");
        assert_eq!(out, "\ndef x = 1");
    }

    #[test]
    fn postprocess_collapses_long_blank_runs_and_trims() {
        let out = postprocess("a\n\n\n\n\nb\n\n");
        assert_eq!(out, "a\n\n\nb");
    }

    #[test]
    fn end_to_end_pipeline_runs_all_tiers() {
        let result = transpile_groovy_to_js("import foo.Bar\ndef x = list.each { it -> println(it) }\n");
        assert!(!result.code.contains("def "));
        assert!(result.code.contains("console.log"));
        assert!(result.code.contains(".forEach("));
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn residual_markers_reduce_confidence() {
        let result = transpile_groovy_to_js("x.metaClass.foo = { 1 }");
        assert!(result.confidence < 1.0);
    }

    #[test]
    fn idempotent_on_already_translated_code() {
        let first = transpile_groovy_to_js("let total = list.reduce((_a, _b) => _a + _b, 0);");
        let second = transpile_groovy_to_js(&first.code);
        assert_eq!(first.code, second.code);
    }
}

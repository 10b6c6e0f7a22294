/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Tier 3 — complex and platform-specific rewrites. Every rewrite here
//! changes runtime behaviour in some way (precision, formatting, or a stub
//! replacing a platform call), so each one records a warning (§4.7).

use regex::Regex;

use super::diagnostics::Diagnostics;

pub fn apply(input: &str, diagnostics: &mut Diagnostics) -> String {
    let code = rewrite_date_formatting(input, diagnostics);
    let code = rewrite_date_types(&code, diagnostics);
    let code = rewrite_big_decimal(&code, diagnostics);
    let code = rewrite_json_slurper(&code);
    let code = rewrite_platform_apis(&code, diagnostics);
    let code = rewrite_class_declarations(&code, diagnostics);
    rewrite_string_format(&code, diagnostics)
}

fn rewrite_date_formatting(input: &str, diagnostics: &mut Diagnostics) -> String {
    let pattern = Regex::new(r#"new\s+SimpleDateFormat\(\s*("(?:[^"\\]|\\.)*")\s*\)"#).expect("fixed pattern");
    if pattern.is_match(input) {
        diagnostics.push_warning(
            0,
            "new SimpleDateFormat(...)",
            "date formatter replaced with createDateFormatter(pattern); locale/timezone nuances are not preserved",
        );
    }
    pattern.replace_all(input, "createDateFormatter($1)").into_owned()
}

fn rewrite_date_types(input: &str, diagnostics: &mut Diagnostics) -> String {
    let pattern = Regex::new(r"\b(?:LocalDate|LocalDateTime|ZonedDateTime|Instant)\.now\(\)").expect("fixed pattern");
    if pattern.is_match(input) {
        diagnostics.push_warning(
            0,
            "LocalDate/LocalDateTime/ZonedDateTime/Instant.now()",
            "modern date/time type replaced with a plain wall-clock Date; zone and precision semantics are lost",
        );
    }
    pattern.replace_all(input, "new Date()").into_owned()
}

fn rewrite_big_decimal(input: &str, diagnostics: &mut Diagnostics) -> String {
    let ctor = Regex::new(r#"new\s+BigDecimal\(\s*([^)]*)\)"#).expect("fixed pattern");
    if ctor.is_match(input) {
        diagnostics.push_warning(
            0,
            "new BigDecimal(...)",
            "arbitrary-precision decimal replaced with a float; rounding behaviour may differ",
        );
    }
    ctor.replace_all(input, "Number($1)").into_owned()
}

fn rewrite_json_slurper(input: &str) -> String {
    let ctor = Regex::new(r"new\s+JsonSlurper\(\s*\)\s*\.\s*parseText\(").expect("fixed pattern");
    let code = ctor.replace_all(input, "JSON.parse(").into_owned();
    let bare = Regex::new(r"\bJsonSlurper\b").expect("fixed pattern");
    bare.replace_all(&code, "JSON").into_owned()
}

fn rewrite_platform_apis(input: &str, diagnostics: &mut Diagnostics) -> String {
    let mut code = input.to_string();
    for namespace in ["JTUtil", "JTLookupUtil", "JTV3Utils", "JTJSONObject"] {
        let pattern = Regex::new(&format!(r"\b{namespace}\b")).expect("namespace is a fixed identifier");
        if pattern.is_match(&code) {
            diagnostics.push_error(
                0,
                namespace,
                format!("{namespace} has no portable equivalent; calls route through a logging stub proxy"),
            );
        }
        code = pattern.replace_all(&code, format!("{namespace}Stub")).into_owned();
    }
    code
}

fn rewrite_class_declarations(input: &str, diagnostics: &mut Diagnostics) -> String {
    let pattern = Regex::new(r"\bclass\s+([A-Za-z_]\w*)").expect("fixed pattern");
    if pattern.is_match(input) {
        diagnostics.push_warning(
            0,
            "class Name { ... }",
            "class declaration kept as `class`; Groovy-specific members (traits, metaClass) are not translated",
        );
    }
    input.to_string()
}

fn rewrite_string_format(input: &str, diagnostics: &mut Diagnostics) -> String {
    let pattern = Regex::new(r#"String\.format\(\s*"%\.(\d+)f"\s*,\s*([^)]+)\)"#).expect("fixed pattern");
    if pattern.is_match(input) {
        diagnostics.push_warning(
            0,
            r#"String.format("%.Nf", x)"#,
            "fixed-digit format replaced with toFixed; rounding mode may differ from Java's",
        );
    }
    pattern.replace_all(input, "($2).toFixed($1)").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_formatter_becomes_helper_with_warning() {
        let mut diagnostics = Diagnostics::new();
        let out = apply(r#"new SimpleDateFormat("yyyy/MM/dd")"#, &mut diagnostics);
        assert_eq!(out, r#"createDateFormatter("yyyy/MM/dd")"#);
        assert!(!diagnostics.warnings().is_empty());
    }

    #[test]
    fn big_decimal_becomes_number_with_warning() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("new BigDecimal(\"1.50\")", &mut diagnostics);
        assert_eq!(out, "Number(\"1.50\")");
        assert!(diagnostics.warnings().iter().any(|w| w.message.contains("arbitrary-precision")));
    }

    #[test]
    fn json_slurper_becomes_json_parse() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("new JsonSlurper().parseText(raw)", &mut diagnostics);
        assert_eq!(out, "JSON.parse(raw)");
    }

    #[test]
    fn platform_api_rewritten_to_stub_with_error_severity() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("JTUtil.lookup(code)", &mut diagnostics);
        assert_eq!(out, "JTUtilStub.lookup(code)");
        assert!(diagnostics
            .warnings()
            .iter()
            .any(|w| w.severity == super::super::diagnostics::Severity::Error));
    }

    #[test]
    fn string_format_becomes_to_fixed() {
        let mut diagnostics = Diagnostics::new();
        let out = apply(r#"String.format("%.2f", total)"#, &mut diagnostics);
        assert_eq!(out, "(total).toFixed(2)");
    }
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Tier 1 — mechanical, token-by-token rewrites (§4.7).

use regex::Regex;

use super::diagnostics::Diagnostics;

struct Rule {
    pattern: &'static str,
    replacement: &'static str,
    note: &'static str,
}

/// Patterns applied in order; each is a plain textual substitution. Order
/// matters where one pattern's output could be mistaken for another's
/// input (e.g. `def` rewrites run before anything that looks at `let`).
const RULES: &[Rule] = &[
    Rule { pattern: r"\bdef\s+([A-Za-z_$][\w$]*)\b", replacement: "let $1", note: "def -> let" },
    Rule { pattern: r"\bdef\s*\(([^)]*)\)\s*=", replacement: "let [$1] =", note: "def destructuring -> let [..] =" },
    Rule { pattern: r"\?:", replacement: "||", note: "Elvis -> short-circuit OR" },
    Rule { pattern: r"\[\s*:\s*\]", replacement: "{}", note: "[:] -> {}" },
    Rule { pattern: r"\bprintln\s*\(", replacement: "console.log(", note: "println(...) -> console.log(...)" },
    Rule { pattern: r"\bprintln\s+([^\n;]+)", replacement: "console.log($1)", note: "println x -> console.log(x)" },
    Rule { pattern: r"\.put\(([^,]+),\s*(.+?)\)", replacement: "[$1] = $2", note: ".put(k, v) -> [k] = v" },
    Rule { pattern: r"\.add\(([^)]*)\)", replacement: ".push($1)", note: ".add(x) -> .push(x)" },
    Rule { pattern: r"\.size\(\)", replacement: ".length", note: ".size() -> .length" },
    Rule {
        pattern: r"(\w[\w.]*)\.containsKey\(([^)]*)\)",
        replacement: "$2 in $1",
        note: ".containsKey(x) -> in",
    },
    Rule { pattern: r"\.toInteger\(\)", replacement: "|0", note: ".toInteger() -> |0" },
    Rule { pattern: r"\.toLong\(\)", replacement: "|0", note: ".toLong() -> |0" },
    Rule { pattern: r"\.toDouble\(\)", replacement: "", note: ".toDouble() -> Number(...)" },
    Rule { pattern: r"\.toBigDecimal\(\)", replacement: "", note: ".toBigDecimal() -> Number(...)" },
    Rule { pattern: r"\.toList\(\)", replacement: "", note: ".toList() -> Array.from(...)" },
    Rule { pattern: r"\.toString\(\)", replacement: ".toString()", note: ".toString() -> .toString() (no-op)" },
    Rule { pattern: r"(\d)[LldDfFgG]\b", replacement: "$1", note: "strip numeric suffix" },
    Rule {
        pattern: r"catch\s*\(\s*[A-Za-z_][\w.]*\s+([A-Za-z_]\w*)\s*\)",
        replacement: "catch ($1)",
        note: "typed catch -> untyped catch",
    },
    Rule { pattern: r"\bnew\s+ArrayList\s*(?:<[^>]*>)?\s*\(\s*\)", replacement: "[]", note: "new ArrayList<>() -> []" },
    Rule { pattern: r"\bnew\s+HashMap\s*(?:<[^>]*>)?\s*\(\s*\)", replacement: "{}", note: "new HashMap<>() -> {}" },
    Rule {
        pattern: r"\bnew\s+LinkedHashMap\s*(?:<[^>]*>)?\s*\(\s*\)",
        replacement: "{}",
        note: "new LinkedHashMap<>() -> {}",
    },
];

pub fn apply(input: &str, diagnostics: &mut Diagnostics) -> String {
    let mut code = input.to_string();
    for rule in RULES {
        let pattern = Regex::new(rule.pattern).expect("tier1 rule pattern is a fixed, valid regex");
        if pattern.is_match(&code) {
            code = pattern.replace_all(&code, rule.replacement).into_owned();
            diagnostics.push_info(0, rule.note, format!("tier1: {}", rule.note));
        }
    }
    code = rewrite_gstrings(&code);
    code = rewrite_simple_map_literals(&code);
    code
}

/// `"literal with ${expr} interpolation"` becomes a template string.
/// Groovy GStrings and JS template strings share the `${...}` syntax, so
/// this only needs to swap the surrounding quotes for backticks on strings
/// that actually contain an interpolation.
fn rewrite_gstrings(input: &str) -> String {
    let pattern = Regex::new(r#""([^"\\]*\$\{[^"]*\})""#).expect("fixed gstring pattern");
    pattern.replace_all(input, "`$1`").into_owned()
}

/// `[k: v, k2: v2]` with simple (non-nested-bracket) entries becomes an
/// object literal `{k: v, k2: v2}`. Nested/complex maps are left to tier 2
/// or surface as a residual pattern if nothing rewrites them.
fn rewrite_simple_map_literals(input: &str) -> String {
    let pattern = Regex::new(r"\[\s*([A-Za-z_$][\w$]*\s*:\s*[^\[\]]+?)\s*\]").expect("fixed map-literal pattern");
    pattern.replace_all(input, "{ $1 }").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn def_becomes_let() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("def total = 0", &mut diagnostics);
        assert_eq!(out, "let total = 0");
    }

    #[test]
    fn println_rewrites_to_console_log() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply("println(\"hi\")", &mut diagnostics), "console.log(\"hi\")");
    }

    #[test]
    fn elvis_and_empty_map() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply("a ?: b", &mut diagnostics), "a || b");
        assert_eq!(apply("[:]", &mut diagnostics), "{}");
    }

    #[test]
    fn collection_methods_and_size() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("list.add(x); list.size()", &mut diagnostics);
        assert_eq!(out, "list.push(x); list.length");
    }

    #[test]
    fn gstring_interpolation_becomes_template_literal() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply(r#""value: ${x}""#, &mut diagnostics), "`value: ${x}`");
    }

    #[test]
    fn simple_map_literal_becomes_object_literal() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply("[a: 1, b: 2]", &mut diagnostics), "{ a: 1, b: 2 }");
    }

    #[test]
    fn contains_key_swaps_operands_into_in_expression() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply("map.containsKey(x)", &mut diagnostics), "x in map");
    }

    #[test]
    fn to_string_is_left_as_is() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply("value.toString()", &mut diagnostics), "value.toString()");
    }
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Tier 2 — structural rewrites: closure-based collection methods and a
//! handful of operator/accessor conversions that tier 1's plain regex
//! substitutions cannot express because the input is brace-nested (§4.7).

use regex::Regex;

use super::diagnostics::Diagnostics;

const CLOSURE_METHODS: &[&str] =
    &["eachWithIndex", "each", "findAll", "findResult", "find", "collectEntries", "collect"];

pub fn apply(input: &str, diagnostics: &mut Diagnostics) -> String {
    let code = rewrite_closures(input, diagnostics);
    let code = rewrite_aggregates(&code);
    let code = rewrite_casts(&code);
    let code = rewrite_ranges(&code);
    let code = rewrite_regex_ops(&code, diagnostics);
    let code = rewrite_spread_dot(&code);
    let code = rewrite_xml_path(&code, diagnostics);
    let code = rewrite_spaceship(&code);
    rewrite_contains(&code)
}

fn read_identifier(chars: &[char], start: usize) -> Option<(String, usize)> {
    if start >= chars.len() || !(chars[start].is_alphabetic() || chars[start] == '_') {
        return None;
    }
    let mut end = start;
    while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    Some((chars[start..end].iter().collect(), end))
}

fn skip_ws(chars: &[char], mut pos: usize) -> usize {
    while pos < chars.len() && chars[pos].is_whitespace() {
        pos += 1;
    }
    pos
}

/// Finds the index one past the matching closing bracket for the opening
/// bracket at `open`, tracking nested `(`, `[`, `{` and skipping over
/// quoted string contents so brackets inside literals don't miscount.
fn matching_close(chars: &[char], open: usize) -> Option<usize> {
    let (open_ch, close_ch) = match chars[open] {
        '(' => ('(', ')'),
        '[' => ('[', ']'),
        '{' => ('{', '}'),
        _ => return None,
    };
    let mut depth = 0i32;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '"' | '\'' => {
                let quote = chars[i];
                i += 1;
                while i < chars.len() && chars[i] != quote {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            c if c == open_ch => depth += 1,
            c if c == close_ch => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits `a, b -> body` into (`["a", "b"]`, `body`); a closure with no
/// `->` takes the implicit single parameter `it`.
fn split_closure(inner: &str) -> (Vec<String>, String) {
    let chars: Vec<char> = inner.chars().collect();
    let mut depth = 0i32;
    let mut split_at = None;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '-' if depth == 0 && chars.get(i + 1) == Some(&'>') => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
        i += 1;
    }
    match split_at {
        Some(idx) => {
            let params: String = chars[..idx].iter().collect();
            let body: String = chars[idx + 2..].iter().collect();
            let params = params
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            (params, body.trim().to_string())
        }
        None => (vec!["it".to_string()], inner.trim().to_string()),
    }
}

fn rewrite_closures(input: &str, diagnostics: &mut Diagnostics) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '.' {
            if let Some((name, after_name)) = read_identifier(&chars, i + 1) {
                if CLOSURE_METHODS.contains(&name.as_str()) {
                    if let Some((consumed, replacement)) = try_rewrite_closure(&chars, after_name, &name, diagnostics)
                    {
                        out.push_str(&replacement);
                        i = consumed;
                        continue;
                    }
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn try_rewrite_closure(
    chars: &[char],
    after_name: usize,
    method: &str,
    diagnostics: &mut Diagnostics,
) -> Option<(usize, String)> {
    let mut pos = skip_ws(chars, after_name);
    if chars.get(pos) == Some(&'(') {
        pos = matching_close(chars, pos)?;
        pos = skip_ws(chars, pos);
    }
    if chars.get(pos) != Some(&'{') {
        return None;
    }
    let close = matching_close(chars, pos)?;
    let inner: String = chars[pos + 1..close - 1].iter().collect();
    let (params, body) = split_closure(&inner);
    let param_list = params.join(", ");

    let replacement = match method {
        "each" => format!(".forEach(({param_list}) => {{ {body} }})"),
        "eachWithIndex" => {
            let param_list = if params.len() >= 2 { param_list } else { format!("{param_list}, _index") };
            format!(".forEach(({param_list}) => {{ {body} }})")
        }
        "findAll" => format!(".filter(({param_list}) => {{ {body} }})"),
        "find" => format!(".find(({param_list}) => {{ {body} }})"),
        "collect" => format!(".map(({param_list}) => {{ {body} }})"),
        "collectEntries" => {
            diagnostics.push_warning(
                0,
                "collectEntries { ... }",
                "collectEntries rewritten assuming the closure yields a [key, value] pair",
            );
            format!(
                ".map(({param_list}) => {{ {body} }}).reduce((acc, pair) => {{ acc[pair[0]] = pair[1]; return acc; }}, {{}})"
            )
        }
        "findResult" => {
            diagnostics.push_warning(
                0,
                "findResult { ... }",
                "findResult rewritten as map-then-find; loses short-circuit evaluation",
            );
            format!(".map(({param_list}) => {{ {body} }}).find((_r) => _r !== null && _r !== undefined)")
        }
        _ => return None,
    };
    Some((close, replacement))
}

fn rewrite_aggregates(input: &str) -> String {
    let sum = Regex::new(r"\.sum\(\)").expect("fixed pattern");
    let code = sum.replace_all(input, ".reduce((_a, _b) => _a + _b, 0)").into_owned();
    let max = Regex::new(r"\.max\(\)").expect("fixed pattern");
    let code = max.replace_all(&code, ".reduce((_a, _b) => (_a > _b ? _a : _b))").into_owned();
    let min = Regex::new(r"\.min\(\)").expect("fixed pattern");
    let code = min.replace_all(&code, ".reduce((_a, _b) => (_a < _b ? _a : _b))").into_owned();
    let round = Regex::new(r"([\w.]+)\.round\((\d+)\)").expect("fixed pattern");
    round.replace_all(&code, "roundTo($1, $2)").into_owned()
}

fn rewrite_casts(input: &str) -> String {
    let pattern = Regex::new(r"\s+as\s+[A-Za-z_][\w.]*\b").expect("fixed pattern");
    pattern.replace_all(input, "").into_owned()
}

fn rewrite_ranges(input: &str) -> String {
    let open_ended = Regex::new(r"\[(-?[\w.]+)\s*\.\.\s*-1\]").expect("fixed pattern");
    let code = open_ended.replace_all(input, ".slice($1)").into_owned();
    let bounded = Regex::new(r"\[(-?[\w.]+)\s*\.\.\s*(-?[\w.]+)\]").expect("fixed pattern");
    bounded.replace_all(&code, ".slice($1, ($2) + 1)").into_owned()
}

fn rewrite_regex_ops(input: &str, diagnostics: &mut Diagnostics) -> String {
    let find = Regex::new(r"(\S+)\s*=~\s*(\S+)").expect("fixed pattern");
    let code = find.replace_all(input, "$1.match($2)").into_owned();
    let matches = Regex::new(r"\.matches\(").expect("fixed pattern");
    let code = matches.replace_all(&code, ".match(").into_owned();
    let replace_all = Regex::new(r"\.replaceAll\(").expect("fixed pattern");
    let code = replace_all.replace_all(&code, ".replace(").into_owned();
    let replace_first = Regex::new(r"\.replaceFirst\(").expect("fixed pattern");
    let code = replace_first.replace_all(&code, ".replace(").into_owned();
    let tokenize_empty = Regex::new(r"\.tokenize\(\)").expect("fixed pattern");
    let code = tokenize_empty.replace_all(&code, ".split(/\\s+/)").into_owned();
    let tokenize = Regex::new(r"\.tokenize\(").expect("fixed pattern");
    let code = tokenize.replace_all(&code, ".split(").into_owned();
    let collate = Regex::new(r"\.collate\(").expect("fixed pattern");
    if collate.is_match(&code) {
        diagnostics.push_warning(0, ".collate(...)", "collate has no direct equivalent; left as a residual call");
    }
    code
}

fn rewrite_spread_dot(input: &str) -> String {
    let pattern = Regex::new(r"([A-Za-z_]\w*)\*\.(\w+)").expect("fixed pattern");
    pattern.replace_all(input, "$1.map(it => it.$2)").into_owned()
}

fn rewrite_xml_path(input: &str, diagnostics: &mut Diagnostics) -> String {
    let text = Regex::new(r"\.text\(\)").expect("fixed pattern");
    let code = text.replace_all(input, ".text").into_owned();
    let named = Regex::new(r"\.'([^']+)'").expect("fixed pattern");
    let code = named.replace_all(&code, "['$1']").into_owned();
    let attr = Regex::new(r"\.@(\w+)").expect("fixed pattern");
    let code = attr.replace_all(&code, "['@$1']").into_owned();
    let deep_find = Regex::new(r"\['[*]{2}'\]\.findAll\(").expect("fixed pattern");
    if deep_find.is_match(&code) {
        diagnostics.push_warning(
            0,
            "['**'].findAll { ... }",
            "recursive descendant search has no mechanical rewrite; left as a residual call",
        );
    }
    code
}

fn rewrite_spaceship(input: &str) -> String {
    let pattern = Regex::new(r"([\w.]+)\s*<=>\s*([\w.]+)").expect("fixed pattern");
    pattern.replace_all(input, "($1 > $2 ? 1 : ($1 < $2 ? -1 : 0))").into_owned()
}

fn rewrite_contains(input: &str) -> String {
    let pattern = Regex::new(r"\.contains\(").expect("fixed pattern");
    pattern.replace_all(input, ".includes(").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_closure_becomes_for_each() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("items.each { it -> console.log(it) }", &mut diagnostics);
        assert_eq!(out, "items.forEach((it) => { console.log(it) })");
    }

    #[test]
    fn find_all_without_explicit_param_uses_it() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("items.findAll { it.active }", &mut diagnostics);
        assert_eq!(out, "items.filter((it) => { it.active })");
    }

    #[test]
    fn collect_with_named_param() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("items.collect { x -> x.id }", &mut diagnostics);
        assert_eq!(out, "items.map((x) => { x.id })");
    }

    #[test]
    fn collect_entries_emits_warning_and_reduce() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("items.collectEntries { [it.id, it] }", &mut diagnostics);
        assert!(out.contains(".reduce((acc, pair) => { acc[pair[0]] = pair[1]; return acc; }, {})"));
        assert!(diagnostics.warnings().iter().any(|w| w.message.contains("collectEntries")));
    }

    #[test]
    fn aggregate_and_round_and_contains() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("values.sum(); total.round(2); list.contains(x)", &mut diagnostics);
        assert!(out.contains(".reduce((_a, _b) => _a + _b, 0)"));
        assert!(out.contains("roundTo(total, 2)"));
        assert!(out.contains("list.includes(x)"));
    }

    #[test]
    fn range_slicing() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply("list[1..-1]", &mut diagnostics), "list.slice(1)");
        assert_eq!(apply("list[1..3]", &mut diagnostics), "list.slice(1, (3) + 1)");
    }

    #[test]
    fn xml_path_constructs() {
        let mut diagnostics = Diagnostics::new();
        let out = apply("node.text(); node.@id; node.'ns:tag'", &mut diagnostics);
        assert_eq!(out, "node.text; node['@id']; node['ns:tag']");
    }

    #[test]
    fn spaceship_becomes_comparator_expression() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(apply("a <=> b", &mut diagnostics), "(a > b ? 1 : (a < b ? -1 : 0))");
    }
}

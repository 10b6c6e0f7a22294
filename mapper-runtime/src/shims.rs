/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Helper functions injected into the sandbox alongside the emitted script
//! (§4.6, §4.7 tier 3): XML bridging, and — only when the caller is
//! executing transpiled legacy-dialect code — the Groovy-platform shim
//! library (`createDateFormatter`, rounding, the `JT*` stub proxies).
//!
//! None of these depend on a real XML or date-formatting crate: the model
//! this engine targets is a small emitter-controlled script dialect, not a
//! general-purpose XML/date toolkit, so the helpers below are deliberately
//! minimal hand-rolled implementations rather than a new dependency pulled
//! in for a handful of call sites (see DESIGN.md).

use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{js_string, Context, JsObject, JsResult, JsValue, NativeFunction};

/// Parameter list appended after `(input, parseXML, toXML` when Groovy
/// shims are requested, in the order [`groovy_shim_values`] supplies them.
pub fn groovy_shim_param_list(inject_groovy_shims: bool) -> &'static str {
    if inject_groovy_shims {
        ", createDateFormatter, roundTo, JTUtil, JTLookupUtil, JTV3Utils, JTJSONObject)"
    } else {
        ")"
    }
}

pub fn install_xml_helpers(ctx: &mut Context) -> JsResult<()> {
    ctx.register_global_builtin_callable(js_string!("parseXML"), 1, NativeFunction::from_fn_ptr(parse_xml))?;
    ctx.register_global_builtin_callable(js_string!("toXML"), 1, NativeFunction::from_fn_ptr(to_xml))?;
    Ok(())
}

pub fn install_groovy_shims(ctx: &mut Context) -> JsResult<()> {
    ctx.register_global_builtin_callable(js_string!("createDateFormatter"), 1, NativeFunction::from_fn_ptr(create_date_formatter))?;
    ctx.register_global_builtin_callable(js_string!("roundTo"), 2, NativeFunction::from_fn_ptr(round_to))?;

    for name in ["JTUtil", "JTLookupUtil", "JTV3Utils", "JTJSONObject"] {
        let proxy = platform_stub_proxy(ctx, name)?;
        ctx.register_global_property(js_string!(name), proxy, Attribute::all())?;
    }
    Ok(())
}

/// Reads the globals `install_groovy_shims` registered back out, in the
/// same order `groovy_shim_param_list` lists them, so the executor can pass
/// them on as positional call arguments.
pub fn groovy_shim_values(ctx: &mut Context, global: &JsObject) -> Vec<JsValue> {
    ["createDateFormatter", "roundTo", "JTUtil", "JTLookupUtil", "JTV3Utils", "JTJSONObject"]
        .into_iter()
        .map(|name| global.get(js_string!(name), ctx).unwrap_or(JsValue::undefined()))
        .collect()
}

/// A deliberately minimal attribute/text XML reader: enough structure for
/// the emitted dialect's `.text()`/`@attr` accessors, not a conformant XML
/// parser. Unrecognised input degrades to `{}` rather than throwing, in
/// keeping with the emitter/executor's soft-failure policy (§7).
fn parse_xml(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let text = args.first().map(|v| v.to_string(ctx)).transpose()?.map(|s| s.to_std_string_escaped()).unwrap_or_default();
    let root = minimal_xml::parse(&text);
    Ok(JsValue::from(minimal_xml::to_js_object(ctx, &root)))
}

fn to_xml(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let value = args.first().cloned().unwrap_or(JsValue::undefined());
    let rendered = minimal_xml::from_js_value(&value, ctx);
    Ok(JsValue::from(js_string!(rendered)))
}

/// `createDateFormatter(pattern)` → a function accepting a millisecond
/// timestamp and returning a `strftime`-ish rendering. A warning-tier
/// substitute for Groovy's `Date.format`, not a faithful reimplementation
/// (§4.7 tier 3 "date formatting ... basic wall-clock replacements").
fn create_date_formatter(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let pattern = args.first().map(|v| v.to_string(ctx)).transpose()?.map(|s| s.to_std_string_escaped()).unwrap_or_default();
    let formatter = ObjectInitializer::new(ctx)
        .property(js_string!("pattern"), js_string!(pattern), Attribute::all())
        .function(NativeFunction::from_fn_ptr(format_timestamp), js_string!("format"), 1)
        .build();
    Ok(JsValue::from(formatter))
}

fn format_timestamp(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let millis = args.first().map(|v| v.to_number(ctx)).transpose()?.unwrap_or(0.0);
    let pattern = this
        .as_object()
        .and_then(|o| o.get(js_string!("pattern"), ctx).ok())
        .and_then(|v| v.to_string(ctx).ok())
        .map(|s| s.to_std_string_escaped())
        .unwrap_or_else(|| "yyyy-MM-dd".to_string());

    let secs = (millis / 1000.0) as i64;
    let datetime = chrono::DateTime::from_timestamp(secs, 0).unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC);
    let strftime_pattern = pattern.replace("yyyy", "%Y").replace("MM", "%m").replace("dd", "%d").replace("HH", "%H").replace("mm", "%M").replace("ss", "%S");
    Ok(JsValue::from(js_string!(datetime.format(&strftime_pattern).to_string())))
}

/// `roundTo(value, digits)`, the substitute for Groovy's `BigDecimal.round`
/// (§4.7 tier 3 "arbitrary-precision decimal → float or rounding helper").
fn round_to(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let value = args.first().map(|v| v.to_number(ctx)).transpose()?.unwrap_or(0.0);
    let digits = args.get(1).map(|v| v.to_number(ctx)).transpose()?.unwrap_or(0.0) as i32;
    let factor = 10f64.powi(digits);
    Ok(JsValue::from((value * factor).round() / factor))
}

/// A stub proxy for one of the legacy `JT*` platform-API namespaces: every
/// call logs a warning and returns `undefined`, matching tier 3's "stub
/// proxy with error-level warnings". Real platform semantics are explicitly
/// out of scope. One fn pointer per namespace (rather than a closure
/// capturing the namespace name) keeps every registration capture-free.
fn platform_stub_proxy(ctx: &mut Context, namespace: &str) -> JsResult<JsObject> {
    let get_fn = match namespace {
        "JTUtil" => jt_util_get,
        "JTLookupUtil" => jt_lookup_util_get,
        "JTV3Utils" => jt_v3_utils_get,
        _ => jt_json_object_get,
    };
    let handler = ObjectInitializer::new(ctx).function(NativeFunction::from_fn_ptr(get_fn), js_string!("get"), 2).build();
    Ok(handler)
}

fn log_platform_stub_call(namespace: &str, args: &[JsValue], ctx: &mut Context) {
    let rendered: Vec<String> =
        args.iter().map(|a| a.to_string(ctx).map(|s| s.to_std_string_escaped()).unwrap_or_default()).collect();
    crate::executor::record_log(format!("[warn] [platform-stub] {namespace} has no equivalent, args=({})", rendered.join(", ")));
}

fn jt_util_get(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    log_platform_stub_call("JTUtil", args, ctx);
    Ok(JsValue::undefined())
}

fn jt_lookup_util_get(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    log_platform_stub_call("JTLookupUtil", args, ctx);
    Ok(JsValue::undefined())
}

fn jt_v3_utils_get(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    log_platform_stub_call("JTV3Utils", args, ctx);
    Ok(JsValue::undefined())
}

fn jt_json_object_get(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    log_platform_stub_call("JTJSONObject", args, ctx);
    Ok(JsValue::undefined())
}

mod minimal_xml {
    use boa_engine::{js_string, Context, JsObject, JsValue};

    #[derive(Debug, Default)]
    pub struct XmlNode {
        pub tag: String,
        pub attrs: Vec<(String, String)>,
        pub text: String,
        pub children: Vec<XmlNode>,
    }

    /// Parses a (non-nested-attribute, non-namespace-aware) subset of XML:
    /// enough for simple element/attribute/text trees. A stack of owned,
    /// still-open ancestors; closing a tag pops one and appends it to its
    /// new-top-of-stack parent.
    pub fn parse(input: &str) -> XmlNode {
        let mut stack: Vec<XmlNode> = vec![XmlNode { tag: "root".to_string(), ..Default::default() }];
        let mut rest = input;

        while let Some(lt) = rest.find('<') {
            if lt > 0 {
                push_text(&mut stack, rest[..lt].trim());
            }
            rest = &rest[lt..];

            if let Some(tail) = rest.strip_prefix("</") {
                let Some(end) = tail.find('>') else { break };
                rest = &tail[end + 1..];
                if stack.len() > 1 {
                    let finished = stack.pop().unwrap();
                    stack.last_mut().unwrap().children.push(finished);
                }
                continue;
            }

            let Some(end) = rest.find('>') else { break };
            let tag_src = &rest[1..end];
            let self_closing = tag_src.trim_end().ends_with('/');
            let tag_src = tag_src.trim_end_matches('/').trim();
            let mut parts = tag_src.split_whitespace();
            let tag = parts.next().unwrap_or_default().to_string();
            let attrs = parts
                .filter_map(|p| p.split_once('='))
                .map(|(k, v)| (k.to_string(), v.trim_matches(['"', '\'']).to_string()))
                .collect();
            rest = &rest[end + 1..];

            let node = XmlNode { tag, attrs, text: String::new(), children: Vec::new() };
            if self_closing {
                stack.last_mut().unwrap().children.push(node);
            } else {
                stack.push(node);
            }
        }

        if !rest.trim().is_empty() {
            push_text(&mut stack, rest.trim());
        }
        while stack.len() > 1 {
            let finished = stack.pop().unwrap();
            stack.last_mut().unwrap().children.push(finished);
        }
        stack.pop().unwrap_or_default()
    }

    fn push_text(stack: &mut [XmlNode], text: &str) {
        if !text.is_empty() {
            if let Some(top) = stack.last_mut() {
                if !top.text.is_empty() {
                    top.text.push(' ');
                }
                top.text.push_str(text);
            }
        }
    }

    pub fn to_js_object(ctx: &mut Context, node: &XmlNode) -> JsObject {
        let obj = boa_engine::object::ObjectInitializer::new(ctx).build();
        if !node.text.is_empty() {
            let _ = obj.set(js_string!("_text"), js_string!(node.text.clone()), false, ctx);
        }
        for (k, v) in &node.attrs {
            let _ = obj.set(js_string!(format!("@{k}")), js_string!(v.clone()), false, ctx);
        }
        for child in &node.children {
            let child_js = to_js_object(ctx, child);
            let _ = obj.set(js_string!(child.tag.clone()), JsValue::from(child_js), false, ctx);
        }
        obj
    }

    /// Best-effort inverse of [`to_js_object`]: renders a plain JS object
    /// back into the same minimal element/attribute/text shape.
    pub fn from_js_value(value: &JsValue, ctx: &mut Context) -> String {
        render(value, "root", ctx)
    }

    fn render(value: &JsValue, tag: &str, ctx: &mut Context) -> String {
        let Some(obj) = value.as_object() else {
            return format!("<{tag}>{}</{tag}>", value.to_string(ctx).map(|s| s.to_std_string_escaped()).unwrap_or_default());
        };
        let mut attrs = String::new();
        let mut inner = String::new();
        let keys = obj.own_property_keys(ctx).unwrap_or_default();
        for key in keys {
            let boa_engine::JsPropertyKey::String(name) = &key else { continue };
            let name = name.to_std_string_escaped();
            let child_value = obj.get(key.clone(), ctx).unwrap_or(JsValue::undefined());
            if let Some(attr_name) = name.strip_prefix('@') {
                attrs.push_str(&format!(" {attr_name}=\"{}\"", child_value.to_string(ctx).map(|s| s.to_std_string_escaped()).unwrap_or_default()));
            } else if name == "_text" {
                inner.push_str(&child_value.to_string(ctx).map(|s| s.to_std_string_escaped()).unwrap_or_default());
            } else {
                inner.push_str(&render(&child_value, &name, ctx));
            }
        }
        format!("<{tag}{attrs}>{inner}</{tag}>")
    }
}

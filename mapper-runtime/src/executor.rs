/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Script executor (§4.6): runs an emitted script body against a parsed
//! input, with captured diagnostics and a bounded, never-throwing contract.

use std::cell::RefCell;
use std::time::Instant;

use boa_engine::{js_string, Context, JsError, JsValue, NativeFunction, Source};

use mapper_model::MapperContext;

use crate::shims;

thread_local! {
    /// The sandboxed script's own `console.log/warn/error` output, captured
    /// for the duration of one [`execute_script`] call (§4.6, §5).
    ///
    /// This is a *different* channel from the host's `tracing` output: this
    /// one carries the guest script's diagnostics, `tracing` carries the
    /// engine's own. Global because `execute_script` must not be invoked
    /// concurrently from the same process (§5); drained unconditionally
    /// after every call regardless of success or failure, the guaranteed-
    /// release the contract requires.
    static CAPTURED_LOGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// The result record described in §6 ("Executor result").
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub output: String,
    pub error: Option<String>,
    pub script_body: String,
    pub duration_ms: f64,
    pub logs: Vec<String>,
}

/// Options steering which shim helpers are injected alongside the
/// mandatory `(input, parseXML, toXML)` parameters (§4.6).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    pub inject_groovy_shims: bool,
}

/// Executes `script_body` against `input_text`, following the §4.6
/// contract: never throws, always returns a populated [`ExecutionResult`].
pub fn execute_script(
    script_body: &str,
    input_text: &str,
    _context: &MapperContext,
    options: ExecuteOptions,
) -> ExecutionResult {
    let started = Instant::now();
    CAPTURED_LOGS.with(|logs| logs.borrow_mut().clear());

    let outcome = run(script_body, input_text, options);
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    let logs = CAPTURED_LOGS.with(|logs| std::mem::take(&mut *logs.borrow_mut()));

    match outcome {
        Ok(output) => ExecutionResult { output, error: None, script_body: script_body.to_string(), duration_ms, logs },
        Err(message) => {
            ExecutionResult { output: String::new(), error: Some(message), script_body: script_body.to_string(), duration_ms, logs }
        }
    }
}

fn run(script_body: &str, input_text: &str, options: ExecuteOptions) -> Result<String, String> {
    // The script is evaluated inside a fresh function wrapper rather than at
    // the realm's top level, so `var`/function declarations in the emitted
    // body never leak into global scope (§4.6 "shall NOT be evaluated in a
    // leaked lexical scope").
    let wrapped = format!(
        "\"use strict\";\n(function(input, parseXML, toXML{}) {{\n{}\n}})",
        shims::groovy_shim_param_list(options.inject_groovy_shims),
        script_body
    );

    let mut ctx = Context::default();
    install_console(&mut ctx).map_err(|e| describe_js_error(&e))?;
    shims::install_xml_helpers(&mut ctx).map_err(|e| describe_js_error(&e))?;
    if options.inject_groovy_shims {
        shims::install_groovy_shims(&mut ctx).map_err(|e| describe_js_error(&e))?;
    }

    let function_value = ctx.eval(Source::from_bytes(wrapped.as_bytes())).map_err(|e| describe_js_error(&e))?;
    let function = function_value.as_callable().cloned().ok_or_else(|| "emitted script did not evaluate to a function".to_string())?;

    let global = ctx.global_object();
    let parse_xml = global.get(js_string!("parseXML"), &mut ctx).unwrap_or(JsValue::undefined());
    let to_xml = global.get(js_string!("toXML"), &mut ctx).unwrap_or(JsValue::undefined());

    let mut args = vec![JsValue::from(js_string!(input_text)), parse_xml, to_xml];
    if options.inject_groovy_shims {
        args.extend(shims::groovy_shim_values(&mut ctx, &global));
    }

    let result = function.call(&JsValue::undefined(), &args, &mut ctx).map_err(|e| describe_js_error(&e))?;
    Ok(coerce_return_value(&result, &mut ctx))
}

fn coerce_return_value(value: &JsValue, ctx: &mut Context) -> String {
    if value.is_null_or_undefined() {
        return String::new();
    }
    value.to_string(ctx).map(|s| s.to_std_string_escaped()).unwrap_or_default()
}

fn describe_js_error(error: &JsError) -> String {
    error.to_string()
}

fn render_console_args(args: &[JsValue], ctx: &mut Context) -> String {
    args.iter()
        .map(|a| a.to_string(ctx).map(|s| s.to_std_string_escaped()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Records an entry on the captured diagnostic channel from outside this
/// module (the platform-API stub proxies log through here too, §4.7 tier 3).
pub(crate) fn record_log(entry: String) {
    CAPTURED_LOGS.with(|logs| logs.borrow_mut().push(entry));
}

fn console_log(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> boa_engine::JsResult<JsValue> {
    let line = render_console_args(args, ctx);
    CAPTURED_LOGS.with(|logs| logs.borrow_mut().push(format!("[log] {line}")));
    Ok(JsValue::undefined())
}

fn console_warn(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> boa_engine::JsResult<JsValue> {
    let line = render_console_args(args, ctx);
    CAPTURED_LOGS.with(|logs| logs.borrow_mut().push(format!("[warn] {line}")));
    Ok(JsValue::undefined())
}

fn console_error(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> boa_engine::JsResult<JsValue> {
    let line = render_console_args(args, ctx);
    CAPTURED_LOGS.with(|logs| logs.borrow_mut().push(format!("[error] {line}")));
    Ok(JsValue::undefined())
}

fn install_console(ctx: &mut Context) -> boa_engine::JsResult<()> {
    let console = boa_engine::object::ObjectInitializer::new(ctx)
        .function(NativeFunction::from_fn_ptr(console_log), js_string!("log"), 0)
        .function(NativeFunction::from_fn_ptr(console_warn), js_string!("warn"), 0)
        .function(NativeFunction::from_fn_ptr(console_error), js_string!("error"), 0)
        .build();
    ctx.register_global_property(js_string!("console"), console, boa_engine::property::Attribute::all())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapper_model::MapperContext;

    #[test]
    fn simple_script_returns_serialized_output() {
        let script = r#"
input = JSON.parse(input);
const output = {};
output.orderId = input.order.id;
return JSON.stringify(output);
"#;
        let result = execute_script(script, r#"{"order":{"id":"101"}}"#, &MapperContext::default(), ExecuteOptions::default());
        assert_eq!(result.error, None);
        assert_eq!(result.output, r#"{"orderId":"101"}"#);
    }

    #[test]
    fn thrown_error_is_captured_not_propagated() {
        let script = "throw new Error('boom');";
        let result = execute_script(script, "{}", &MapperContext::default(), ExecuteOptions::default());
        assert_eq!(result.output, "");
        assert!(result.error.is_some());
    }

    #[test]
    fn console_log_is_captured_in_call_order() {
        let script = r#"
console.log('first');
console.warn('second');
return 'done';
"#;
        let result = execute_script(script, "{}", &MapperContext::default(), ExecuteOptions::default());
        assert_eq!(result.logs, vec!["[log] first".to_string(), "[warn] second".to_string()]);
    }

    #[test]
    fn null_return_coerces_to_empty_string() {
        let result = execute_script("return null;", "{}", &MapperContext::default(), ExecuteOptions::default());
        assert_eq!(result.output, "");
        assert_eq!(result.error, None);
    }

    #[test]
    fn logs_do_not_leak_across_calls() {
        execute_script("console.log('one'); return '';", "{}", &MapperContext::default(), ExecuteOptions::default());
        let second = execute_script("return '';", "{}", &MapperContext::default(), ExecuteOptions::default());
        assert!(second.logs.is_empty());
    }
}

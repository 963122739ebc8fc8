//! `{{path}}` placeholder resolution.
//!
//! Rules:
//! - a string that is exactly one placeholder yields the referenced value
//!   with its native type (number, mapping, sequence, ...);
//! - placeholders embedded in other text are rendered to strings and
//!   substituted left to right;
//! - an unresolved path yields `null` as a whole-string placeholder and `""`
//!   when embedded — never an error;
//! - non-string leaves pass through unchanged.
//!
//! An unclosed `{{` is kept literally.

use serde_json::{Map, Value};

use crate::context::ExecutionContext;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Resolve every placeholder in `value` against `ctx`.
pub fn resolve(value: &Value, ctx: &ExecutionContext) -> Value {
    match value {
        Value::String(s) => resolve_string(s, ctx),
        Value::Array(items) => Value::Array(items.iter().map(|item| resolve(item, ctx)).collect()),
        Value::Object(map) => Value::Object(resolve_map(map, ctx)),
        other => other.clone(),
    }
}

/// [`resolve`] for a mapping, keeping key order.
pub fn resolve_map(map: &Map<String, Value>, ctx: &ExecutionContext) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), resolve(value, ctx)))
        .collect()
}

fn resolve_string(raw: &str, ctx: &ExecutionContext) -> Value {
    if let Some(path) = whole_placeholder(raw) {
        return ctx.lookup(path).cloned().unwrap_or(Value::Null);
    }
    if !raw.contains(OPEN) {
        return Value::String(raw.to_owned());
    }
    Value::String(interpolate(raw, ctx))
}

/// `Some(path)` when `raw` is a single placeholder and nothing else.
fn whole_placeholder(raw: &str) -> Option<&str> {
    let inner = raw.strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    if inner.contains(OPEN) || inner.contains(CLOSE) {
        return None;
    }
    Some(inner.trim())
}

fn interpolate(raw: &str, ctx: &ExecutionContext) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find(OPEN) {
        let (before, after) = rest.split_at(start);
        out.push_str(before);

        let Some(end) = after[OPEN.len()..].find(CLOSE) else {
            out.push_str(after);
            return out;
        };
        let path = after[OPEN.len()..OPEN.len() + end].trim();
        if let Some(value) = ctx.lookup(path) {
            out.push_str(&render(value));
        }
        rest = &after[OPEN.len() + end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// String form used for embedded substitution.
///
/// Strings are inserted raw, `null` renders empty, containers render as JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Paths of every placeholder in `raw`, in order. Delimiters are stripped.
pub fn placeholders(raw: &str) -> Vec<&str> {
    let mut paths = Vec::new();
    let mut rest = raw;

    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            break;
        };
        paths.push(after[..end].trim());
        rest = &after[end + CLOSE.len()..];
    }

    paths
}

/// Placeholder paths in `map` that do not resolve against `ctx`.
pub fn unresolved_paths(map: &Map<String, Value>, ctx: &ExecutionContext) -> Vec<String> {
    let mut missing = Vec::new();
    map.values()
        .for_each(|value| collect_unresolved(value, ctx, &mut missing));
    missing
}

fn collect_unresolved(value: &Value, ctx: &ExecutionContext, missing: &mut Vec<String>) {
    match value {
        Value::String(s) => missing.extend(
            placeholders(s)
                .into_iter()
                .filter(|path| ctx.lookup(path).is_none())
                .map(str::to_owned),
        ),
        Value::Array(items) => items
            .iter()
            .for_each(|item| collect_unresolved(item, ctx, missing)),
        Value::Object(map) => map
            .values()
            .for_each(|item| collect_unresolved(item, ctx, missing)),
        _ => {}
    }
}

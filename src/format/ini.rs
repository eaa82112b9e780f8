//! INI reading and writing.
//!
//! Supported syntax:
//! - `key = value` pairs, optionally before the first section
//! - `[section]` headers; dotted names (`[a.b]`) nest mappings
//! - `key[] = value` appends to a list
//! - `;` and `#` comments, both on their own line and after unquoted values
//! - double-quoted (JSON escaped) and single-quoted values, always strings
//!
//! Unquoted `true`, `false`, `null` and numeric literals become typed values.
//! INI cannot express `$merge`, so the adapter reports no merge support.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use super::{ensure_content, non_empty, FormatAdapter};
use crate::error::AdapterError;
use crate::tree::{Mapping, Tree};

static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*([^\]]+?)\s*\]$").unwrap());

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?$").unwrap());

#[derive(Debug, Default, Clone, Copy)]
pub struct IniFormat;

impl FormatAdapter for IniFormat {
    fn name(&self) -> &'static str {
        "INI"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ini", "cfg", "conf"]
    }

    fn supports_merge(&self) -> bool {
        false
    }

    fn parse(&self, text: &str) -> Result<Tree, AdapterError> {
        ensure_content(text)?;
        let mut root = Mapping::new();
        let mut section: Vec<String> = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            let line_no = idx + 1;

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(caps) = SECTION.captures(line) {
                section = caps[1].split('.').map(|s| s.trim().to_string()).collect();
                if section.iter().any(String::is_empty) {
                    return Err(parse_error(line_no, "empty section name"));
                }
                section_mut(&mut root, &section).map_err(|msg| parse_error(line_no, &msg))?;
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(parse_error(line_no, "expected `key = value`"));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "missing key"));
            }
            let value = parse_value(value.trim()).map_err(|msg| parse_error(line_no, &msg))?;
            let target = section_mut(&mut root, &section).map_err(|msg| parse_error(line_no, &msg))?;

            match key.strip_suffix("[]") {
                Some(list_key) => {
                    let list_key = list_key.trim_end().to_string();
                    match target.get_mut(&list_key) {
                        Some(Value::Array(items)) => items.push(value),
                        _ => {
                            target.insert(list_key, Value::Array(vec![value]));
                        }
                    }
                }
                None => {
                    target.insert(key.to_string(), value);
                }
            }
        }

        non_empty(Value::Object(root))
    }

    fn serialize(&self, tree: &Tree) -> Result<String, AdapterError> {
        let Value::Object(root) = tree else {
            return Err(AdapterError::Serialize(
                "INI documents must be a mapping at the top level".into(),
            ));
        };
        let mut out = String::new();
        write_section(&mut out, &[], root)?;
        Ok(out)
    }
}

fn parse_error(line: usize, message: &str) -> AdapterError {
    AdapterError::Parse(format!("line {line}: {message}"))
}

/// Walk (creating as needed) the nested mapping for a section path.
fn section_mut<'a>(root: &'a mut Mapping, path: &[String]) -> Result<&'a mut Mapping, String> {
    let mut current = root;
    for name in path {
        let entry = current
            .entry(name.clone())
            .or_insert_with(|| Value::Object(Mapping::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => return Err(format!("section '{name}' collides with a non-section key")),
        };
    }
    Ok(current)
}

fn parse_value(raw: &str) -> Result<Value, String> {
    if raw.starts_with('"') {
        return serde_json::from_str::<String>(raw)
            .map(Value::String)
            .map_err(|e| format!("invalid quoted value: {e}"));
    }
    if raw.len() > 1 && raw.starts_with('\'') && raw.ends_with('\'') {
        return Ok(Value::String(raw[1..raw.len() - 1].to_string()));
    }

    let raw = strip_comment(raw);
    let typed = match raw.as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        s if NUMBER.is_match(s) => parse_number(s),
        _ => None,
    };
    Ok(typed.unwrap_or(Value::String(raw)))
}

/// Cut an unquoted value at the first unescaped `;` or `#`.
fn strip_comment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ (';' | '#' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            ';' | '#' => break,
            _ => out.push(c),
        }
    }
    out.trim_end().to_string()
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Value::Number(u.into()));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Write the scalars of `map`, then each child mapping as its own section.
fn write_section(out: &mut String, path: &[&str], map: &Mapping) -> Result<(), AdapterError> {
    for (key, value) in map {
        if !value.is_object() {
            write_entry(out, key, value)?;
        }
    }

    for (key, value) in map {
        let Value::Object(child) = value else {
            continue;
        };
        check_section_name(key)?;
        let mut child_path = path.to_vec();
        child_path.push(key);
        if !out.is_empty() {
            out.push('\n');
        }
        out.push('[');
        out.push_str(&child_path.join("."));
        out.push_str("]\n");
        write_section(out, &child_path, child)?;
    }
    Ok(())
}

fn write_entry(out: &mut String, key: &str, value: &Value) -> Result<(), AdapterError> {
    check_key(key)?;
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(AdapterError::Serialize(format!(
                    "empty list '{key}' cannot be represented in INI"
                )));
            }
            for item in items {
                if item.is_array() || item.is_object() {
                    return Err(AdapterError::Serialize(format!(
                        "list '{key}' may only hold scalar values in INI"
                    )));
                }
                out.push_str(&format!("{key}[]={}\n", format_scalar(item)));
            }
        }
        scalar => out.push_str(&format!("{key}={}\n", format_scalar(scalar))),
    }
    Ok(())
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) if needs_quoting(s) => Value::String(s.clone()).to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Strings that would not read back as the same string are JSON-quoted.
fn needs_quoting(s: &str) -> bool {
    s != s.trim()
        || matches!(s, "true" | "false" | "null")
        || NUMBER.is_match(s)
        || s.starts_with('[')
        || s.contains(['=', ';', '#', '"', '\'', '\\', '\n', '\r'])
}

fn check_key(key: &str) -> Result<(), AdapterError> {
    let invalid = key.is_empty()
        || key != key.trim()
        || key.ends_with("[]")
        || key.starts_with(['[', ';', '#'])
        || key.contains(['=', '\n', '\r']);
    if invalid {
        return Err(AdapterError::Serialize(format!(
            "key '{key}' cannot be represented in INI"
        )));
    }
    Ok(())
}

fn check_section_name(name: &str) -> Result<(), AdapterError> {
    if name.is_empty() || name != name.trim() || name.contains(['.', '[', ']', '\n', '\r']) {
        return Err(AdapterError::Serialize(format!(
            "section name '{name}' cannot be represented in INI"
        )));
    }
    Ok(())
}

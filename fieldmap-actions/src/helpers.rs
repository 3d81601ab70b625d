//! Helper functions for field actions
//!
//! Common utilities for extracting inputs and properties.

use fieldmap_core::{MapError, Number, Value};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Extract text from a Value, handling null propagation
pub fn extract_text(value: &Value) -> Result<Option<&str>, MapError> {
    match value {
        Value::Text(s) => Ok(Some(s.as_str())),
        Value::Null => Ok(None),
        other => Err(MapError::type_error("Text", other.type_name())),
    }
}

/// Apply a text-to-text mapping, passing null through
pub fn map_text(value: &Value, f: impl FnOnce(&str) -> String) -> Result<Value, MapError> {
    Ok(match extract_text(value)? {
        Some(s) => Value::Text(f(s)),
        None => Value::Null,
    })
}

/// Optional text property; scalars are rendered as text
pub fn text_property(props: &HashMap<String, Value>, action: &str, name: &str) -> Result<Option<String>, MapError> {
    match props.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(other) => Err(MapError::arg_type(action, name, "Text", other.type_name())),
    }
}

pub fn require_text_property(props: &HashMap<String, Value>, action: &str, name: &str) -> Result<String, MapError> {
    text_property(props, action, name)?
        .ok_or_else(|| MapError::missing_property(action, name))
}

/// Optional integer property; numeric text is accepted
pub fn int_property(props: &HashMap<String, Value>, action: &str, name: &str) -> Result<Option<i64>, MapError> {
    let number = match props.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.clone(),
        Some(Value::Text(s)) => Number::from_str(s)?,
        Some(other) => return Err(MapError::arg_type(action, name, "Number", other.type_name())),
    };
    number.to_i64().map(Some).ok_or_else(|| {
        MapError::domain_error(format!("{}: {} must be a valid integer", action, name))
    })
}

pub fn bool_property(props: &HashMap<String, Value>, action: &str, name: &str) -> Result<Option<bool>, MapError> {
    match props.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::Text(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::Text(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(other) => Err(MapError::arg_type(action, name, "Bool", other.type_name())),
    }
}

/// Numbers of a single value or of a list; nulls are skipped
pub fn numbers(value: &Value, action: &str) -> Result<Vec<Number>, MapError> {
    let items: &[Value] = match value {
        Value::List(items) => items,
        single => std::slice::from_ref(single),
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Number(n) => out.push(n.clone()),
            Value::Text(s) => out.push(Number::from_str(s)?),
            Value::Null => {}
            other => return Err(MapError::arg_type(action, "values", "Number", other.type_name())),
        }
    }
    Ok(out)
}

/// Regex cache for compiled patterns
static REGEX_CACHE: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, Regex>> {
    REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get or compile a regex pattern with caching
pub fn get_regex(pattern: &str) -> Result<Regex, MapError> {
    let cache = get_cache();

    {
        let read_guard = cache.read().map_err(|_| {
            MapError::new("INTERNAL", "Failed to acquire regex cache lock")
        })?;
        if let Some(re) = read_guard.get(pattern) {
            return Ok(re.clone());
        }
    }

    let re = Regex::new(pattern).map_err(|e| {
        MapError::parse_error(format!("Invalid regex '{}': {}", pattern, e))
    })?;

    // Caching is best effort
    if let Ok(mut write_guard) = cache.write() {
        write_guard.insert(pattern.to_string(), re.clone());
    }

    Ok(re)
}

/// Normalize index to handle negative values (Python-style)
pub fn normalize_index(idx: i64, len: usize) -> usize {
    if idx < 0 {
        let positive = idx.unsigned_abs() as usize;
        len.saturating_sub(positive)
    } else {
        (idx as usize).min(len)
    }
}

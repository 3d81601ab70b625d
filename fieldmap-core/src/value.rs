//! Runtime values flowing through expressions
//!
//! Values can be numbers, text, booleans, lists, objects (nested source
//! documents) or null. `Null` is the absent value; `List` is the aggregate
//! handed to a field action when a call has several arguments.

use crate::Number;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(Number),
    Text(String),
    Bool(bool),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
}

/// Shape of a value, used as the second half of a field-action dispatch key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueCategory {
    Null,
    Bool,
    Number,
    Text,
    List,
    Object,
}

impl ValueCategory {
    /// Every category, in declaration order
    pub const ALL: [ValueCategory; 6] = [
        ValueCategory::Null,
        ValueCategory::Bool,
        ValueCategory::Number,
        ValueCategory::Text,
        ValueCategory::List,
        ValueCategory::Object,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ValueCategory::Null => "Null",
            ValueCategory::Bool => "Bool",
            ValueCategory::Number => "Number",
            ValueCategory::Text => "Text",
            ValueCategory::List => "List",
            ValueCategory::Object => "Object",
        }
    }
}

impl std::fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Dispatch category of this value
    pub fn category(&self) -> ValueCategory {
        match self {
            Value::Number(_) => ValueCategory::Number,
            Value::Text(_) => ValueCategory::Text,
            Value::Bool(_) => ValueCategory::Bool,
            Value::Object(_) => ValueCategory::Object,
            Value::List(_) => ValueCategory::List,
            Value::Null => ValueCategory::Null,
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.category().name()
    }

    /// Field of an object value; `None` for missing keys and non-objects
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Emptiness as understood by mapping functions: null, "", [] and {}
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::List(l) => l.is_empty(),
            Value::Object(o) => o.is_empty(),
            Value::Number(_) | Value::Bool(_) => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(obj) => {
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                let fields: Vec<String> = keys.iter()
                    .map(|k| format!("{}: {}", k, obj[*k]))
                    .collect();
                write!(f, "{{{}}}", fields.join(", "))
            }
            Value::List(items) => {
                let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", contents.join(", "))
            }
            Value::Null => write!(f, "null"),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from_i64(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Source documents usually arrive as JSON
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::from(i),
                None => Number::from_str(&n.to_string())
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

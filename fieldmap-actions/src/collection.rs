//! Collection and general-purpose field actions

use crate::helpers::{bool_property, int_property, normalize_index, text_property};
use fieldmap_plugin::prelude::*;
use std::collections::HashMap;

const CATEGORY: &str = "collection";

// ============ Concatenate ============

pub struct Concatenate;

static CONCATENATE_PROPS: [ArgMeta; 2] = [
    ArgMeta::optional("delimiter", "Text", "Text placed between items", "\"\""),
    ArgMeta::optional("delimitingEmptyValues", "Bool", "Keep empty and null items", "false"),
];

impl FieldAction for Concatenate {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Concatenate",
            description: "Join list items into one text",
            accepts: Accepts::OneOf(&[ValueCategory::List, ValueCategory::Text]),
            properties: &CONCATENATE_PROPS,
            returns: "Text",
            examples: &["Concatenate(\"a\", \"b\", delimiter=\"-\") → \"a-b\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let delimiter = text_property(props, "Concatenate", "delimiter")?.unwrap_or_default();
        let keep_empty = bool_property(props, "Concatenate", "delimitingEmptyValues")?.unwrap_or(false);

        let items = match value {
            Value::List(items) => items,
            Value::Null => return Ok(Value::Null),
            single => vec![single],
        };
        let parts: Vec<String> = items.iter()
            .filter(|item| keep_empty || !item.is_empty())
            .map(|item| match item {
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        Ok(Value::Text(parts.join(&delimiter)))
    }
}

// ============ Count / ItemAt ============

pub struct Count;
pub struct ItemAt;

impl FieldAction for Count {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Count",
            description: "Number of items in a list",
            accepts: Accepts::Only(ValueCategory::List),
            properties: &[],
            returns: "Number",
            examples: &["Count(\"a\", \"b\", \"c\") → 3"],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        match value {
            Value::List(items) => Ok(Value::from(items.len() as i64)),
            Value::Null => Ok(Value::from(0)),
            other => Err(MapError::type_error("List", other.type_name())),
        }
    }
}

static ITEM_AT_PROPS: [ArgMeta; 1] = [ArgMeta::required("index", "Number", "Position; negative counts from the end")];

impl FieldAction for ItemAt {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "ItemAt",
            description: "Item of a list at a position",
            accepts: Accepts::Only(ValueCategory::List),
            properties: &ITEM_AT_PROPS,
            returns: "Any",
            examples: &["ItemAt(\"a\", \"b\", index=1) → \"b\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let index = int_property(props, "ItemAt", "index")?
            .ok_or_else(|| MapError::missing_property("ItemAt", "index"))?;
        let mut items = match value {
            Value::List(items) => items,
            Value::Null => return Ok(Value::Null),
            other => return Err(MapError::type_error("List", other.type_name())),
        };
        let pos = normalize_index(index, items.len());
        if pos >= items.len() {
            return Err(MapError::transformation(
                "ItemAt",
                format!("index {} out of bounds for {} items", index, items.len()),
            ));
        }
        Ok(items.swap_remove(pos))
    }
}

// ============ Length / IsNull ============

pub struct Length;
pub struct IsNull;

impl FieldAction for Length {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Length",
            description: "Characters in text, items in a list or fields in an object",
            accepts: Accepts::OneOf(&[ValueCategory::Text, ValueCategory::List, ValueCategory::Object]),
            properties: &[],
            returns: "Number",
            examples: &["Length(\"abc\") → 3"],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let len = match &value {
            Value::Text(s) => s.chars().count(),
            Value::List(items) => items.len(),
            Value::Object(fields) => fields.len(),
            Value::Null => return Ok(Value::Null),
            other => return Err(MapError::type_error("Text, List or Object", other.type_name())),
        };
        Ok(Value::from(len as i64))
    }
}

impl FieldAction for IsNull {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "IsNull",
            description: "True when the value is absent",
            accepts: Accepts::Any,
            properties: &[],
            returns: "Bool",
            examples: &["IsNull(${/missing}) → true"],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        Ok(Value::Bool(value.is_null()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::codes;

    fn props(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn list(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn test_concatenate() {
        let p = props(&[("delimiter", Value::from("-"))]);
        assert_eq!(Concatenate.process(&p, list(&["a", "b", "c"])).unwrap(), Value::from("a-b-c"));
        assert_eq!(Concatenate.process(&HashMap::new(), list(&["a", "b"])).unwrap(), Value::from("ab"));
        assert_eq!(Concatenate.process(&p, Value::from("solo")).unwrap(), Value::from("solo"));
    }

    #[test]
    fn test_concatenate_empty_values() {
        let items = Value::List(vec![Value::from("a"), Value::Null, Value::from(""), Value::from(3)]);
        let skip = props(&[("delimiter", Value::from(","))]);
        assert_eq!(Concatenate.process(&skip, items.clone()).unwrap(), Value::from("a,3"));

        let keep = props(&[("delimiter", Value::from(",")), ("delimitingEmptyValues", Value::Bool(true))]);
        assert_eq!(Concatenate.process(&keep, items).unwrap(), Value::from("a,,,3"));
    }

    #[test]
    fn test_concatenate_keeps_number_digits() {
        let precise = Value::Number(Number::from_str("123456789012345678.5").unwrap());
        let items = Value::List(vec![Value::from("id"), precise]);
        let p = props(&[("delimiter", Value::from(":"))]);
        assert_eq!(Concatenate.process(&p, items).unwrap(), Value::from("id:123456789012345678.5"));
    }

    #[test]
    fn test_count_and_item_at() {
        let items = list(&["x", "y", "z"]);
        assert_eq!(Count.process(&HashMap::new(), items.clone()).unwrap(), Value::from(3));
        assert_eq!(ItemAt.process(&props(&[("index", Value::from(1))]), items.clone()).unwrap(), Value::from("y"));
        assert_eq!(ItemAt.process(&props(&[("index", Value::from(-1))]), items.clone()).unwrap(), Value::from("z"));

        let err = ItemAt.process(&props(&[("index", Value::from(5))]), items).unwrap_err();
        assert!(err.is(codes::TRANSFORMATION_ERROR));
    }

    #[test]
    fn test_length() {
        assert_eq!(Length.process(&HashMap::new(), Value::from("héllo")).unwrap(), Value::from(5));
        assert_eq!(Length.process(&HashMap::new(), list(&["a", "b"])).unwrap(), Value::from(2));
        assert!(Length.process(&HashMap::new(), Value::Null).unwrap().is_null());
    }

    #[test]
    fn test_is_null() {
        assert_eq!(IsNull.process(&HashMap::new(), Value::Null).unwrap(), Value::Bool(true));
        assert_eq!(IsNull.process(&HashMap::new(), Value::from(0)).unwrap(), Value::Bool(false));
    }
}

//! Text field actions: case, trimming, affixes, padding, substrings, replacement.

use crate::helpers::{extract_text, get_regex, int_property, map_text, require_text_property, text_property};
use fieldmap_plugin::prelude::*;
use std::collections::HashMap;

const TEXT: Accepts = Accepts::Only(ValueCategory::Text);
const CATEGORY: &str = "string";

// ============ Case ============

pub struct Uppercase;
pub struct Lowercase;
pub struct Capitalize;

impl FieldAction for Uppercase {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Uppercase",
            description: "Convert text to uppercase",
            accepts: TEXT,
            properties: &[],
            returns: "Text",
            examples: &["Uppercase(\"hello\") → \"HELLO\""],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        map_text(&value, str::to_uppercase)
    }
}

impl FieldAction for Lowercase {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Lowercase",
            description: "Convert text to lowercase",
            accepts: TEXT,
            properties: &[],
            returns: "Text",
            examples: &["Lowercase(\"HELLO\") → \"hello\""],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        map_text(&value, str::to_lowercase)
    }
}

impl FieldAction for Capitalize {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Capitalize",
            description: "Uppercase the first character of text",
            accepts: TEXT,
            properties: &[],
            returns: "Text",
            examples: &["Capitalize(\"hello world\") → \"Hello world\""],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        map_text(&value, |s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
    }
}

// ============ Trim ============

pub struct Trim;
pub struct TrimLeft;
pub struct TrimRight;

impl FieldAction for Trim {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Trim",
            description: "Remove leading and trailing whitespace",
            accepts: TEXT,
            properties: &[],
            returns: "Text",
            examples: &["Trim(\"  hi  \") → \"hi\""],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        map_text(&value, |s| s.trim().to_string())
    }
}

impl FieldAction for TrimLeft {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "TrimLeft",
            description: "Remove leading whitespace",
            accepts: TEXT,
            properties: &[],
            returns: "Text",
            examples: &["TrimLeft(\"  hi  \") → \"hi  \""],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        map_text(&value, |s| s.trim_start().to_string())
    }
}

impl FieldAction for TrimRight {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "TrimRight",
            description: "Remove trailing whitespace",
            accepts: TEXT,
            properties: &[],
            returns: "Text",
            examples: &["TrimRight(\"  hi  \") → \"  hi\""],
            category: CATEGORY,
        }
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        map_text(&value, |s| s.trim_end().to_string())
    }
}

// ============ Append / Prepend ============

pub struct Append;
pub struct Prepend;

static AFFIX_PROPS: [ArgMeta; 1] = [ArgMeta::required("string", "Text", "Text to add")];

impl FieldAction for Append {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Append",
            description: "Add text after the value",
            accepts: TEXT,
            properties: &AFFIX_PROPS,
            returns: "Text",
            examples: &["Append(\"file\", string=\".txt\") → \"file.txt\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let suffix = require_text_property(props, "Append", "string")?;
        // Null input appends to the empty string
        let base = extract_text(&value)?.unwrap_or_default();
        Ok(Value::Text(format!("{}{}", base, suffix)))
    }
}

impl FieldAction for Prepend {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Prepend",
            description: "Add text before the value",
            accepts: TEXT,
            properties: &AFFIX_PROPS,
            returns: "Text",
            examples: &["Prepend(\"42\", string=\"#\") → \"#42\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let prefix = require_text_property(props, "Prepend", "string")?;
        let base = extract_text(&value)?.unwrap_or_default();
        Ok(Value::Text(format!("{}{}", prefix, base)))
    }
}

// ============ Padding ============

pub struct PadStringLeft;
pub struct PadStringRight;

/// Upper bound on `padCount`
pub const MAX_PAD_COUNT: usize = 65_536;

static PAD_PROPS: [ArgMeta; 2] = [
    ArgMeta::required("padCharacter", "Text", "Single character to pad with"),
    ArgMeta::required("padCount", "Number", "How many characters to add"),
];

fn pad_settings(props: &HashMap<String, Value>, action: &str) -> Result<(char, usize), MapError> {
    let pad = require_text_property(props, action, "padCharacter")?;
    let mut chars = pad.chars();
    let pad_char = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(MapError::transformation(action, "padCharacter must be a single character")),
    };
    let count = int_property(props, action, "padCount")?
        .ok_or_else(|| MapError::missing_property(action, "padCount"))?;
    if count < 0 {
        return Err(MapError::transformation(action, "padCount must not be negative"));
    }
    let count = usize::try_from(count).unwrap_or(usize::MAX);
    if count > MAX_PAD_COUNT {
        return Err(MapError::transformation(
            action,
            format!("padCount {} exceeds the limit of {}", count, MAX_PAD_COUNT),
        ));
    }
    Ok((pad_char, count))
}

impl FieldAction for PadStringLeft {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "PadStringLeft",
            description: "Prefix text with a repeated pad character",
            accepts: TEXT,
            properties: &PAD_PROPS,
            returns: "Text",
            examples: &["PadStringLeft(\"7\", padCharacter=\"0\", padCount=2) → \"007\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let (pad_char, count) = pad_settings(props, "PadStringLeft")?;
        let base = extract_text(&value)?.unwrap_or_default();
        let padding: String = std::iter::repeat(pad_char).take(count).collect();
        Ok(Value::Text(padding + base))
    }
}

impl FieldAction for PadStringRight {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "PadStringRight",
            description: "Suffix text with a repeated pad character",
            accepts: TEXT,
            properties: &PAD_PROPS,
            returns: "Text",
            examples: &["PadStringRight(\"ab\", padCharacter=\"-\", padCount=3) → \"ab---\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let (pad_char, count) = pad_settings(props, "PadStringRight")?;
        let mut out = extract_text(&value)?.unwrap_or_default().to_string();
        out.extend(std::iter::repeat(pad_char).take(count));
        Ok(Value::Text(out))
    }
}

// ============ SubString ============

pub struct SubString;

static SUBSTRING_PROPS: [ArgMeta; 2] = [
    ArgMeta::required("startIndex", "Number", "First character (0-based)"),
    ArgMeta::optional("endIndex", "Number", "One past the last character", "end of text"),
];

impl FieldAction for SubString {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "SubString",
            description: "Characters between startIndex and endIndex",
            accepts: TEXT,
            properties: &SUBSTRING_PROPS,
            returns: "Text",
            examples: &["SubString(\"mapping\", startIndex=0, endIndex=3) → \"map\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let Some(s) = extract_text(&value)? else {
            return Ok(Value::Null);
        };
        let len = s.chars().count();
        let start = int_property(props, "SubString", "startIndex")?
            .ok_or_else(|| MapError::missing_property("SubString", "startIndex"))?;
        let end = int_property(props, "SubString", "endIndex")?.unwrap_or(len as i64);
        if start < 0 || end < start || end as usize > len {
            return Err(MapError::transformation(
                "SubString",
                format!("range {}..{} out of bounds for length {}", start, end, len),
            ));
        }
        let out: String = s.chars().skip(start as usize).take((end - start) as usize).collect();
        Ok(Value::Text(out))
    }
}

// ============ Replace ============

pub struct ReplaceAll;
pub struct ReplaceFirst;

static REPLACE_PROPS: [ArgMeta; 2] = [
    ArgMeta::required("match", "Text", "Regular expression to look for"),
    ArgMeta::optional("newString", "Text", "Replacement text", "\"\""),
];

fn replace(props: &HashMap<String, Value>, value: &Value, action: &str, all: bool) -> Result<Value, MapError> {
    let Some(s) = extract_text(value)? else {
        return Ok(Value::Null);
    };
    let pattern = require_text_property(props, action, "match")?;
    let replacement = text_property(props, action, "newString")?.unwrap_or_default();
    let re = get_regex(&pattern)?;
    let out = if all {
        re.replace_all(s, replacement.as_str())
    } else {
        re.replace(s, replacement.as_str())
    };
    Ok(Value::Text(out.into_owned()))
}

impl FieldAction for ReplaceAll {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "ReplaceAll",
            description: "Replace every match of a regular expression",
            accepts: TEXT,
            properties: &REPLACE_PROPS,
            returns: "Text",
            examples: &["ReplaceAll(\"a-b-c\", match=\"-\", newString=\"+\") → \"a+b+c\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        replace(props, &value, "ReplaceAll", true)
    }
}

impl FieldAction for ReplaceFirst {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "ReplaceFirst",
            description: "Replace the first match of a regular expression",
            accepts: TEXT,
            properties: &REPLACE_PROPS,
            returns: "Text",
            examples: &["ReplaceFirst(\"a-b-c\", match=\"-\", newString=\"+\") → \"a+b-c\""],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        replace(props, &value, "ReplaceFirst", false)
    }
}

// ============ Split ============

pub struct Split;

static SPLIT_PROPS: [ArgMeta; 1] = [ArgMeta::required("delimiter", "Text", "Separator text")];

impl FieldAction for Split {
    fn meta(&self) -> ActionMeta {
        ActionMeta {
            name: "Split",
            description: "Split text into a list on a delimiter",
            accepts: TEXT,
            properties: &SPLIT_PROPS,
            returns: "List",
            examples: &["Split(\"a,b\", delimiter=\",\") → [\"a\", \"b\"]"],
            category: CATEGORY,
        }
    }

    fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let Some(s) = extract_text(&value)? else {
            return Ok(Value::Null);
        };
        let delimiter = require_text_property(props, "Split", "delimiter")?;
        if delimiter.is_empty() {
            return Err(MapError::transformation("Split", "delimiter must not be empty"));
        }
        Ok(Value::List(s.split(delimiter.as_str()).map(Value::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::codes;

    fn props(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn none() -> HashMap<String, Value> {
        HashMap::new()
    }

    #[test]
    fn test_case_actions() {
        assert_eq!(Uppercase.process(&none(), Value::from("café")).unwrap(), Value::from("CAFÉ"));
        assert_eq!(Lowercase.process(&none(), Value::from("MiXeD")).unwrap(), Value::from("mixed"));
        assert_eq!(Capitalize.process(&none(), Value::from("élan vital")).unwrap(), Value::from("Élan vital"));
        assert_eq!(Capitalize.process(&none(), Value::from("")).unwrap(), Value::from(""));
    }

    #[test]
    fn test_null_passes_through() {
        assert!(Uppercase.process(&none(), Value::Null).unwrap().is_null());
        assert!(Trim.process(&none(), Value::Null).unwrap().is_null());
        assert!(SubString.process(&props(&[("startIndex", Value::from(0))]), Value::Null).unwrap().is_null());
    }

    #[test]
    fn test_trim_family() {
        let v = Value::from("  hi  ");
        assert_eq!(Trim.process(&none(), v.clone()).unwrap(), Value::from("hi"));
        assert_eq!(TrimLeft.process(&none(), v.clone()).unwrap(), Value::from("hi  "));
        assert_eq!(TrimRight.process(&none(), v).unwrap(), Value::from("  hi"));
    }

    #[test]
    fn test_affixes() {
        let p = props(&[("string", Value::from("!"))]);
        assert_eq!(Append.process(&p, Value::from("hey")).unwrap(), Value::from("hey!"));
        assert_eq!(Prepend.process(&p, Value::from("hey")).unwrap(), Value::from("!hey"));
        assert_eq!(Append.process(&p, Value::Null).unwrap(), Value::from("!"));
        let err = Append.process(&none(), Value::from("hey")).unwrap_err();
        assert!(err.is(codes::MISSING_PROPERTY));
    }

    #[test]
    fn test_padding() {
        let p = props(&[("padCharacter", Value::from("0")), ("padCount", Value::from(2))]);
        assert_eq!(PadStringLeft.process(&p, Value::from("7")).unwrap(), Value::from("007"));
        assert_eq!(PadStringRight.process(&p, Value::from("7")).unwrap(), Value::from("700"));

        let bad = props(&[("padCharacter", Value::from("ab")), ("padCount", Value::from(1))]);
        assert!(PadStringLeft.process(&bad, Value::from("x")).unwrap_err().is(codes::TRANSFORMATION_ERROR));
    }

    #[test]
    fn test_padding_count_is_bounded() {
        let huge = props(&[("padCharacter", Value::from("0")), ("padCount", Value::from("1e12"))]);
        assert!(PadStringLeft.process(&huge, Value::from("7")).unwrap_err().is(codes::TRANSFORMATION_ERROR));
        assert!(PadStringRight.process(&huge, Value::from("7")).unwrap_err().is(codes::TRANSFORMATION_ERROR));

        let at_limit = props(&[
            ("padCharacter", Value::from("-")),
            ("padCount", Value::from(MAX_PAD_COUNT as i64)),
        ]);
        let padded = PadStringRight.process(&at_limit, Value::from("")).unwrap();
        assert_eq!(padded.as_text().map(str::len), Some(MAX_PAD_COUNT));
    }

    #[test]
    fn test_substring() {
        let p = props(&[("startIndex", Value::from(1)), ("endIndex", Value::from(3))]);
        assert_eq!(SubString.process(&p, Value::from("héllo")).unwrap(), Value::from("él"));

        let open = props(&[("startIndex", Value::from(2))]);
        assert_eq!(SubString.process(&open, Value::from("hello")).unwrap(), Value::from("llo"));

        let out = props(&[("startIndex", Value::from(4)), ("endIndex", Value::from(9))]);
        assert!(SubString.process(&out, Value::from("hello")).unwrap_err().is(codes::TRANSFORMATION_ERROR));
    }

    #[test]
    fn test_replace() {
        let p = props(&[("match", Value::from(r"\d")), ("newString", Value::from("#"))]);
        assert_eq!(ReplaceAll.process(&p, Value::from("a1b22")).unwrap(), Value::from("a#b##"));
        assert_eq!(ReplaceFirst.process(&p, Value::from("a1b22")).unwrap(), Value::from("a#b22"));

        let bad = props(&[("match", Value::from("[oops"))]);
        assert!(ReplaceAll.process(&bad, Value::from("x")).unwrap_err().is(codes::PARSE_ERROR));
    }

    #[test]
    fn test_split() {
        let p = props(&[("delimiter", Value::from(","))]);
        assert_eq!(
            Split.process(&p, Value::from("a,b,,c")).unwrap(),
            Value::List(vec![Value::from("a"), Value::from("b"), Value::from(""), Value::from("c")])
        );
    }

    #[test]
    fn test_rejects_non_text() {
        let err = Uppercase.process(&none(), Value::from(5)).unwrap_err();
        assert!(err.is(codes::TYPE_ERROR));
    }
}

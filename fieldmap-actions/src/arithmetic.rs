//! Numeric field actions
//!
//! Aggregates accept a list of numbers (numeric text is parsed, nulls are
//! skipped) or a single number. Unary actions accept a single number.

use crate::helpers::numbers;
use fieldmap_plugin::prelude::*;
use std::collections::HashMap;

const CATEGORY: &str = "arithmetic";
const NUMBERS: Accepts = Accepts::OneOf(&[ValueCategory::List, ValueCategory::Number]);
const NUMBER: Accepts = Accepts::Only(ValueCategory::Number);

pub struct Add;
pub struct Subtract;
pub struct Multiply;
pub struct Divide;
pub struct Maximum;
pub struct Minimum;
pub struct Average;

fn aggregate_meta(name: &'static str, description: &'static str, example: &'static [&'static str]) -> ActionMeta {
    ActionMeta {
        name,
        description,
        accepts: NUMBERS,
        properties: &[],
        returns: "Number",
        examples: example,
        category: CATEGORY,
    }
}

/// Fold the first number with the rest; `None` for an empty input
fn fold_numbers(
    value: &Value,
    action: &str,
    op: impl Fn(&Number, &Number) -> Result<Number, MapError>,
) -> Result<Option<Number>, MapError> {
    let nums = numbers(value, action)?;
    let mut iter = nums.into_iter();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    iter.try_fold(first, |acc, n| op(&acc, &n)).map(Some)
}

impl FieldAction for Add {
    fn meta(&self) -> ActionMeta {
        aggregate_meta("Add", "Sum of the numbers", &["Add(1, 2, 3) → 6"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let sum = fold_numbers(&value, "Add", |a, b| Ok(a.add(b)))?;
        Ok(Value::Number(sum.unwrap_or_else(|| Number::from_i64(0))))
    }
}

impl FieldAction for Subtract {
    fn meta(&self) -> ActionMeta {
        aggregate_meta("Subtract", "First number minus the others", &["Subtract(10, 3) → 7"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let diff = fold_numbers(&value, "Subtract", |a, b| Ok(a.sub(b)))?;
        Ok(diff.map(Value::Number).unwrap_or(Value::Null))
    }
}

impl FieldAction for Multiply {
    fn meta(&self) -> ActionMeta {
        aggregate_meta("Multiply", "Product of the numbers", &["Multiply(2, 3, 4) → 24"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let product = fold_numbers(&value, "Multiply", |a, b| Ok(a.mul(b)))?;
        Ok(Value::Number(product.unwrap_or_else(|| Number::from_i64(1))))
    }
}

impl FieldAction for Divide {
    fn meta(&self) -> ActionMeta {
        aggregate_meta("Divide", "First number divided by the others", &["Divide(10, 4) → 2.5"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let quotient = fold_numbers(&value, "Divide", |a, b| a.checked_div(b).map_err(MapError::from))?;
        Ok(quotient.map(Value::Number).unwrap_or(Value::Null))
    }
}

impl FieldAction for Maximum {
    fn meta(&self) -> ActionMeta {
        aggregate_meta("Maximum", "Largest of the numbers", &["Maximum(3, 9, 4) → 9"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let nums = numbers(&value, "Maximum")?;
        Ok(nums.into_iter().max().map(Value::Number).unwrap_or(Value::Null))
    }
}

impl FieldAction for Minimum {
    fn meta(&self) -> ActionMeta {
        aggregate_meta("Minimum", "Smallest of the numbers", &["Minimum(3, 9, 4) → 3"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let nums = numbers(&value, "Minimum")?;
        Ok(nums.into_iter().min().map(Value::Number).unwrap_or(Value::Null))
    }
}

impl FieldAction for Average {
    fn meta(&self) -> ActionMeta {
        aggregate_meta("Average", "Arithmetic mean of the numbers", &["Average(1, 2, 3, 4) → 2.5"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        let nums = numbers(&value, "Average")?;
        if nums.is_empty() {
            return Ok(Value::from(0));
        }
        let count = Number::from_i64(nums.len() as i64);
        let sum = nums.iter().fold(Number::from_i64(0), |acc, n| acc.add(n));
        Ok(Value::Number(sum.checked_div(&count)?))
    }
}

// ============ Unary ============

pub struct AbsoluteValue;
pub struct Ceiling;
pub struct Floor;
pub struct Round;

fn unary(value: &Value, action: &str, op: fn(&Number) -> Number) -> Result<Value, MapError> {
    match value {
        Value::Number(n) => Ok(Value::Number(op(n))),
        Value::Null => Ok(Value::Null),
        other => Err(MapError::arg_type(action, "value", "Number", other.type_name())),
    }
}

fn unary_meta(name: &'static str, description: &'static str, example: &'static [&'static str]) -> ActionMeta {
    ActionMeta {
        name,
        description,
        accepts: NUMBER,
        properties: &[],
        returns: "Number",
        examples: example,
        category: CATEGORY,
    }
}

impl FieldAction for AbsoluteValue {
    fn meta(&self) -> ActionMeta {
        unary_meta("AbsoluteValue", "Absolute value", &["AbsoluteValue(-4) → 4"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        unary(&value, "AbsoluteValue", Number::abs)
    }
}

impl FieldAction for Ceiling {
    fn meta(&self) -> ActionMeta {
        unary_meta("Ceiling", "Smallest integer not below the value", &["Ceiling(1.2) → 2"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        unary(&value, "Ceiling", Number::ceil)
    }
}

impl FieldAction for Floor {
    fn meta(&self) -> ActionMeta {
        unary_meta("Floor", "Largest integer not above the value", &["Floor(1.8) → 1"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        unary(&value, "Floor", Number::floor)
    }
}

impl FieldAction for Round {
    fn meta(&self) -> ActionMeta {
        unary_meta("Round", "Nearest integer, halves away from zero", &["Round(2.5) → 3"])
    }

    fn process(&self, _props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
        unary(&value, "Round", Number::round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::codes;

    fn nums(items: &[i64]) -> Value {
        Value::List(items.iter().map(|n| Value::from(*n)).collect())
    }

    fn run(action: &dyn FieldAction, value: Value) -> Result<Value, MapError> {
        action.process(&HashMap::new(), value)
    }

    fn as_i64(value: Value) -> Option<i64> {
        value.as_number().and_then(|n| n.to_i64())
    }

    #[test]
    fn test_add_and_multiply() {
        assert_eq!(as_i64(run(&Add, nums(&[1, 2, 3])).unwrap()), Some(6));
        assert_eq!(as_i64(run(&Add, nums(&[])).unwrap()), Some(0));
        assert_eq!(as_i64(run(&Multiply, nums(&[2, 3, 4])).unwrap()), Some(24));
        assert_eq!(as_i64(run(&Add, Value::from(5)).unwrap()), Some(5));
    }

    #[test]
    fn test_subtract_and_divide() {
        assert_eq!(as_i64(run(&Subtract, nums(&[10, 3, 2])).unwrap()), Some(5));
        assert_eq!(run(&Divide, nums(&[10, 4])).unwrap().to_string(), "2.5");
        assert!(run(&Subtract, nums(&[])).unwrap().is_null());
    }

    #[test]
    fn test_divide_by_zero() {
        let err = run(&Divide, nums(&[1, 0])).unwrap_err();
        assert!(err.is(codes::DIV_ZERO));
    }

    #[test]
    fn test_min_max_average() {
        assert_eq!(as_i64(run(&Maximum, nums(&[3, 9, 4])).unwrap()), Some(9));
        assert_eq!(as_i64(run(&Minimum, nums(&[3, 9, 4])).unwrap()), Some(3));
        assert_eq!(run(&Average, nums(&[1, 2, 3, 4])).unwrap().to_string(), "2.5");
        assert!(run(&Maximum, nums(&[])).unwrap().is_null());
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        let mixed = Value::List(vec![Value::from("1.5"), Value::from(2), Value::Null]);
        assert_eq!(run(&Add, mixed).unwrap().to_string(), "3.5");
    }

    #[test]
    fn test_unary() {
        let x = Value::Number(Number::from_str("-2.5").unwrap());
        assert_eq!(as_i64(run(&AbsoluteValue, Value::from(-4)).unwrap()), Some(4));
        assert_eq!(as_i64(run(&Ceiling, x.clone()).unwrap()), Some(-2));
        assert_eq!(as_i64(run(&Floor, x.clone()).unwrap()), Some(-3));
        assert_eq!(as_i64(run(&Round, x).unwrap()), Some(-3));
        assert!(run(&Round, Value::from("x")).unwrap_err().is(codes::ARG_TYPE));
    }
}

//! Evaluation Context

use fieldmap_core::{MapError, Value};
use std::collections::HashMap;

/// Runtime context an expression tree is evaluated against
///
/// Holds the source document fields by name. Evaluation only reads it.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub variables: HashMap<String, Value>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(mut self, vars: HashMap<String, Value>) -> Self {
        self.variables = vars;
        self
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn set_var(&mut self, name: String, value: Value) {
        self.variables.insert(name, value);
    }

    /// Resolve a dotted path such as `order.customer.name`
    pub fn get_var(&self, path: &str) -> Result<Value, MapError> {
        let mut parts = path.split('.');
        let root = parts.next().unwrap_or_default();

        let mut current = self.variables.get(root)
            .ok_or_else(|| MapError::undefined_field(path))?;
        for part in parts {
            current = current.get(part)
                .ok_or_else(|| MapError::undefined_field(path))?;
        }
        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_core::codes;

    fn order_context() -> EvalContext {
        let customer: HashMap<String, Value> =
            [("name".to_string(), Value::from("Ada"))].into_iter().collect();
        let order: HashMap<String, Value> = [
            ("id".to_string(), Value::from(17)),
            ("customer".to_string(), Value::Object(customer)),
        ]
        .into_iter()
        .collect();
        EvalContext::new()
            .with_var("order", Value::Object(order))
            .with_var("note", Value::Null)
    }

    #[test]
    fn test_root_variable() {
        let ctx = order_context();
        assert!(ctx.get_var("note").unwrap().is_null());
    }

    #[test]
    fn test_nested_path() {
        let ctx = order_context();
        assert_eq!(ctx.get_var("order.customer.name").unwrap(), Value::from("Ada"));
        assert_eq!(ctx.get_var("order.id").unwrap(), Value::from(17));
    }

    #[test]
    fn test_missing_path() {
        let ctx = order_context();
        let err = ctx.get_var("order.total").unwrap_err();
        assert!(err.is(codes::UNDEFINED_FIELD));
        assert_eq!(err.subject.as_deref(), Some("order.total"));
        assert!(ctx.get_var("missing").is_err());
    }

    #[test]
    fn test_set_var_overrides() {
        let mut ctx = EvalContext::new().with_var("x", 1i64);
        ctx.set_var("x".to_string(), Value::from(2));
        assert_eq!(ctx.get_var("x").unwrap(), Value::from(2));
    }
}

//! Leaf expression nodes

use fieldmap_core::{MapError, Value};
use fieldmap_plugin::{EvalContext, Expression};

/// Constant value
#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub Value);

impl Literal {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn boxed(value: impl Into<Value>) -> Box<dyn Expression> {
        Box::new(Self::new(value))
    }
}

impl Expression for Literal {
    fn evaluate(&self, _ctx: &EvalContext) -> Result<Value, MapError> {
        Ok(self.0.clone())
    }
}

/// Reference to a source field by dotted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef(pub String);

impl FieldRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn boxed(path: impl Into<String>) -> Box<dyn Expression> {
        Box::new(Self::new(path))
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

impl Expression for FieldRef {
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value, MapError> {
        ctx.get_var(&self.0)
    }
}

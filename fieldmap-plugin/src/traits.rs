//! Plugin traits

use crate::EvalContext;
use fieldmap_core::{MapError, Value, ValueCategory};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A lazily evaluable node of the mapping language
///
/// Evaluation only reads the context, so a node may be evaluated any number
/// of times and yields the same result for an unchanged context.
pub trait Expression: Send + Sync {
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value, MapError>;
}

impl<F> Expression for F
where
    F: Fn(&EvalContext) -> Result<Value, MapError> + Send + Sync,
{
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value, MapError> {
        self(ctx)
    }
}

/// Metadata about a function argument or an action property
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

impl ArgMeta {
    pub const fn required(name: &'static str, typ: &'static str, description: &'static str) -> Self {
        Self { name, typ, description, optional: false, default: None }
    }

    pub const fn optional(name: &'static str, typ: &'static str, description: &'static str, default: &'static str) -> Self {
        Self { name, typ, description, optional: true, default: Some(default) }
    }
}

/// Metadata for a function factory
#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub args: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
}

/// Statically registered builder turning an argument list into a node
pub trait FunctionFactory: Send + Sync {
    fn meta(&self) -> FunctionMeta;
    fn create(&self, args: Vec<Box<dyn Expression>>) -> Result<Box<dyn Expression>, MapError>;
}

/// Value shapes a field action can be dispatched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Accepts {
    Only(ValueCategory),
    OneOf(&'static [ValueCategory]),
    Any,
}

impl Accepts {
    pub fn categories(&self) -> Vec<ValueCategory> {
        match self {
            Accepts::Only(c) => vec![*c],
            Accepts::OneOf(cs) => cs.to_vec(),
            Accepts::Any => ValueCategory::ALL.to_vec(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Accepts::Any)
    }
}

/// Metadata for a field action
#[derive(Debug, Clone, Serialize)]
pub struct ActionMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub accepts: Accepts,
    pub properties: &'static [ArgMeta],
    pub returns: &'static str,
    pub examples: &'static [&'static str],
    pub category: &'static str,
}

/// Named, type-specialized value transformation
pub trait FieldAction: Send + Sync {
    fn meta(&self) -> ActionMeta;
    fn process(&self, properties: &HashMap<String, Value>, value: Value) -> Result<Value, MapError>;
}

/// Handle to a field action selected for a value category
#[derive(Clone)]
pub struct ActionProcessor {
    action: Arc<dyn FieldAction>,
    category: ValueCategory,
}

impl ActionProcessor {
    pub fn new(action: Arc<dyn FieldAction>, category: ValueCategory) -> Self {
        Self { action, category }
    }

    pub fn name(&self) -> &'static str {
        self.action.meta().name
    }

    /// Category the processor was selected for
    pub fn category(&self) -> ValueCategory {
        self.category
    }

    pub fn meta(&self) -> ActionMeta {
        self.action.meta()
    }

    pub fn action(&self) -> &dyn FieldAction {
        self.action.as_ref()
    }
}

impl std::fmt::Debug for ActionProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionProcessor")
            .field("name", &self.name())
            .field("category", &self.category)
            .finish()
    }
}

/// Generic dispatch target used when no function factory matches a name
pub trait ActionBridge: Send + Sync {
    /// Look up a processor by name and the shape of `sample`; never fails
    fn find_action_processor(&self, name: &str, sample: &Value) -> Option<ActionProcessor>;

    /// Run a processor; action errors are returned unchanged
    fn process_action(
        &self,
        processor: &ActionProcessor,
        properties: &HashMap<String, Value>,
        value: Value,
    ) -> Result<Value, MapError>;

    /// Names known to the bridge, used for "did you mean" hints
    fn action_names(&self) -> Vec<String> {
        Vec::new()
    }
}

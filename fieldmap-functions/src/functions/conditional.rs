//! Conditional functions

use fieldmap_plugin::prelude::*;
use fieldmap_plugin::FUNCTION_FACTORIES;
use linkme::distributed_slice;

pub struct If;
pub struct IsEmpty;

static IF_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("condition", "Bool", "Condition; null counts as false"),
    ArgMeta::required("then", "Any", "Evaluated when the condition holds"),
    ArgMeta::required("else", "Any", "Evaluated otherwise"),
];
static IF_EXAMPLES: [&str; 1] = ["IF(ISEMPTY(${/middleName}), '', ' ')"];

static ISEMPTY_ARGS: [ArgMeta; 1] = [ArgMeta::required("value", "Any", "Value to test")];
static ISEMPTY_EXAMPLES: [&str; 2] = ["ISEMPTY(${/note})", "ISEMPTY('')"];

#[distributed_slice(FUNCTION_FACTORIES)]
static IF_FACTORY: &'static dyn FunctionFactory = &If;

#[distributed_slice(FUNCTION_FACTORIES)]
static ISEMPTY_FACTORY: &'static dyn FunctionFactory = &IsEmpty;

impl FunctionFactory for If {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "IF",
            description: "Evaluate one of two branches depending on a condition",
            usage: "IF(condition, then, else)",
            args: &IF_ARGS,
            returns: "Any",
            examples: &IF_EXAMPLES,
            category: "conditional",
        }
    }

    fn create(&self, args: Vec<Box<dyn Expression>>) -> Result<Box<dyn Expression>, MapError> {
        let [condition, then_branch, else_branch]: [Box<dyn Expression>; 3] = args
            .try_into()
            .map_err(|rest: Vec<Box<dyn Expression>>| MapError::arg_count("IF", 3, rest.len()))?;
        Ok(Box::new(IfNode { condition, then_branch, else_branch }))
    }
}

struct IfNode {
    condition: Box<dyn Expression>,
    then_branch: Box<dyn Expression>,
    else_branch: Box<dyn Expression>,
}

impl Expression for IfNode {
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value, MapError> {
        // Only the selected branch is evaluated
        let holds = match self.condition.evaluate(ctx)? {
            Value::Bool(b) => b,
            Value::Null => false,
            other => return Err(MapError::arg_type("IF", "condition", "Bool", other.type_name())),
        };
        if holds {
            self.then_branch.evaluate(ctx)
        } else {
            self.else_branch.evaluate(ctx)
        }
    }
}

impl FunctionFactory for IsEmpty {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "ISEMPTY",
            description: "True for null, empty text, empty lists and empty objects",
            usage: "ISEMPTY(value)",
            args: &ISEMPTY_ARGS,
            returns: "Bool",
            examples: &ISEMPTY_EXAMPLES,
            category: "conditional",
        }
    }

    fn create(&self, mut args: Vec<Box<dyn Expression>>) -> Result<Box<dyn Expression>, MapError> {
        if args.len() != 1 {
            return Err(MapError::arg_count("ISEMPTY", 1, args.len()));
        }
        let operand = args.remove(0);
        Ok(Box::new(move |ctx: &EvalContext| {
            operand.evaluate(ctx).map(|v| Value::Bool(v.is_empty()))
        }))
    }
}

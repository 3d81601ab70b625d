//! Case conversion functions

use fieldmap_plugin::prelude::*;
use fieldmap_plugin::FUNCTION_FACTORIES;
use linkme::distributed_slice;

pub struct ToLower;
pub struct ToUpper;

static TEXT_ARGS: [ArgMeta; 1] = [ArgMeta::required("text", "Text", "Text to convert")];
static TOLOWER_EXAMPLES: [&str; 1] = ["TOLOWER('HeLLo') → 'hello'"];
static TOUPPER_EXAMPLES: [&str; 1] = ["TOUPPER('HeLLo') → 'HELLO'"];

#[distributed_slice(FUNCTION_FACTORIES)]
static TOLOWER_FACTORY: &'static dyn FunctionFactory = &ToLower;

#[distributed_slice(FUNCTION_FACTORIES)]
static TOUPPER_FACTORY: &'static dyn FunctionFactory = &ToUpper;

/// Shared node for both case conversions
struct CaseNode {
    func: &'static str,
    operand: Box<dyn Expression>,
    convert: fn(&str) -> String,
}

impl Expression for CaseNode {
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value, MapError> {
        match self.operand.evaluate(ctx)? {
            Value::Text(s) => Ok(Value::Text((self.convert)(&s))),
            Value::Null => Ok(Value::Null),
            scalar @ (Value::Number(_) | Value::Bool(_)) => {
                Ok(Value::Text((self.convert)(&scalar.to_string())))
            }
            other => Err(MapError::arg_type(self.func, "text", "Text", other.type_name())),
        }
    }
}

fn case_node(
    func: &'static str,
    mut args: Vec<Box<dyn Expression>>,
    convert: fn(&str) -> String,
) -> Result<Box<dyn Expression>, MapError> {
    if args.len() != 1 {
        return Err(MapError::arg_count(func, 1, args.len()));
    }
    Ok(Box::new(CaseNode { func, operand: args.remove(0), convert }))
}

impl FunctionFactory for ToLower {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "TOLOWER",
            description: "Convert text to lowercase",
            usage: "TOLOWER(text)",
            args: &TEXT_ARGS,
            returns: "Text",
            examples: &TOLOWER_EXAMPLES,
            category: "text",
        }
    }

    fn create(&self, args: Vec<Box<dyn Expression>>) -> Result<Box<dyn Expression>, MapError> {
        case_node("TOLOWER", args, str::to_lowercase)
    }
}

impl FunctionFactory for ToUpper {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "TOUPPER",
            description: "Convert text to uppercase",
            usage: "TOUPPER(text)",
            args: &TEXT_ARGS,
            returns: "Text",
            examples: &TOUPPER_EXAMPLES,
            category: "text",
        }
    }

    fn create(&self, args: Vec<Box<dyn Expression>>) -> Result<Box<dyn Expression>, MapError> {
        case_node("TOUPPER", args, str::to_uppercase)
    }
}

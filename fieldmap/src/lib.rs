//! fieldmap - expression function resolution for field mapping
//!
//! A call such as `TOUPPER(${/name})` or `Concatenate(a, b, delimiter="-")`
//! is resolved into a single [`Expression`]. Registered function factories
//! win; any other name is dispatched at evaluation time to the field action
//! matching the evaluated arguments.
//!
//! ```ignore
//! use fieldmap::{resolve, FieldRef, Literal, props, EvalContext};
//!
//! let node = resolve(
//!     "Concatenate",
//!     vec![FieldRef::boxed("first"), FieldRef::boxed("last")],
//!     props! { delimiter: Literal::boxed(" ") },
//! )?;
//! let ctx = EvalContext::new().with_var("first", "Ada").with_var("last", "Lovelace");
//! assert_eq!(node.evaluate(&ctx)?, "Ada Lovelace".into());
//! ```

mod config;
mod nodes;
mod resolver;

pub use config::{ResolverConfig, STRICT_FUNCTIONS_VAR, SUGGESTIONS_VAR};
pub use nodes::{FieldRef, Literal};
pub use resolver::{DefaultFunctionResolver, DynamicCall, FunctionResolver, Properties};

pub use fieldmap_actions::FieldActionService;
pub use fieldmap_core::{codes, MapError, Number, Value, ValueCategory};
pub use fieldmap_plugin::{ActionBridge, DuplicatePolicy, EvalContext, Expression, FunctionRegistry};

// Link the built-in factories into every binary using this crate
use fieldmap_functions as _;

/// Resolve a call with the process-wide resolver
pub fn resolve(
    name: &str,
    args: Vec<Box<dyn Expression>>,
    properties: Properties,
) -> Result<Box<dyn Expression>, MapError> {
    DefaultFunctionResolver::global()?.resolve(name, args, properties)
}

/// Build a [`Properties`] map from `name: expression` pairs
#[macro_export]
macro_rules! props {
    {} => { $crate::Properties::new() };
    { $($key:ident : $value:expr),* $(,)? } => {{
        let mut map = $crate::Properties::new();
        $(
            map.insert(stringify!($key).to_string(), $value);
        )*
        map
    }};
}

//! fieldmap Plugin System
//!
//! Provides the extension points of the expression engine:
//! - `Expression` nodes evaluated against an `EvalContext`
//! - `FunctionFactory` plugins discovered at link time into the `FunctionRegistry`
//! - `FieldAction` transformations reached through an `ActionBridge`

mod traits;
mod registry;
mod context;

pub use traits::{
    Expression,
    FunctionFactory, FunctionMeta,
    FieldAction, ActionMeta, Accepts,
    ActionProcessor, ActionBridge,
    ArgMeta,
};
pub use registry::{
    FunctionRegistry, DuplicatePolicy, RegistryError, FUNCTION_FACTORIES, similar_names,
};
pub use context::EvalContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        Expression,
        FunctionFactory, FunctionMeta,
        FieldAction, ActionMeta, Accepts,
        ActionProcessor, ActionBridge,
        ArgMeta, EvalContext,
    };
    pub use fieldmap_core::prelude::*;
}

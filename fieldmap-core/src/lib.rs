//! fieldmap core - fundamental types
//!
//! This crate provides the core types used throughout fieldmap:
//! - `Number`: Arbitrary precision decimal numbers
//! - `Value`: Runtime values (numbers, text, lists, objects, null)
//! - `ValueCategory`: Enumerable value shapes used for action dispatch
//! - `MapError`: Structured errors

mod number;
mod value;
mod error;

pub use number::{Number, NumberError};
pub use value::{Value, ValueCategory};
pub use error::{MapError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, Value, ValueCategory, MapError};
    pub use crate::error::codes;
}

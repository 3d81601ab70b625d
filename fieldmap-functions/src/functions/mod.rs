//! Built-in function factories

mod conditional;
mod text;

pub use conditional::{If, IsEmpty};
pub use text::{ToLower, ToUpper};

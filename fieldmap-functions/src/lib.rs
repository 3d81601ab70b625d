//! fieldmap built-in functions
//!
//! Every factory here registers itself into `FUNCTION_FACTORIES` at link
//! time. Binaries that want them only need to link this crate
//! (`use fieldmap_functions as _;`).

pub mod functions;

/// Names of the factories this crate contributes
pub const BUILTIN_FUNCTIONS: [&str; 4] = ["IF", "ISEMPTY", "TOLOWER", "TOUPPER"];

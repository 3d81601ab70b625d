//! Structured errors
//!
//! Every failure in resolution or evaluation surfaces as a `MapError`
//! carrying a machine-readable code, a message and optional hints.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const FUNCTION_NOT_FOUND: &str = "FUNCTION_NOT_FOUND";
    pub const TRANSFORMATION_ERROR: &str = "TRANSFORMATION_ERROR";
    pub const REGISTRY_ERROR: &str = "REGISTRY_ERROR";
    pub const UNDEFINED_FIELD: &str = "UNDEFINED_FIELD";
    pub const MISSING_PROPERTY: &str = "MISSING_PROPERTY";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const OVERFLOW: &str = "OVERFLOW";
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Name of the function, field or property the error is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

impl MapError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            subject: None,
            suggestion: None,
            notes: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    /// Neither a function factory nor a field action matched `name`
    pub fn function_not_found(name: &str) -> Self {
        Self::new(
            codes::FUNCTION_NOT_FOUND,
            format!("The expression function or transformation '{}' was not found", name),
        )
        .with_subject(name)
    }

    pub fn transformation(action: &str, details: impl Into<String>) -> Self {
        Self::new(
            codes::TRANSFORMATION_ERROR,
            format!("Field action '{}' failed: {}", action, details.into()),
        )
        .with_subject(action)
    }

    pub fn registry(details: impl Into<String>) -> Self {
        Self::new(codes::REGISTRY_ERROR, format!("Function registry error: {}", details.into()))
            .with_suggestion("Check the names of discovered function factories")
    }

    pub fn undefined_field(path: &str) -> Self {
        Self::new(codes::UNDEFINED_FIELD, format!("Undefined field: {}", path))
            .with_subject(path)
    }

    pub fn missing_property(action: &str, property: &str) -> Self {
        Self::new(
            codes::MISSING_PROPERTY,
            format!("{} requires property '{}'", action, property),
        )
        .with_subject(property)
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(codes::TYPE_ERROR, format!("Expected {}, got {}", expected, got))
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_subject(func)
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
            .with_subject(func)
    }

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
            .with_suggestion("Ensure divisor is not zero")
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for MapError {}

impl From<NumberError> for MapError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::parse_error(s),
            NumberError::DivisionByZero => Self::div_zero(),
            NumberError::Overflow => Self::new(codes::OVERFLOW, "Numeric overflow"),
        }
    }
}

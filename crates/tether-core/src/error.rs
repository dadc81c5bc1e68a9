#![forbid(unsafe_code)]

//! Binding error model.
//!
//! # Design Principles
//!
//! 1. **Misuse propagates**: type mismatches, shape mismatches and
//!    out-of-span range reassignments are returned to the caller.
//! 2. **User input is absorbed**: a bad string typed into a text box is
//!    not an error; the display reverts and nothing is returned here.
//! 3. **Stale widgets are silent**: writes aimed at a destroyed widget are
//!    skipped, never reported.

use thiserror::Error;

/// Result alias used by listeners, setters and widget operations.
pub type BindResult<T = ()> = Result<T, BindError>;

/// Errors surfaced by the binding engine and widget wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A supplied value could not be converted to the observable's element type.
    #[error("type mismatch: observable holds {expected}, value is {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A value does not lie within the span of a (newly assigned) range.
    #[error("value {value} not within the span of range {range}")]
    RangeViolation { value: String, range: String },

    /// A step range is malformed (zero step, inverted bounds, bad notation).
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// Writing a value into the native widget failed.
    #[error("widget setter failed: {message}")]
    Setter { message: String },

    /// Choices of one shape were mixed with choices of another.
    #[error("choice shape mismatch: widget holds {expected}, got {found}")]
    ArgumentShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A selection named a choice the widget does not offer.
    #[error("unknown choice {0:?}")]
    UnknownChoice(String),

    /// A choice label was appended twice.
    #[error("duplicate choice {0:?}")]
    DuplicateChoice(String),
}

impl BindError {
    /// Shorthand for a [`BindError::Setter`] with the given message.
    pub fn setter(message: impl Into<String>) -> Self {
        Self::Setter {
            message: message.into(),
        }
    }

    /// Whether this error was raised while writing to a native widget.
    #[must_use]
    pub fn is_setter_failure(&self) -> bool {
        matches!(self, Self::Setter { .. })
    }
}

use serde::Serialize;
use thiserror::Error;

/// Top-level error type returned by tagform builders and containers.
///
/// Validation outcomes are not errors; see [`ValidationIssue`] and
/// [`crate::field::Field::is_valid`].
#[derive(Debug, Error)]
pub enum FormError {
    /// The field factory has no constructor registered for the type tag.
    #[error("unknown field type `{tag}`")]
    UnknownFieldType { tag: String },

    /// Reparenting would make a field its own ancestor.
    #[error("field `{field}` cannot be nested under one of its own descendants")]
    ParentCycle { field: String },

    /// Lookup of a field by name failed.
    #[error("no field named `{name}`")]
    UnknownField { name: String },

    /// A class descriptor is missing data the extractor needs.
    #[error("invalid class descriptor: {message}")]
    Descriptor { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormError {
    pub(crate) fn descriptor(message: impl Into<String>) -> Self {
        Self::Descriptor {
            message: message.into(),
        }
    }
}

/// Collection of validation issues gathered across a form.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable messages in field order.
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.message.as_str()).collect()
    }
}

/// The single failure produced by one field's validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Machine codes carried by [`ValidationIssue::code`].
pub mod codes {
    pub const REQUIRED: &str = "validation.required";
    pub const CALLBACK: &str = "validation.callback";
    pub const RULE: &str = "validation.rule";
    pub const FILTER: &str = "validation.filter";
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub type Result<T, E = FormError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_issue_error_exposes_message() {
        let err = ValidationError::single("email", codes::FILTER, "email is not valid");
        assert!(!err.is_empty());
        assert_eq!(err.messages(), vec!["email is not valid"]);
        assert_eq!(err.issues[0].code, "validation.filter");
    }

    #[test]
    fn unknown_type_display_names_the_tag() {
        let err = FormError::UnknownFieldType { tag: "Slider".into() };
        assert_eq!(err.to_string(), "unknown field type `Slider`");
    }
}

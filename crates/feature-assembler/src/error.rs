//! Assembly Error Types

use thiserror::Error;

/// Errors raised while turning raw input into a feature vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssemblyError {
    /// One or more always-required fields are empty
    #[error(
        "All fields except Body Temperature and Heart Rate must be filled (missing: {})",
        .missing.join(", ")
    )]
    MissingField { missing: Vec<&'static str> },

    /// Value outside a fixed enumeration
    #[error("{field} must be {expected}, got '{value}'")]
    InvalidCategory {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Value that does not parse as a finite decimal number
    #[error("'{value}' is not a valid number for {field}")]
    NumericFormat { field: &'static str, value: String },
}

impl AssemblyError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AssemblyError::MissingField { .. } => "missing_field",
            AssemblyError::InvalidCategory { .. } => "invalid_category",
            AssemblyError::NumericFormat { .. } => "numeric_format",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_lists_names() {
        let err = AssemblyError::MissingField {
            missing: vec!["Age", "Weight"],
        };
        let message = err.to_string();
        assert!(message.starts_with("All fields except Body Temperature and Heart Rate"));
        assert!(message.contains("Age, Weight"));
    }

    #[test]
    fn test_numeric_format_quotes_literal() {
        let err = AssemblyError::NumericFormat {
            field: "Age",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "'abc' is not a valid number for Age");
        assert_eq!(err.kind(), "numeric_format");
    }
}

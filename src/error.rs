//! Error types for bubble plot construction.

use crate::ir::ColumnRole;
use thiserror::Error;

/// Result type alias using [`BubbleError`].
pub type Result<T> = std::result::Result<T, BubbleError>;

/// Broad classification of a failure.
///
/// Configuration errors are detected before any row is ingested; data
/// errors are raised while rows are being ingested. Both abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Data,
}

/// Errors that can occur while turning rows into a bubble plot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BubbleError {
    /// A column role is bound to a name missing from the header.
    #[error("Unknown column '{column}' for {role}")]
    UnknownColumn {
        /// Role the column was bound to.
        role: ColumnRole,
        /// The requested column name.
        column: String,
    },

    /// A transform step names an unknown operation or carries a bad value.
    #[error("Invalid transform {op}({value}): {reason}")]
    InvalidTransform {
        op: String,
        value: String,
        reason: String,
    },

    /// More distinct categories than palette colors.
    #[error("Exceeded maximum number of categories ({max})")]
    TooManyCategories {
        /// Palette capacity.
        max: usize,
    },

    /// A layout or appearance option is out of range or malformed.
    #[error("Invalid {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    /// A row's X/Y/Z value could not be read as a finite number.
    #[error("Failed to parse '{value}' as number in column '{column}' at row {row}")]
    NonNumeric {
        /// 1-based index among data rows (header excluded).
        row: usize,
        column: String,
        value: String,
    },

    /// Input had a header but no data rows.
    #[error("Input must contain at least one data row")]
    EmptyData,
}

impl BubbleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BubbleError::UnknownColumn { .. }
            | BubbleError::InvalidTransform { .. }
            | BubbleError::TooManyCategories { .. }
            | BubbleError::InvalidOption { .. } => ErrorKind::Configuration,
            BubbleError::NonNumeric { .. } | BubbleError::EmptyData => ErrorKind::Data,
        }
    }

    pub(crate) fn invalid_option(option: &str, reason: impl Into<String>) -> Self {
        BubbleError::InvalidOption {
            option: option.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_numeric_display() {
        let err = BubbleError::NonNumeric {
            row: 4,
            column: "weight".to_string(),
            value: "heavy".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'heavy'"));
        assert!(msg.contains("weight"));
        assert!(msg.contains("row 4"));
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn test_unknown_column_is_configuration() {
        let err = BubbleError::UnknownColumn {
            role: ColumnRole::Category,
            column: "region".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Unknown column 'region' for category");
    }

    #[test]
    fn test_too_many_categories_is_configuration() {
        let err = BubbleError::TooManyCategories { max: 20 };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("20"));
    }
}

//! Error types for loading, cleaning and summarising survey data.

use thiserror::Error;

/// Every failure the library reports. All of them are deterministic
/// functions of the input, so none is worth retrying.
#[derive(Error, Debug)]
pub enum Error {
    /// A field name that is not part of the dataset's schema.
    #[error("Field not found: '{0}'")]
    FieldNotFound(String),

    /// A numeric operation was asked of a categorical field.
    #[error("Field '{0}' is not numeric")]
    NonNumericField(String),

    /// Cleaning (or loading) left no rows to work with.
    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Insufficient data: expected at least {expected} observations, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Correlation is undefined when one side never varies.
    #[error("Field '{0}' has zero variance")]
    ZeroVariance(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A schema column absent from the file header.
    #[error("Missing column in input: '{0}'")]
    MissingColumn(String),

    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for "needed `expected` observations, saw `actual`".
    pub fn insufficient(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FieldNotFound("Age".to_string());
        assert_eq!(err.to_string(), "Field not found: 'Age'");

        let err = Error::NonNumericField("Gender".to_string());
        assert_eq!(err.to_string(), "Field 'Gender' is not numeric");

        let err = Error::insufficient(2, 1);
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 observations, got 1"
        );

        let err = Error::Parse {
            row: 3,
            column: "Age".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Row 3, column 'Age': 'abc' is not a number");
    }
}

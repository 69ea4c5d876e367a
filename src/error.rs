//! Error types for toolseq
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in toolseq
#[derive(Debug, Error)]
pub enum SequencerError {
    /// Requested item is not in the matrix, or the subset is empty
    #[error("Invalid subset: {0}")]
    InvalidSubset(String),

    /// Start item is not a member of the chosen subset
    #[error("Invalid start item: {0}")]
    InvalidStartItem(String),

    /// Matrix is not square, has negative values or duplicate labels
    #[error("Malformed matrix: {0}")]
    MalformedMatrix(String),

    /// Sequence is not a permutation of the sub-matrix items
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    /// Selection exceeds the configured item cap
    #[error("Subset too large: {requested} items requested, limit is {limit}")]
    SubsetTooLarge { requested: usize, limit: usize },

    /// Unknown matrix file extension or export format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No work center with the given name under the data directory
    #[error("Work center not found: {0}")]
    WorkCenterNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Bad glob pattern built from the data directory
    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Workbook could not be opened or a sheet could not be read
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// Results workbook could not be written
    #[error("Workbook write error: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type alias for toolseq operations
pub type Result<T> = std::result::Result<T, SequencerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_subset_error() {
        let err = SequencerError::InvalidSubset("item 'X9' not in matrix".to_string());
        assert_eq!(err.to_string(), "Invalid subset: item 'X9' not in matrix");
    }

    #[test]
    fn test_invalid_start_item_error() {
        let err = SequencerError::InvalidStartItem("Z".to_string());
        assert_eq!(err.to_string(), "Invalid start item: Z");
    }

    #[test]
    fn test_malformed_matrix_error() {
        let err = SequencerError::MalformedMatrix("negative value at (A, B)".to_string());
        assert_eq!(err.to_string(), "Malformed matrix: negative value at (A, B)");
    }

    #[test]
    fn test_subset_too_large_error() {
        let err = SequencerError::SubsetTooLarge {
            requested: 600,
            limit: 500,
        };
        assert_eq!(
            err.to_string(),
            "Subset too large: 600 items requested, limit is 500"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SequencerError = io_err.into();
        assert!(matches!(err, SequencerError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: SequencerError = json_err.into();
        assert!(matches!(err, SequencerError::Json(_)));
    }

    #[test]
    fn test_workbook_write_error_conversion() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let xlsx_err = workbook
            .add_worksheet()
            .set_name("")
            .err()
            .expect("blank sheet name is rejected");
        let err: SequencerError = xlsx_err.into();
        assert!(matches!(err, SequencerError::WorkbookWrite(_)));
        assert!(err.to_string().starts_with("Workbook write error:"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(SequencerError::InvalidStartItem("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}

use thiserror::Error;

pub type FilterResult<T> = Result<T, FilterError>;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unparsable file: {0}")]
    UnparsableFile(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid numeric operator: {0}")]
    InvalidOperator(String),

    #[error("Invalid description: {0}")]
    InvalidDescription(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FilterError::InvalidOperator("??".to_string()).to_string(),
            "Invalid numeric operator: ??"
        );
        assert_eq!(
            FilterError::UnknownColumn("city".to_string()).to_string(),
            "Unknown column: city"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FilterError = io.into();
        assert!(matches!(err, FilterError::Io(_)));
    }
}

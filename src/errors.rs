use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A date option is not a valid `YYYY-MM-DD` calendar date
    #[error("Malformed date for '{field}': {value} (expected YYYY-MM-DD)")]
    MalformedDate { field: &'static str, value: String },
    /// The supplied combination of date options cannot be resolved
    #[error("Invalid option combination: {0}")]
    InvalidCombination(String),
    /// Product name not present in the catalog
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Destination folder is missing or cannot be written
    #[error("Folder '{}' does not exist or is not writable: {reason}", .path.display())]
    DestinationNotWritable { path: PathBuf, reason: String },
    /// Credentials could not be obtained
    #[error("Credentials error: {0}")]
    Credentials(String),
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Failed to parse a remote listing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
    /// At least one product failed to download
    #[error("{failed} of {total} product(s) failed to download")]
    PartialFailure { failed: usize, total: usize },
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;
    use std::path::PathBuf;

    #[test]
    fn test_malformed_date_display_names_field_and_value() {
        let err = AppError::MalformedDate {
            field: "startday",
            value: "2020-13-01".to_string(),
        };

        let error_msg = err.to_string();
        assert!(error_msg.contains("startday"));
        assert!(error_msg.contains("2020-13-01"));
    }

    #[test]
    fn test_unknown_product_display() {
        let err = AppError::UnknownProduct("lst_mars_daily".to_string());
        assert!(err.to_string().contains("Unknown product"));
        assert!(err.to_string().contains("lst_mars_daily"));
    }

    #[test]
    fn test_destination_error_display() {
        let err = AppError::DestinationNotWritable {
            path: PathBuf::from("/nowhere"),
            reason: "not found".to_string(),
        };
        assert!(err.to_string().contains("/nowhere"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_partial_failure_display() {
        let err = AppError::PartialFailure {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 product(s) failed to download");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AppError::from(io);
        assert!(matches!(err, AppError::IoError(_)));
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        use std::error::Error;
        let err: Box<dyn Error> = Box::new(AppError::NetworkError("test".to_string()));
        assert!(!err.to_string().is_empty());
    }
}

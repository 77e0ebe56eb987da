//! Error types for switchctld

use thiserror::Error;

/// Daemon errors
#[derive(Error, Debug)]
pub enum SwitchctlError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for switchctld operations
pub type Result<T> = std::result::Result<T, SwitchctlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SwitchctlError::Configuration("bind must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: bind must not be empty"
        );
    }

    #[test]
    fn test_error_from_io() {
        let err: SwitchctlError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, SwitchctlError::Io(_)));
    }
}

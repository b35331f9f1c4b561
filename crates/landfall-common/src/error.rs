//! Error types for Landfall

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Landfall operations
pub type Result<T> = std::result::Result<T, LandfallError>;

/// Main error type for Landfall
#[derive(Error, Debug)]
pub enum LandfallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported timestamp field '{symbol}' in file pattern {pattern:?}")]
    UnsupportedTimestampField { pattern: String, symbol: char },

    #[error("unterminated escape at end of file pattern {pattern:?}")]
    UnterminatedEscape { pattern: String },

    #[error("unclosed '{{' group in file pattern {pattern:?}")]
    UnclosedGroup { pattern: String },

    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("compression error: {0}")]
    Compression(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

impl LandfallError {
    /// Whether this error came from the pattern compiler (configuration
    /// level, raised before any I/O is attempted).
    pub fn is_pattern_error(&self) -> bool {
        matches!(
            self,
            LandfallError::UnsupportedTimestampField { .. }
                | LandfallError::UnterminatedEscape { .. }
                | LandfallError::UnclosedGroup { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_classification() {
        let err = LandfallError::UnsupportedTimestampField {
            pattern: "{qq}".to_string(),
            symbol: 'q',
        };
        assert!(err.is_pattern_error());

        let err = LandfallError::DestinationExists(PathBuf::from("/data/x"));
        assert!(!err.is_pattern_error());
    }

    #[test]
    fn test_error_display_includes_context() {
        let err = LandfallError::UnsupportedTimestampField {
            pattern: "{table}{yyyyQQ}.DAT".to_string(),
            symbol: 'Q',
        };
        let msg = err.to_string();
        assert!(msg.contains('Q'));
        assert!(msg.contains("{table}{yyyyQQ}.DAT"));
    }
}

//! Error types for cutekit.

use std::fmt;
use std::io;

/// Result type alias for cutekit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for cutekit operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error while reading an asset from disk.
    Io(io::Error),
    /// Input ended in the middle of a token or record.
    PrematureEnd,
    /// A string exceeded the maximum length the format or pool accepts.
    StringTooLarge { len: usize, max: usize },
    /// Malformed input text.
    Parse { line: usize, message: String },
    /// Rejected configuration value.
    InvalidConfig(String),
    /// No handle index is addressable with the configured index width.
    HandleSpaceExhausted { index_bits: u32 },
    /// A fixed-capacity task stack is full.
    QueueFull { capacity: usize },
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::PrematureEnd => write!(f, "premature end of buffer"),
            Self::StringTooLarge { len, max } => {
                write!(f, "string too large: {len} bytes (max {max})")
            }
            Self::Parse { line, message } => write!(f, "parse error on line {line}: {message}"),
            Self::InvalidConfig(s) => write!(f, "invalid configuration: {s}"),
            Self::HandleSpaceExhausted { index_bits } => {
                write!(f, "handle space exhausted ({index_bits} index bits)")
            }
            Self::QueueFull { capacity } => write!(f, "task stack full ({capacity} tasks)"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::StringTooLarge { len: 2000, max: 1024 };
        assert!(err.to_string().contains("2000 bytes"));

        let err = Error::parse(7, "expected number");
        assert_eq!(err.to_string(), "parse error on line 7: expected number");

        let err = Error::HandleSpaceExhausted { index_bits: 4 };
        assert!(err.to_string().contains("4 index bits"));

        assert_eq!(Error::PrematureEnd.to_string(), "premature end of buffer");
        assert!(Error::QueueFull { capacity: 8 }.to_string().contains("8 tasks"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}

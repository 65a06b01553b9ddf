//! Error types for the log follower library.

use std::io;
use thiserror::Error;

/// The main error type for log follower operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors from the underlying source.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// File watching errors from the notify crate.
    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// The current source does not provide the requested capability.
    #[error("operation not supported: {operation}")]
    NotSupported { operation: &'static str },

    /// The follower was closed and no longer owns a source.
    #[error("follower closed")]
    Closed,
}

/// A convenient Result type for log follower operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn not_supported(operation: &'static str) -> Self {
        Error::NotSupported { operation }
    }

    /// Returns true for the unsupported-capability sentinel.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Error::NotSupported { .. })
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            // Errors from the source pass through untouched.
            Error::Io(inner) => inner,
            Error::NotSupported { .. } => io::Error::new(io::ErrorKind::Unsupported, error),
            Error::Closed => io::Error::new(io::ErrorKind::BrokenPipe, error),
            Error::Watcher(_) => io::Error::other(error),
        }
    }
}

/// Checks whether an `io::Error` carries the unsupported-capability sentinel.
///
/// `Seek` implementations have to speak `io::Error`, so the sentinel travels
/// inside one. Only errors produced by this crate match; an
/// `ErrorKind::Unsupported` raised by the operating system does not.
pub fn is_not_supported(error: &io::Error) -> bool {
    error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<Error>())
        .is_some_and(Error::is_not_supported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_error_conversion() {
        let io_error = IoError::new(ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();

        match error {
            Error::Io(_) => {}
            _ => panic!("Expected Error::Io variant"),
        }

        // Source errors display exactly as the source reported them.
        assert_eq!(error.to_string(), "File not found");
    }

    #[test]
    fn test_watcher_error_conversion() {
        let notify_error = notify::Error::generic("Test watcher error");
        let error: Error = notify_error.into();

        match error {
            Error::Watcher(_) => {}
            _ => panic!("Expected Error::Watcher variant"),
        }

        assert!(error.to_string().contains("File watcher error"));
        assert!(error.to_string().contains("Test watcher error"));
    }

    #[test]
    fn test_not_supported_error() {
        let error = Error::not_supported("seek");

        assert!(error.is_not_supported());
        assert_eq!(error.to_string(), "operation not supported: seek");
    }

    #[test]
    fn test_closed_error() {
        let error = Error::Closed;
        assert!(!error.is_not_supported());
        assert_eq!(error.to_string(), "follower closed");
    }

    #[test]
    fn test_io_error_round_trips_verbatim() {
        let original = IoError::new(ErrorKind::PermissionDenied, "Access denied");
        let error: Error = original.into();
        let back: IoError = error.into();

        assert_eq!(back.kind(), ErrorKind::PermissionDenied);
        assert_eq!(back.to_string(), "Access denied");
        assert!(back.get_ref().is_some_and(|inner| !inner.is::<Error>()));
    }

    #[test]
    fn test_not_supported_into_io_error() {
        let io_error: IoError = Error::not_supported("close").into();

        assert_eq!(io_error.kind(), ErrorKind::Unsupported);
        assert!(is_not_supported(&io_error));
    }

    #[test]
    fn test_os_unsupported_is_not_the_sentinel() {
        let io_error = IoError::from(ErrorKind::Unsupported);
        assert!(!is_not_supported(&io_error));

        let io_error = IoError::new(ErrorKind::Unsupported, "platform says no");
        assert!(!is_not_supported(&io_error));
    }

    #[test]
    fn test_closed_into_io_error() {
        let io_error: IoError = Error::Closed.into();
        assert_eq!(io_error.kind(), ErrorKind::BrokenPipe);
        assert!(!is_not_supported(&io_error));
    }

    #[test]
    fn test_error_send_sync_traits() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}

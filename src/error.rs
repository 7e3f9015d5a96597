use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    Internal,

    /// The caller asked for something unsupported: a length out of bounds,
    /// an unknown algorithm, an unreadable config file.
    User,
}

/// Condition tags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Requested password length is outside the accepted bounds.
    Length,
    /// A crypt or hash algorithm identifier is not one we support.
    Algorithm,
    /// The random source failed or generated material had the wrong size.
    Generation,
    /// The crypt(3) scheme refused to produce an encoding.
    Crypt,
    /// Digest computation produced an unexpected result.
    Hash,
    /// Configuration could not be loaded or decoded.
    Config,
    /// Explicit password input could not be obtained.
    Input,
    /// Interaction with the filesystem, stdin/stdout, or other I/O failed.
    Io,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct CryptpassError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Specific condition tag.
    pub kind: ErrorKind,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl CryptpassError {
    pub fn new(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that retains the originating source error.
    pub fn with_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind,
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// The user-facing reason carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CryptpassError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_keeps_kind_and_source() {
        let inner = CryptpassError::with_source(
            ErrorCategory::Internal,
            ErrorKind::Io,
            "failed to write",
            io::Error::other("disk full"),
        );
        let outer = inner.with_context("failed to write output");

        assert_eq!(outer.kind, ErrorKind::Io);
        assert_eq!(outer.category, ErrorCategory::Internal);
        assert_eq!(outer.to_string(), "failed to write output");
        let source = outer.source_error().expect("expected wrapped source");
        assert_eq!(source.to_string(), "failed to write");
    }

    #[test]
    fn test_message_without_source() {
        let err = CryptpassError::new(ErrorCategory::User, ErrorKind::Length, "too short");
        assert_eq!(err.message(), "too short");
        assert!(err.source_error().is_none());
    }
}

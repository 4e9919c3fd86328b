use super::Error;

/// Error when a statement submitted through the read path could modify data.
#[derive(Debug)]
pub(super) struct ReadOnlyViolation {
    statement: Box<str>,
}

impl std::error::Error for ReadOnlyViolation {}

impl core::fmt::Display for ReadOnlyViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "read-only store refused statement: {}", self.statement)
    }
}

impl Error {
    /// Creates a read-only violation error for the refused statement.
    pub fn read_only_violation(statement: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ReadOnlyViolation(ReadOnlyViolation {
            statement: statement.into().into(),
        }))
    }

    /// Returns `true` if this error is a read-only violation.
    pub fn is_read_only_violation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ReadOnlyViolation(_))
    }
}

use super::Error;

/// Error when a schema definition is invalid.
///
/// This occurs when:
/// - A table has no `id` column, or its `id` column has a kind that cannot be a key
/// - A column names an enum or a table that is not declared
/// - A relation points at a column that is not a matching reference
/// - A type builder did not produce a type for a declared table
///
/// These errors are raised while the process starts, never at query time.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error. The message should name the offending
    /// table and, when there is one, the offending column.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSchema(_))
    }
}

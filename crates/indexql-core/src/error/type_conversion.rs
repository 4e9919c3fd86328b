use super::Error;

/// Error when a value cannot be converted between its storage and logical
/// representation.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    from: Box<str>,
    to: &'static str,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert {} to {}", self.from, self.to)
    }
}

impl Error {
    /// Creates a type conversion error.
    pub fn type_conversion(from: impl Into<String>, to: &'static str) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            from: from.into().into(),
            to,
        }))
    }

    /// Returns `true` if this error is a type conversion error.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeConversion(_))
    }
}

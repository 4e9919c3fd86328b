use super::Error;

/// Error when a storage engine other than SQLite or PostgreSQL is requested.
#[derive(Debug)]
pub(super) struct UnsupportedEngine {
    engine: Box<str>,
}

impl std::error::Error for UnsupportedEngine {}

impl core::fmt::Display for UnsupportedEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported storage engine `{}`; expected `sqlite` or `postgresql`",
            self.engine
        )
    }
}

impl Error {
    /// Creates an unsupported engine error.
    pub fn unsupported_engine(engine: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedEngine(UnsupportedEngine {
            engine: engine.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported engine error.
    pub fn is_unsupported_engine(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedEngine(_))
    }
}

use std::fmt;
use std::io;

/// Engine setup error.
///
/// Returned by the registration-phase operations that touch the filesystem,
/// notably template loading. Request-time failures never surface here; they
/// are written into the response instead.
#[derive(Debug)]
pub enum EngineError {
    /// Filesystem access failed.
    Io(io::Error),
    /// A template could not be compiled.
    Template(minijinja::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io(err) => write!(f, "I/O error: {err}"),
            EngineError::Template(err) => write!(f, "template error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(err) => Some(err),
            EngineError::Template(err) => Some(err),
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        EngineError::Io(err)
    }
}

impl From<minijinja::Error> for EngineError {
    fn from(err: minijinja::Error) -> Self {
        EngineError::Template(err)
    }
}

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::timeline::InvariantViolation;

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced at the fallible edges of the engine.
///
/// Gesture handling itself never fails: degenerate geometry and out-of-range
/// boundary proposals are clamped instead.
#[derive(Debug)]
pub enum EngineError {
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    ConfigParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    InvalidConfig {
        reason: String,
    },
    InvariantViolated(InvariantViolation),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigIo { path, source } => {
                write!(f, "failed to read engine config: {} ({source})", path.display())
            }
            Self::ConfigParse {
                path: Some(path),
                source,
            } => write!(
                f,
                "engine config deserialization failed at {} ({source})",
                path.display()
            ),
            Self::ConfigParse { path: None, source } => {
                write!(f, "engine config deserialization failed ({source})")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid engine config: {reason}"),
            Self::InvariantViolated(violation) => {
                write!(f, "segment invariant violated: {violation}")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InvariantViolation> for EngineError {
    fn from(value: InvariantViolation) -> Self {
        Self::InvariantViolated(value)
    }
}

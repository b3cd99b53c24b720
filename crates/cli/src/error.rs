use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use trimline_engine::EngineError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    ScenarioIo {
        path: PathBuf,
        source: std::io::Error,
    },
    ScenarioParse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Engine(EngineError),
    Output(std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScenarioIo { .. } | Self::ScenarioParse { .. } => 2,
            Self::Engine(EngineError::InvariantViolated(_)) => 3,
            Self::Engine(_) => 2,
            Self::Output(_) => 1,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScenarioIo { path, source } => {
                write!(f, "failed to read scenario {} ({source})", path.display())
            }
            Self::ScenarioParse {
                path: Some(path),
                source,
            } => write!(f, "invalid scenario {} ({source})", path.display()),
            Self::ScenarioParse { path: None, source } => write!(f, "invalid scenario ({source})"),
            Self::Engine(error) => write!(f, "{error}"),
            Self::Output(source) => write!(f, "failed to write events ({source})"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ScenarioIo { source, .. } => Some(source),
            Self::ScenarioParse { source, .. } => Some(source),
            Self::Engine(error) => Some(error),
            Self::Output(source) => Some(source),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use trimline_engine::{Command, SceneBoundary, Segment};

use crate::error::{CliError, Result};

/// A scripted gesture session replayed against a fresh engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    pub duration: f64,
    pub track_width: f64,
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Answer every detail thumbnail request immediately.
    #[serde(default = "default_serve_thumbnails")]
    pub serve_thumbnails: bool,
    pub steps: Vec<Step>,
}

fn default_serve_thumbnails() -> bool {
    true
}

/// One scripted input. Clock values are milliseconds on the engine clock.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down { x: f64, at_ms: u64 },
    Move { x: f64, at_ms: u64 },
    Up { at_ms: u64 },
    Tick { at_ms: u64 },
    /// Reports the most recently started collapse animation as finished.
    FinishAnimation { at_ms: u64 },
    SetDuration { duration: f64 },
    SetTrackWidth { width: f64 },
    ImportShots { shots: Vec<SceneBoundary> },
    Insert { start: f64, end: f64 },
    Toggle { index: usize },
}

impl Step {
    /// Converts the step into an engine command. `FinishAnimation` yields
    /// `None`; the replayer resolves it against the animation it last saw.
    pub fn to_command(&self) -> Option<Command<u32>> {
        let command = match self {
            Self::Down { x, at_ms } => Command::PointerDown {
                x: *x,
                at: Duration::from_millis(*at_ms),
            },
            Self::Move { x, at_ms } => Command::PointerMove {
                x: *x,
                at: Duration::from_millis(*at_ms),
            },
            Self::Up { at_ms } => Command::PointerUp {
                at: Duration::from_millis(*at_ms),
            },
            Self::Tick { at_ms } => Command::Tick {
                at: Duration::from_millis(*at_ms),
            },
            Self::FinishAnimation { .. } => return None,
            Self::SetDuration { duration } => Command::SetDuration {
                duration: *duration,
            },
            Self::SetTrackWidth { width } => Command::SetTrackWidth { width: *width },
            Self::ImportShots { shots } => Command::ImportShots(shots.clone()),
            Self::Insert { start, end } => Command::InsertSegment {
                start: *start,
                end: *end,
            },
            Self::Toggle { index } => Command::ToggleActive { index: *index },
        };
        Some(command)
    }
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| CliError::ScenarioParse { path: None, source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CliError::ScenarioIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| CliError::ScenarioParse {
            path: Some(path.to_path_buf()),
            source,
        })
    }
}

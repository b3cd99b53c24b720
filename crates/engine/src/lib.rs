//! UI-agnostic segment timeline gesture engine for Trimline.

pub mod api;
pub mod commit;
pub mod config;
pub mod coords;
pub mod detail;
pub mod drag;
pub mod error;
pub mod gesture;
pub mod proximity;
pub mod render;
pub mod scheduler;
pub mod shots;
pub mod timeline;

pub use api::{Command, Engine, Event};
pub use commit::{AnimationId, CarpetGeometry, Collapse, CollapseKind, CommitPhase};
pub use config::EngineConfig;
pub use coords::TrackGeometry;
pub use detail::{DetailMode, DetailRequestId, DetailWindow, detail_window};
pub use drag::{DeleteIntent, Direction, Intent, MergeIntent, OvershootGeometry, rubber_band};
pub use error::{EngineError, Result};
pub use gesture::{DragTarget, Edge, HandleRef, resolve_press};
pub use render::TimelineView;
pub use shots::SceneBoundary;
pub use timeline::{InvariantViolation, Segment, SegmentId, SegmentPatch, SegmentStore};

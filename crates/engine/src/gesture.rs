use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::coords::TrackGeometry;
use crate::proximity::adjacency;
use crate::timeline::SegmentStore;

/// Which boundary of a segment a handle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    End,
}

/// A concrete segment boundary addressed by store index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleRef {
    pub segment: usize,
    pub edge: Edge,
}

impl HandleRef {
    pub fn start(segment: usize) -> Self {
        Self {
            segment,
            edge: Edge::Start,
        }
    }

    pub fn end(segment: usize) -> Self {
        Self {
            segment,
            edge: Edge::End,
        }
    }
}

/// What a pointer press grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTarget {
    StartHandle(usize),
    EndHandle(usize),
    /// Two facing handles too close to tell apart. The first horizontal
    /// motion picks the side.
    Shared {
        left: usize,
        right: usize,
        press_x: f64,
    },
    Playhead,
}

impl DragTarget {
    pub fn handle(&self) -> Option<HandleRef> {
        match *self {
            Self::StartHandle(segment) => Some(HandleRef::start(segment)),
            Self::EndHandle(segment) => Some(HandleRef::end(segment)),
            Self::Shared { .. } | Self::Playhead => None,
        }
    }
}

impl From<HandleRef> for DragTarget {
    fn from(value: HandleRef) -> Self {
        match value.edge {
            Edge::Start => Self::StartHandle(value.segment),
            Edge::End => Self::EndHandle(value.segment),
        }
    }
}

/// Classifies a press at `press_x` into a drag target.
///
/// The nearest handle within `snap_radius_px` wins. On an exact distance tie
/// the handle that comes first in `(segment index, start before end)` order
/// wins, so an earlier segment's end handle beats the next segment's start
/// handle. A winning handle whose facing neighbour overlaps it by more than
/// `shared_handle_blend` yields [`DragTarget::Shared`]. Presses away from
/// every handle target the playhead.
///
/// # Example
/// ```
/// use trimline_engine::{DragTarget, EngineConfig, Segment, SegmentId, SegmentStore, TrackGeometry, resolve_press};
///
/// let store = SegmentStore::replace_all(
///     vec![Segment::new(SegmentId(1), 0.0, 4.0), Segment::new(SegmentId(2), 6.0, 10.0)],
///     10.0,
///     0.1,
/// );
/// let track = TrackGeometry::new(10.0, 1_000.0);
/// let config = EngineConfig::default();
///
/// assert_eq!(resolve_press(&store, &track, 404.0, &config), DragTarget::EndHandle(0));
/// assert_eq!(resolve_press(&store, &track, 500.0, &config), DragTarget::Playhead);
/// ```
pub fn resolve_press(
    store: &SegmentStore,
    geometry: &TrackGeometry,
    press_x: f64,
    config: &EngineConfig,
) -> DragTarget {
    let mut nearest: Option<(f64, HandleRef)> = None;
    for (index, segment) in store.iter().enumerate() {
        for (handle, time) in [
            (HandleRef::start(index), segment.start),
            (HandleRef::end(index), segment.end),
        ] {
            let distance = (geometry.time_to_px(time) - press_x).abs();
            if distance > config.snap_radius_px {
                continue;
            }
            if nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, handle));
            }
        }
    }

    let Some((_, handle)) = nearest else {
        return DragTarget::Playhead;
    };

    let facing_pair = match handle.edge {
        Edge::End if handle.segment + 1 < store.len() => Some((handle.segment, handle.segment + 1)),
        Edge::Start if handle.segment > 0 => Some((handle.segment - 1, handle.segment)),
        _ => None,
    };
    if let Some((left, right)) = facing_pair {
        let left_end = store.segments()[left].end;
        let right_start = store.segments()[right].start;
        let score = adjacency(
            geometry.time_to_px(left_end),
            geometry.time_to_px(right_start),
            config.handle_width_px,
        );
        if score > config.shared_handle_blend {
            return DragTarget::Shared {
                left,
                right,
                press_x,
            };
        }
    }

    handle.into()
}

#[cfg(test)]
mod tests {
    use super::{DragTarget, resolve_press};
    use crate::config::EngineConfig;
    use crate::coords::TrackGeometry;
    use crate::timeline::{Segment, SegmentId, SegmentStore};

    fn store(bounds: &[(f64, f64)]) -> SegmentStore {
        SegmentStore::replace_all(
            bounds
                .iter()
                .enumerate()
                .map(|(index, (start, end))| Segment::new(SegmentId(index as u64 + 1), *start, *end)),
            10.0,
            0.1,
        )
    }

    fn track() -> TrackGeometry {
        TrackGeometry::new(10.0, 1_000.0)
    }

    // Binary-exact pixel positions, so distance ties are exact.
    fn exact_track() -> TrackGeometry {
        TrackGeometry::new(8.0, 800.0)
    }

    #[test]
    fn press_near_start_handle_grabs_it() {
        let store = store(&[(2.0, 5.0)]);
        let target = resolve_press(&store, &track(), 195.0, &EngineConfig::default());
        assert_eq!(target, DragTarget::StartHandle(0));
    }

    #[test]
    fn press_outside_snap_radius_targets_playhead() {
        let store = store(&[(2.0, 5.0)]);
        let target = resolve_press(&store, &track(), 211.0, &EngineConfig::default());
        assert_eq!(target, DragTarget::Playhead);
    }

    #[test]
    fn nearer_handle_wins_when_both_are_in_radius() {
        let store = store(&[(0.0, 4.0), (4.15, 8.0)]);
        let config = EngineConfig {
            shared_handle_blend: 1.0,
            ..EngineConfig::default()
        };

        assert_eq!(
            resolve_press(&store, &track(), 406.0, &config),
            DragTarget::EndHandle(0)
        );
        assert_eq!(
            resolve_press(&store, &track(), 410.0, &config),
            DragTarget::StartHandle(1)
        );
    }

    #[test]
    fn exact_tie_prefers_earlier_segment_end_handle() {
        let store = store(&[(0.0, 4.0), (4.125, 8.0)]);
        let config = EngineConfig {
            shared_handle_blend: 1.0,
            ..EngineConfig::default()
        };

        let target = resolve_press(&store, &exact_track(), 406.25, &config);
        assert_eq!(target, DragTarget::EndHandle(0));
    }

    #[test]
    fn exact_tie_inside_one_segment_prefers_start_handle() {
        let store = store(&[(3.0, 3.125)]);
        let target = resolve_press(&store, &exact_track(), 306.25, &EngineConfig::default());
        assert_eq!(target, DragTarget::StartHandle(0));
    }

    #[test]
    fn coincident_handles_resolve_to_shared() {
        let store = store(&[(0.0, 5.0), (5.0, 10.0)]);
        let target = resolve_press(&store, &track(), 502.0, &EngineConfig::default());
        assert_eq!(
            target,
            DragTarget::Shared {
                left: 0,
                right: 1,
                press_x: 502.0,
            }
        );
    }

    #[test]
    fn handles_with_small_overlap_stay_concrete() {
        let store = store(&[(0.0, 5.0), (5.08, 10.0)]);
        let target = resolve_press(&store, &track(), 498.0, &EngineConfig::default());
        assert_eq!(target, DragTarget::EndHandle(0));
    }

    #[test]
    fn empty_store_always_targets_playhead() {
        let target = resolve_press(
            &SegmentStore::default(),
            &track(),
            0.0,
            &EngineConfig::default(),
        );
        assert_eq!(target, DragTarget::Playhead);
    }
}

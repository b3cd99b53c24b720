use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::coords::{TrackGeometry, clamp_between};
use crate::gesture::{Edge, HandleRef};
use crate::timeline::{SegmentId, SegmentStore};

/// Horizontal direction of an overshoot, seen from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Rubber-band displacement for a raw overshoot.
///
/// Grows monotonically with `raw_px` and stays strictly below `scale_px`.
///
/// # Example
/// ```
/// use trimline_engine::rubber_band;
///
/// assert_eq!(rubber_band(0.0, 55.0), 0.0);
/// assert!(rubber_band(40.0, 55.0) < 40.0);
/// assert!(rubber_band(10_000.0, 55.0) < 55.0);
/// ```
pub fn rubber_band(raw_px: f64, scale_px: f64) -> f64 {
    if !(raw_px > 0.0) || !(scale_px > 0.0) {
        return 0.0;
    }
    let damped = scale_px * -(-raw_px / scale_px).exp_m1();
    // exp_m1 saturates to -1 for large inputs.
    damped.min(scale_px * (1.0 - f64::EPSILON))
}

/// Geometry of one overshoot sample, enough to draw its feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OvershootGeometry {
    /// Pixel position of the boundary the pointer crossed.
    pub anchor_px: f64,
    /// Undamped distance past the anchor.
    pub raw_px: f64,
    /// Rubber-banded distance past the anchor.
    pub damped_px: f64,
    /// Where the feedback cursor is drawn: `anchor_px ± damped_px`.
    pub cursor_px: f64,
    /// `min(1, raw_px / threshold)`.
    pub progress: f64,
    pub direction: Direction,
}

impl OvershootGeometry {
    pub fn new(
        anchor_px: f64,
        raw_px: f64,
        direction: Direction,
        threshold_px: f64,
        damping_px: f64,
    ) -> Self {
        let raw_px = raw_px.max(0.0);
        let damped_px = rubber_band(raw_px, damping_px);
        Self {
            anchor_px,
            raw_px,
            damped_px,
            cursor_px: anchor_px + direction.sign() * damped_px,
            progress: (raw_px / threshold_px).min(1.0),
            direction,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Boundary dragged past the opposite boundary of its own segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeleteIntent {
    pub segment: usize,
    pub segment_id: SegmentId,
    pub edge: Edge,
    pub overshoot: OvershootGeometry,
}

/// Boundary dragged past the facing boundary of a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergeIntent {
    pub segment: usize,
    pub segment_id: SegmentId,
    pub target: usize,
    pub target_id: SegmentId,
    pub edge: Edge,
    pub overshoot: OvershootGeometry,
}

/// Provisional outcome of an overshooting drag. Only one kind exists at a
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Delete(DeleteIntent),
    Merge(MergeIntent),
}

impl Intent {
    pub fn overshoot(&self) -> &OvershootGeometry {
        match self {
            Self::Delete(intent) => &intent.overshoot,
            Self::Merge(intent) => &intent.overshoot,
        }
    }
}

/// Classification of one pointer sample during a handle drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Within bounds after clamping; `time` is the clamped boundary.
    Normal { time: f64 },
    SelfOvershoot(OvershootGeometry),
    NeighborOvershoot {
        target: usize,
        overshoot: OvershootGeometry,
    },
}

/// Classifies a pointer sample for a drag of `handle` on the full track.
///
/// Self overshoot is reported only when the store holds more than one
/// segment; the last remaining segment is clamped instead.
pub fn classify_move(
    store: &SegmentStore,
    geometry: &TrackGeometry,
    handle: HandleRef,
    pointer_x: f64,
    config: &EngineConfig,
) -> MoveOutcome {
    let Some(segment) = store.get(handle.segment) else {
        return MoveOutcome::Normal {
            time: geometry.clamp_time(geometry.px_to_time(pointer_x)),
        };
    };
    let can_delete = store.len() > 1;

    match handle.edge {
        Edge::Start => {
            let sibling_px = geometry.time_to_px(segment.end);
            if can_delete && pointer_x > sibling_px {
                return MoveOutcome::SelfOvershoot(OvershootGeometry::new(
                    sibling_px,
                    pointer_x - sibling_px,
                    Direction::Right,
                    config.delete_threshold_px,
                    config.delete_damping_px(),
                ));
            }
            if let Some(previous_end) = store.previous_end(handle.segment) {
                let neighbor_px = geometry.time_to_px(previous_end);
                if pointer_x < neighbor_px {
                    return MoveOutcome::NeighborOvershoot {
                        target: handle.segment - 1,
                        overshoot: OvershootGeometry::new(
                            neighbor_px,
                            neighbor_px - pointer_x,
                            Direction::Left,
                            config.merge_threshold_px,
                            config.merge_damping_px(),
                        ),
                    };
                }
            }
        }
        Edge::End => {
            let sibling_px = geometry.time_to_px(segment.start);
            if can_delete && pointer_x < sibling_px {
                return MoveOutcome::SelfOvershoot(OvershootGeometry::new(
                    sibling_px,
                    sibling_px - pointer_x,
                    Direction::Left,
                    config.delete_threshold_px,
                    config.delete_damping_px(),
                ));
            }
            if let Some(next_start) = store.next_start(handle.segment) {
                let neighbor_px = geometry.time_to_px(next_start);
                if pointer_x > neighbor_px {
                    return MoveOutcome::NeighborOvershoot {
                        target: handle.segment + 1,
                        overshoot: OvershootGeometry::new(
                            neighbor_px,
                            pointer_x - neighbor_px,
                            Direction::Right,
                            config.merge_threshold_px,
                            config.merge_damping_px(),
                        ),
                    };
                }
            }
        }
    }

    MoveOutcome::Normal {
        time: clamp_boundary(
            store,
            geometry.duration,
            handle,
            geometry.px_to_time(pointer_x),
            config.min_segment_len,
        ),
    }
}

/// Clamps a proposed boundary time for `handle`.
///
/// Start boundaries stay within `[previous end or 0, end - min_len]` and end
/// boundaries within `[start + min_len, next start or duration]`.
pub fn clamp_boundary(
    store: &SegmentStore,
    duration: f64,
    handle: HandleRef,
    time: f64,
    min_len: f64,
) -> f64 {
    let Some(segment) = store.get(handle.segment) else {
        return clamp_between(time, 0.0, duration.max(0.0));
    };
    match handle.edge {
        Edge::Start => {
            let low = store.previous_end(handle.segment).unwrap_or(0.0);
            clamp_between(time, low, segment.end - min_len)
        }
        Edge::End => {
            let high = store
                .next_start(handle.segment)
                .unwrap_or(duration.max(0.0));
            clamp_between(time, segment.start + min_len, high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, MoveOutcome, OvershootGeometry, clamp_boundary, classify_move, rubber_band};
    use crate::config::EngineConfig;
    use crate::coords::TrackGeometry;
    use crate::gesture::HandleRef;
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

    #[test]
    fn rubber_band_approaches_but_never_reaches_scale() {
        let near = rubber_band(1.0, 55.0);
        let far = rubber_band(500.0, 55.0);
        assert!(near > 0.0 && near < 1.0);
        assert!(far > near);
        assert!(far < 55.0);
    }

    #[test]
    fn rubber_band_is_zero_for_non_positive_input() {
        assert_eq!(rubber_band(-5.0, 55.0), 0.0);
        assert_eq!(rubber_band(5.0, 0.0), 0.0);
        assert_eq!(rubber_band(f64::NAN, 55.0), 0.0);
    }

    #[test]
    fn overshoot_geometry_places_cursor_on_overshoot_side() {
        let left = OvershootGeometry::new(300.0, 40.0, Direction::Left, 100.0, 55.0);
        let right = OvershootGeometry::new(300.0, 40.0, Direction::Right, 100.0, 55.0);

        assert!(left.cursor_px < 300.0);
        assert!(right.cursor_px > 300.0);
        assert!((left.progress - 0.4).abs() < 1e-9);
        assert!(!left.is_complete());
    }

    #[test]
    fn overshoot_progress_saturates_at_one() {
        let geometry = OvershootGeometry::new(0.0, 250.0, Direction::Right, 100.0, 55.0);
        assert_eq!(geometry.progress, 1.0);
        assert!(geometry.is_complete());
    }

    #[test]
    fn normal_move_clamps_start_to_previous_end() {
        let store = store(&[(0.0, 3.0), (5.0, 8.0)]);
        let outcome = classify_move(
            &store,
            &track(),
            HandleRef::start(1),
            300.0,
            &EngineConfig::default(),
        );
        assert_eq!(outcome, MoveOutcome::Normal { time: 3.0 });
    }

    #[test]
    fn start_dragged_past_own_end_is_self_overshoot() {
        let store = store(&[(0.0, 3.0), (5.0, 8.0)]);
        let outcome = classify_move(
            &store,
            &track(),
            HandleRef::start(1),
            850.0,
            &EngineConfig::default(),
        );

        let MoveOutcome::SelfOvershoot(overshoot) = outcome else {
            panic!("expected self overshoot, got {outcome:?}");
        };
        assert_eq!(overshoot.direction, Direction::Right);
        assert!((overshoot.raw_px - 50.0).abs() < 1e-9);
    }

    #[test]
    fn end_dragged_past_next_start_is_neighbor_overshoot() {
        let store = store(&[(0.0, 3.0), (5.0, 8.0)]);
        let outcome = classify_move(
            &store,
            &track(),
            HandleRef::end(0),
            560.0,
            &EngineConfig::default(),
        );

        let MoveOutcome::NeighborOvershoot { target, overshoot } = outcome else {
            panic!("expected neighbor overshoot, got {outcome:?}");
        };
        assert_eq!(target, 1);
        assert_eq!(overshoot.direction, Direction::Right);
        assert!((overshoot.progress - 0.6).abs() < 1e-9);
    }

    #[test]
    fn last_segment_clamps_instead_of_overshooting() {
        let store = store(&[(0.0, 10.0)]);
        let outcome = classify_move(
            &store,
            &track(),
            HandleRef::end(0),
            -150.0,
            &EngineConfig::default(),
        );
        assert_eq!(outcome, MoveOutcome::Normal { time: 0.1 });
    }

    #[test]
    fn clamp_boundary_keeps_minimum_length() {
        let store = store(&[(2.0, 4.0)]);
        assert_eq!(clamp_boundary(&store, 10.0, HandleRef::start(0), 9.0, 0.1), 3.9);
        assert_eq!(clamp_boundary(&store, 10.0, HandleRef::end(0), 12.0, 0.1), 10.0);
        assert_eq!(clamp_boundary(&store, 10.0, HandleRef::start(0), -1.0, 0.1), 0.0);
    }
}

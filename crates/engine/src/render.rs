use std::time::Duration;

use serde::Serialize;

use crate::commit::{CarpetGeometry, CollapseKind, CommitPhase};
use crate::coords::TrackGeometry;
use crate::detail::DetailWindow;
use crate::drag::Intent;
use crate::gesture::Edge;
use crate::timeline::{SegmentId, SegmentStore};

/// One segment laid out on the full track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentStrip {
    pub id: SegmentId,
    pub start: f64,
    pub end: f64,
    pub x: f64,
    pub width: f64,
    pub active: bool,
    /// Below `1.0` only for a segment fading out after a merge.
    pub opacity: f64,
}

/// Magnified editing view of one boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView<'a, T> {
    pub window: DetailWindow,
    pub handle_time: f64,
    /// Handle position inside the zoomed window, in track pixels.
    pub handle_x: f64,
    pub segment: usize,
    pub edge: Edge,
    /// `None` until the thumbnails for this window arrive.
    pub thumbnails: Option<&'a [T]>,
}

/// Immutable render model of the whole timeline at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView<'a, T> {
    pub geometry: TrackGeometry,
    pub segments: Vec<SegmentStrip>,
    /// Adjacency score per neighbouring pair, in store order.
    pub blends: Vec<f64>,
    pub intent: Option<Intent>,
    pub carpet: Option<CarpetGeometry>,
    /// Kind of the collapse animation currently playing. The intent is
    /// already gone by then, so hosts colour the carpet from this.
    pub collapsing: Option<CollapseKind>,
    pub detail: Option<DetailView<'a, T>>,
    pub thumbnails: &'a [T],
    pub scrubbing: bool,
}

/// Lays out every segment of `store` on the full track, fading the segment
/// absorbed by a pending merge.
pub fn layout_strips(
    store: &SegmentStore,
    geometry: &TrackGeometry,
    phase: &CommitPhase,
    now: Duration,
) -> Vec<SegmentStrip> {
    let fading = match phase {
        CommitPhase::Committing(fade) => Some((fade.absorbed, fade.opacity(now))),
        _ => None,
    };
    store
        .iter()
        .map(|segment| {
            let x = geometry.time_to_px(segment.start);
            let opacity = match fading {
                Some((absorbed, opacity)) if absorbed == segment.id => opacity,
                _ => 1.0,
            };
            SegmentStrip {
                id: segment.id,
                start: segment.start,
                end: segment.end,
                x,
                width: (geometry.time_to_px(segment.end) - x).max(0.0),
                active: segment.active,
                opacity,
            }
        })
        .collect()
}

/// Carpet to draw for the current intent or collapse, if any.
pub fn carpet_for(
    intent: Option<&Intent>,
    phase: &CommitPhase,
    now: Duration,
) -> Option<CarpetGeometry> {
    if let CommitPhase::Animating(collapse) = phase {
        return Some(collapse.sample(now));
    }
    intent.map(|intent| CarpetGeometry::from_overshoot(intent.overshoot()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{carpet_for, layout_strips};
    use crate::commit::{CommitPhase, MergeFade};
    use crate::coords::TrackGeometry;
    use crate::drag::{DeleteIntent, Direction, Intent, OvershootGeometry};
    use crate::gesture::Edge;
    use crate::timeline::{Segment, SegmentId, SegmentStore};

    fn store() -> SegmentStore {
        SegmentStore::replace_all(
            vec![
                Segment::new(SegmentId(1), 0.0, 2.5),
                Segment::new(SegmentId(2), 5.0, 10.0),
            ],
            10.0,
            0.1,
        )
    }

    #[test]
    fn strips_map_segments_to_track_pixels() {
        let strips = layout_strips(
            &store(),
            &TrackGeometry::new(10.0, 800.0),
            &CommitPhase::Idle,
            Duration::ZERO,
        );

        assert_eq!(strips.len(), 2);
        assert_eq!(strips[0].x, 0.0);
        assert_eq!(strips[0].width, 200.0);
        assert_eq!(strips[1].x, 400.0);
        assert_eq!(strips[1].width, 400.0);
        assert!(strips.iter().all(|strip| strip.opacity == 1.0));
    }

    #[test]
    fn absorbed_segment_fades_during_merge_commit() {
        let phase = CommitPhase::Committing(MergeFade {
            survivor: SegmentId(1),
            absorbed: SegmentId(2),
            started_at: Duration::from_millis(0),
            until: Duration::from_millis(400),
        });
        let strips = layout_strips(
            &store(),
            &TrackGeometry::new(10.0, 800.0),
            &phase,
            Duration::from_millis(100),
        );

        assert_eq!(strips[0].opacity, 1.0);
        assert!((strips[1].opacity - 0.75).abs() < 1e-9);
    }

    #[test]
    fn carpet_follows_intent_overshoot() {
        let intent = Intent::Delete(DeleteIntent {
            segment: 0,
            segment_id: SegmentId(1),
            edge: Edge::Start,
            overshoot: OvershootGeometry::new(200.0, 30.0, Direction::Right, 100.0, 55.0),
        });
        let carpet = carpet_for(Some(&intent), &CommitPhase::Idle, Duration::ZERO)
            .expect("intent should draw a carpet");

        assert_eq!(carpet.left_px, 200.0);
        assert!((carpet.width_px - intent.overshoot().damped_px).abs() < 1e-9);
        assert!(carpet_for(None, &CommitPhase::Idle, Duration::ZERO).is_none());
    }
}

use serde::{Deserialize, Serialize};

use crate::timeline::{Segment, SegmentId};

/// One detected shot, as produced by a shot detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBoundary {
    pub start: f64,
    pub end: f64,
}

/// Converts detected shots into fresh, active segments.
///
/// Conversion stops early once `next_id` runs out of ids. The result is not
/// normalised; feed it through
/// [`SegmentStore::replace_all`](crate::timeline::SegmentStore::replace_all).
pub fn segments_from_scenes(
    scenes: &[SceneBoundary],
    mut next_id: impl FnMut() -> Option<SegmentId>,
) -> Vec<Segment> {
    scenes
        .iter()
        .map_while(|scene| next_id().map(|id| Segment::new(id, scene.start, scene.end)))
        .collect()
}

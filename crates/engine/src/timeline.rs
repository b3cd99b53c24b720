use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coords::clamp_between;

/// Float slack used when comparing segment boundaries.
pub const TIME_TOLERANCE: f64 = 1e-9;

/// Opaque identifier for timeline segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u64);

impl Display for SegmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One kept range of the source media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub start: f64,
    pub end: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Segment {
    pub fn new(id: SegmentId, start: f64, end: f64) -> Self {
        Self {
            id,
            start,
            end,
            active: true,
        }
    }
}

/// Partial update applied by [`SegmentStore::update_one`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentPatch {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub active: Option<bool>,
}

impl SegmentPatch {
    pub fn start(start: f64) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }

    pub fn end(end: f64) -> Self {
        Self {
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn bounds(start: f64, end: f64) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            active: None,
        }
    }
}

/// Reason a segment collection fails the store invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    TooShort {
        segment_id: SegmentId,
        start: f64,
        end: f64,
    },
    OutOfRange {
        segment_id: SegmentId,
        start: f64,
        end: f64,
        duration: f64,
    },
    Unsorted {
        index: usize,
    },
    Overlap {
        left: SegmentId,
        right: SegmentId,
    },
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort {
                segment_id,
                start,
                end,
            } => write!(f, "segment {segment_id} is too short: {start}..{end}"),
            Self::OutOfRange {
                segment_id,
                start,
                end,
                duration,
            } => write!(
                f,
                "segment {segment_id} lies outside 0..{duration}: {start}..{end}"
            ),
            Self::Unsorted { index } => write!(f, "segment at index {index} is out of order"),
            Self::Overlap { left, right } => {
                write!(f, "segments {left} and {right} overlap")
            }
        }
    }
}

/// Ordered, non-overlapping collection of segments.
///
/// Every operation leaves `self` untouched and returns a new store, so the
/// host can diff or re-render from whole snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentStore {
    segments: Vec<Segment>,
}

impl SegmentStore {
    /// Store holding one segment that spans the full duration.
    pub fn full_duration(id: SegmentId, duration: f64) -> Self {
        if !(duration.is_finite() && duration > 0.0) {
            return Self::default();
        }
        Self {
            segments: vec![Segment::new(id, 0.0, duration)],
        }
    }

    /// Builds a store from arbitrary segments, normalising instead of
    /// rejecting.
    ///
    /// Bounds are ordered and clamped into `[0, duration]`, the result is
    /// sorted by start, every segment is trimmed to begin no earlier than its
    /// predecessor's end, and segments shorter than `min_len` are dropped.
    ///
    /// # Example
    /// ```
    /// use trimline_engine::{Segment, SegmentId, SegmentStore};
    ///
    /// let store = SegmentStore::replace_all(
    ///     vec![
    ///         Segment::new(SegmentId(2), 6.0, 12.0),
    ///         Segment::new(SegmentId(1), 0.0, 7.0),
    ///     ],
    ///     10.0,
    ///     0.1,
    /// );
    /// assert_eq!(store.segments()[0].id, SegmentId(1));
    /// assert_eq!(store.segments()[1].start, 7.0);
    /// assert_eq!(store.segments()[1].end, 10.0);
    /// ```
    pub fn replace_all(
        segments: impl IntoIterator<Item = Segment>,
        duration: f64,
        min_len: f64,
    ) -> Self {
        let max = duration.max(0.0);
        let mut incoming: Vec<Segment> = segments
            .into_iter()
            .filter(|segment| segment.start.is_finite() && segment.end.is_finite())
            .map(|mut segment| {
                let (low, high) = if segment.start <= segment.end {
                    (segment.start, segment.end)
                } else {
                    (segment.end, segment.start)
                };
                segment.start = clamp_between(low, 0.0, max);
                segment.end = clamp_between(high, 0.0, max);
                segment
            })
            .collect();
        incoming.sort_by(|left, right| left.start.total_cmp(&right.start));

        let mut normalized = Vec::with_capacity(incoming.len());
        let mut floor = 0.0_f64;
        for mut segment in incoming {
            segment.start = segment.start.max(floor);
            if segment.end - segment.start + TIME_TOLERANCE >= min_len {
                floor = segment.end;
                normalized.push(segment);
            } else {
                debug!(
                    segment_id = %segment.id,
                    start = segment.start,
                    end = segment.end,
                    "dropping degenerate segment"
                );
            }
        }

        Self {
            segments: normalized,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn to_vec(&self) -> Vec<Segment> {
        self.segments.clone()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn position(&self, id: SegmentId) -> Option<usize> {
        self.segments.iter().position(|segment| segment.id == id)
    }

    /// End of the segment before `index`, if any.
    pub fn previous_end(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(1)
            .and_then(|previous| self.segments.get(previous))
            .map(|segment| segment.end)
    }

    /// Start of the segment after `index`, if any.
    pub fn next_start(&self, index: usize) -> Option<f64> {
        self.segments.get(index + 1).map(|segment| segment.start)
    }

    /// Applies `patch` to the segment at `index`. Out-of-range indices return
    /// an unchanged copy.
    pub fn update_one(&self, index: usize, patch: SegmentPatch) -> Self {
        let mut segments = self.segments.clone();
        if let Some(segment) = segments.get_mut(index) {
            if let Some(start) = patch.start {
                segment.start = start;
            }
            if let Some(end) = patch.end {
                segment.end = end;
            }
            if let Some(active) = patch.active {
                segment.active = active;
            }
        }
        Self { segments }
    }

    /// Removes the first segment matching `predicate`.
    pub fn remove_one(&self, predicate: impl Fn(&Segment) -> bool) -> Self {
        let mut segments = self.segments.clone();
        if let Some(index) = segments.iter().position(predicate) {
            segments.remove(index);
        }
        Self { segments }
    }

    /// Inserts an externally created segment and re-sorts by start.
    ///
    /// The segment is clamped into the free gap that contains its start, so
    /// the store invariants survive arbitrary in/out marks. When that leaves
    /// less than `min_len`, the store is returned unchanged.
    pub fn insert_sorted(&self, segment: Segment, duration: f64, min_len: f64) -> Self {
        let max = duration.max(0.0);
        let (low, high) = if segment.start <= segment.end {
            (segment.start, segment.end)
        } else {
            (segment.end, segment.start)
        };
        let mut start = clamp_between(low, 0.0, max);
        let mut end = clamp_between(high, 0.0, max);

        let floor = self
            .segments
            .iter()
            .filter(|existing| existing.start <= start)
            .map(|existing| existing.end)
            .fold(0.0_f64, f64::max);
        start = start.max(floor);
        let ceiling = self
            .segments
            .iter()
            .map(|existing| existing.start)
            .filter(|existing_start| *existing_start >= start)
            .fold(max, f64::min);
        end = end.min(ceiling);

        if !(end - start + TIME_TOLERANCE >= min_len) {
            debug!(
                segment_id = %segment.id,
                start,
                end,
                "insert rejected: no free gap"
            );
            return self.clone();
        }

        let mut segments = self.segments.clone();
        segments.push(Segment {
            start,
            end,
            ..segment
        });
        segments.sort_by(|left, right| left.start.total_cmp(&right.start));
        Self { segments }
    }

    pub fn toggle_active(&self, index: usize) -> Self {
        let Some(segment) = self.segments.get(index) else {
            return self.clone();
        };
        self.update_one(
            index,
            SegmentPatch {
                active: Some(!segment.active),
                ..SegmentPatch::default()
            },
        )
    }

    /// Ordered `(start, end)` pairs of the active segments, as handed to the
    /// export pipeline.
    pub fn active_ranges(&self) -> Vec<(f64, f64)> {
        self.segments
            .iter()
            .filter(|segment| segment.active)
            .map(|segment| (segment.start, segment.end))
            .collect()
    }

    /// Checks ordering, separation and range invariants.
    pub fn check_invariants(
        &self,
        duration: f64,
        min_len: f64,
    ) -> std::result::Result<(), InvariantViolation> {
        let max = duration.max(0.0);
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.start < -TIME_TOLERANCE || segment.end > max + TIME_TOLERANCE {
                return Err(InvariantViolation::OutOfRange {
                    segment_id: segment.id,
                    start: segment.start,
                    end: segment.end,
                    duration,
                });
            }
            if segment.end - segment.start + TIME_TOLERANCE < min_len {
                return Err(InvariantViolation::TooShort {
                    segment_id: segment.id,
                    start: segment.start,
                    end: segment.end,
                });
            }
            let Some(previous) = index.checked_sub(1).map(|previous| &self.segments[previous])
            else {
                continue;
            };
            if segment.start < previous.start {
                return Err(InvariantViolation::Unsorted { index });
            }
            if segment.start + TIME_TOLERANCE < previous.end {
                return Err(InvariantViolation::Overlap {
                    left: previous.id,
                    right: segment.id,
                });
            }
        }
        Ok(())
    }
}

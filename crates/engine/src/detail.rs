use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coords::clamp_between;
use crate::gesture::Edge;

/// Time range shown by the detail magnifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailWindow {
    pub start: f64,
    pub end: f64,
}

impl DetailWindow {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Computes the zoomed window around a handle at `handle_time`.
///
/// The window is half the duration, and the handle keeps the same
/// proportional offset inside it as on the full track, so activating the
/// magnifier does not move the handle under the pointer.
///
/// # Example
/// ```
/// use trimline_engine::detail_window;
///
/// let window = detail_window(8.0, 10.0);
/// assert_eq!(window.start, 4.0);
/// assert_eq!(window.end, 9.0);
/// ```
pub fn detail_window(handle_time: f64, duration: f64) -> DetailWindow {
    if !(duration.is_finite() && duration > 0.0) {
        return DetailWindow {
            start: 0.0,
            end: 0.0,
        };
    }
    let handle_time = clamp_between(handle_time, 0.0, duration);
    let size = duration / 2.0;
    let ratio = handle_time / duration;
    let start = clamp_between(handle_time - ratio * size, 0.0, duration - size);
    let end = clamp_between(start + size, handle_time, duration);
    DetailWindow {
        start: start.min(handle_time),
        end,
    }
}

/// Sequence number of an outbound detail-thumbnail request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailRequestId(pub u64);

/// Active magnified editing of one boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetailMode {
    pub view_start: f64,
    pub view_end: f64,
    /// Detail playhead; follows the dragged boundary.
    pub handle_time: f64,
    pub segment: usize,
    pub edge: Edge,
}

impl DetailMode {
    pub fn window(&self) -> DetailWindow {
        DetailWindow {
            start: self.view_start,
            end: self.view_end,
        }
    }
}

/// Last-request-wins bookkeeping for detail thumbnails.
///
/// Only the most recently issued request may deliver content, and only while
/// its window is still the one pending or on screen. Retiring or clearing
/// makes every outstanding response stale.
#[derive(Debug)]
pub struct DetailRequests<T> {
    issued: u64,
    latest: Option<(DetailRequestId, DetailWindow)>,
    thumbnails: Option<Vec<T>>,
    dirty: bool,
}

impl<T> Default for DetailRequests<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            latest: None,
            thumbnails: None,
            dirty: false,
        }
    }
}

impl<T> DetailRequests<T> {
    /// Issues a new request for `window`, superseding any earlier one.
    pub fn issue(&mut self, window: DetailWindow) -> DetailRequestId {
        self.issued += 1;
        let request = DetailRequestId(self.issued);
        self.latest = Some((request, window));
        self.thumbnails = None;
        self.dirty = true;
        debug!(
            request = request.0,
            start = window.start,
            end = window.end,
            "detail thumbnails requested"
        );
        request
    }

    /// Applies a response. Returns `false` and drops `thumbnails` when the
    /// response is stale.
    pub fn accept(&mut self, request: DetailRequestId, thumbnails: Vec<T>) -> bool {
        if self.latest.is_none_or(|(latest, _)| latest != request) {
            warn!(
                request = request.0,
                latest = ?self.latest.map(|(latest, _)| latest.0),
                "stale detail thumbnails discarded"
            );
            return false;
        }
        self.thumbnails = Some(thumbnails);
        true
    }

    /// Makes the live request stale without signalling the host.
    pub fn retire(&mut self) {
        self.latest = None;
        self.thumbnails = None;
    }

    /// Drops all detail state. Returns `true` when the host may hold
    /// detail-thumbnail state that it should discard.
    pub fn clear(&mut self) -> bool {
        let had_state = self.dirty;
        self.latest = None;
        self.thumbnails = None;
        self.dirty = false;
        had_state
    }

    pub fn thumbnails(&self) -> Option<&[T]> {
        self.thumbnails.as_deref()
    }
}

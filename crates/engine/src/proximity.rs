use crate::coords::TrackGeometry;
use crate::timeline::SegmentStore;

/// Adjacency score between a left segment's end handle and the next
/// segment's start handle.
///
/// `1.0` means the handles sit on top of each other and `0.0` means they are
/// at least one handle width apart.
///
/// # Example
/// ```
/// use trimline_engine::proximity::adjacency;
///
/// assert_eq!(adjacency(100.0, 100.0, 12.0), 1.0);
/// assert_eq!(adjacency(100.0, 106.0, 12.0), 0.5);
/// assert_eq!(adjacency(100.0, 140.0, 12.0), 0.0);
/// ```
pub fn adjacency(left_end_px: f64, right_start_px: f64, handle_width_px: f64) -> f64 {
    if !(handle_width_px.is_finite() && handle_width_px > 0.0) {
        return 0.0;
    }
    let gap = (right_start_px - left_end_px).max(0.0);
    (1.0 - gap / handle_width_px).clamp(0.0, 1.0)
}

/// One adjacency score per neighbouring segment pair, in store order.
pub fn blend_scores(
    store: &SegmentStore,
    geometry: &TrackGeometry,
    handle_width_px: f64,
) -> Vec<f64> {
    store
        .segments()
        .windows(2)
        .map(|pair| {
            adjacency(
                geometry.time_to_px(pair[0].end),
                geometry.time_to_px(pair[1].start),
                handle_width_px,
            )
        })
        .collect()
}

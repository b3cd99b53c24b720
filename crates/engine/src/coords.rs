/// Duration and measured pixel width of the timeline track.
///
/// Every conversion tolerates degenerate values: a non-positive duration maps
/// everything to `0`, and a non-positive width is treated as one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub duration: f64,
    pub width: f64,
}

impl TrackGeometry {
    pub fn new(duration: f64, width: f64) -> Self {
        Self { duration, width }
    }

    /// Width used for pixel math, never below one pixel.
    pub fn effective_width(&self) -> f64 {
        if self.width.is_finite() && self.width >= 1.0 {
            self.width
        } else {
            1.0
        }
    }

    fn has_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// Converts a timeline time into a percentage of the track.
    ///
    /// # Example
    /// ```
    /// use trimline_engine::TrackGeometry;
    ///
    /// let track = TrackGeometry::new(8.0, 400.0);
    /// assert_eq!(track.time_to_percent(2.0), 25.0);
    /// assert_eq!(TrackGeometry::new(0.0, 400.0).time_to_percent(2.0), 0.0);
    /// ```
    pub fn time_to_percent(&self, time: f64) -> f64 {
        if !self.has_duration() {
            return 0.0;
        }
        100.0 * time / self.duration
    }

    pub fn percent_to_time(&self, percent: f64) -> f64 {
        if !self.has_duration() {
            return 0.0;
        }
        percent / 100.0 * self.duration
    }

    pub fn time_to_px(&self, time: f64) -> f64 {
        self.time_to_percent(time) / 100.0 * self.effective_width()
    }

    /// Converts a pixel offset into a timeline time without clamping.
    ///
    /// Offsets left of the track or past its right edge produce times outside
    /// `[0, duration]`; overshoot detection relies on that.
    pub fn px_to_time(&self, x: f64) -> f64 {
        self.percent_to_time(100.0 * x / self.effective_width())
    }

    /// Maps a pixel offset through a zoomed `[view_start, view_end]` window
    /// drawn across the full track width.
    pub fn px_to_time_in(&self, x: f64, view_start: f64, view_end: f64) -> f64 {
        view_start + (x / self.effective_width()) * (view_end - view_start)
    }

    /// Maps a time inside a zoomed window to its pixel offset on the track.
    pub fn time_to_px_in(&self, time: f64, view_start: f64, view_end: f64) -> f64 {
        let span = view_end - view_start;
        if !(span.is_finite() && span > 0.0) {
            return 0.0;
        }
        (time - view_start) / span * self.effective_width()
    }

    pub fn clamp_time(&self, time: f64) -> f64 {
        clamp_between(time, 0.0, self.duration.max(0.0))
    }
}

/// Clamps `value` into `[low, high]` without panicking on inverted bounds or
/// NaN. Inverted bounds collapse onto `low`.
pub(crate) fn clamp_between(value: f64, low: f64, high: f64) -> f64 {
    value.min(high).max(low)
}

#[cfg(test)]
mod tests {
    use super::{TrackGeometry, clamp_between};

    #[test]
    fn percent_and_time_are_inverse() {
        let track = TrackGeometry::new(12.5, 640.0);
        for time in [0.0, 0.1, 3.3, 12.5] {
            let percent = track.time_to_percent(time);
            assert!((track.percent_to_time(percent) - time).abs() < 1e-9);
        }
    }

    #[test]
    fn pixels_and_time_are_inverse() {
        let track = TrackGeometry::new(10.0, 1_000.0);
        assert_eq!(track.time_to_px(2.5), 250.0);
        assert_eq!(track.px_to_time(250.0), 2.5);
        assert!((track.px_to_time(track.time_to_px(7.77)) - 7.77).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_maps_everything_to_zero() {
        let track = TrackGeometry::new(0.0, 500.0);
        assert_eq!(track.time_to_percent(4.0), 0.0);
        assert_eq!(track.percent_to_time(50.0), 0.0);
        assert_eq!(track.px_to_time(250.0), 0.0);
        assert_eq!(track.time_to_px(4.0), 0.0);
    }

    #[test]
    fn zero_width_is_treated_as_one_pixel() {
        let track = TrackGeometry::new(10.0, 0.0);
        assert_eq!(track.effective_width(), 1.0);
        assert_eq!(track.time_to_px(10.0), 1.0);
        assert_eq!(track.px_to_time(0.5), 5.0);
    }

    #[test]
    fn px_to_time_does_not_clamp_outside_track() {
        let track = TrackGeometry::new(10.0, 100.0);
        assert_eq!(track.px_to_time(-20.0), -2.0);
        assert_eq!(track.px_to_time(150.0), 15.0);
        assert_eq!(track.clamp_time(15.0), 10.0);
        assert_eq!(track.clamp_time(-2.0), 0.0);
    }

    #[test]
    fn zoomed_window_mapping_round_trips() {
        let track = TrackGeometry::new(10.0, 200.0);
        let time = track.px_to_time_in(50.0, 2.0, 7.0);
        assert!((time - 3.25).abs() < 1e-9);
        assert!((track.time_to_px_in(time, 2.0, 7.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn clamp_between_tolerates_inverted_bounds() {
        assert_eq!(clamp_between(5.0, 3.0, 1.0), 3.0);
        assert!(clamp_between(f64::NAN, 0.0, 1.0).is_finite());
    }
}

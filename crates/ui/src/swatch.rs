use iced::Color;

/// Number of swatches rendered across the full track.
pub const TRACK_SWATCHES: usize = 24;
/// Number of swatches rendered across a detail window.
pub const DETAIL_SWATCHES: usize = 16;

/// Synthetic thumbnail colour for `time`, cycling hue over the duration.
///
/// Stands in for decoded frames while the window shows no real media.
pub fn swatch_at(time: f64, duration: f64) -> Color {
    if !(duration.is_finite() && duration > 0.0) {
        return Color::from_rgb8(40, 44, 52);
    }
    let ratio = (time / duration).clamp(0.0, 1.0) as f32;
    hsv(ratio * 300.0, 0.45, 0.55)
}

/// `count` evenly spaced swatches sampled over `[start, end]`.
pub fn swatches(start: f64, end: f64, duration: f64, count: usize) -> Vec<Color> {
    if count == 0 {
        return Vec::new();
    }
    let step = (end - start) / count as f64;
    (0..count)
        .map(|index| swatch_at(start + step * (index as f64 + 0.5), duration))
        .collect()
}

fn hsv(hue: f32, saturation: f32, value: f32) -> Color {
    let chroma = value * saturation;
    let sector = (hue / 60.0).rem_euclid(6.0);
    let secondary = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, secondary, 0.0),
        1 => (secondary, chroma, 0.0),
        2 => (0.0, chroma, secondary),
        3 => (0.0, secondary, chroma),
        4 => (secondary, 0.0, chroma),
        _ => (chroma, 0.0, secondary),
    };
    let offset = value - chroma;
    Color::from_rgb(r + offset, g + offset, b + offset)
}

#[cfg(test)]
mod tests {
    use super::{swatch_at, swatches};

    #[test]
    fn swatches_sample_requested_count() {
        assert_eq!(swatches(0.0, 10.0, 10.0, 8).len(), 8);
        assert!(swatches(0.0, 10.0, 10.0, 0).is_empty());
    }

    #[test]
    fn swatch_changes_along_the_track() {
        assert_ne!(swatch_at(0.0, 10.0), swatch_at(5.0, 10.0));
    }

    #[test]
    fn swatch_for_empty_duration_is_neutral() {
        assert_eq!(swatch_at(3.0, 0.0), swatch_at(7.0, -1.0));
    }
}

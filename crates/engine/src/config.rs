use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Thresholds, radii and timings that shape gesture handling.
///
/// Pixel values are logical pixels of the measured track. Millisecond values
/// are measured on the host-supplied engine clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum press distance from a handle that still grabs it.
    pub snap_radius_px: f64,
    /// Horizontal travel that resolves a shared handle into one side.
    pub shared_resolve_px: f64,
    /// Adjacency score above which two facing handles count as shared.
    pub shared_handle_blend: f64,
    /// Visual handle width used for adjacency scoring.
    pub handle_width_px: f64,
    /// Overshoot distance at which a delete gesture commits.
    pub delete_threshold_px: f64,
    /// Overshoot distance at which a merge gesture commits.
    pub merge_threshold_px: f64,
    /// Rubber-band asymptote as a fraction of the commit threshold.
    pub damping_ratio: f64,
    /// Minimum segment length in timeline units.
    pub min_segment_len: f64,
    pub prefetch_delay_ms: u64,
    pub dwell_delay_ms: u64,
    pub collapse_duration_ms: u64,
    pub merge_fade_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_radius_px: 10.0,
            shared_resolve_px: 2.0,
            shared_handle_blend: 0.5,
            handle_width_px: 12.0,
            delete_threshold_px: 100.0,
            merge_threshold_px: 100.0,
            damping_ratio: 0.55,
            min_segment_len: 0.1,
            prefetch_delay_ms: 200,
            dwell_delay_ms: 600,
            collapse_duration_ms: 400,
            merge_fade_ms: 450,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config. Missing fields take their defaults.
    ///
    /// # Example
    /// ```
    /// use trimline_engine::EngineConfig;
    ///
    /// let config = EngineConfig::from_json_str(r#"{ "snap_radius_px": 14.0 }"#).expect("valid");
    /// assert_eq!(config.snap_radius_px, 14.0);
    /// assert_eq!(config.dwell_delay_ms, 600);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|source| EngineError::ConfigParse { path: None, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&json).map_err(|source| EngineError::ConfigParse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the gesture engine cannot operate with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("snap_radius_px", self.snap_radius_px),
            ("handle_width_px", self.handle_width_px),
            ("delete_threshold_px", self.delete_threshold_px),
            ("merge_threshold_px", self.merge_threshold_px),
            ("damping_ratio", self.damping_ratio),
            ("min_segment_len", self.min_segment_len),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidConfig {
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if !(self.shared_resolve_px.is_finite() && self.shared_resolve_px >= 0.0) {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "shared_resolve_px must not be negative, got {}",
                    self.shared_resolve_px
                ),
            });
        }
        if !(self.shared_handle_blend > 0.0 && self.shared_handle_blend <= 1.0) {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "shared_handle_blend must be in (0, 1], got {}",
                    self.shared_handle_blend
                ),
            });
        }
        if self.dwell_delay_ms < self.prefetch_delay_ms {
            return Err(EngineError::InvalidConfig {
                reason: format!(
                    "dwell_delay_ms ({}) must not be shorter than prefetch_delay_ms ({})",
                    self.dwell_delay_ms, self.prefetch_delay_ms
                ),
            });
        }
        Ok(())
    }

    pub fn prefetch_delay(&self) -> Duration {
        Duration::from_millis(self.prefetch_delay_ms)
    }

    pub fn dwell_delay(&self) -> Duration {
        Duration::from_millis(self.dwell_delay_ms)
    }

    pub fn collapse_duration(&self) -> Duration {
        Duration::from_millis(self.collapse_duration_ms)
    }

    pub fn merge_fade(&self) -> Duration {
        Duration::from_millis(self.merge_fade_ms)
    }

    /// Rubber-band asymptote for delete overshoot, in pixels.
    pub fn delete_damping_px(&self) -> f64 {
        self.damping_ratio * self.delete_threshold_px
    }

    /// Rubber-band asymptote for merge overshoot, in pixels.
    pub fn merge_damping_px(&self) -> f64 {
        self.damping_ratio * self.merge_threshold_px
    }
}

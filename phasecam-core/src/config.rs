//! Configuration structures and constants for phasecam-core.
//!
//! Consumers (such as phasecam-cli) build a [`DetectorConfig`] and an
//! [`AnalysisConfig`] and pass them into the processing entry points. All
//! fields have sensible defaults; `validate` rejects values the detection
//! math cannot work with.

use crate::error::{CoreError, CoreResult};

/// Default per-axis shift magnitude (in pixels) that counts as motion.
pub const DEFAULT_MOTION_THRESHOLD: f64 = 2.0;

/// Default width (in pixels) frames are scaled to before correlation.
/// Smaller frames correlate faster; 400 px keeps sub-pixel accuracy usable.
pub const DEFAULT_ANALYSIS_WIDTH: u32 = 400;

/// Sub-pixel refinement strategy applied around the correlation peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubpixelMethod {
    /// Three-point parabolic fit per axis. Cheap and accurate for sharp peaks.
    #[default]
    Parabolic,
    /// Intensity-weighted centroid over a 5x5 neighborhood around the peak.
    Centroid,
}

/// Configuration for the phase-shift detector.
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    /// Minimum absolute per-axis shift (pixels) classified as motion.
    /// The boundary is inclusive: a shift of exactly `threshold` is motion.
    pub threshold: f64,

    /// Apply a Hann window to both frames before the forward transforms.
    /// Reduces edge ringing on real (non-cyclic) footage at a small cost
    /// in peak sharpness.
    pub apply_window: bool,

    /// Sub-pixel refinement strategy.
    pub subpixel: SubpixelMethod,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MOTION_THRESHOLD,
            apply_window: false,
            subpixel: SubpixelMethod::default(),
        }
    }
}

impl DetectorConfig {
    /// Creates a configuration with the given threshold and default tuning.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Checks that the configuration is usable for detection.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "motion threshold must be a finite value above zero, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Configuration for batch video analysis.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Detector settings shared by every comparison in the run.
    pub detector: DetectorConfig,

    /// Width frames are scaled to before correlation (aspect preserved).
    pub analysis_width: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            analysis_width: DEFAULT_ANALYSIS_WIDTH,
        }
    }
}

impl AnalysisConfig {
    /// Checks that the configuration is usable for a batch run.
    pub fn validate(&self) -> CoreResult<()> {
        self.detector.validate()?;
        if self.analysis_width == 0 {
            return Err(CoreError::InvalidConfig(
                "analysis width must be at least 1 pixel".to_string(),
            ));
        }
        Ok(())
    }
}

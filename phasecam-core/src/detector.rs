//! Shift detection and motion classification for frame pairs.
//!
//! [`ShiftDetector`] owns the detector configuration and a reusable
//! [`PhaseCorrelator`]; it is the single entry point both processing modes
//! call. Detection is stateless across calls apart from cached FFT plans.

use crate::config::DetectorConfig;
use crate::correlation::{PhaseCorrelator, ShiftEstimate};
use crate::error::{CoreResult, frame_size_error};
use crate::frame::Frame;
use serde::Serialize;

/// Verdict for one frame pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    /// At least one axis moved by the threshold or more.
    Moved,
    /// Both axes stayed below the threshold.
    Stable,
}

impl Classification {
    #[must_use]
    pub fn is_moved(self) -> bool {
        self == Self::Moved
    }

    /// Human-readable status used by overlays and terminal output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Moved => "Motion Detected",
            Self::Stable => "Position Stable",
        }
    }
}

/// Phase-shift detector with a configurable motion threshold.
pub struct ShiftDetector {
    config: DetectorConfig,
    correlator: PhaseCorrelator,
}

impl ShiftDetector {
    /// Creates a detector after validating the configuration.
    pub fn new(config: DetectorConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            correlator: PhaseCorrelator::new(&config),
            config,
        })
    }

    /// Detector with the default threshold of
    /// [`crate::config::DEFAULT_MOTION_THRESHOLD`] pixels.
    #[must_use]
    pub fn with_defaults() -> Self {
        let config = DetectorConfig::default();
        Self {
            correlator: PhaseCorrelator::new(&config),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Estimates the sub-pixel translation of `curr` relative to `prev`.
    ///
    /// Returns `IncompatibleFrameSize` when the dimensions differ; identical
    /// frames come back as (0, 0) up to floating-point noise.
    pub fn detect_shift(&mut self, prev: &Frame, curr: &Frame) -> CoreResult<ShiftEstimate> {
        if prev.dimensions() != curr.dimensions() {
            return Err(frame_size_error(prev.dimensions(), curr.dimensions()));
        }

        let reference = prev.to_gray();
        let target = curr.to_gray();
        self.correlator.correlate(&reference, &target)
    }

    /// Applies the motion threshold to an estimate.
    ///
    /// The boundary is inclusive: a per-axis magnitude of exactly the
    /// threshold counts as motion.
    #[must_use]
    pub fn classify(&self, estimate: &ShiftEstimate) -> Classification {
        if estimate.dx.abs() >= self.config.threshold || estimate.dy.abs() >= self.config.threshold
        {
            Classification::Moved
        } else {
            Classification::Stable
        }
    }

    /// Detection and classification in one step.
    pub fn detect_and_classify(
        &mut self,
        prev: &Frame,
        curr: &Frame,
    ) -> CoreResult<(ShiftEstimate, Classification)> {
        let estimate = self.detect_shift(prev, curr)?;
        let classification = self.classify(&estimate);
        Ok((estimate, classification))
    }
}

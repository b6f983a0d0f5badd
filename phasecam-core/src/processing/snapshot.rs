//! Paired-snapshot comparison.
//!
//! The stateless counterpart of batch processing: two externally supplied
//! stills, one shift estimate, one verdict.

use crate::detector::{Classification, ShiftDetector};
use crate::error::CoreResult;
use crate::frame::Frame;
use log::debug;

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotComparison {
    /// Offset of `frame_b` relative to `frame_a`.
    pub estimate: crate::correlation::ShiftEstimate,
    pub classification: Classification,
}

impl SnapshotComparison {
    /// Whether the pair crossed the motion threshold.
    #[must_use]
    pub fn is_moved(&self) -> bool {
        self.classification.is_moved()
    }
}

/// Compares two snapshots and classifies the shift between them.
///
/// `frame_a` acts as the reference, so the estimate reads as the offset
/// of `frame_b` relative to it. Both frames must share dimensions.
pub fn compare_frames(
    frame_a: &Frame,
    frame_b: &Frame,
    detector: &mut ShiftDetector,
) -> CoreResult<SnapshotComparison> {
    let (estimate, classification) = detector.detect_and_classify(frame_a, frame_b)?;
    debug!(
        "snapshot comparison: dx {:.3}, dy {:.3}, response {:.3} -> {}",
        estimate.dx,
        estimate.dy,
        estimate.response,
        classification.label()
    );
    Ok(SnapshotComparison {
        estimate,
        classification,
    })
}

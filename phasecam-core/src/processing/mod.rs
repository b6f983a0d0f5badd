//! Frame-pair processing entry points.
//!
//! Orchestrates the two analysis modes on top of the detector: sequential
//! batch processing of a frame source, and the stateless comparison of two
//! externally supplied snapshots.

/// Sequential batch analysis over a frame source
pub mod video;

/// Stateless paired-snapshot comparison
pub mod snapshot;

pub use snapshot::{SnapshotComparison, compare_frames};
pub use video::{DiscardSink, FrameSink, PngDirectorySink, VideoAnalysis, process_frames};

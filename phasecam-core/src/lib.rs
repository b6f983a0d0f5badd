//! Core library for detecting translational camera movement in video.
//!
//! This crate provides frame decoding via ffmpeg, phase-correlation shift
//! estimation between consecutive frames, threshold classification, and
//! annotated-frame output.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use phasecam_core::{AnalysisConfig, DiscardSink, EventDispatcher, ShiftDetector};
//! use phasecam_core::source::VideoFrameSource;
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! config.validate().unwrap();
//!
//! let mut source =
//!     VideoFrameSource::open(Path::new("clip.mp4"), config.analysis_width).unwrap();
//! let mut detector = ShiftDetector::new(config.detector).unwrap();
//! let dispatcher = EventDispatcher::new();
//!
//! let analysis = phasecam_core::process_frames(
//!     "clip.mp4",
//!     &mut source,
//!     &mut detector,
//!     &mut DiscardSink,
//!     &dispatcher,
//! )
//! .unwrap();
//! println!("moved frames: {:?}", analysis.moved_indices);
//! ```

pub mod annotate;
pub mod config;
pub mod correlation;
pub mod detector;
pub mod error;
pub mod events;
pub mod frame;
pub mod processing;
pub mod source;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use annotate::annotate_frame;
pub use config::{
    AnalysisConfig, DEFAULT_ANALYSIS_WIDTH, DEFAULT_MOTION_THRESHOLD, DetectorConfig,
    SubpixelMethod,
};
pub use correlation::{PhaseCorrelator, ShiftEstimate};
pub use detector::{Classification, ShiftDetector};
pub use error::{CoreError, CoreResult};
pub use events::{Event, EventDispatcher, EventHandler, JsonEventHandler};
pub use frame::{Frame, GrayFrame};
pub use processing::{
    DiscardSink, FrameSink, PngDirectorySink, SnapshotComparison, VideoAnalysis, compare_frames,
    process_frames,
};
pub use source::{FrameBuffer, FrameSource, VideoFrameSource};
pub use temp_files::SpooledInput;

//! Sequential frame processing for batch analysis.
//!
//! Walks a [`FrameSource`] pair by pair: the first frame only seeds the
//! reference, and every later frame is compared against the frame
//! immediately before it. Indices of frames classified as moved are
//! collected in encounter order. Annotated copies of compared frames go to
//! a [`FrameSink`] when one wants them, and progress is reported through
//! the event dispatcher.

use crate::annotate::annotate_frame;
use crate::detector::{Classification, ShiftDetector};
use crate::error::CoreResult;
use crate::events::{Event, EventDispatcher};
use crate::frame::Frame;
use crate::source::FrameSource;
use chrono::Local;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Receiver for annotated copies of compared frames.
pub trait FrameSink {
    /// Whether the sink wants frames at all. Annotation work is skipped
    /// entirely when it does not.
    fn wants_frames(&self) -> bool {
        true
    }

    /// Accepts the annotated copy of the compared frame at `index`.
    fn deliver(
        &mut self,
        index: usize,
        frame: Frame,
        classification: Classification,
    ) -> CoreResult<()>;
}

/// Sink for callers that only want the moved indices.
pub struct DiscardSink;

impl FrameSink for DiscardSink {
    fn wants_frames(&self) -> bool {
        false
    }

    fn deliver(
        &mut self,
        _index: usize,
        _frame: Frame,
        _classification: Classification,
    ) -> CoreResult<()> {
        Ok(())
    }
}

/// Sink that writes annotated frames into a directory as
/// `frame_000042.png`, numbered by frame index.
pub struct PngDirectorySink {
    dir: PathBuf,
}

impl PngDirectorySink {
    /// Creates the sink, creating the directory when missing.
    pub fn new(dir: &Path) -> CoreResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Output path for the annotated copy of frame `index`.
    #[must_use]
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for PngDirectorySink {
    fn deliver(
        &mut self,
        index: usize,
        frame: Frame,
        _classification: Classification,
    ) -> CoreResult<()> {
        frame.save(&self.frame_path(index))
    }
}

/// Outcome of one batch run.
#[derive(Debug, Clone)]
pub struct VideoAnalysis {
    /// Indices of frames classified as moved, in encounter order.
    pub moved_indices: Vec<usize>,
    /// Frames pulled from the source, the seed frame included.
    pub frames_seen: usize,
    /// Comparisons performed; one less than `frames_seen` whenever any
    /// frame arrived.
    pub comparisons: usize,
    /// True when the source failed mid-stream and the result is partial.
    pub truncated: bool,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl VideoAnalysis {
    /// Whether any compared pair crossed the motion threshold.
    #[must_use]
    pub fn motion_detected(&self) -> bool {
        !self.moved_indices.is_empty()
    }
}

/// Runs sequential motion detection over every frame of `source`.
///
/// The first frame seeds the reference and is never compared or reported.
/// Each later frame is compared against its immediate predecessor and then
/// becomes the new reference, so N frames yield exactly N-1 comparisons.
/// Source exhaustion ends the run normally. A read failure after at least
/// one frame arrived ends it early with `truncated` set on the partial
/// result; a failure before any frame arrived, and any frame-size mismatch,
/// are errors.
pub fn process_frames<S, K>(
    input: &str,
    source: &mut S,
    detector: &mut ShiftDetector,
    sink: &mut K,
    dispatcher: &EventDispatcher,
) -> CoreResult<VideoAnalysis>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let start = Instant::now();
    info!(
        "Starting analysis of {input} (threshold: {} px)",
        detector.threshold()
    );
    dispatcher.emit(Event::AnalysisStarted {
        input: input.to_string(),
        total_frames: source.total_frames(),
        threshold: detector.threshold(),
    });

    let mut analysis = VideoAnalysis {
        moved_indices: Vec::new(),
        frames_seen: 0,
        comparisons: 0,
        truncated: false,
        elapsed: Duration::ZERO,
    };

    // Seed the reference; the first frame is cached, never compared.
    let mut reference = match source.next_frame()? {
        Some(frame) => {
            analysis.frames_seen = 1;
            frame
        }
        None => {
            debug!("Frame source was empty, nothing to compare");
            analysis.elapsed = start.elapsed();
            emit_complete(dispatcher, &analysis);
            return Ok(analysis);
        }
    };

    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(err) => {
                warn!(
                    "Frame source failed after {} frame(s): {err}; keeping partial result",
                    analysis.frames_seen
                );
                dispatcher.emit(Event::Warning {
                    message: format!(
                        "frame source ended early after {} frame(s): {err}",
                        analysis.frames_seen
                    ),
                });
                analysis.truncated = true;
                break;
            }
        };

        let index = analysis.frames_seen;
        analysis.frames_seen += 1;

        let (estimate, classification) = detector.detect_and_classify(&reference, &frame)?;
        analysis.comparisons += 1;
        dispatcher.emit(Event::FrameCompared {
            index,
            dx: estimate.dx,
            dy: estimate.dy,
            response: estimate.response,
            moved: classification.is_moved(),
        });

        if classification.is_moved() {
            analysis.moved_indices.push(index);
            dispatcher.emit(Event::MotionDetected {
                index,
                dx: estimate.dx,
                dy: estimate.dy,
                detected_at: Local::now(),
            });
        }

        if sink.wants_frames() {
            sink.deliver(index, annotate_frame(&frame, classification), classification)?;
        }

        // Sliding window: the comparison target becomes the next reference.
        reference = frame;
    }

    analysis.elapsed = start.elapsed();
    info!(
        "Analysis of {input} finished: {} comparison(s), {} moved",
        analysis.comparisons,
        analysis.moved_indices.len()
    );
    emit_complete(dispatcher, &analysis);
    Ok(analysis)
}

fn emit_complete(dispatcher: &EventDispatcher, analysis: &VideoAnalysis) {
    dispatcher.emit(Event::AnalysisComplete {
        moved_indices: analysis.moved_indices.clone(),
        frames_seen: analysis.frames_seen,
        comparisons: analysis.comparisons,
        elapsed: analysis.elapsed,
    });
}

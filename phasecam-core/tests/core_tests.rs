//! End-to-end tests of the public detection and processing API.

use assert_approx_eq::assert_approx_eq;
use phasecam_core::annotate::{MOVED_COLOR, STABLE_COLOR};
use phasecam_core::*;
use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Checkerboard-and-gradient frame, cyclically shifted by
/// (offset_x, offset_y) so integer translations between frames are exact.
/// The gradient periods (9 and 7) do not divide the frame dimensions, so
/// the pattern is aperiodic in both axes and the true shift is the only
/// exact match; a bare 16-px checkerboard would make shifts ambiguous
/// modulo its period.
fn pattern_frame(width: u32, height: u32, offset_x: isize, offset_y: isize) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height as isize {
        for x in 0..width as isize {
            let src_x = (x - offset_x).rem_euclid(width as isize);
            let src_y = (y - offset_y).rem_euclid(height as isize);
            let base = if (src_x / 8 + src_y / 8) % 2 == 0 {
                185_u8
            } else {
                45_u8
            };
            let value = base
                .saturating_add((src_x % 9) as u8 * 2)
                .saturating_add((src_y % 7) as u8 * 3);
            data.extend_from_slice(&[value, value, value]);
        }
    }
    Frame::from_raw(width, height, data).unwrap()
}

fn shifted(offset_x: isize, offset_y: isize) -> Frame {
    pattern_frame(64, 48, offset_x, offset_y)
}

/// In-memory source of frames at the given cumulative offsets.
fn drift_source(offsets: &[(isize, isize)]) -> FrameBuffer {
    FrameBuffer::new(offsets.iter().map(|&(x, y)| shifted(x, y)).collect())
}

/// Records every delivered frame with its top-left banner pixel.
struct CollectingSink {
    delivered: Vec<(usize, Classification, [u8; 3])>,
}

impl CollectingSink {
    fn new() -> Self {
        Self {
            delivered: Vec::new(),
        }
    }
}

impl FrameSink for CollectingSink {
    fn deliver(
        &mut self,
        index: usize,
        frame: Frame,
        classification: Classification,
    ) -> CoreResult<()> {
        let banner = [frame.data()[0], frame.data()[1], frame.data()[2]];
        self.delivered.push((index, classification, banner));
        Ok(())
    }
}

/// Captures emitted events for sequence assertions.
struct EventCollector {
    events: Mutex<Vec<Event>>,
}

impl EventCollector {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                Event::AnalysisStarted { .. } => "started",
                Event::FrameCompared { .. } => "compared",
                Event::MotionDetected { .. } => "motion",
                Event::AnalysisComplete { .. } => "complete",
                Event::Warning { .. } => "warning",
            })
            .collect()
    }
}

impl EventHandler for EventCollector {
    fn handle(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Yields the given frames, then fails like a decoder dying mid-stream.
struct FailingSource {
    frames: std::vec::IntoIter<Frame>,
}

impl FailingSource {
    fn after(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for FailingSource {
    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        match self.frames.next() {
            Some(frame) => Ok(Some(frame)),
            None => Err(CoreError::OperationFailed("decoder went away".to_string())),
        }
    }
}

#[test]
fn test_known_shift_through_public_api() {
    let prev = shifted(0, 0);
    let curr = shifted(5, 0);
    let mut detector = ShiftDetector::with_defaults();

    let (estimate, classification) = detector.detect_and_classify(&prev, &curr).unwrap();
    assert_approx_eq!(estimate.dx, 5.0, 0.1);
    assert_approx_eq!(estimate.dy, 0.0, 0.1);
    assert!(classification.is_moved());
}

#[test]
fn test_single_pixel_step_resolves_both_axes() {
    // A pure horizontal step must come back with dy at zero, not snapped
    // to a repeat of the checker pattern on the other axis.
    let prev = shifted(0, 0);
    let curr = shifted(1, 0);
    let mut detector = ShiftDetector::with_defaults();

    let estimate = detector.detect_shift(&prev, &curr).unwrap();
    assert_approx_eq!(estimate.dx, 1.0, 0.1);
    assert_approx_eq!(estimate.dy, 0.0, 0.1);
}

#[test]
fn test_identical_frames_stable_for_any_threshold() {
    let frame = shifted(0, 0);
    let mut detector = ShiftDetector::with_defaults();
    let estimate = detector.detect_shift(&frame, &frame).unwrap();

    assert_approx_eq!(estimate.dx, 0.0, 1e-3);
    assert_approx_eq!(estimate.dy, 0.0, 1e-3);
    for threshold in [0.01, 0.5, 2.0, 50.0] {
        let detector = ShiftDetector::new(DetectorConfig::with_threshold(threshold)).unwrap();
        assert_eq!(detector.classify(&estimate), Classification::Stable);
    }
}

#[test]
fn test_classification_boundary_is_inclusive() {
    let detector = ShiftDetector::with_defaults();
    let at_threshold = ShiftEstimate {
        dx: DEFAULT_MOTION_THRESHOLD,
        dy: 0.0,
        response: 1.0,
    };
    let just_under = ShiftEstimate {
        dx: DEFAULT_MOTION_THRESHOLD - 1e-9,
        dy: 0.0,
        response: 1.0,
    };

    assert_eq!(detector.classify(&at_threshold), Classification::Moved);
    assert_eq!(detector.classify(&just_under), Classification::Stable);
}

#[test]
fn test_three_frame_run_flags_the_jump() {
    let mut source = drift_source(&[(0, 0), (0, 0), (3, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    let dispatcher = EventDispatcher::new();

    let analysis = process_frames(
        "jump",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    assert_eq!(analysis.frames_seen, 3);
    assert_eq!(analysis.comparisons, 2);
    assert_eq!(analysis.moved_indices, vec![2]);
    assert!(analysis.motion_detected());
    assert!(!analysis.truncated);
}

#[test]
fn test_n_frames_yield_n_minus_one_comparisons() {
    let mut source = drift_source(&[(0, 0); 6]);
    let mut detector = ShiftDetector::with_defaults();
    let dispatcher = EventDispatcher::new();

    let analysis = process_frames(
        "steady",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    assert_eq!(analysis.frames_seen, 6);
    assert_eq!(analysis.comparisons, 5);
    assert!(analysis.moved_indices.is_empty());
}

#[test]
fn test_sub_threshold_drift_is_never_flagged() {
    // 1 px per step stays under the 2 px threshold even though the
    // cumulative drift reaches 4 px; each frame is measured against its
    // immediate predecessor, not the first frame.
    let mut source = drift_source(&[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    let dispatcher = EventDispatcher::new();

    let analysis = process_frames(
        "drift",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    assert_eq!(analysis.comparisons, 4);
    assert!(analysis.moved_indices.is_empty());
}

#[test]
fn test_every_step_past_threshold_is_flagged() {
    // 3 px per step crosses the threshold at every comparison.
    let mut source = drift_source(&[(0, 0), (3, 0), (6, 0), (9, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    let dispatcher = EventDispatcher::new();

    let analysis = process_frames(
        "pan",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    assert_eq!(analysis.moved_indices, vec![1, 2, 3]);
}

#[test]
fn test_truncated_source_keeps_partial_result() {
    let frames = vec![shifted(0, 0), shifted(0, 0), shifted(5, 0)];
    let mut source = FailingSource::after(frames);
    let mut detector = ShiftDetector::with_defaults();
    let dispatcher = EventDispatcher::new();

    let analysis = process_frames(
        "dying",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    assert!(analysis.truncated);
    assert_eq!(analysis.frames_seen, 3);
    assert_eq!(analysis.comparisons, 2);
    assert_eq!(analysis.moved_indices, vec![2]);
}

#[test]
fn test_failure_before_first_frame_is_an_error() {
    let mut source = FailingSource::after(Vec::new());
    let mut detector = ShiftDetector::with_defaults();
    let dispatcher = EventDispatcher::new();

    let result = process_frames(
        "broken",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    );
    assert!(result.is_err());
}

#[test]
fn test_dimension_change_mid_stream_is_an_error() {
    let frames = vec![pattern_frame(64, 48, 0, 0), pattern_frame(32, 48, 0, 0)];
    let mut source = FrameBuffer::new(frames);
    let mut detector = ShiftDetector::with_defaults();
    let dispatcher = EventDispatcher::new();

    let result = process_frames(
        "resized",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    );
    assert!(matches!(
        result,
        Err(CoreError::IncompatibleFrameSize { .. })
    ));
}

#[test]
fn test_annotated_frames_delivered_with_status_colors() {
    let mut source = drift_source(&[(0, 0), (0, 0), (4, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    let mut sink = CollectingSink::new();
    let dispatcher = EventDispatcher::new();

    process_frames("sink", &mut source, &mut detector, &mut sink, &dispatcher).unwrap();

    // The seed frame is never delivered; compared frames carry the banner
    // color matching their verdict.
    assert_eq!(sink.delivered.len(), 2);
    assert_eq!(sink.delivered[0], (1, Classification::Stable, STABLE_COLOR));
    assert_eq!(sink.delivered[1], (2, Classification::Moved, MOVED_COLOR));
}

#[test]
fn test_png_sink_writes_numbered_files() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let mut source = drift_source(&[(0, 0), (0, 0), (3, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    let mut sink = PngDirectorySink::new(dir.path())?;
    let dispatcher = EventDispatcher::new();

    process_frames("png", &mut source, &mut detector, &mut sink, &dispatcher)?;

    assert!(!dir.path().join("frame_000000.png").exists());
    let first = Frame::load(&dir.path().join("frame_000001.png"))?;
    assert_eq!(first.dimensions(), (64, 48));
    assert!(dir.path().join("frame_000002.png").exists());
    Ok(())
}

#[test]
fn test_event_sequence_for_detected_motion() {
    let collector = EventCollector::new();
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(collector.clone());

    let mut source = drift_source(&[(0, 0), (0, 0), (3, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    process_frames(
        "events",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    assert_eq!(
        collector.kinds(),
        vec!["started", "compared", "compared", "motion", "complete"]
    );

    let events = collector.events.lock().unwrap();
    match &events[0] {
        Event::AnalysisStarted {
            input,
            total_frames,
            threshold,
        } => {
            assert_eq!(input, "events");
            assert_eq!(*total_frames, Some(3));
            assert_eq!(*threshold, DEFAULT_MOTION_THRESHOLD);
        }
        other => panic!("expected AnalysisStarted, got {other:?}"),
    }
    match events.last() {
        Some(Event::AnalysisComplete {
            moved_indices,
            frames_seen,
            comparisons,
            ..
        }) => {
            assert_eq!(moved_indices, &vec![2]);
            assert_eq!(*frames_seen, 3);
            assert_eq!(*comparisons, 2);
        }
        other => panic!("expected AnalysisComplete, got {other:?}"),
    }
}

#[test]
fn test_truncation_emits_warning_event() {
    let collector = EventCollector::new();
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(collector.clone());

    let mut source = FailingSource::after(vec![shifted(0, 0), shifted(0, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    process_frames(
        "dying",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    assert_eq!(
        collector.kinds(),
        vec!["started", "compared", "warning", "complete"]
    );
}

#[test]
fn test_json_event_stream_parses_back() {
    struct SharedWriter(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let content = Arc::new(Mutex::new(Vec::new()));
    let handler = JsonEventHandler::with_writer(Box::new(SharedWriter(content.clone())));
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(Arc::new(handler));

    let mut source = drift_source(&[(0, 0), (3, 0)]);
    let mut detector = ShiftDetector::with_defaults();
    process_frames(
        "clip.mp4",
        &mut source,
        &mut detector,
        &mut DiscardSink,
        &dispatcher,
    )
    .unwrap();

    let output = String::from_utf8(content.lock().unwrap().clone()).unwrap();
    let lines: Vec<serde_json::Value> = output
        .trim()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines[0]["type"], "analysis_started");
    assert_eq!(lines[0]["input"], "clip.mp4");
    assert_eq!(lines[1]["type"], "frame_compared");
    assert_eq!(lines[1]["moved"], true);
    assert_eq!(lines[2]["type"], "motion_detected");
    assert_eq!(lines[2]["frame"], 1);
    let last = lines.last().unwrap();
    assert_eq!(last["type"], "analysis_complete");
    assert_eq!(last["moved_frames"], serde_json::json!([1]));
}

#[test]
fn test_snapshot_comparison_matches_batch_semantics() {
    let frame_a = shifted(0, 0);
    let frame_b = shifted(0, -6);
    let mut detector = ShiftDetector::with_defaults();

    let comparison = compare_frames(&frame_a, &frame_b, &mut detector).unwrap();
    assert!(comparison.is_moved());
    assert_approx_eq!(comparison.estimate.dy, -6.0, 0.1);
    assert_approx_eq!(comparison.estimate.dx, 0.0, 0.1);
}

#[test]
fn test_snapshot_comparison_rejects_mismatched_sizes() {
    let frame_a = pattern_frame(64, 48, 0, 0);
    let frame_b = pattern_frame(48, 64, 0, 0);
    let mut detector = ShiftDetector::with_defaults();

    let result = compare_frames(&frame_a, &frame_b, &mut detector);
    assert!(matches!(
        result,
        Err(CoreError::IncompatibleFrameSize { .. })
    ));
}

#[test]
fn test_analysis_config_validation_rules() {
    let mut config = AnalysisConfig::default();
    assert!(config.validate().is_ok());

    config.analysis_width = 0;
    assert!(config.validate().is_err());

    config = AnalysisConfig::default();
    config.detector.threshold = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn test_supported_container_extensions() {
    assert!(utils::has_supported_extension(Path::new("clip.mp4")));
    assert!(utils::has_supported_extension(Path::new("CLIP.AVI")));
    assert!(!utils::has_supported_extension(Path::new("clip.mkv")));
    assert!(!utils::has_supported_extension(Path::new("clip")));
}

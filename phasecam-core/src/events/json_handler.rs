//! NDJSON event handler for machine-readable progress output.
//!
//! Writes one JSON object per event, newline-delimited, for consumption by
//! wrapping tools. Defaults to stdout; tests inject a buffer.

use super::{Event, EventHandler};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that serializes analysis events as JSON lines.
pub struct JsonEventHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventHandler {
    /// Handler writing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Handler writing to a custom sink.
    #[must_use]
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    /// Current timestamp as seconds since the Unix epoch.
    fn unix_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_json(&self, value: serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(line) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{line}");
                let _ = output.flush();
            }
        }
    }
}

impl EventHandler for JsonEventHandler {
    fn handle(&self, event: &Event) {
        let timestamp = Self::unix_timestamp();

        match event {
            Event::AnalysisStarted {
                input,
                total_frames,
                threshold,
            } => {
                self.write_json(json!({
                    "type": "analysis_started",
                    "input": input,
                    "total_frames": total_frames,
                    "threshold": threshold,
                    "timestamp": timestamp,
                }));
            }

            Event::FrameCompared {
                index,
                dx,
                dy,
                response,
                moved,
            } => {
                self.write_json(json!({
                    "type": "frame_compared",
                    "frame": index,
                    "dx": dx,
                    "dy": dy,
                    "response": response,
                    "moved": moved,
                    "timestamp": timestamp,
                }));
            }

            Event::MotionDetected {
                index,
                dx,
                dy,
                detected_at,
            } => {
                self.write_json(json!({
                    "type": "motion_detected",
                    "frame": index,
                    "dx": dx,
                    "dy": dy,
                    "detected_at": detected_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    "timestamp": timestamp,
                }));
            }

            Event::AnalysisComplete {
                moved_indices,
                frames_seen,
                comparisons,
                elapsed,
            } => {
                self.write_json(json!({
                    "type": "analysis_complete",
                    "moved_frames": moved_indices,
                    "frames_seen": frames_seen,
                    "comparisons": comparisons,
                    "elapsed_seconds": elapsed.as_secs_f64(),
                    "timestamp": timestamp,
                }));
            }

            Event::Warning { message } => {
                self.write_json(json!({
                    "type": "warning",
                    "message": message,
                    "timestamp": timestamp,
                }));
            }
        }
    }
}

impl Default for JsonEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

//! Analysis lifecycle events.
//!
//! The processing code is presentation-free: it reports progress through
//! typed events dispatched to registered handlers. The CLI installs a
//! terminal handler, machine consumers an NDJSON handler, tests a collector.

pub mod json_handler;

pub use json_handler::JsonEventHandler;

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;

/// Events emitted during batch analysis.
#[derive(Debug, Clone)]
pub enum Event {
    /// Batch analysis is starting.
    AnalysisStarted {
        input: String,
        /// Probed frame count when the container reports one.
        total_frames: Option<u64>,
        threshold: f64,
    },

    /// One frame pair was compared.
    FrameCompared {
        index: usize,
        dx: f64,
        dy: f64,
        response: f64,
        moved: bool,
    },

    /// A compared pair crossed the motion threshold.
    MotionDetected {
        index: usize,
        dx: f64,
        dy: f64,
        detected_at: DateTime<Local>,
    },

    /// Batch analysis finished (complete or truncated).
    AnalysisComplete {
        moved_indices: Vec<usize>,
        frames_seen: usize,
        comparisons: usize,
        elapsed: Duration,
    },

    /// Non-fatal condition worth surfacing, e.g. a truncated source.
    Warning { message: String },
}

/// Receives every event emitted by an analysis run.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

/// Fan-out of events to registered handlers, in registration order.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//! Frame sources for batch analysis.
//!
//! A [`FrameSource`] supplies frames one at a time in presentation order.
//! The video implementation decodes through ffmpeg; [`FrameBuffer`] serves
//! library consumers and tests that already hold frames in memory.

pub mod video;

pub use video::VideoFrameSource;

use crate::error::CoreResult;
use crate::frame::Frame;

/// Pull-based supplier of sequential frames.
pub trait FrameSource {
    /// Returns the next frame, or `Ok(None)` once the source is exhausted.
    ///
    /// An `Err` is a read failure; batch processing stops at the first one
    /// without retrying.
    fn next_frame(&mut self) -> CoreResult<Option<Frame>>;

    /// Frame geometry when known before decoding.
    fn dimensions(&self) -> Option<(u32, u32)> {
        None
    }

    /// Source frame rate in frames per second, when known.
    fn frame_rate(&self) -> Option<f64> {
        None
    }

    /// Total frame count when the container reports one. An estimate for
    /// progress display, not a guarantee.
    fn total_frames(&self) -> Option<u64> {
        None
    }
}

/// In-memory frame source over an ordered sequence.
pub struct FrameBuffer {
    frames: std::vec::IntoIter<Frame>,
    dimensions: Option<(u32, u32)>,
    total: u64,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(frames: Vec<Frame>) -> Self {
        let dimensions = frames.first().map(Frame::dimensions);
        let total = frames.len() as u64;
        Self {
            frames: frames.into_iter(),
            dimensions,
            total,
        }
    }
}

impl FrameSource for FrameBuffer {
    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        Ok(self.frames.next())
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    fn total_frames(&self) -> Option<u64> {
        Some(self.total)
    }
}

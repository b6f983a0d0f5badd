//! Video frame decoding through ffmpeg.
//!
//! Spawns an ffmpeg child that decodes the input to raw rgb24 frames piped
//! back into the process, scaled down to the analysis width first. The
//! child is a scoped resource: it is reaped when the stream ends and killed
//! if the source is dropped early.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::frame::Frame;
use crate::source::FrameSource;
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use ffmpeg_sidecar::iter::FfmpegIterator;
use ffprobe::FfProbeError;
use std::path::Path;

/// Container metadata probed before decoding starts.
///
/// Every field is best-effort: a missing value degrades progress display,
/// never decoding.
#[derive(Debug, Default, Clone)]
pub struct VideoMetadata {
    /// Duration of the media in seconds
    pub duration: Option<f64>,
    /// Width of the video stream before analysis scaling
    pub width: Option<u32>,
    /// Height of the video stream before analysis scaling
    pub height: Option<u32>,
    /// Total number of frames in the video
    pub total_frames: Option<u64>,
    /// Frame rate declared by the container (parsed from `r_frame_rate`)
    pub reported_rate: Option<f64>,
}

impl VideoMetadata {
    /// Frame rate of the stream: the container-declared rate when present,
    /// otherwise derived from the frame count and duration.
    #[must_use]
    pub fn frame_rate(&self) -> Option<f64> {
        self.reported_rate
            .or_else(|| match (self.total_frames, self.duration) {
                (Some(frames), Some(duration)) if duration > 0.0 => {
                    Some(frames as f64 / duration)
                }
                _ => None,
            })
    }
}

/// Probes container metadata with ffprobe.
///
/// A file ffprobe rejects is an error (the input is unreadable before any
/// decoding starts); a missing or odd ffprobe installation only costs the
/// metadata. A probed container without a video stream is always an error.
pub fn probe_metadata(input_path: &Path) -> CoreResult<VideoMetadata> {
    log::debug!("Running ffprobe on: {}", input_path.display());
    match ffprobe::ffprobe(input_path) {
        Ok(probed) => {
            let duration = probed
                .format
                .duration
                .as_deref()
                .and_then(|d| d.parse::<f64>().ok());

            let video_stream = probed
                .streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
                .ok_or_else(|| CoreError::NoStreamsFound(input_path.to_path_buf()))?;

            Ok(VideoMetadata {
                duration,
                width: video_stream.width.and_then(|w| u32::try_from(w).ok()),
                height: video_stream.height.and_then(|h| u32::try_from(h).ok()),
                total_frames: video_stream
                    .nb_frames
                    .as_deref()
                    .and_then(|f| f.parse::<u64>().ok()),
                reported_rate: crate::utils::parse_frame_rate(&video_stream.r_frame_rate),
            })
        }
        Err(FfProbeError::Status(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            Err(command_failed_error("ffprobe", output.status, stderr))
        }
        Err(err) => {
            log::warn!(
                "ffprobe unavailable for {} ({err:?}); continuing without metadata",
                input_path.display()
            );
            Ok(VideoMetadata::default())
        }
    }
}

/// Builds the ffmpeg invocation decoding `input_path` to scaled rgb24 frames.
fn build_decode_command(input_path: &Path, analysis_width: u32) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.input(input_path.to_string_lossy());
    cmd.args(["-an", "-vf", &format!("scale={analysis_width}:-2")]);
    cmd.rawvideo();
    cmd
}

/// Frame source decoding a video file through an ffmpeg child process.
pub struct VideoFrameSource {
    child: FfmpegChild,
    events: FfmpegIterator,
    metadata: VideoMetadata,
    decoded_dimensions: Option<(u32, u32)>,
    frames_delivered: u64,
    stderr_lines: Vec<String>,
    finished: bool,
}

impl VideoFrameSource {
    /// Opens the input and spawns the decoder.
    ///
    /// Frames come back scaled to `analysis_width` with aspect preserved
    /// (height rounded to even, as the scaler requires).
    pub fn open(input_path: &Path, analysis_width: u32) -> CoreResult<Self> {
        let metadata = probe_metadata(input_path)?;
        log::debug!(
            "Decoding {} at analysis width {analysis_width}",
            input_path.display()
        );

        let mut cmd = build_decode_command(input_path, analysis_width);
        let mut child = cmd
            .spawn()
            .map_err(|e| command_start_error("ffmpeg", e))?;
        let events = child.iter().map_err(|e| {
            command_failed_error(
                "ffmpeg",
                std::process::ExitStatus::default(),
                e.to_string(),
            )
        })?;

        Ok(Self {
            child,
            events,
            metadata,
            decoded_dimensions: None,
            frames_delivered: 0,
            stderr_lines: Vec::new(),
            finished: false,
        })
    }

    /// Metadata probed from the container.
    #[must_use]
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Reaps the child and settles the stream outcome.
    fn finish(&mut self) -> CoreResult<Option<Frame>> {
        self.finished = true;
        let _ = self.child.wait();

        if self.frames_delivered > 0 && !self.stderr_lines.is_empty() {
            log::warn!(
                "ffmpeg reported errors after {} frames; stream is truncated",
                self.frames_delivered
            );
        }
        Self::stream_outcome(self.frames_delivered, &self.stderr_lines)
    }

    /// Outcome of an ended event stream. Decoding that never produced a
    /// frame is a failure, and so is a decoder that errored after
    /// delivering frames: the error reaches batch processing, which keeps
    /// the partial result and marks it truncated. Only an error-free end
    /// is clean exhaustion.
    fn stream_outcome(
        frames_delivered: u64,
        stderr_lines: &[String],
    ) -> CoreResult<Option<Frame>> {
        if frames_delivered == 0 {
            let stderr = if stderr_lines.is_empty() {
                "no frames decoded".to_string()
            } else {
                stderr_lines.join("\n")
            };
            return Err(command_failed_error(
                "ffmpeg",
                std::process::ExitStatus::default(),
                stderr,
            ));
        }

        if !stderr_lines.is_empty() {
            return Err(command_failed_error(
                "ffmpeg",
                std::process::ExitStatus::default(),
                stderr_lines.join("\n"),
            ));
        }
        Ok(None)
    }
}

impl FrameSource for VideoFrameSource {
    fn next_frame(&mut self) -> CoreResult<Option<Frame>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            match self.events.next() {
                Some(FfmpegEvent::OutputFrame(frame)) => {
                    if frame.pix_fmt != "rgb24" {
                        return Err(CoreError::FrameDecode(format!(
                            "expected rgb24 frames from the decoder, got {}",
                            frame.pix_fmt
                        )));
                    }
                    let decoded = Frame::from_raw(frame.width, frame.height, frame.data)?;
                    self.decoded_dimensions.get_or_insert(decoded.dimensions());
                    self.frames_delivered += 1;
                    return Ok(Some(decoded));
                }
                Some(FfmpegEvent::Error(message)) => {
                    log::debug!("ffmpeg: {message}");
                    self.stderr_lines.push(message);
                }
                Some(FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line)) => {
                    log::debug!("ffmpeg: {line}");
                    self.stderr_lines.push(line);
                }
                Some(FfmpegEvent::Log(_, line)) => {
                    log::trace!("ffmpeg: {line}");
                }
                Some(FfmpegEvent::Done) | None => return self.finish(),
                Some(_) => {}
            }
        }
    }

    /// Geometry of the decoded (scaled) frames, known after the first one.
    fn dimensions(&self) -> Option<(u32, u32)> {
        self.decoded_dimensions
    }

    fn frame_rate(&self) -> Option<f64> {
        self.metadata.frame_rate()
    }

    fn total_frames(&self) -> Option<u64> {
        self.metadata.total_frames
    }
}

impl Drop for VideoFrameSource {
    fn drop(&mut self) {
        // Release the decoder on early exits as well
        if !self.finished {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

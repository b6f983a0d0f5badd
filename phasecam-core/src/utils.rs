//! Utility functions for formatting and file checks.
//!
//! Small general-purpose helpers shared by the processing code and the CLI:
//! shift and duration formatting, frame-rate parsing, and the container
//! extension check applied to batch inputs.

use std::path::Path;
use std::time::Duration;

/// Container extensions the batch analyzer accepts (case-insensitive).
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["mp4", "avi"];

/// Checks whether the path carries a supported video container extension.
/// Purely lexical; existence and readability are checked separately.
#[must_use]
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext_str| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext_str.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Formats a shift pair with two decimal places (e.g. "dx: 5.00, dy: -0.25").
#[must_use]
pub fn format_shift(dx: f64, dy: f64) -> String {
    format!("dx: {dx:.2}, dy: {dy:.2}")
}

/// Formats seconds as HH:MM:SS (e.g. 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parses an ffprobe rational frame rate ("30000/1001", "25/1", "30") to
/// frames per second. Returns None for malformed or zero-denominator input.
#[must_use]
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let trimmed = rate.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().ok()?;
            let den = den.parse::<f64>().ok()?;
            if den == 0.0 || !num.is_finite() || !den.is_finite() {
                None
            } else {
                Some(num / den)
            }
        }
        None => {
            let value = trimmed.parse::<f64>().ok()?;
            value.is_finite().then_some(value)
        }
    }
}

/// Frames processed per wall-clock second; 0.0 for an empty or instant run.
#[must_use]
pub fn effective_fps(frames: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 && frames > 0 {
        frames as f64 / secs
    } else {
        0.0
    }
}

/// Safely extracts filename from a path with consistent error handling.
/// Returns the filename as a String, or an error if the path has no filename component.
pub fn get_filename_safe(path: &Path) -> crate::CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            crate::CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

//! Phase correlation between two luminance planes.
//!
//! Estimates the translational offset of a target frame relative to a
//! reference frame in the frequency domain: forward 2D FFT of both planes,
//! normalized cross-power spectrum, inverse transform, then a peak search
//! with wraparound handling and sub-pixel refinement. Works at the exact
//! frame dimensions; no padding is applied.

use crate::config::{DetectorConfig, SubpixelMethod};
use crate::error::{CoreResult, frame_size_error};
use crate::frame::GrayFrame;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::Serialize;
use std::sync::Arc;

/// Magnitudes below this are treated as zero when normalizing spectrum bins.
const MAGNITUDE_EPSILON: f32 = 1e-10;

/// Estimated sub-pixel translation of a target frame relative to a reference
/// frame, plus the correlation peak strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShiftEstimate {
    /// Horizontal translation in pixels (positive = content moved right).
    pub dx: f64,
    /// Vertical translation in pixels (positive = content moved down).
    pub dy: f64,
    /// Normalized correlation peak value, near 1.0 for identical frames.
    /// Carried for diagnostics; classification ignores it.
    pub response: f64,
}

/// Frequency-domain correlator with cached FFT plans.
///
/// The planner reuses plans per transform length, so a correlator can be
/// kept across frames of one size or fed pairs of varying sizes; results
/// never depend on earlier calls.
pub struct PhaseCorrelator {
    planner: FftPlanner<f32>,
    apply_window: bool,
    subpixel: SubpixelMethod,
}

impl PhaseCorrelator {
    /// Creates a correlator with the detector's windowing and refinement
    /// settings.
    #[must_use]
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            planner: FftPlanner::new(),
            apply_window: config.apply_window,
            subpixel: config.subpixel,
        }
    }

    /// Estimates the translation of `target` relative to `reference`.
    ///
    /// A target equal to the reference translated by (+5, 0) yields
    /// dx close to +5.0. Both planes must have identical dimensions.
    pub fn correlate(
        &mut self,
        reference: &GrayFrame,
        target: &GrayFrame,
    ) -> CoreResult<ShiftEstimate> {
        if reference.dimensions() != target.dimensions() {
            return Err(frame_size_error(
                reference.dimensions(),
                target.dimensions(),
            ));
        }

        let width = reference.width() as usize;
        let height = reference.height() as usize;

        let mut ref_spectrum = self.plane_to_complex(reference);
        let mut tgt_spectrum = self.plane_to_complex(target);
        self.fft_2d(&mut ref_spectrum, width, height, true);
        self.fft_2d(&mut tgt_spectrum, width, height, true);

        let mut cross = cross_power_spectrum(&tgt_spectrum, &ref_spectrum);
        self.fft_2d(&mut cross, width, height, false);

        // Normalize so an exact match peaks at 1.0.
        let scale = (width * height) as f32;
        let surface: Vec<f32> = cross.iter().map(|c| c.norm() / scale).collect();

        let (peak_x, peak_y, peak_value) = find_peak(&surface, width);
        let (offset_x, offset_y) = match self.subpixel {
            SubpixelMethod::Parabolic => parabolic_offset(&surface, width, height, peak_x, peak_y),
            SubpixelMethod::Centroid => centroid_offset(&surface, width, height, peak_x, peak_y),
        };

        let dx = wrap_coordinate(peak_x, width) + offset_x;
        let dy = wrap_coordinate(peak_y, height) + offset_y;

        log::trace!(
            "correlation peak at ({peak_x}, {peak_y}) value {peak_value:.4}, refined to ({dx:.3}, {dy:.3})"
        );

        Ok(ShiftEstimate {
            dx,
            dy,
            response: f64::from(peak_value),
        })
    }

    /// Copies a luminance plane into a complex buffer, windowing if enabled.
    fn plane_to_complex(&self, plane: &GrayFrame) -> Vec<Complex<f32>> {
        let width = plane.width() as usize;
        let height = plane.height() as usize;
        let data = plane.data();

        if self.apply_window {
            let win_x = hann_window(width);
            let win_y = hann_window(height);
            let mut buffer = Vec::with_capacity(width * height);
            for y in 0..height {
                for x in 0..width {
                    let value = data[y * width + x] * win_x[x] * win_y[y];
                    buffer.push(Complex::new(value, 0.0));
                }
            }
            buffer
        } else {
            data.iter().map(|&v| Complex::new(v, 0.0)).collect()
        }
    }

    /// In-place 2D FFT by row-column decomposition.
    fn fft_2d(&mut self, data: &mut Vec<Complex<f32>>, width: usize, height: usize, forward: bool) {
        let row_fft = self.plan(width, forward);
        for row in data.chunks_exact_mut(width) {
            row_fft.process(row);
        }

        let mut transposed = transpose(data, width, height);
        let col_fft = self.plan(height, forward);
        for column in transposed.chunks_exact_mut(height) {
            col_fft.process(column);
        }

        *data = transpose(&transposed, height, width);
    }

    fn plan(&mut self, len: usize, forward: bool) -> Arc<dyn Fft<f32>> {
        if forward {
            self.planner.plan_fft_forward(len)
        } else {
            self.planner.plan_fft_inverse(len)
        }
    }
}

/// Per-bin normalized product `target * conj(reference)`.
///
/// With this orientation the inverse transform peaks at the translation of
/// the target relative to the reference, so no sign flip is needed later.
/// Bins with near-zero magnitude are zeroed instead of amplified.
fn cross_power_spectrum(
    target: &[Complex<f32>],
    reference: &[Complex<f32>],
) -> Vec<Complex<f32>> {
    target
        .iter()
        .zip(reference.iter())
        .map(|(t, r)| {
            let product = t * r.conj();
            let magnitude = product.norm();
            if magnitude > MAGNITUDE_EPSILON {
                product / magnitude
            } else {
                Complex::new(0.0, 0.0)
            }
        })
        .collect()
}

/// Location and value of the strongest correlation bin.
fn find_peak(surface: &[f32], width: usize) -> (usize, usize, f32) {
    let mut peak_index = 0;
    let mut peak_value = f32::MIN;
    for (index, &value) in surface.iter().enumerate() {
        if value > peak_value {
            peak_value = value;
            peak_index = index;
        }
    }
    (peak_index % width, peak_index / width, peak_value)
}

/// Maps a peak coordinate to a signed offset: positions past the midpoint
/// wrap to negative translations.
fn wrap_coordinate(position: usize, size: usize) -> f64 {
    if position > size / 2 {
        position as f64 - size as f64
    } else {
        position as f64
    }
}

/// Correlation value at a wrapped surface coordinate.
fn surface_value(surface: &[f32], width: usize, height: usize, x: isize, y: isize) -> f64 {
    let xi = x.rem_euclid(width as isize) as usize;
    let yi = y.rem_euclid(height as isize) as usize;
    f64::from(surface[yi * width + xi])
}

/// Three-point parabolic refinement around the peak, one axis at a time.
fn parabolic_offset(
    surface: &[f32],
    width: usize,
    height: usize,
    peak_x: usize,
    peak_y: usize,
) -> (f64, f64) {
    let px = peak_x as isize;
    let py = peak_y as isize;
    let center = surface_value(surface, width, height, px, py);

    let left = surface_value(surface, width, height, px - 1, py);
    let right = surface_value(surface, width, height, px + 1, py);
    let denom_x = left + right - 2.0 * center;
    let offset_x = if denom_x.abs() > 1e-10 {
        (left - right) / (2.0 * denom_x)
    } else {
        0.0
    };

    let above = surface_value(surface, width, height, px, py - 1);
    let below = surface_value(surface, width, height, px, py + 1);
    let denom_y = above + below - 2.0 * center;
    let offset_y = if denom_y.abs() > 1e-10 {
        (above - below) / (2.0 * denom_y)
    } else {
        0.0
    };

    (offset_x, offset_y)
}

/// Intensity-weighted centroid over a 5x5 wrapped neighborhood of the peak.
fn centroid_offset(
    surface: &[f32],
    width: usize,
    height: usize,
    peak_x: usize,
    peak_y: usize,
) -> (f64, f64) {
    let px = peak_x as isize;
    let py = peak_y as isize;

    let mut total = 0.0;
    let mut weighted_x = 0.0;
    let mut weighted_y = 0.0;
    for offset_y in -2_isize..=2 {
        for offset_x in -2_isize..=2 {
            let value = surface_value(surface, width, height, px + offset_x, py + offset_y);
            total += value;
            weighted_x += offset_x as f64 * value;
            weighted_y += offset_y as f64 * value;
        }
    }

    if total > 1e-10 {
        (weighted_x / total, weighted_y / total)
    } else {
        (0.0, 0.0)
    }
}

/// Hann window coefficients for a transform of the given length.
fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size as f32 - 1.0)).cos())
        })
        .collect()
}

/// Out-of-place transpose of a `width` x `height` row-major buffer.
fn transpose(data: &[Complex<f32>], width: usize, height: usize) -> Vec<Complex<f32>> {
    let mut out = vec![Complex::new(0.0, 0.0); data.len()];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = data[y * width + x];
        }
    }
    out
}

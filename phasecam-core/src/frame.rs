//! Frame representations and color conversion.
//!
//! [`Frame`] is an owned 8-bit RGB raster, the unit every processing path
//! works in: decoded video frames, loaded stills, and annotated output all
//! use it. [`GrayFrame`] is the single-channel floating-point derivation fed
//! to the correlation step and dropped right after.

use crate::error::{CoreError, CoreResult};
use std::path::Path;

/// Bytes per pixel in the rgb24 layout.
const RGB_BYTES: usize = 3;

/// Owned 8-bit RGB frame, row-major, tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wraps raw rgb24 bytes. The buffer length must be exactly
    /// `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::FrameDecode(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * RGB_BYTES;
        if data.len() != expected {
            return Err(CoreError::FrameDecode(format!(
                "rgb24 buffer for {width}x{height} should hold {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Loads a still image from disk and converts it to rgb24.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_raw(width, height, rgb.into_raw())
    }

    /// Writes the frame as an image file; the format follows the extension.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| {
                CoreError::FrameDecode("frame buffer no longer matches its geometry".to_string())
            })?;
        img.save(path)?;
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) pair, the geometry compared across a frame pair.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel access for overlay painting.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Converts to a single-channel luminance plane using Rec.601 weights,
    /// values on the 0..255 scale.
    #[must_use]
    pub fn to_gray(&self) -> GrayFrame {
        let pixels = self.width as usize * self.height as usize;
        let mut luma = Vec::with_capacity(pixels);
        for px in self.data.chunks_exact(RGB_BYTES) {
            let r = f32::from(px[0]);
            let g = f32::from(px[1]);
            let b = f32::from(px[2]);
            luma.push(0.299 * r + 0.587 * g + 0.114 * b);
        }
        GrayFrame {
            width: self.width,
            height: self.height,
            data: luma,
        }
    }
}

/// Single-channel `f32` luminance plane, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayFrame {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl GrayFrame {
    /// Wraps a raw luminance plane. The buffer length must be exactly
    /// `width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::FrameDecode(format!(
                "frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(CoreError::FrameDecode(format!(
                "luminance plane for {width}x{height} should hold {expected} samples, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

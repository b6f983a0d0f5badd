//! Status overlays for compared frames.
//!
//! Each compared frame can be emitted with its verdict painted on: a solid
//! banner across the top plus a thin border, red for motion and green for
//! stable. The textual status travels with the events instead of being
//! rasterized into the pixels.

use crate::detector::Classification;
use crate::frame::Frame;

/// Overlay color for frames classified as moved.
pub const MOVED_COLOR: [u8; 3] = [220, 40, 40];

/// Overlay color for stable frames.
pub const STABLE_COLOR: [u8; 3] = [40, 180, 70];

/// Height of the status banner in pixels.
const BANNER_HEIGHT: u32 = 22;

/// Thickness of the frame border in pixels.
const BORDER_THICKNESS: u32 = 2;

/// Overlay color for a classification.
#[must_use]
pub fn status_color(classification: Classification) -> [u8; 3] {
    match classification {
        Classification::Moved => MOVED_COLOR,
        Classification::Stable => STABLE_COLOR,
    }
}

/// Returns a copy of the frame with the status banner and border painted.
#[must_use]
pub fn annotate_frame(frame: &Frame, classification: Classification) -> Frame {
    let mut annotated = frame.clone();
    let color = status_color(classification);
    let width = annotated.width();
    let height = annotated.height();
    let data = annotated.data_mut();

    let banner_rows = BANNER_HEIGHT.min(height);
    for y in 0..banner_rows {
        for x in 0..width {
            put_pixel(data, width, x, y, color);
        }
    }

    let border = BORDER_THICKNESS.min(width).min(height);
    for y in 0..height {
        for t in 0..border {
            put_pixel(data, width, t, y, color);
            put_pixel(data, width, width - 1 - t, y, color);
        }
    }
    for t in 0..border {
        for x in 0..width {
            put_pixel(data, width, x, height - 1 - t, color);
        }
    }

    annotated
}

fn put_pixel(data: &mut [u8], width: u32, x: u32, y: u32, color: [u8; 3]) {
    let index = (y as usize * width as usize + x as usize) * 3;
    data[index..index + 3].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: u32, height: u32) -> Frame {
        Frame::from_raw(width, height, vec![128; (width * height * 3) as usize]).unwrap()
    }

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let index = (y as usize * frame.width() as usize + x as usize) * 3;
        let px = &frame.data()[index..index + 3];
        [px[0], px[1], px[2]]
    }

    #[test]
    fn test_banner_color_matches_classification() {
        let frame = gray_frame(100, 80);

        let moved = annotate_frame(&frame, Classification::Moved);
        assert_eq!(pixel(&moved, 50, 0), MOVED_COLOR);
        assert_eq!(pixel(&moved, 50, 21), MOVED_COLOR);

        let stable = annotate_frame(&frame, Classification::Stable);
        assert_eq!(pixel(&stable, 50, 0), STABLE_COLOR);
    }

    #[test]
    fn test_border_painted_on_all_edges() {
        let frame = gray_frame(100, 80);
        let annotated = annotate_frame(&frame, Classification::Moved);

        assert_eq!(pixel(&annotated, 0, 40), MOVED_COLOR);
        assert_eq!(pixel(&annotated, 99, 40), MOVED_COLOR);
        assert_eq!(pixel(&annotated, 50, 79), MOVED_COLOR);
        assert_eq!(pixel(&annotated, 50, 78), MOVED_COLOR);
    }

    #[test]
    fn test_interior_untouched() {
        let frame = gray_frame(100, 80);
        let annotated = annotate_frame(&frame, Classification::Stable);

        assert_eq!(pixel(&annotated, 50, 40), [128, 128, 128]);
        assert_eq!(annotated.dimensions(), frame.dimensions());
    }

    #[test]
    fn test_original_frame_unmodified() {
        let frame = gray_frame(100, 80);
        let _ = annotate_frame(&frame, Classification::Moved);
        assert_eq!(pixel(&frame, 0, 0), [128, 128, 128]);
    }

    #[test]
    fn test_tiny_frame_fully_painted_without_panic() {
        let frame = gray_frame(3, 2);
        let annotated = annotate_frame(&frame, Classification::Moved);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(pixel(&annotated, x, y), MOVED_COLOR);
            }
        }
    }
}

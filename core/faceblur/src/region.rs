use crate::error::FaceBlurError;
use crate::face_detector::BoundingBox;

/// Pixel-aligned region within the image being blurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    /// Left edge (pixels).
    pub x: u32,
    /// Top edge (pixels).
    pub y: u32,
    /// Width in pixels; may be zero.
    pub width: u32,
    /// Height in pixels; may be zero.
    pub height: u32,
}

impl PixelRegion {
    /// Whether the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether pixel `(px, py)` lies inside the region.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Map a detector rectangle onto the pixel grid of a `width` × `height` image.
///
/// Each corner is truncated toward zero, then clamped to the image. Corners
/// that cross after clamping yield an empty region rather than an error; only
/// non-finite coordinates are rejected.
pub(crate) fn pixel_region(
    bbox: &BoundingBox,
    index: usize,
    width: u32,
    height: u32,
) -> Result<PixelRegion, FaceBlurError> {
    if !bbox.is_finite() {
        return Err(FaceBlurError::MalformedGeometry {
            index,
            x1: bbox.x1,
            y1: bbox.y1,
            x2: bbox.x2,
            y2: bbox.y2,
        });
    }

    let x1 = clamp_coordinate(bbox.x1, width);
    let y1 = clamp_coordinate(bbox.y1, height);
    let x2 = clamp_coordinate(bbox.x2, width);
    let y2 = clamp_coordinate(bbox.y2, height);

    Ok(PixelRegion {
        x: x1,
        y: y1,
        width: x2.saturating_sub(x1),
        height: y2.saturating_sub(y1),
    })
}

fn clamp_coordinate(value: f32, limit: u32) -> u32 {
    // `as` saturates for out-of-range floats
    (value.trunc() as i64).clamp(0, limit as i64) as u32
}

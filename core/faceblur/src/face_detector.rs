use image::RgbImage;

/// Error type a [`FaceDetector`] may return.
pub type DetectorError = Box<dyn std::error::Error + Send + Sync>;

/// Confidence assumed for detections that don't carry one.
pub const IMPLICIT_CONFIDENCE: f32 = 1.0;

/// Axis-aligned rectangle in pixel coordinates, given by its two corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge (pixels).
    pub x1: f32,
    /// Top edge (pixels).
    pub y1: f32,
    /// Right edge, exclusive (pixels).
    pub x2: f32,
    /// Bottom edge, exclusive (pixels).
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from its top-left and bottom-right corners.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }
}

/// A single face reported by a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Where the face is.
    pub bbox: BoundingBox,
    /// Detection confidence in `[0, 1]`, if the detector reports one.
    pub confidence: Option<f32>,
}

impl Detection {
    /// A detection with an explicit confidence score.
    pub fn new(bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            bbox,
            confidence: Some(confidence),
        }
    }

    /// A detection without a confidence score; it is treated as certain.
    pub fn without_confidence(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            confidence: None,
        }
    }

    /// The confidence score, falling back to [`IMPLICIT_CONFIDENCE`].
    pub fn confidence(&self) -> f32 {
        self.confidence.unwrap_or(IMPLICIT_CONFIDENCE)
    }
}

/// One group of detections, in the order the detector produced them.
///
/// Batch-oriented models typically return one result per input; a detector
/// is free to split its output into several groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    /// Detections in this group.
    pub detections: Vec<Detection>,
}

impl DetectionResult {
    /// Wrap a list of detections.
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Iterate over the detections in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    /// Number of detections in the group.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Whether the group holds no detections.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

impl FromIterator<Detection> for DetectionResult {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DetectionResult {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}

/// Pluggable face detection backend.
///
/// The pipeline treats the detector as a black box: it is handed the
/// untouched input image and must return rectangles in that image's pixel
/// coordinates. Implement this for an ONNX model, a remote service, or wrap a
/// closure; any `Fn(&RgbImage) -> Result<Vec<DetectionResult>, DetectorError>`
/// already implements it.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in `image`.
    fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionResult>, DetectorError>;
}

impl<F> FaceDetector for F
where
    F: Fn(&RgbImage) -> Result<Vec<DetectionResult>, DetectorError> + Send + Sync,
{
    fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionResult>, DetectorError> {
        self(image)
    }
}

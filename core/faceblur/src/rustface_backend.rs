use std::io::Read;
use std::path::Path;

use image::RgbImage;

use crate::error::FaceBlurError;
use crate::face_detector::{BoundingBox, Detection, DetectionResult, DetectorError, FaceDetector};

const DEFAULT_MIN_FACE_SIZE: u32 = 20;
const DEFAULT_SCORE_THRESHOLD: f64 = 2.0;

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// SeetaFace scores are unbounded, so detections are returned without a
/// confidence and the backend's own score threshold decides what counts as a
/// face.
pub struct RustfaceDetector {
    model: rustface::Model,
    min_face_size: u32,
    score_threshold: f64,
}

impl RustfaceDetector {
    /// Load a SeetaFace frontal model from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FaceBlurError> {
        let model =
            rustface::read_model(reader).map_err(|e| FaceBlurError::ModelLoad(e.to_string()))?;
        Ok(Self {
            model,
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        })
    }

    /// Load a model already held in memory, e.g. via `include_bytes!`.
    pub fn from_model_bytes(data: &[u8]) -> Result<Self, FaceBlurError> {
        Self::from_reader(std::io::Cursor::new(data))
    }

    /// Load a model file such as `seeta_fd_frontal_v1.0.bin`.
    pub fn from_model_path<P: AsRef<Path>>(path: P) -> Result<Self, FaceBlurError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| FaceBlurError::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Smallest face edge, in pixels, the detector searches for (default: 20).
    pub fn min_face_size(mut self, size: u32) -> Self {
        self.min_face_size = size;
        self
    }

    /// Minimum SeetaFace score for a window to count as a face (default: 2.0).
    pub fn score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<DetectionResult>, DetectorError> {
        let gray = image::imageops::grayscale(image);
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(self.score_threshold);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        let result = faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                let (x, y) = (bbox.x() as f32, bbox.y() as f32);
                Detection::without_confidence(BoundingBox::new(
                    x,
                    y,
                    x + bbox.width() as f32,
                    y + bbox.height() as f32,
                ))
            })
            .collect();

        Ok(vec![result])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model_is_rejected() {
        let result = RustfaceDetector::from_model_bytes(&[]);
        assert!(matches!(result, Err(FaceBlurError::ModelLoad(_))));
    }

    #[test]
    fn missing_model_file_is_rejected() {
        let result = RustfaceDetector::from_model_path("/nonexistent/seeta_fd_frontal_v1.0.bin");
        match result {
            Err(FaceBlurError::ModelLoad(message)) => assert!(message.contains("nonexistent")),
            _ => panic!("expected a model load error"),
        }
    }
}

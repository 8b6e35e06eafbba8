use thiserror::Error;

use crate::face_detector::DetectorError;

#[derive(Debug, Error)]
pub enum FaceBlurError {
    #[error("face detector failed: {0}")]
    Detector(#[source] DetectorError),

    #[error("detection {index} has a non-finite coordinate: ({x1}, {y1}, {x2}, {y2})")]
    MalformedGeometry {
        index: usize,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },

    #[error("confidence threshold must be between 0.0 and 1.0, got {0}")]
    InvalidConfidenceThreshold(f32),

    #[error("blur kernel size {size} exceeds the maximum of {max}")]
    KernelTooLarge { size: u32, max: u32 },

    #[error("failed to load detector model: {0}")]
    ModelLoad(String),
}

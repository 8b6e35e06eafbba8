//! Face anonymization: find faces with a pluggable detector and Gaussian-blur
//! them out of a copy of the image.
//!
//! # Example
//!
//! ```no_run
//! use faceblur::{BoundingBox, Detection, DetectionResult, DetectorError, FaceBlurPipeline};
//! use image::RgbImage;
//!
//! let detector = |_: &RgbImage| -> Result<Vec<DetectionResult>, DetectorError> {
//!     Ok(vec![DetectionResult::new(vec![Detection::new(
//!         BoundingBox::new(10.0, 10.0, 60.0, 70.0),
//!         0.93,
//!     )])])
//! };
//!
//! let photo = image::open("group.jpg").unwrap().to_rgb8();
//! let result = FaceBlurPipeline::new(Box::new(detector))
//!     .blur_strength(31)
//!     .run(&photo)
//!     .unwrap();
//! println!("Blurred {} face(s)", result.face_count);
//! ```
#![warn(missing_docs)]

mod blur;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod pipeline;
mod region;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;

use image::RgbImage;
use tracing::warn;

/// Blur kernel size type.
pub use blur::BlurKernelSize;
/// Error type returned by faceblur operations.
pub use error::FaceBlurError;
/// Face detection trait and detection types.
pub use face_detector::{
    BoundingBox, Detection, DetectionResult, DetectorError, FaceDetector, IMPLICIT_CONFIDENCE,
};
/// Pixel region type reported for each blurred face.
pub use region::PixelRegion;
#[cfg(feature = "rustface")]
/// Built-in detector that runs a SeetaFace model.
pub use rustface_backend::RustfaceDetector;

/// Kernel size used when none is configured.
pub const DEFAULT_BLUR_STRENGTH: u32 = 25;

/// Detections scoring below this are neither counted nor blurred.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.5;

/// Result of a successful blur run.
#[derive(Debug, Clone)]
pub struct BlurredImage {
    /// Copy of the input with every accepted face region blurred.
    pub image: RgbImage,

    /// Number of detections at or above the confidence threshold.
    pub face_count: usize,

    /// Pixel region of each counted face, in processing order. Regions that
    /// fell entirely outside the image are present but empty.
    pub regions: Vec<PixelRegion>,
}

/// Blur every face `detector` finds in `image`.
///
/// `blur_strength` is the Gaussian kernel size; even values are bumped to the
/// next odd one. Detections below [`DEFAULT_MIN_CONFIDENCE`] are ignored.
/// The input is never modified.
pub fn blur_faces<D: FaceDetector + ?Sized>(
    image: &RgbImage,
    detector: &D,
    blur_strength: u32,
) -> Result<BlurredImage, FaceBlurError> {
    pipeline::run_pipeline(
        image,
        detector,
        BlurKernelSize::new(blur_strength),
        DEFAULT_MIN_CONFIDENCE,
    )
}

/// Fail-open variant of [`blur_faces`].
///
/// On any failure the error is logged and a copy of the untouched input is
/// returned with a face count of 0. Callers cannot tell "no faces" from
/// "detection failed" through this function; use [`blur_faces`] when that
/// matters.
pub fn blur_faces_or_original<D: FaceDetector + ?Sized>(
    image: &RgbImage,
    detector: &D,
    blur_strength: u32,
) -> (RgbImage, usize) {
    into_fail_open(image, blur_faces(image, detector, blur_strength))
}

fn into_fail_open(
    image: &RgbImage,
    result: Result<BlurredImage, FaceBlurError>,
) -> (RgbImage, usize) {
    match result {
        Ok(blurred) => (blurred.image, blurred.face_count),
        Err(error) => {
            warn!(%error, "face blur failed, returning original image");
            (image.clone(), 0)
        }
    }
}

/// Builder for blurring faces with a fixed detector and settings.
///
/// ```no_run
/// use faceblur::{DetectionResult, FaceBlurPipeline, FaceDetector, DetectorError};
/// use image::RgbImage;
///
/// struct MyDetector;
/// impl FaceDetector for MyDetector {
///     fn detect(&self, _image: &RgbImage) -> Result<Vec<DetectionResult>, DetectorError> {
///         // Your detection logic here
///         Ok(vec![])
///     }
/// }
///
/// let frame = RgbImage::new(640, 480);
/// let (blurred, faces) = FaceBlurPipeline::new(Box::new(MyDetector))
///     .blur_strength(45)
///     .min_confidence(0.6)
///     .run_or_original(&frame);
/// ```
pub struct FaceBlurPipeline {
    detector: Box<dyn FaceDetector>,
    blur_strength: u32,
    min_confidence: f32,
}

impl FaceBlurPipeline {
    /// Create a pipeline around `detector` with default settings.
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector,
            blur_strength: DEFAULT_BLUR_STRENGTH,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Set the Gaussian kernel size (default: 25). Even values are rounded up
    /// to the next odd value.
    pub fn blur_strength(mut self, strength: u32) -> Self {
        self.blur_strength = strength;
        self
    }

    /// Set the minimum detection confidence, from 0.0 to 1.0 (default: 0.5).
    /// Detections scoring exactly the threshold are blurred.
    pub fn min_confidence(mut self, threshold: f32) -> Self {
        self.min_confidence = threshold;
        self
    }

    /// The kernel size this pipeline will actually use.
    pub fn kernel_size(&self) -> BlurKernelSize {
        BlurKernelSize::new(self.blur_strength)
    }

    /// Detect and blur faces in `image`.
    pub fn run(&self, image: &RgbImage) -> Result<BlurredImage, FaceBlurError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(FaceBlurError::InvalidConfidenceThreshold(self.min_confidence));
        }

        pipeline::run_pipeline(
            image,
            self.detector.as_ref(),
            self.kernel_size(),
            self.min_confidence,
        )
    }

    /// Like [`FaceBlurPipeline::run`], but falls back to the untouched image
    /// and a count of 0 on failure.
    pub fn run_or_original(&self, image: &RgbImage) -> (RgbImage, usize) {
        into_fail_open(image, self.run(image))
    }
}

use image::RgbImage;
use tracing::debug;

use crate::blur::{blur_region, BlurKernelSize};
use crate::error::FaceBlurError;
use crate::face_detector::FaceDetector;
use crate::region::pixel_region;
use crate::BlurredImage;

/// Full blur pipeline: copy → detect → filter by confidence → blur each region.
///
/// Every detection's geometry is validated before its confidence is looked
/// at, so a malformed box fails the run even when it would have been skipped.
/// Detection runs on `image`, never on the copy being blurred. Regions are
/// blurred one after another on the same copy, so overlapping boxes see the
/// blur applied by earlier detections.
pub(crate) fn run_pipeline<D: FaceDetector + ?Sized>(
    image: &RgbImage,
    detector: &D,
    kernel: BlurKernelSize,
    min_confidence: f32,
) -> Result<BlurredImage, FaceBlurError> {
    if !kernel.is_supported() {
        return Err(FaceBlurError::KernelTooLarge {
            size: kernel.get(),
            max: BlurKernelSize::MAX,
        });
    }

    let mut output = image.clone();
    let (width, height) = output.dimensions();

    let results = detector.detect(image).map_err(FaceBlurError::Detector)?;

    let mut regions = Vec::new();
    for (index, detection) in results.iter().flat_map(|r| r.iter()).enumerate() {
        let region = pixel_region(&detection.bbox, index, width, height)?;

        let confidence = detection.confidence();
        if confidence < min_confidence {
            debug!(index, confidence, "skipping low-confidence detection");
            continue;
        }

        if region.is_empty() {
            debug!(index, bbox = ?detection.bbox, "detection covers no pixels");
        } else {
            blur_region(&mut output, region, kernel);
        }
        regions.push(region);
    }

    debug!(
        faces = regions.len(),
        kernel = kernel.get(),
        "blurred faces"
    );

    Ok(BlurredImage {
        face_count: regions.len(),
        image: output,
        regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_detector::{BoundingBox, Detection, DetectionResult, DetectorError};
    use image::Rgb;

    fn make_gradient(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([
                ((x * 37 + y * 11) % 256) as u8,
                ((x * 5 + y * 53) % 256) as u8,
                128,
            ]);
        }
        img
    }

    struct Fixed(Vec<DetectionResult>);

    impl FaceDetector for Fixed {
        fn detect(&self, _image: &RgbImage) -> Result<Vec<DetectionResult>, DetectorError> {
            Ok(self.0.clone())
        }
    }

    fn single(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Fixed {
        Fixed(vec![DetectionResult::new(vec![Detection::new(
            BoundingBox::new(x1, y1, x2, y2),
            confidence,
        )])])
    }

    #[test]
    fn threshold_is_inclusive() {
        let img = make_gradient(40, 40);
        let detector = single(5.0, 5.0, 20.0, 20.0, 0.5);
        let out = run_pipeline(&img, &detector, BlurKernelSize::new(5), 0.5).unwrap();
        assert_eq!(out.face_count, 1);
        assert_ne!(out.image, img);
    }

    #[test]
    fn groups_are_flattened_in_order() {
        let img = make_gradient(60, 60);
        let detector = Fixed(vec![
            DetectionResult::new(vec![Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9)]),
            DetectionResult::default(),
            DetectionResult::new(vec![
                Detection::new(BoundingBox::new(20.0, 20.0, 30.0, 30.0), 0.2),
                Detection::without_confidence(BoundingBox::new(40.0, 40.0, 50.0, 55.0)),
            ]),
        ]);
        let out = run_pipeline(&img, &detector, BlurKernelSize::new(3), 0.5).unwrap();
        assert_eq!(out.face_count, 2);
        assert_eq!(out.regions[0].x, 0);
        assert_eq!(out.regions[1].x, 40);
        assert_eq!(out.regions[1].height, 15);
    }

    #[test]
    fn malformed_box_aborts_whole_run() {
        let img = make_gradient(30, 30);
        let detector = Fixed(vec![DetectionResult::new(vec![
            Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9),
            Detection::new(BoundingBox::new(0.0, f32::INFINITY, 10.0, 10.0), 0.9),
        ])]);
        let err = run_pipeline(&img, &detector, BlurKernelSize::new(3), 0.5).unwrap_err();
        assert!(matches!(err, FaceBlurError::MalformedGeometry { index: 1, .. }));
    }

    #[test]
    fn low_confidence_malformed_box_still_fails() {
        let img = make_gradient(30, 30);
        let detector = single(f32::NAN, 0.0, 10.0, 10.0, 0.1);
        let err = run_pipeline(&img, &detector, BlurKernelSize::new(3), 0.5).unwrap_err();
        assert!(matches!(err, FaceBlurError::MalformedGeometry { index: 0, .. }));
    }

    #[test]
    fn oversized_kernel_fails_before_detection() {
        let img = make_gradient(32, 32);
        let detector = single(0.0, 0.0, 16.0, 16.0, 0.9);
        let err = run_pipeline(&img, &detector, BlurKernelSize::new(1_000_000_000), 0.5)
            .unwrap_err();
        assert!(matches!(
            err,
            FaceBlurError::KernelTooLarge {
                size: 1_000_000_001,
                max: BlurKernelSize::MAX
            }
        ));
    }

    #[test]
    fn largest_kernel_blurs_small_region() {
        let img = make_gradient(12, 12);
        let detector = single(2.0, 2.0, 8.0, 9.0, 0.9);
        let out = run_pipeline(&img, &detector, BlurKernelSize::new(BlurKernelSize::MAX), 0.5)
            .unwrap();
        assert_eq!(out.face_count, 1);
        assert_ne!(out.image, img);
    }

    #[test]
    fn overlapping_boxes_blur_cumulatively() {
        let img = make_gradient(40, 40);
        let kernel = BlurKernelSize::new(5);

        let once = single(0.0, 0.0, 20.0, 20.0, 0.9);
        let once = run_pipeline(&img, &once, kernel, 0.5).unwrap();

        let twice = Fixed(vec![DetectionResult::new(vec![
            Detection::new(BoundingBox::new(0.0, 0.0, 20.0, 20.0), 0.9),
            Detection::new(BoundingBox::new(0.0, 0.0, 20.0, 20.0), 0.9),
        ])]);
        let twice = run_pipeline(&img, &twice, kernel, 0.5).unwrap();

        assert_eq!(twice.face_count, 2);
        assert_ne!(once.image, twice.image);

        // The second pass reads the already-blurred copy.
        let mut expected = once.image.clone();
        blur_region(&mut expected, once.regions[0], kernel);
        assert_eq!(twice.image, expected);
    }
}

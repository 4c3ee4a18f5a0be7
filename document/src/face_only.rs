//! Face-Only Detector.

use idv_types::{FaceBox, FaceOnlyResult, Image};

/// Flags document images dominated by a single face.
#[derive(Clone, Debug)]
pub struct FaceOnlyDetector {
    threshold: f64,
}

impl FaceOnlyDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// `face` is the largest face found in `image`, if any. The part of the
    /// box outside the frame is ignored.
    pub fn check_face_only(&self, image: &Image, face: Option<FaceBox>) -> FaceOnlyResult {
        let face_area_ratio = face
            .map(|f| {
                (f.clipped_area(image.width(), image.height()) as f64 / image.area() as f64)
                    .clamp(0.0, 1.0)
            })
            .unwrap_or(0.0);
        FaceOnlyResult {
            is_just_face: face_area_ratio > self.threshold,
            face_area_ratio,
            face_found: face.is_some(),
            threshold_used: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_face_is_face_only() {
        let img = Image::solid(400, 400, [0, 0, 0]);
        let result = FaceOnlyDetector::new(0.60)
            .check_face_only(&img, Some(FaceBox::new(27, 27, 346, 346)));
        assert!(result.face_area_ratio > 0.74);
        assert!(result.is_just_face);
        assert!(result.face_found);
    }

    #[test]
    fn ratio_at_threshold_is_not_face_only() {
        let img = Image::solid(100, 100, [0, 0, 0]);
        let result =
            FaceOnlyDetector::new(0.60).check_face_only(&img, Some(FaceBox::new(0, 0, 60, 100)));
        assert_eq!(result.face_area_ratio, 0.60);
        assert!(!result.is_just_face);
    }

    #[test]
    fn no_face_is_not_face_only() {
        let img = Image::solid(100, 100, [0, 0, 0]);
        let result = FaceOnlyDetector::new(0.60).check_face_only(&img, None);
        assert_eq!(result.face_area_ratio, 0.0);
        assert!(!result.is_just_face);
        assert!(!result.face_found);
    }

    #[test]
    fn box_overhanging_the_frame_is_clipped() {
        let img = Image::solid(100, 100, [0, 0, 0]);
        let result = FaceOnlyDetector::new(0.60)
            .check_face_only(&img, Some(FaceBox::new(50, 50, 500, 500)));
        assert_eq!(result.face_area_ratio, 0.25);
    }
}

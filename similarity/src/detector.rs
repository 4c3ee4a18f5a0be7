//! Fusing the scorers into a duplicate verdict.

use crate::methods::{DifferenceHashScorer, HistogramScorer, PixelDiffScorer, SsimScorer};
use crate::scorer::{fuse, PreparedImage, WeightedScorer};
use idv_types::{Image, SimilarityResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compares images and decides whether they are duplicates.
pub struct ImageSimilarityDetector {
    scorers: Vec<WeightedScorer>,
    threshold: f64,
}

impl ImageSimilarityDetector {
    /// The standard scorer set: SSIM 0.40, histogram 0.25, pixel
    /// difference 0.20, perceptual hash 0.15.
    pub fn new(threshold: f64) -> Self {
        Self::with_scorers(
            threshold,
            vec![
                WeightedScorer::new(SsimScorer::default(), 0.40),
                WeightedScorer::new(HistogramScorer::default(), 0.25),
                WeightedScorer::new(PixelDiffScorer, 0.20),
                WeightedScorer::new(DifferenceHashScorer, 0.15),
            ],
        )
    }

    /// A detector over a custom ordered scorer set. Weights should sum to 1.
    pub fn with_scorers(threshold: f64, scorers: Vec<WeightedScorer>) -> Self {
        Self { scorers, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare two images of any size; both are resampled to the common
    /// canvas first.
    pub fn compare(&self, a: &Image, b: &Image) -> SimilarityResult {
        self.compare_prepared(&PreparedImage::new(a), &PreparedImage::new(b))
    }

    pub fn compare_prepared(&self, a: &PreparedImage, b: &PreparedImage) -> SimilarityResult {
        let sub_scores: Vec<_> = self.scorers.iter().map(|s| s.evaluate(a, b)).collect();
        let fused_score = fuse(&sub_scores);
        let is_duplicate = fused_score >= self.threshold;
        debug!(fused_score, is_duplicate, threshold = self.threshold, "similarity compared");
        SimilarityResult {
            fused_score,
            sub_scores,
            is_duplicate,
            threshold_used: self.threshold,
        }
    }

    /// Compare every pair in a batch and report the duplicates.
    pub fn check_uniqueness(&self, images: &[Image]) -> UniquenessReport {
        let prepared: Vec<_> = images.iter().map(PreparedImage::new).collect();
        let mut duplicates = Vec::new();
        let mut total_comparisons = 0;
        for i in 0..prepared.len() {
            for j in i + 1..prepared.len() {
                total_comparisons += 1;
                let result = self.compare_prepared(&prepared[i], &prepared[j]);
                if result.is_duplicate {
                    duplicates.push(DuplicatePair {
                        first: i,
                        second: j,
                        similarity: result.fused_score,
                    });
                }
            }
        }
        UniquenessReport {
            all_unique: duplicates.is_empty(),
            duplicates,
            total_comparisons,
        }
    }
}

/// Two batch members judged to be the same picture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub first: usize,
    pub second: usize,
    pub similarity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniquenessReport {
    pub all_unique: bool,
    pub duplicates: Vec<DuplicatePair>,
    /// `n * (n - 1) / 2` for a batch of `n`.
    pub total_comparisons: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portrait(seed: u8) -> Image {
        let mut img = Image::solid(240, 320, [200, 190, 180]);
        img.fill_rect(60, 60, 120, 160, [150 + seed, 110, 90]);
        img.fill_rect(90, 110, 20, 10, [30, 30, 30]);
        img.fill_rect(130, 110, 20, 10, [30, 30, 30]);
        img.fill_rect(100, 180, 40, 8, [120, 40, 40]);
        img
    }

    fn card() -> Image {
        let mut img = Image::solid(400, 260, [30, 30, 30]);
        img.fill_rect(40, 30, 320, 200, [120, 140, 160]);
        img.fill_rect(60, 60, 75, 90, [90, 70, 60]);
        for row in 0..4 {
            img.fill_rect(160, 60 + row * 20, 160, 4, [20, 20, 20]);
        }
        img
    }

    #[test]
    fn identical_images_are_duplicates() {
        let detector = ImageSimilarityDetector::new(0.95);
        let img = portrait(0);
        let result = detector.compare(&img, &img);
        assert!(result.fused_score >= 0.99);
        assert!(result.is_duplicate);
        assert_eq!(result.sub_scores.len(), 4);
        assert_eq!(result.sub_score("ssim"), Some(1.0));
    }

    #[test]
    fn rescaled_copy_is_still_a_duplicate() {
        let detector = ImageSimilarityDetector::new(0.95);
        let img = portrait(0);
        let canvas = idv_imaging::RgbBuffer::from_image(&img).resize(480, 640);
        let big = Image::new(
            480,
            640,
            idv_types::PixelFormat::Rgb8,
            canvas.as_slice().to_vec(),
        )
        .unwrap();
        assert!(detector.compare(&img, &big).is_duplicate);
    }

    #[test]
    fn card_and_portrait_are_distinct() {
        let detector = ImageSimilarityDetector::new(0.95);
        let result = detector.compare(&card(), &portrait(0));
        assert!(!result.is_duplicate);
        assert!(result.fused_score < 0.8, "fused {}", result.fused_score);
        assert_eq!(result.threshold_used, 0.95);
    }

    #[test]
    fn uniqueness_reports_each_duplicate_pair() {
        let detector = ImageSimilarityDetector::new(0.95);
        let batch = vec![portrait(0), card(), portrait(0), card()];
        let report = detector.check_uniqueness(&batch);
        assert_eq!(report.total_comparisons, 6);
        assert!(!report.all_unique);
        let pairs: Vec<_> = report
            .duplicates
            .iter()
            .map(|d| (d.first, d.second))
            .collect();
        assert_eq!(pairs, vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn tiny_batches_are_trivially_unique() {
        let detector = ImageSimilarityDetector::new(0.95);
        let report = detector.check_uniqueness(&[card()]);
        assert!(report.all_unique);
        assert_eq!(report.total_comparisons, 0);
    }
}

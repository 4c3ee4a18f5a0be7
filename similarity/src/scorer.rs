//! The scorer seam and the weighted-sum reducer.

use idv_imaging::{GrayBuffer, RgbBuffer};
use idv_types::{Image, MethodScore};

/// Side length of the square canvas both images are resampled to before
/// any scorer runs. Scorers may assume equal dimensions.
pub const COMPARISON_CANVAS: usize = 256;

/// An image resampled onto the comparison canvas, in both colour and luma.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub rgb: RgbBuffer,
    pub gray: GrayBuffer,
}

impl PreparedImage {
    pub fn new(image: &Image) -> Self {
        let rgb = RgbBuffer::from_image(image).resize(COMPARISON_CANVAS, COMPARISON_CANVAS);
        let gray = rgb.to_gray();
        Self { rgb, gray }
    }
}

/// One similarity metric.
pub trait SimilarityScorer: Send + Sync {
    /// Stable name reported in [`MethodScore::method`].
    fn name(&self) -> &'static str;

    /// Similarity in `[0, 1]`, 1 meaning indistinguishable.
    fn score(&self, a: &PreparedImage, b: &PreparedImage) -> f64;
}

/// A scorer and its share of the fused score.
pub struct WeightedScorer {
    pub scorer: Box<dyn SimilarityScorer>,
    pub weight: f64,
}

impl WeightedScorer {
    pub fn new(scorer: impl SimilarityScorer + 'static, weight: f64) -> Self {
        Self {
            scorer: Box::new(scorer),
            weight,
        }
    }

    pub fn evaluate(&self, a: &PreparedImage, b: &PreparedImage) -> MethodScore {
        MethodScore {
            method: self.scorer.name().to_string(),
            score: self.scorer.score(a, b).clamp(0.0, 1.0),
            weight: self.weight,
        }
    }
}

/// Weighted sum of method scores, clamped to `[0, 1]`.
pub fn fuse(scores: &[MethodScore]) -> f64 {
    scores
        .iter()
        .map(|m| m.weight * m.score)
        .sum::<f64>()
        .clamp(0.0, 1.0)
}

//! Image Similarity Detector.
//!
//! Flags a document and selfie that are the same (or nearly the same)
//! picture. Four independent scorers each return a value in `[0, 1]`; a
//! weighted-sum reducer fuses them, and the pair is a duplicate when the
//! fused score reaches the configured threshold.
//!
//! There is no rotation or crop invariance: a rotated or tightly re-cropped
//! copy of the same photo will usually score below the threshold.

pub mod detector;
pub mod methods;
pub mod scorer;

pub use detector::{DuplicatePair, ImageSimilarityDetector, UniquenessReport};
pub use methods::{DifferenceHashScorer, HistogramScorer, PixelDiffScorer, SsimScorer};
pub use scorer::{fuse, PreparedImage, SimilarityScorer, WeightedScorer, COMPARISON_CANVAS};

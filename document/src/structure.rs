//! Document Structure Validator.

use crate::features::{self, EdgeMap};
use idv_imaging::{RgbBuffer, WORKING_CANVAS_MAX};
use idv_types::{DocumentDiagnostics, DocumentFeatures, DocumentStructureResult, Image};
use tracing::debug;

/// Scores how much an image looks like an identity document.
#[derive(Clone, Debug)]
pub struct DocumentStructureValidator {
    threshold: f64,
}

impl DocumentStructureValidator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run all five feature checks on a downscaled working copy.
    pub fn assess(&self, image: &Image) -> DocumentStructureResult {
        let rgb = RgbBuffer::from_image(image).fit_within(WORKING_CANVAS_MAX);
        let gray = rgb.to_gray();
        let edges = EdgeMap::new(&gray);

        let rectangles_found = features::card_outlines(&edges);
        let text_region_count = features::text_lines(&gray);
        let specular_ratio = features::specular_share(&rgb);
        let photo_candidates = features::photo_candidates(&edges);
        let aspect_ratio = image.aspect_ratio();

        let found = DocumentFeatures {
            card_edges: rectangles_found > 0,
            text_regions: features::has_text(text_region_count),
            security_features: features::has_security_features(specular_ratio),
            photo_region: photo_candidates > 0,
            aspect_ratio_valid: features::is_document_shaped(aspect_ratio),
        };
        let confidence = weighted_confidence(&found);
        let has_document = confidence >= self.threshold;

        debug!(
            confidence,
            has_document,
            card_edges = found.card_edges,
            text_regions = found.text_regions,
            security_features = found.security_features,
            photo_region = found.photo_region,
            aspect_ratio_valid = found.aspect_ratio_valid,
            "document structure assessed"
        );

        DocumentStructureResult {
            has_document,
            confidence,
            features: found,
            diagnostics: DocumentDiagnostics {
                rectangles_found,
                text_region_count,
                specular_ratio,
                photo_candidates,
                aspect_ratio,
            },
            threshold_used: self.threshold,
        }
    }
}

/// Sum of the weights of the features present, rounded to remove float
/// noise so threshold comparisons behave at the boundaries.
pub fn weighted_confidence(found: &DocumentFeatures) -> f64 {
    let parts = [
        (found.card_edges, features::WEIGHT_CARD_EDGES),
        (found.text_regions, features::WEIGHT_TEXT_REGIONS),
        (found.security_features, features::WEIGHT_SECURITY_FEATURES),
        (found.photo_region, features::WEIGHT_PHOTO_REGION),
        (found.aspect_ratio_valid, features::WEIGHT_ASPECT_RATIO),
    ];
    let sum: f64 = parts.iter().filter(|(on, _)| *on).map(|(_, w)| w).sum();
    (sum * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use idv_nullables::fixtures;

    #[test]
    fn synthetic_card_has_every_feature() {
        let result = DocumentStructureValidator::new(0.60).assess(&fixtures::id_card());
        assert_eq!(
            result.features,
            DocumentFeatures {
                card_edges: true,
                text_regions: true,
                security_features: true,
                photo_region: true,
                aspect_ratio_valid: true,
            }
        );
        assert_eq!(result.confidence, 1.0);
        assert!(result.has_document);
        assert!(result.diagnostics.text_region_count >= 2);
    }

    #[test]
    fn blank_square_is_not_a_document() {
        let result =
            DocumentStructureValidator::new(0.60).assess(&Image::solid(500, 500, [128, 128, 128]));
        assert_eq!(result.confidence, 0.0);
        assert!(!result.has_document);
        assert_eq!(result.threshold_used, 0.60);
    }

    #[test]
    fn face_closeup_falls_short_of_default_threshold() {
        let result = DocumentStructureValidator::new(0.60).assess(&fixtures::face_closeup());
        assert!(!result.features.card_edges);
        assert!(!result.has_document, "confidence {}", result.confidence);
    }

    #[test]
    fn threshold_is_inclusive() {
        let found = DocumentFeatures {
            card_edges: true,
            text_regions: true,
            aspect_ratio_valid: true,
            ..Default::default()
        };
        assert_eq!(weighted_confidence(&found), 0.65);
        let found = DocumentFeatures {
            card_edges: true,
            text_regions: true,
            security_features: false,
            photo_region: false,
            aspect_ratio_valid: false,
        };
        assert_eq!(weighted_confidence(&found), 0.55);
    }

    #[test]
    fn assessment_is_deterministic() {
        let validator = DocumentStructureValidator::new(0.30);
        let card = fixtures::id_card();
        assert_eq!(validator.assess(&card), validator.assess(&card));
    }
}

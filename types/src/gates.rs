//! Results of the three local gate checks.

use serde::{Deserialize, Serialize};

/// One similarity method's contribution to the fused score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodScore {
    pub method: String,
    /// Normalised to `[0, 1]`.
    pub score: f64,
    pub weight: f64,
}

/// Outcome of comparing the document image against the selfie.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    /// Weighted sum of the method scores, in `[0, 1]`.
    pub fused_score: f64,
    pub sub_scores: Vec<MethodScore>,
    pub is_duplicate: bool,
    pub threshold_used: f64,
}

impl SimilarityResult {
    /// Score of a named method, if it ran.
    pub fn sub_score(&self, method: &str) -> Option<f64> {
        self.sub_scores
            .iter()
            .find(|m| m.method == method)
            .map(|m| m.score)
    }
}

/// Which document features were found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFeatures {
    pub card_edges: bool,
    pub text_regions: bool,
    pub security_features: bool,
    pub photo_region: bool,
    pub aspect_ratio_valid: bool,
}

/// Raw measurements behind [`DocumentFeatures`], kept for audit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDiagnostics {
    pub rectangles_found: usize,
    pub text_region_count: usize,
    /// Fraction of pixels classed as specular.
    pub specular_ratio: f64,
    pub photo_candidates: usize,
    pub aspect_ratio: f64,
}

/// Outcome of the document structure check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStructureResult {
    pub has_document: bool,
    /// Weighted sum of detected features, in `[0, 1]`.
    pub confidence: f64,
    pub features: DocumentFeatures,
    pub diagnostics: DocumentDiagnostics,
    pub threshold_used: f64,
}

/// Axis-aligned face bounding box in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Area of the part of the box that lies inside a `width` x `height` image.
    pub fn clipped_area(&self, width: u32, height: u32) -> u64 {
        let x_end = self.x.saturating_add(self.width).min(width);
        let y_end = self.y.saturating_add(self.height).min(height);
        x_end.saturating_sub(self.x) as u64 * y_end.saturating_sub(self.y) as u64
    }
}

/// Outcome of the face-only check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceOnlyResult {
    pub is_just_face: bool,
    /// Face box area over image area, in `[0, 1]`. Zero when no face was found.
    pub face_area_ratio: f64,
    pub face_found: bool,
    pub threshold_used: f64,
}

/// The gates that ran for one evaluation, in order. A gate that did not run
/// (because an earlier one rejected) is `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<SimilarityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_structure: Option<DocumentStructureResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_only: Option<FaceOnlyResult>,
}

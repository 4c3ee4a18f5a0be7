//! Gate sequencing.
//!
//! Gates run in a fixed order and stop at the first rejection:
//!
//! 1. duplicate image (document vs selfie similarity)
//! 2. document structure
//! 3. face-only document, fed by the [`FaceDetector`] collaborator
//!
//! Gates 1 and 2 are pure pixel work and run together on the blocking pool.
//! The face detector is a collaborator like any other: it is isolated behind
//! a timeout, and when it fails the face-only gate passes with a warning.
//!
//! [`FaceDetector`]: idv_signals::FaceDetector

use crate::error::VerificationError;
use crate::signals::run_isolated;
use crate::spans::gate_span;
use idv_document::{DocumentStructureValidator, FaceOnlyDetector};
use idv_imaging::{QualityReport, QualityThresholds};
use idv_signals::{FaceDetector, SignalError};
use idv_similarity::ImageSimilarityDetector;
use idv_types::{
    FaceBox, GateKind, GateReport, Image, ImageRole, PolicyConfig, VerificationRequest,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn, Span};

/// What the gates concluded for one request.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateOutcome {
    /// Results of the gates that actually ran.
    pub report: GateReport,
    /// The gate that ended the evaluation, if any.
    pub rejected_by: Option<GateKind>,
    /// Capture-quality advisories and face detector failures.
    pub warnings: Vec<String>,
}

impl GateOutcome {
    pub fn passed(&self) -> bool {
        self.rejected_by.is_none()
    }
}

/// Run gates 1 and 2 plus the quality advisories. CPU-bound.
pub fn structural_gates(
    document: &Image,
    selfie: &Image,
    policy: &PolicyConfig,
    quality: &QualityThresholds,
) -> GateOutcome {
    let mut outcome = GateOutcome {
        warnings: capture_advisories(document, selfie, quality),
        ..GateOutcome::default()
    };

    let similarity = {
        let _gate = gate_span(GateKind::Similarity).entered();
        ImageSimilarityDetector::new(policy.similarity_threshold).compare(document, selfie)
    };
    debug!(
        fused = similarity.fused_score,
        duplicate = similarity.is_duplicate,
        "similarity gate"
    );
    let duplicate = similarity.is_duplicate;
    outcome.report.similarity = Some(similarity);
    if duplicate {
        outcome.rejected_by = Some(GateKind::Similarity);
        return outcome;
    }

    let structure = {
        let _gate = gate_span(GateKind::DocumentStructure).entered();
        DocumentStructureValidator::new(policy.document_threshold).assess(document)
    };
    debug!(
        confidence = structure.confidence,
        has_document = structure.has_document,
        "document structure gate"
    );
    let has_document = structure.has_document;
    outcome.report.document_structure = Some(structure);
    if !has_document {
        outcome.rejected_by = Some(GateKind::DocumentStructure);
    }
    outcome
}

/// Apply gate 3 given the face detector's answer.
///
/// A detector failure fails open: the gate passes and a warning records
/// that the check was skipped.
pub fn face_only_gate(
    outcome: &mut GateOutcome,
    document: &Image,
    located: Result<Option<FaceBox>, SignalError>,
    policy: &PolicyConfig,
) {
    let _gate = gate_span(GateKind::FaceOnly).entered();
    let face = match located {
        Ok(face) => face,
        Err(e) => {
            warn!(error = %e, "face detector failed, face-only check skipped");
            outcome
                .warnings
                .push(format!("face detector unavailable: {e}; face-only check skipped"));
            return;
        }
    };
    let result = FaceOnlyDetector::new(policy.face_only_threshold).check_face_only(document, face);
    debug!(
        ratio = result.face_area_ratio,
        face_only = result.is_just_face,
        "face-only gate"
    );
    if result.is_just_face {
        outcome.rejected_by = Some(GateKind::FaceOnly);
    }
    outcome.report.face_only = Some(result);
}

/// Run all three gates for a request.
pub async fn run_gates(
    request: &VerificationRequest,
    policy: Arc<PolicyConfig>,
    quality: QualityThresholds,
    face_detector: Arc<dyn FaceDetector>,
    limit: Duration,
) -> Result<GateOutcome, VerificationError> {
    let mut outcome = {
        let document = request.document.clone();
        let selfie = request.selfie.clone();
        let policy = policy.clone();
        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            structural_gates(&document, &selfie, &policy, &quality)
        })
        .await
        .map_err(|e| VerificationError::Internal(format!("gate task failed: {e}")))?
    };
    if !outcome.passed() {
        return Ok(outcome);
    }

    let located = {
        let document = request.document.clone();
        run_isolated(limit, move || face_detector.locate(&document)).await
    };
    face_only_gate(&mut outcome, &request.document, located, &policy);
    Ok(outcome)
}

fn capture_advisories(document: &Image, selfie: &Image, limits: &QualityThresholds) -> Vec<String> {
    let mut out = QualityReport::measure(document).advisories(ImageRole::Document, limits);
    out.extend(QualityReport::measure(selfie).advisories(ImageRole::Selfie, limits));
    out
}

//! The structured decision returned for every evaluation.

use crate::gates::GateReport;
use crate::request::RequestId;
use crate::signal::{SignalName, SignalScore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal decision tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Approved,
    ManualReview,
    Rejected,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Approved => "approved",
            DecisionStatus::ManualReview => "manual_review",
            DecisionStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a request was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Document and selfie are the same or near-identical picture.
    #[serde(rename = "duplicate-image-fraud")]
    DuplicateImage,
    #[serde(rename = "no-document-structure")]
    NoDocumentStructure,
    /// The "document" is a close-up face with no card around it.
    #[serde(rename = "face-only-document")]
    FaceOnlyDocument,
    /// Signals were collected but the aggregate fell below the review tier.
    #[serde(rename = "aggregate-confidence-low")]
    LowConfidence,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::DuplicateImage => "duplicate-image-fraud",
            RejectionReason::NoDocumentStructure => "no-document-structure",
            RejectionReason::FaceOnlyDocument => "face-only-document",
            RejectionReason::LowConfidence => "aggregate-confidence-low",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The local gates, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    Similarity,
    DocumentStructure,
    FaceOnly,
}

impl GateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::Similarity => "similarity",
            GateKind::DocumentStructure => "document_structure",
            GateKind::FaceOnly => "face_only",
        }
    }

    /// The rejection a failing gate produces.
    pub fn rejection_reason(&self) -> RejectionReason {
        match self {
            GateKind::Similarity => RejectionReason::DuplicateImage,
            GateKind::DocumentStructure => RejectionReason::NoDocumentStructure,
            GateKind::FaceOnly => RejectionReason::FaceOnlyDocument,
        }
    }
}

/// What produced the final status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "gate")]
pub enum DecisionOrigin {
    /// A gate short-circuited the pipeline.
    Gate(GateKind),
    /// The decision policy scored collected signals.
    Policy,
}

/// Confidence band of a single signal against its thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Low => "low",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::High => "high",
        }
    }
}

/// Per-signal pass/fail detail attached to every policy decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalCheck {
    pub name: SignalName,
    pub passed: bool,
    pub tier: ConfidenceTier,
    /// Normalised score the check was made on (0 when unavailable).
    pub score: f64,
    /// Weighted contribution to the aggregate.
    pub contribution: f64,
}

/// The engine's answer for one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDecision {
    pub request_id: RequestId,
    pub status: DecisionStatus,
    /// Aggregate confidence in `[0, 100]`. Always zero for gate rejections.
    pub overall_confidence: f64,
    pub signals: Vec<SignalScore>,
    pub checks: Vec<SignalCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
    pub warnings: Vec<String>,
    pub message: String,
    pub origin: DecisionOrigin,
    pub gates: GateReport,
}

impl VerificationDecision {
    pub fn is_approved(&self) -> bool {
        self.status == DecisionStatus::Approved
    }

    pub fn is_rejected(&self) -> bool {
        self.status == DecisionStatus::Rejected
    }

    /// True when a gate, not the policy, ended the evaluation.
    pub fn rejected_by_gate(&self) -> bool {
        matches!(self.origin, DecisionOrigin::Gate(_))
    }

    /// The collected score for a signal, if signals were collected.
    pub fn signal(&self, name: SignalName) -> Option<&SignalScore> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// Whether any warning contains `needle`.
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(needle))
    }
}

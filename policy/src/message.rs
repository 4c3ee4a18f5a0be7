//! Human-readable decision messages.

use idv_types::{DecisionStatus, RejectionReason};

pub fn policy_message(status: DecisionStatus, overall_confidence: f64) -> String {
    match status {
        DecisionStatus::Approved => {
            format!("Identity verified (confidence: {overall_confidence:.1}%)")
        }
        DecisionStatus::ManualReview => {
            format!("Manual review required (confidence: {overall_confidence:.1}%)")
        }
        DecisionStatus::Rejected => {
            format!("Verification failed (confidence: {overall_confidence:.1}%)")
        }
    }
}

pub fn gate_message(reason: RejectionReason) -> String {
    let detail = match reason {
        RejectionReason::DuplicateImage => "the document and selfie are the same image",
        RejectionReason::NoDocumentStructure => {
            "the document image does not show an identity document"
        }
        RejectionReason::FaceOnlyDocument => "the document image shows only a face",
        RejectionReason::LowConfidence => "aggregate confidence is too low",
    };
    format!("Verification failed: {detail} ({reason})")
}

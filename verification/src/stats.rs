//! Outcome counters.

use idv_types::{DecisionOrigin, DecisionStatus, GateKind, VerificationDecision};
use idv_utils::StatsCounter;
use std::collections::BTreeMap;

pub const EVALUATIONS: &str = "evaluations";
pub const APPROVED: &str = "approved";
pub const MANUAL_REVIEW: &str = "manual_review";
pub const REJECTED: &str = "rejected";
pub const GATE_SIMILARITY: &str = "gate_similarity";
pub const GATE_DOCUMENT_STRUCTURE: &str = "gate_document_structure";
pub const GATE_FACE_ONLY: &str = "gate_face_only";
pub const SIGNALS_UNAVAILABLE: &str = "signals_unavailable";
pub const INPUT_ERRORS: &str = "input_errors";
pub const CANCELLED: &str = "cancelled";

/// Running totals of what the engine has decided.
pub struct OutcomeStats {
    counters: StatsCounter,
}

impl OutcomeStats {
    pub fn new() -> Self {
        Self {
            counters: StatsCounter::new(&[
                EVALUATIONS,
                APPROVED,
                MANUAL_REVIEW,
                REJECTED,
                GATE_SIMILARITY,
                GATE_DOCUMENT_STRUCTURE,
                GATE_FACE_ONLY,
                SIGNALS_UNAVAILABLE,
                INPUT_ERRORS,
                CANCELLED,
            ]),
        }
    }

    pub fn record_decision(&self, decision: &VerificationDecision) {
        self.counters.increment(EVALUATIONS);
        self.counters.increment(match decision.status {
            DecisionStatus::Approved => APPROVED,
            DecisionStatus::ManualReview => MANUAL_REVIEW,
            DecisionStatus::Rejected => REJECTED,
        });
        if let DecisionOrigin::Gate(gate) = decision.origin {
            self.counters.increment(match gate {
                GateKind::Similarity => GATE_SIMILARITY,
                GateKind::DocumentStructure => GATE_DOCUMENT_STRUCTURE,
                GateKind::FaceOnly => GATE_FACE_ONLY,
            });
        }
        let unavailable = decision.signals.iter().filter(|s| !s.available).count();
        self.counters.add(SIGNALS_UNAVAILABLE, unavailable as u64);
    }

    pub fn record_input_error(&self) {
        self.counters.increment(INPUT_ERRORS);
    }

    pub fn record_cancelled(&self) {
        self.counters.increment(CANCELLED);
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name)
    }

    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.counters.snapshot()
    }
}

impl Default for OutcomeStats {
    fn default() -> Self {
        Self::new()
    }
}

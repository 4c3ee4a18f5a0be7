//! Evaluation phase tracking.

use crate::error::VerificationError;
use idv_types::{DecisionStatus, GateKind};
use serde::Serialize;

/// Where an evaluation is in its lifecycle.
///
/// ```text
/// Pending ──► RejectedAtGate(gate)
///    │
///    └──────► SignalsCollected ──► Decided(status)
/// ```
///
/// There are no backward transitions and both terminal phases carry exactly
/// one outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationPhase {
    Pending,
    RejectedAtGate(GateKind),
    SignalsCollected,
    Decided(DecisionStatus),
}

impl EvaluationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EvaluationPhase::RejectedAtGate(_) | EvaluationPhase::Decided(_)
        )
    }

    pub fn can_advance_to(&self, next: &EvaluationPhase) -> bool {
        use EvaluationPhase::*;
        matches!(
            (self, next),
            (Pending, RejectedAtGate(_)) | (Pending, SignalsCollected) | (SignalsCollected, Decided(_))
        )
    }

    /// Move to `next`, refusing any transition not in the diagram.
    pub fn advance(&mut self, next: EvaluationPhase) -> Result<(), VerificationError> {
        if !self.can_advance_to(&next) {
            return Err(VerificationError::Internal(format!(
                "illegal phase transition {self:?} -> {next:?}"
            )));
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_path_terminates() {
        let mut phase = EvaluationPhase::Pending;
        phase
            .advance(EvaluationPhase::RejectedAtGate(GateKind::Similarity))
            .unwrap();
        assert!(phase.is_terminal());
        assert!(phase.advance(EvaluationPhase::SignalsCollected).is_err());
    }

    #[test]
    fn signal_path_terminates() {
        let mut phase = EvaluationPhase::Pending;
        phase.advance(EvaluationPhase::SignalsCollected).unwrap();
        assert!(!phase.is_terminal());
        phase
            .advance(EvaluationPhase::Decided(DecisionStatus::ManualReview))
            .unwrap();
        assert!(phase.is_terminal());
    }

    #[test]
    fn no_shortcuts_or_backward_moves() {
        let mut phase = EvaluationPhase::Pending;
        assert!(phase
            .advance(EvaluationPhase::Decided(DecisionStatus::Approved))
            .is_err());
        let mut collected = EvaluationPhase::SignalsCollected;
        assert!(collected.advance(EvaluationPhase::Pending).is_err());
        assert!(collected
            .advance(EvaluationPhase::RejectedAtGate(GateKind::FaceOnly))
            .is_err());
    }
}

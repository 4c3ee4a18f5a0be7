//! The verification engine: one entry point per request.

use crate::config::EngineConfig;
use crate::error::VerificationError;
use crate::gates::{run_gates, GateOutcome};
use crate::signals::collect_signals;
use crate::spans::evaluate_span;
use crate::state::EvaluationPhase;
use crate::stats::OutcomeStats;
use idv_policy::{decide, gate_message, policy_message, PolicyStore};
use idv_signals::Collaborators;
use idv_types::{
    DecisionOrigin, DecisionStatus, GateKind, ImageRole, InputError, PolicyConfig,
    RejectionReason, Timestamp, VerificationDecision, VerificationRequest,
};
use idv_utils::format_duration;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, Instrument};

/// Evaluates verification requests against the current policy.
///
/// The engine holds no per-request state and can serve any number of
/// concurrent evaluations. Each evaluation reads one policy snapshot at the
/// start and uses it throughout, even if the policy is replaced mid-flight.
pub struct VerificationEngine {
    config: EngineConfig,
    policy: Arc<PolicyStore>,
    collaborators: Collaborators,
    stats: OutcomeStats,
}

impl VerificationEngine {
    /// Build an engine with its own policy store seeded from `config.policy`.
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Result<Self, VerificationError> {
        config.validate()?;
        let policy = Arc::new(PolicyStore::new(config.policy.clone())?);
        Ok(Self::with_policy_store(config, policy, collaborators))
    }

    /// Build an engine that reads its policy from a shared store.
    /// `config.policy` is ignored.
    pub fn with_policy_store(
        config: EngineConfig,
        policy: Arc<PolicyStore>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            config,
            policy,
            collaborators,
            stats: OutcomeStats::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The policy snapshot the next evaluation would use.
    pub fn policy(&self) -> Arc<PolicyConfig> {
        self.policy.load()
    }

    pub fn policy_store(&self) -> &Arc<PolicyStore> {
        &self.policy
    }

    /// Validate and install a new policy for subsequent evaluations.
    pub fn replace_policy(&self, policy: PolicyConfig) -> Result<Arc<PolicyConfig>, VerificationError> {
        Ok(self.policy.replace(policy)?)
    }

    /// Outcome counters since construction.
    pub fn stats(&self) -> BTreeMap<&'static str, u64> {
        self.stats.snapshot()
    }

    /// Evaluate under the current policy.
    pub async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationDecision, VerificationError> {
        let policy = self.policy.load();
        self.evaluate_under(request, policy)
            .instrument(evaluate_span(&request.request_id))
            .await
    }

    /// Evaluate under an explicit policy instead of the stored one.
    pub async fn evaluate_with_policy(
        &self,
        request: &VerificationRequest,
        policy: &PolicyConfig,
    ) -> Result<VerificationDecision, VerificationError> {
        policy.validate()?;
        self.evaluate_under(request, Arc::new(policy.clone()))
            .instrument(evaluate_span(&request.request_id))
            .await
    }

    /// Evaluate, giving up as soon as `shutdown` fires.
    ///
    /// Signal tasks still queued are aborted. A closed channel without a
    /// signal lets the evaluation finish.
    pub async fn evaluate_with_shutdown(
        &self,
        request: &VerificationRequest,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<VerificationDecision, VerificationError> {
        let evaluation = self.evaluate(request);
        tokio::pin!(evaluation);
        tokio::select! {
            result = &mut evaluation => result,
            signal = shutdown.recv() => match signal {
                Err(RecvError::Closed) => evaluation.await,
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    info!(request_id = %request.request_id, "evaluation cancelled");
                    self.stats.record_cancelled();
                    Err(VerificationError::Cancelled)
                }
            },
        }
    }

    /// Run only the gates under the current policy; no signal collaborator
    /// is called.
    pub async fn run_gates(
        &self,
        request: &VerificationRequest,
    ) -> Result<GateOutcome, VerificationError> {
        self.check_input(request)?;
        run_gates(
            request,
            self.policy.load(),
            self.config.quality.clone(),
            self.collaborators.face_detector.clone(),
            self.config.signal_timeout(),
        )
        .instrument(evaluate_span(&request.request_id))
        .await
    }

    async fn evaluate_under(
        &self,
        request: &VerificationRequest,
        policy: Arc<PolicyConfig>,
    ) -> Result<VerificationDecision, VerificationError> {
        let started = Instant::now();
        if let Err(e) = self.check_input(request) {
            self.stats.record_input_error();
            return Err(e.into());
        }
        info!(
            document = %format!("{}x{}", request.document.width(), request.document.height()),
            selfie = %format!("{}x{}", request.selfie.width(), request.selfie.height()),
            age_secs = request.received_at.elapsed_since(Timestamp::now()),
            "evaluation started"
        );

        let mut phase = EvaluationPhase::Pending;
        let gates = run_gates(
            request,
            policy.clone(),
            self.config.quality.clone(),
            self.collaborators.face_detector.clone(),
            self.config.signal_timeout(),
        )
        .await?;

        let decision = match gates.rejected_by {
            Some(gate) => {
                phase.advance(EvaluationPhase::RejectedAtGate(gate))?;
                gate_decision(request, gate, gates)
            }
            None => {
                let signals =
                    collect_signals(request, &self.collaborators, self.config.signal_timeout())
                        .await;
                phase.advance(EvaluationPhase::SignalsCollected)?;
                let outcome = decide(&signals, &policy);
                phase.advance(EvaluationPhase::Decided(outcome.status))?;

                let mut warnings = outcome.warnings;
                warnings.extend(gates.warnings);
                VerificationDecision {
                    request_id: request.request_id.clone(),
                    status: outcome.status,
                    overall_confidence: outcome.overall_confidence,
                    signals,
                    checks: outcome.checks,
                    rejection_reason: (outcome.status == DecisionStatus::Rejected)
                        .then_some(RejectionReason::LowConfidence),
                    warnings,
                    message: policy_message(outcome.status, outcome.overall_confidence),
                    origin: DecisionOrigin::Policy,
                    gates: gates.report,
                }
            }
        };

        self.stats.record_decision(&decision);
        info!(
            status = %decision.status,
            confidence = decision.overall_confidence,
            elapsed = %format_duration(started.elapsed()),
            "evaluation finished"
        );
        Ok(decision)
    }

    fn check_input(&self, request: &VerificationRequest) -> Result<(), InputError> {
        let (min, max) = (self.config.min_image_dimension, self.config.max_image_dimension);
        request
            .document
            .check_dimensions(ImageRole::Document, min, max)?;
        request.selfie.check_dimensions(ImageRole::Selfie, min, max)
    }
}

fn gate_decision(
    request: &VerificationRequest,
    gate: GateKind,
    gates: GateOutcome,
) -> VerificationDecision {
    let reason = gate.rejection_reason();
    VerificationDecision {
        request_id: request.request_id.clone(),
        status: DecisionStatus::Rejected,
        overall_confidence: 0.0,
        signals: Vec::new(),
        checks: Vec::new(),
        rejection_reason: Some(reason),
        warnings: gates.warnings,
        message: gate_message(reason),
        origin: DecisionOrigin::Gate(gate),
        gates: gates.report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idv_nullables::null_collaborators;

    #[test]
    fn invalid_policy_is_refused_at_construction() {
        let mut config = EngineConfig::default();
        config.policy.review_threshold = 90.0;
        let result = VerificationEngine::new(config, null_collaborators());
        assert!(matches!(result, Err(VerificationError::Config(_))));
    }

    #[test]
    fn replace_policy_validates() {
        let engine = VerificationEngine::new(EngineConfig::default(), null_collaborators()).unwrap();
        let mut bad = PolicyConfig::default();
        bad.weight_deepfake = -0.1;
        assert!(engine.replace_policy(bad).is_err());
        assert_eq!(*engine.policy(), PolicyConfig::default());

        engine
            .replace_policy(PolicyConfig::field_calibrated())
            .unwrap();
        assert_eq!(engine.policy().document_threshold, 0.30);
    }

    #[test]
    fn shared_store_is_seen_by_every_engine() {
        let store = Arc::new(PolicyStore::default());
        let a = VerificationEngine::with_policy_store(
            EngineConfig::default(),
            store.clone(),
            null_collaborators(),
        );
        let b = VerificationEngine::with_policy_store(
            EngineConfig::default(),
            store.clone(),
            null_collaborators(),
        );
        a.replace_policy(PolicyConfig::field_calibrated()).unwrap();
        assert_eq!(b.policy().document_threshold, 0.30);
    }
}

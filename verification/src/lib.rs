//! Verification Orchestrator.
//!
//! Turns a document image and a selfie into a [`VerificationDecision`]:
//!
//! 1. **Gates**: duplicate-image, document-structure and face-only checks,
//!    in that order. The first gate that fails ends the evaluation with a
//!    `Rejected` decision and no signal collaborator is called.
//! 2. **Signals**: liveness, face match, document authenticity and deepfake
//!    collaborators run concurrently, each isolated behind its own timeout.
//!    A failing collaborator only degrades its own signal.
//! 3. **Policy**: the collected scores are aggregated under the current
//!    [`idv_types::PolicyConfig`] snapshot.
//!
//! Only malformed input is returned as an error; every other path yields a
//! decision.
//!
//! [`VerificationDecision`]: idv_types::VerificationDecision

pub mod config;
pub mod engine;
pub mod error;
pub mod gates;
pub mod signals;
pub mod spans;
pub mod state;
pub mod stats;

pub use config::EngineConfig;
pub use engine::VerificationEngine;
pub use error::VerificationError;
pub use gates::GateOutcome;
pub use state::EvaluationPhase;
pub use stats::OutcomeStats;

use idv_types::SignalName;
use thiserror::Error;

/// Why a collaborator produced no usable signal.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SignalError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("model failure: {0}")]
    ModelFailure(String),

    #[error("invalid {signal} output: {reason}")]
    InvalidOutput { signal: SignalName, reason: String },

    #[error("timed out after {after_ms}ms")]
    TimedOut { after_ms: u64 },

    #[error("task aborted: {0}")]
    Aborted(String),
}

impl SignalError {
    pub fn invalid(signal: SignalName, reason: impl Into<String>) -> Self {
        Self::InvalidOutput {
            signal,
            reason: reason.into(),
        }
    }
}

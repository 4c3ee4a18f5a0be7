//! Span constructors, so field names stay consistent across the engine.

use idv_types::{GateKind, RequestId, SignalName};
use tracing::{debug_span, info_span, Span};

/// Span covering one full evaluation.
pub fn evaluate_span(request_id: &RequestId) -> Span {
    info_span!("evaluate", request_id = %request_id)
}

/// Span covering a single gate check.
pub fn gate_span(gate: GateKind) -> Span {
    debug_span!("gate", gate = gate.as_str())
}

/// Span covering one collaborator call.
pub fn signal_span(signal: SignalName) -> Span {
    debug_span!("signal", signal = signal.as_str())
}

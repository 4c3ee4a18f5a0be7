//! Concurrent, isolated signal collection.
//!
//! Each collaborator call runs on the blocking pool under its own timeout.
//! Whatever goes wrong inside one call (an error, a panic, a hang, or an
//! out-of-range report) turns into an unavailable [`SignalScore`] for that
//! signal alone; siblings keep running.

use crate::spans::signal_span;
use idv_signals::{
    Collaborators, DeepfakeDetector, DocumentAuthenticator, FaceMatcher, LivenessDetector,
    SignalError, SignalReport,
};
use idv_types::{SignalName, SignalScore, VerificationRequest};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

/// Aborts the wrapped task when dropped, so abandoned evaluations do not
/// leave queued collaborator calls behind.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run a blocking collaborator call with panic capture and a deadline.
pub async fn run_isolated<T, F>(limit: Duration, call: F) -> Result<T, SignalError>
where
    F: FnOnce() -> Result<T, SignalError> + Send + 'static,
    T: Send + 'static,
{
    let mut task = AbortOnDrop(tokio::task::spawn_blocking(call));
    match tokio::time::timeout(limit, &mut task.0).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) if join.is_panic() => {
            Err(SignalError::Aborted("collaborator panicked".to_string()))
        }
        Ok(Err(join)) => Err(SignalError::Aborted(join.to_string())),
        Err(_) => Err(SignalError::TimedOut {
            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Call one collaborator and normalise its report.
async fn collect<R, F>(limit: Duration, call: F) -> SignalScore
where
    R: SignalReport,
    F: FnOnce() -> Result<R, SignalError> + Send + 'static,
{
    match run_isolated(limit, call).await.and_then(|report| report.normalize()) {
        Ok(score) => {
            debug!(signal = %R::NAME, score = score.normalized_score, "signal collected");
            score
        }
        Err(e) => {
            warn!(signal = %R::NAME, error = %e, "signal unavailable");
            SignalScore::unavailable(R::NAME, e.to_string())
        }
    }
}

/// Invoke all four signal collaborators concurrently.
///
/// Latency is that of the slowest call, bounded by `limit`. The result holds
/// one score per signal in canonical order.
pub async fn collect_signals(
    request: &VerificationRequest,
    collaborators: &Collaborators,
    limit: Duration,
) -> Vec<SignalScore> {
    let liveness = {
        let detector = collaborators.liveness.clone();
        let selfie = request.selfie.clone();
        collect(limit, move || detector.check(&selfie))
            .instrument(signal_span(SignalName::Liveness))
    };
    let face_match = {
        let matcher = collaborators.face_matcher.clone();
        let document = request.document.clone();
        let selfie = request.selfie.clone();
        collect(limit, move || matcher.compare(&document, &selfie))
            .instrument(signal_span(SignalName::FaceMatch))
    };
    let document_authenticity = {
        let authenticator = collaborators.document_authenticator.clone();
        let document = request.document.clone();
        collect(limit, move || authenticator.check(&document))
            .instrument(signal_span(SignalName::DocumentAuthenticity))
    };
    let deepfake = {
        let detector = collaborators.deepfake.clone();
        let selfie = request.selfie.clone();
        collect(limit, move || detector.classify(&selfie))
            .instrument(signal_span(SignalName::Deepfake))
    };

    let (liveness, face_match, document_authenticity, deepfake) =
        tokio::join!(liveness, face_match, document_authenticity, deepfake);
    vec![liveness, face_match, document_authenticity, deepfake]
}

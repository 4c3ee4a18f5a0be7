//! Nullable signal collaborators.

use idv_signals::{
    Collaborators, DeepfakeDetector, DeepfakeReport, DocumentAuthReport, DocumentAuthenticator,
    FaceDetector, FaceMatchReport, FaceMatcher, LivenessDetector, LivenessReport, SignalError,
};
use idv_types::{FaceBox, Image};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a nullable does when called.
#[derive(Clone, Debug)]
pub enum Behaviour<R> {
    Respond(R),
    Fail(SignalError),
    /// Panic inside the call, as a crashing model binding would.
    Panic,
}

/// A programmable collaborator returning `R`.
///
/// Calls block the current thread for `delay` before answering, which is
/// how tests simulate slow models.
pub struct NullSignal<R> {
    behaviour: Mutex<Behaviour<R>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl<R: Clone> NullSignal<R> {
    pub fn responding(report: R) -> Self {
        Self::with_behaviour(Behaviour::Respond(report))
    }

    pub fn failing(error: SignalError) -> Self {
        Self::with_behaviour(Behaviour::Fail(error))
    }

    pub fn panicking() -> Self {
        Self::with_behaviour(Behaviour::Panic)
    }

    pub fn with_behaviour(behaviour: Behaviour<R>) -> Self {
        Self {
            behaviour: Mutex::new(behaviour),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Stall every call by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Change the response for subsequent calls.
    pub fn set_behaviour(&self, behaviour: Behaviour<R>) {
        if let Ok(mut current) = self.behaviour.lock() {
            *current = behaviour;
        }
    }

    /// How many times the collaborator has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn invoke(&self) -> Result<R, SignalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let behaviour = self
            .behaviour
            .lock()
            .map(|b| b.clone())
            .map_err(|_| SignalError::Aborted("nullable state poisoned".into()))?;
        match behaviour {
            Behaviour::Respond(report) => Ok(report),
            Behaviour::Fail(error) => Err(error),
            Behaviour::Panic => panic!("nullable collaborator told to panic"),
        }
    }
}

pub type NullLiveness = NullSignal<LivenessReport>;
pub type NullFaceMatcher = NullSignal<FaceMatchReport>;
pub type NullDocumentAuth = NullSignal<DocumentAuthReport>;
pub type NullDeepfake = NullSignal<DeepfakeReport>;
pub type NullFaceDetector = NullSignal<Option<FaceBox>>;

impl LivenessDetector for NullLiveness {
    fn check(&self, _selfie: &Image) -> Result<LivenessReport, SignalError> {
        self.invoke()
    }
}

impl FaceMatcher for NullFaceMatcher {
    fn compare(&self, _document: &Image, _selfie: &Image) -> Result<FaceMatchReport, SignalError> {
        self.invoke()
    }
}

impl DocumentAuthenticator for NullDocumentAuth {
    fn check(&self, _document: &Image) -> Result<DocumentAuthReport, SignalError> {
        self.invoke()
    }
}

impl DeepfakeDetector for NullDeepfake {
    fn classify(&self, _image: &Image) -> Result<DeepfakeReport, SignalError> {
        self.invoke()
    }
}

impl FaceDetector for NullFaceDetector {
    fn locate(&self, _image: &Image) -> Result<Option<FaceBox>, SignalError> {
        self.invoke()
    }
}

// ── Ready-made reports ──────────────────────────────────────────────────

impl NullLiveness {
    /// A live selfie with the given score in `[0, 1]`.
    pub fn live(score: f64) -> Self {
        Self::responding(LivenessReport {
            is_live: true,
            score,
            sub_checks: BTreeMap::from([
                ("blink".to_string(), true),
                ("texture".to_string(), true),
            ]),
        })
    }
}

impl NullFaceMatcher {
    /// A report consistent with a 0.5 distance tolerance: confidence is
    /// `(1 − distance) × 100`, matched when distance is within tolerance.
    pub fn confidence(percent: f64) -> Self {
        let distance = 1.0 - percent / 100.0;
        Self::responding(FaceMatchReport {
            matched: distance <= 0.5,
            confidence_percent: percent,
            distance,
        })
    }
}

impl NullDocumentAuth {
    pub fn authentic(score: f64) -> Self {
        Self::responding(DocumentAuthReport {
            authenticity_score: score,
            tamper_flags: Vec::new(),
            expired: false,
        })
    }
}

impl NullDeepfake {
    /// Classified real with the given confidence in `[0, 1]`.
    pub fn real(confidence: f64) -> Self {
        Self::responding(DeepfakeReport {
            is_fake: false,
            confidence,
        })
    }
}

impl NullFaceDetector {
    pub fn face(face: FaceBox) -> Self {
        Self::responding(Some(face))
    }

    pub fn no_face() -> Self {
        Self::responding(None)
    }
}

/// Typed handles to one set of nullables, for call-count assertions.
#[derive(Clone)]
pub struct NullSuite {
    pub liveness: Arc<NullLiveness>,
    pub face_matcher: Arc<NullFaceMatcher>,
    pub document_auth: Arc<NullDocumentAuth>,
    pub deepfake: Arc<NullDeepfake>,
    pub face_detector: Arc<NullFaceDetector>,
}

impl NullSuite {
    /// The genuine pair: face match 85, liveness 0.90, document 80, deepfake
    /// real at 0.97, a face box covering a small part of the document.
    pub fn genuine() -> Self {
        Self {
            liveness: Arc::new(NullLiveness::live(0.90)),
            face_matcher: Arc::new(NullFaceMatcher::confidence(85.0)),
            document_auth: Arc::new(NullDocumentAuth::authentic(80.0)),
            deepfake: Arc::new(NullDeepfake::real(0.97)),
            face_detector: Arc::new(NullFaceDetector::face(FaceBox::new(110, 110, 150, 180))),
        }
    }

    pub fn with_face_matcher(mut self, matcher: NullFaceMatcher) -> Self {
        self.face_matcher = Arc::new(matcher);
        self
    }

    pub fn with_liveness(mut self, liveness: NullLiveness) -> Self {
        self.liveness = Arc::new(liveness);
        self
    }

    pub fn with_document_auth(mut self, auth: NullDocumentAuth) -> Self {
        self.document_auth = Arc::new(auth);
        self
    }

    pub fn with_deepfake(mut self, deepfake: NullDeepfake) -> Self {
        self.deepfake = Arc::new(deepfake);
        self
    }

    pub fn with_face_detector(mut self, detector: NullFaceDetector) -> Self {
        self.face_detector = Arc::new(detector);
        self
    }

    /// Calls made to the four signal collaborators (not the face detector).
    pub fn signal_calls(&self) -> usize {
        self.liveness.calls()
            + self.face_matcher.calls()
            + self.document_auth.calls()
            + self.deepfake.calls()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            liveness: self.liveness.clone(),
            face_matcher: self.face_matcher.clone(),
            document_authenticator: self.document_auth.clone(),
            deepfake: self.deepfake.clone(),
            face_detector: self.face_detector.clone(),
        }
    }
}

/// Collaborators for the genuine pair, without handles.
pub fn null_collaborators() -> Collaborators {
    NullSuite::genuine().collaborators()
}

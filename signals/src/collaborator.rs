//! Collaborator contracts.
//!
//! Calls are synchronous and may block for seconds; the orchestrator runs
//! each one on the blocking pool under a timeout. Implementations must be
//! shareable across concurrent evaluations.

use crate::error::SignalError;
use crate::report::{DeepfakeReport, DocumentAuthReport, FaceMatchReport, LivenessReport};
use idv_types::{FaceBox, Image};
use std::sync::Arc;

pub trait LivenessDetector: Send + Sync {
    fn check(&self, selfie: &Image) -> Result<LivenessReport, SignalError>;
}

pub trait FaceMatcher: Send + Sync {
    fn compare(&self, document: &Image, selfie: &Image) -> Result<FaceMatchReport, SignalError>;
}

pub trait DocumentAuthenticator: Send + Sync {
    fn check(&self, document: &Image) -> Result<DocumentAuthReport, SignalError>;
}

pub trait DeepfakeDetector: Send + Sync {
    fn classify(&self, image: &Image) -> Result<DeepfakeReport, SignalError>;
}

/// Locates the largest face in an image, feeding the face-only gate.
pub trait FaceDetector: Send + Sync {
    fn locate(&self, image: &Image) -> Result<Option<FaceBox>, SignalError>;
}

/// The full set of collaborators an engine is wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub liveness: Arc<dyn LivenessDetector>,
    pub face_matcher: Arc<dyn FaceMatcher>,
    pub document_authenticator: Arc<dyn DocumentAuthenticator>,
    pub deepfake: Arc<dyn DeepfakeDetector>,
    pub face_detector: Arc<dyn FaceDetector>,
}

impl Collaborators {
    /// Wire every contract to one value that implements them all, e.g. a
    /// recorded replay.
    pub fn from_shared<T>(shared: Arc<T>) -> Self
    where
        T: LivenessDetector
            + FaceMatcher
            + DocumentAuthenticator
            + DeepfakeDetector
            + FaceDetector
            + 'static,
    {
        Self {
            liveness: shared.clone(),
            face_matcher: shared.clone(),
            document_authenticator: shared.clone(),
            deepfake: shared.clone(),
            face_detector: shared,
        }
    }
}

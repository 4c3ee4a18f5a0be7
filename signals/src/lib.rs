//! External signal collaborators.
//!
//! The engine does not know how liveness, face matching, document
//! authenticity or deepfake detection are computed. It only knows the
//! contracts in [`collaborator`], the report shapes in [`report`], and how
//! each report maps onto the common 0–100 [`idv_types::SignalScore`] scale
//! ([`normalize`]).

pub mod collaborator;
pub mod error;
pub mod normalize;
pub mod replay;
pub mod report;

pub use collaborator::{
    Collaborators, DeepfakeDetector, DocumentAuthenticator, FaceDetector, FaceMatcher,
    LivenessDetector,
};
pub use error::SignalError;
pub use normalize::SignalReport;
pub use replay::{Recorded, RecordedSignals};
pub use report::{DeepfakeReport, DocumentAuthReport, FaceMatchReport, LivenessReport};

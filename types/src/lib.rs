//! Fundamental types for the identity verification engine.
//!
//! This crate defines the data model shared across every other crate in the
//! workspace: decoded images, requests, gate results, signal scores, the
//! policy configuration, and the final decision.

pub mod decision;
pub mod error;
pub mod gates;
pub mod image;
pub mod params;
pub mod request;
pub mod signal;
pub mod time;

pub use decision::{
    ConfidenceTier, DecisionOrigin, DecisionStatus, GateKind, RejectionReason, SignalCheck,
    VerificationDecision,
};
pub use error::{ConfigError, InputError};
pub use gates::{
    DocumentDiagnostics, DocumentFeatures, DocumentStructureResult, FaceBox, FaceOnlyResult,
    GateReport, MethodScore, SimilarityResult,
};
pub use image::{Image, ImageRole, PixelFormat};
pub use params::{PolicyConfig, SignalTier};
pub use request::{RequestId, VerificationRequest, VerificationRequestBuilder};
pub use signal::{SignalName, SignalScore};
pub use time::Timestamp;

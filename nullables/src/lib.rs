//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator the engine talks to is a trait. This crate
//! provides test-friendly implementations that:
//! - Return a fixed, programmable report
//! - Count how often they were called
//! - Can be told to fail, panic, or stall
//!
//! It also draws the synthetic images the gate and engine tests run on.
//!
//! Usage: swap real collaborators for nullables in tests.

pub mod collaborators;
pub mod fixtures;

pub use collaborators::{
    null_collaborators, Behaviour, NullDeepfake, NullDocumentAuth, NullFaceDetector,
    NullFaceMatcher, NullLiveness, NullSignal, NullSuite,
};

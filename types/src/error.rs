//! Error types shared across crates.

use crate::image::ImageRole;
use crate::signal::SignalName;
use thiserror::Error;

/// A malformed, unreadable or missing image.
///
/// This is the only failure the engine surfaces to its caller; everything
/// else becomes a structured decision.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InputError {
    #[error("{0} image is missing")]
    MissingImage(ImageRole),

    #[error("image has a zero dimension ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("{role} image is too small: {width}x{height}, minimum side is {min}")]
    TooSmall {
        role: ImageRole,
        width: u32,
        height: u32,
        min: u32,
    },

    #[error("{role} image is too large: {width}x{height}, maximum side is {max}")]
    TooLarge {
        role: ImageRole,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("{role} image could not be decoded: {reason}")]
    Undecodable { role: ImageRole, reason: String },
}

/// An invalid policy or engine configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be a finite, non-negative weight, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("signal weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("approve_threshold ({approve}) must exceed review_threshold ({review})")]
    ThresholdOrder { approve: f64, review: f64 },

    #[error("{signal} pass threshold ({min}) exceeds its high threshold ({high})")]
    TierOrder { signal: SignalName, min: f64, high: f64 },

    #[error("{0}")]
    Invalid(String),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config io error: {0}")]
    Io(String),
}

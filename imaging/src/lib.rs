//! Pixel primitives for the local gates.
//!
//! Everything here is deterministic and allocation-bounded by the input size.
//! The gates work on small canonical buffers ([`RgbBuffer`], [`GrayBuffer`])
//! rather than on the caller's [`idv_types::Image`] directly, so pixel layout
//! only has to be handled once.

pub mod buffer;
pub mod color;
pub mod decode;
pub mod filters;
pub mod mask;
pub mod quality;

pub use buffer::{GrayBuffer, RgbBuffer};
pub use color::{specular_ratio, ColorHistogram, Hsv};
pub use decode::{decode, decode_file};
pub use filters::{
    adaptive_threshold_inv, edge_mask, laplacian_variance, sobel_magnitude, IntegralImage,
};
pub use mask::{Component, Mask};
pub use quality::{QualityReport, QualityThresholds};

/// Longest side of the working canvas the document checks run on.
pub const WORKING_CANVAS_MAX: usize = 800;

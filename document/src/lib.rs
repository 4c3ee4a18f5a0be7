//! Gates that decide whether the "document" image is a document at all.
//!
//! - [`DocumentStructureValidator`] scores five structural features of an
//!   identity card and accepts the image when their weighted sum reaches the
//!   configured threshold.
//! - [`FaceOnlyDetector`] rejects a document image that is mostly one face,
//!   i.e. a selfie resubmitted in the document slot.

pub mod face_only;
pub mod features;
pub mod structure;

pub use face_only::FaceOnlyDetector;
pub use structure::DocumentStructureValidator;

//! Biometric and document signals produced by external collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four independent signals aggregated by the decision policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalName {
    Liveness,
    FaceMatch,
    DocumentAuthenticity,
    Deepfake,
}

impl SignalName {
    /// Every signal, in aggregation order.
    pub const ALL: [SignalName; 4] = [
        SignalName::Liveness,
        SignalName::FaceMatch,
        SignalName::DocumentAuthenticity,
        SignalName::Deepfake,
    ];

    /// Wire name, as used in serialized decisions.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::Liveness => "liveness",
            SignalName::FaceMatch => "faceMatch",
            SignalName::DocumentAuthenticity => "documentAuthenticity",
            SignalName::Deepfake => "deepfake",
        }
    }

    /// Label used in human-readable warnings.
    pub fn label(&self) -> &'static str {
        match self {
            SignalName::Liveness => "liveness",
            SignalName::FaceMatch => "face match",
            SignalName::DocumentAuthenticity => "document authenticity",
            SignalName::Deepfake => "deepfake",
        }
    }
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One collected signal, normalised onto the 0–100 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalScore {
    pub name: SignalName,
    /// The collaborator's own figure, on its own scale.
    pub raw_score: f64,
    /// The figure the policy aggregates, in `[0, 100]`.
    pub normalized_score: f64,
    /// False when the collaborator failed, timed out, or returned garbage.
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Collaborator detail worth surfacing to a reviewer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl SignalScore {
    /// A successfully collected signal. `normalized` is clamped into `[0, 100]`.
    pub fn available(name: SignalName, raw_score: f64, normalized: f64) -> Self {
        Self {
            name,
            raw_score,
            normalized_score: normalized.clamp(0.0, 100.0),
            available: true,
            error: None,
            notes: Vec::new(),
        }
    }

    /// A signal whose collaborator could not deliver.
    pub fn unavailable(name: SignalName, error: impl Into<String>) -> Self {
        Self {
            name,
            raw_score: 0.0,
            normalized_score: 0.0,
            available: false,
            error: Some(error.into()),
            notes: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    /// What this signal adds to the aggregate before weighting.
    pub fn contribution(&self) -> f64 {
        if self.available {
            self.normalized_score
        } else {
            0.0
        }
    }
}

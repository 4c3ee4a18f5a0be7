//! What each collaborator returns, on its own scale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anti-spoofing assessment of the selfie.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivenessReport {
    pub is_live: bool,
    /// In `[0, 1]`.
    pub score: f64,
    /// Named sub-checks (blink, texture, screen glare, ...) and whether each
    /// passed.
    #[serde(default)]
    pub sub_checks: BTreeMap<String, bool>,
}

/// Biometric comparison of the document portrait with the selfie.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceMatchReport {
    /// True when `distance` is under the matcher's tolerance.
    pub matched: bool,
    /// In `[0, 100]`.
    pub confidence_percent: f64,
    /// Embedding distance, lower is closer.
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAuthReport {
    /// In `[0, 100]`.
    pub authenticity_score: f64,
    #[serde(default)]
    pub tamper_flags: Vec<String>,
    #[serde(default)]
    pub expired: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepfakeReport {
    pub is_fake: bool,
    /// Confidence in the `is_fake` verdict, in `[0, 1]`.
    pub confidence: f64,
}

//! Recorded collaborator output, replayed offline.
//!
//! A fixture holds what each collaborator said (or how it failed) for one
//! request, so a decision can be reproduced without the models:
//!
//! ```toml
//! faceBox = { x = 40, y = 60, width = 120, height = 150 }
//!
//! [liveness]
//! isLive = true
//! score = 0.9
//!
//! [faceMatch]
//! matched = true
//! confidencePercent = 85.0
//! distance = 0.15
//!
//! [deepfake]
//! error = "model offline"
//! ```
//!
//! A missing section replays as an unavailable collaborator.

use crate::collaborator::{
    DeepfakeDetector, DocumentAuthenticator, FaceDetector, FaceMatcher, LivenessDetector,
};
use crate::error::SignalError;
use crate::report::{DeepfakeReport, DocumentAuthReport, FaceMatchReport, LivenessReport};
use idv_types::{FaceBox, Image};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded outcome: a report, or the error the collaborator raised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recorded<T> {
    Failed { error: String },
    Report(T),
}

impl<T: Clone> Recorded<T> {
    fn replay(&self) -> Result<T, SignalError> {
        match self {
            Recorded::Report(report) => Ok(report.clone()),
            Recorded::Failed { error } => Err(SignalError::ModelFailure(error.clone())),
        }
    }
}

fn replay<T: Clone>(recorded: &Option<Recorded<T>>, what: &str) -> Result<T, SignalError> {
    recorded
        .as_ref()
        .ok_or_else(|| SignalError::Unavailable(format!("no recorded {what} output")))?
        .replay()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSignals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness: Option<Recorded<LivenessReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_match: Option<Recorded<FaceMatchReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_authenticity: Option<Recorded<DocumentAuthReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepfake: Option<Recorded<DeepfakeReport>>,
    /// Largest face in the document image. Absent means no face was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_box: Option<FaceBox>,
}

impl RecordedSignals {
    pub fn from_toml_str(s: &str) -> Result<Self, SignalError> {
        toml::from_str(s).map_err(|e| SignalError::Unavailable(format!("bad fixture: {e}")))
    }

    pub fn from_json_str(s: &str) -> Result<Self, SignalError> {
        serde_json::from_str(s).map_err(|e| SignalError::Unavailable(format!("bad fixture: {e}")))
    }

    /// Load a `.json` fixture, or TOML for any other extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SignalError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SignalError::Unavailable(format!("{}: {e}", path.display())))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl LivenessDetector for RecordedSignals {
    fn check(&self, _selfie: &Image) -> Result<LivenessReport, SignalError> {
        replay(&self.liveness, "liveness")
    }
}

impl FaceMatcher for RecordedSignals {
    fn compare(&self, _document: &Image, _selfie: &Image) -> Result<FaceMatchReport, SignalError> {
        replay(&self.face_match, "face match")
    }
}

impl DocumentAuthenticator for RecordedSignals {
    fn check(&self, _document: &Image) -> Result<DocumentAuthReport, SignalError> {
        replay(&self.document_authenticity, "document authenticity")
    }
}

impl DeepfakeDetector for RecordedSignals {
    fn classify(&self, _image: &Image) -> Result<DeepfakeReport, SignalError> {
        replay(&self.deepfake, "deepfake")
    }
}

impl FaceDetector for RecordedSignals {
    fn locate(&self, _image: &Image) -> Result<Option<FaceBox>, SignalError> {
        Ok(self.face_box)
    }
}

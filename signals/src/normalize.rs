//! Mapping collaborator reports onto the common 0–100 scale.
//!
//! Out-of-range or non-finite output is rejected as
//! [`SignalError::InvalidOutput`]; the orchestrator then treats the signal
//! as unavailable rather than trusting a garbage number.

use crate::error::SignalError;
use crate::report::{DeepfakeReport, DocumentAuthReport, FaceMatchReport, LivenessReport};
use idv_types::{SignalName, SignalScore};

/// A collaborator report that can be scored.
pub trait SignalReport: Send + 'static {
    const NAME: SignalName;

    fn normalize(&self) -> Result<SignalScore, SignalError>;
}

fn in_range(name: SignalName, field: &str, value: f64, max: f64) -> Result<f64, SignalError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(SignalError::invalid(
            name,
            format!("{field} {value} outside [0, {max}]"),
        ))
    }
}

impl SignalReport for LivenessReport {
    const NAME: SignalName = SignalName::Liveness;

    /// `score × 100`. Failed sub-checks become notes.
    fn normalize(&self) -> Result<SignalScore, SignalError> {
        let score = in_range(Self::NAME, "score", self.score, 1.0)?;
        let mut notes: Vec<String> = self
            .sub_checks
            .iter()
            .filter(|(_, passed)| !**passed)
            .map(|(check, _)| format!("liveness sub-check failed: {check}"))
            .collect();
        if !self.is_live {
            notes.insert(0, "liveness detector reported a spoof".to_string());
        }
        Ok(SignalScore::available(Self::NAME, score, score * 100.0).with_notes(notes))
    }
}

impl SignalReport for FaceMatchReport {
    const NAME: SignalName = SignalName::FaceMatch;

    /// `confidence_percent` when matched, otherwise zero.
    fn normalize(&self) -> Result<SignalScore, SignalError> {
        let confidence = in_range(Self::NAME, "confidencePercent", self.confidence_percent, 100.0)?;
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(SignalError::invalid(
                Self::NAME,
                format!("distance {} is not a non-negative number", self.distance),
            ));
        }
        if self.matched {
            Ok(SignalScore::available(Self::NAME, confidence, confidence))
        } else {
            Ok(SignalScore::available(Self::NAME, confidence, 0.0).with_notes(vec![format!(
                "faces did not match (distance {:.3}, confidence {:.1}%)",
                self.distance, confidence
            )]))
        }
    }
}

impl SignalReport for DocumentAuthReport {
    const NAME: SignalName = SignalName::DocumentAuthenticity;

    fn normalize(&self) -> Result<SignalScore, SignalError> {
        let score = in_range(Self::NAME, "authenticityScore", self.authenticity_score, 100.0)?;
        let mut notes: Vec<String> = self
            .tamper_flags
            .iter()
            .map(|flag| format!("document tamper flag: {flag}"))
            .collect();
        if self.expired {
            notes.push("document is expired".to_string());
        }
        Ok(SignalScore::available(Self::NAME, score, score).with_notes(notes))
    }
}

impl SignalReport for DeepfakeReport {
    const NAME: SignalName = SignalName::Deepfake;

    /// Realness: `confidence × 100` for a real verdict, `(1 − confidence) × 100`
    /// for a fake one.
    fn normalize(&self) -> Result<SignalScore, SignalError> {
        let confidence = in_range(Self::NAME, "confidence", self.confidence, 1.0)?;
        if self.is_fake {
            Ok(
                SignalScore::available(Self::NAME, confidence, (1.0 - confidence) * 100.0)
                    .with_notes(vec![format!(
                        "selfie classified as deepfake (confidence {:.2})",
                        confidence
                    )]),
            )
        } else {
            Ok(SignalScore::available(Self::NAME, confidence, confidence * 100.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn liveness_scales_and_notes_failed_checks() {
        let report = LivenessReport {
            is_live: true,
            score: 0.9,
            sub_checks: BTreeMap::from([
                ("blink".to_string(), true),
                ("screen_glare".to_string(), false),
            ]),
        };
        let score = report.normalize().unwrap();
        assert_eq!(score.normalized_score, 90.0);
        assert_eq!(score.raw_score, 0.9);
        assert_eq!(score.notes, vec!["liveness sub-check failed: screen_glare"]);
    }

    #[test]
    fn unmatched_face_earns_nothing() {
        let report = FaceMatchReport {
            matched: false,
            confidence_percent: 45.0,
            distance: 0.55,
        };
        let score = report.normalize().unwrap();
        assert!(score.available);
        assert_eq!(score.normalized_score, 0.0);
        assert_eq!(score.raw_score, 45.0);
        assert_eq!(score.notes.len(), 1);
    }

    #[test]
    fn matched_face_keeps_confidence() {
        let report = FaceMatchReport {
            matched: true,
            confidence_percent: 85.0,
            distance: 0.15,
        };
        assert_eq!(report.normalize().unwrap().normalized_score, 85.0);
    }

    #[test]
    fn deepfake_score_measures_realness() {
        let real = DeepfakeReport {
            is_fake: false,
            confidence: 0.97,
        };
        assert!((real.normalize().unwrap().normalized_score - 97.0).abs() < 1e-9);
        let fake = DeepfakeReport {
            is_fake: true,
            confidence: 0.8,
        };
        let score = fake.normalize().unwrap();
        assert!((score.normalized_score - 20.0).abs() < 1e-9);
        assert!(score.notes[0].contains("deepfake"));
    }

    #[test]
    fn document_notes_flags_and_expiry() {
        let report = DocumentAuthReport {
            authenticity_score: 62.0,
            tamper_flags: vec!["font_mismatch".into()],
            expired: true,
        };
        let score = report.normalize().unwrap();
        assert_eq!(score.normalized_score, 62.0);
        assert_eq!(
            score.notes,
            vec!["document tamper flag: font_mismatch", "document is expired"]
        );
    }

    #[test]
    fn out_of_range_output_is_invalid() {
        let bad = LivenessReport {
            is_live: true,
            score: 1.5,
            sub_checks: BTreeMap::new(),
        };
        assert!(matches!(
            bad.normalize(),
            Err(SignalError::InvalidOutput {
                signal: SignalName::Liveness,
                ..
            })
        ));
        let nan = DocumentAuthReport {
            authenticity_score: f64::NAN,
            tamper_flags: vec![],
            expired: false,
        };
        assert!(nan.normalize().is_err());
        let negative = FaceMatchReport {
            matched: true,
            confidence_percent: 80.0,
            distance: -1.0,
        };
        assert!(negative.normalize().is_err());
    }
}

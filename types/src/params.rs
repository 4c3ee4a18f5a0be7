//! Policy parameters: gate thresholds, signal weights and decision tiers.
//!
//! Every field is a plain scalar supplied from outside. The engine never
//! mutates a `PolicyConfig`; retuning replaces the whole value.

use crate::error::ConfigError;
use crate::signal::SignalName;
use serde::{Deserialize, Serialize};

/// Tolerance when checking that the signal weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Pass and high-confidence thresholds for one signal, on the 0–100 scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalTier {
    /// At or above this the signal passes.
    pub pass: f64,
    /// At or above this the signal is high confidence.
    pub high: f64,
}

/// All tunable values consumed by the gates and the decision policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    // ── Gates ────────────────────────────────────────────────────────────
    /// Fused similarity at or above which two images count as duplicates.
    pub similarity_threshold: f64,

    /// Structure confidence needed to accept an image as a document.
    /// Field data suggests 0.25–0.40 works better for cropped uploads.
    pub document_threshold: f64,

    /// Face box / image area ratio above which a "document" is just a face.
    pub face_only_threshold: f64,

    // ── Signal weights (sum to 1.0) ──────────────────────────────────────
    pub weight_face_match: f64,
    pub weight_liveness: f64,
    pub weight_document_authenticity: f64,
    /// Kept low: the deepfake classifier has been unreliable on selfies.
    pub weight_deepfake: f64,

    // ── Decision tiers (0–100) ───────────────────────────────────────────
    pub approve_threshold: f64,
    pub review_threshold: f64,

    // ── Per-signal pass / high thresholds (0–100) ────────────────────────
    pub liveness_pass: f64,
    pub liveness_high: f64,
    pub face_match_pass: f64,
    pub face_match_high: f64,
    pub document_authenticity_pass: f64,
    pub document_authenticity_high: f64,
    pub deepfake_pass: f64,
    pub deepfake_high: f64,
}

impl PolicyConfig {
    /// Starting calibration. These are a tuning surface, not a guarantee.
    pub fn calibrated_defaults() -> Self {
        Self {
            similarity_threshold: 0.95,
            document_threshold: 0.60,
            face_only_threshold: 0.60,

            weight_face_match: 0.45,
            weight_liveness: 0.25,
            weight_document_authenticity: 0.15,
            weight_deepfake: 0.15,

            approve_threshold: 75.0,
            review_threshold: 55.0,

            liveness_pass: 55.0,
            liveness_high: 75.0,
            face_match_pass: 65.0,
            face_match_high: 80.0,
            document_authenticity_pass: 50.0,
            document_authenticity_high: 70.0,
            deepfake_pass: 65.0,
            deepfake_high: 90.0,
        }
    }

    /// Defaults with the lower document threshold observed to suit real
    /// phone captures of cropped cards.
    pub fn field_calibrated() -> Self {
        Self {
            document_threshold: 0.30,
            ..Self::calibrated_defaults()
        }
    }

    /// Aggregation weight for a signal.
    pub fn weight(&self, name: SignalName) -> f64 {
        match name {
            SignalName::Liveness => self.weight_liveness,
            SignalName::FaceMatch => self.weight_face_match,
            SignalName::DocumentAuthenticity => self.weight_document_authenticity,
            SignalName::Deepfake => self.weight_deepfake,
        }
    }

    /// Pass / high thresholds for a signal.
    pub fn tier(&self, name: SignalName) -> SignalTier {
        let (pass, high) = match name {
            SignalName::Liveness => (self.liveness_pass, self.liveness_high),
            SignalName::FaceMatch => (self.face_match_pass, self.face_match_high),
            SignalName::DocumentAuthenticity => (
                self.document_authenticity_pass,
                self.document_authenticity_high,
            ),
            SignalName::Deepfake => (self.deepfake_pass, self.deepfake_high),
        };
        SignalTier { pass, high }
    }

    /// Check every range constraint. A config that fails here must never
    /// reach an evaluation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_range("similarity_threshold", self.similarity_threshold, 0.0, 1.0)?;
        unit_range("document_threshold", self.document_threshold, 0.0, 1.0)?;
        unit_range("face_only_threshold", self.face_only_threshold, 0.0, 1.0)?;

        let weights = [
            ("weight_face_match", self.weight_face_match),
            ("weight_liveness", self.weight_liveness),
            (
                "weight_document_authenticity",
                self.weight_document_authenticity,
            ),
            ("weight_deepfake", self.weight_deepfake),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }

        unit_range("approve_threshold", self.approve_threshold, 0.0, 100.0)?;
        unit_range("review_threshold", self.review_threshold, 0.0, 100.0)?;
        if self.approve_threshold <= self.review_threshold {
            return Err(ConfigError::ThresholdOrder {
                approve: self.approve_threshold,
                review: self.review_threshold,
            });
        }

        for name in SignalName::ALL {
            let tier = self.tier(name);
            unit_range("signal pass threshold", tier.pass, 0.0, 100.0)?;
            unit_range("signal high threshold", tier.high, 0.0, 100.0)?;
            if tier.pass > tier.high {
                return Err(ConfigError::TierOrder {
                    signal: name,
                    min: tier.pass,
                    high: tier.high,
                });
            }
        }
        Ok(())
    }
}

fn unit_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::calibrated_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(PolicyConfig::default().validate().is_ok());
        assert!(PolicyConfig::field_calibrated().validate().is_ok());
    }

    #[test]
    fn weights_must_sum_to_one() {
        let config = PolicyConfig {
            weight_deepfake: 0.25,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WeightSum(_))));
    }

    #[test]
    fn negative_weight_rejected() {
        let config = PolicyConfig {
            weight_face_match: -0.05,
            weight_liveness: 0.75,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight {
                name: "weight_face_match",
                ..
            })
        ));
    }

    #[test]
    fn approve_must_exceed_review() {
        let config = PolicyConfig {
            approve_threshold: 55.0,
            review_threshold: 55.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn gate_thresholds_are_unit_range() {
        let config = PolicyConfig {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "similarity_threshold",
                ..
            })
        ));
        let config = PolicyConfig {
            document_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn tier_order_enforced() {
        let config = PolicyConfig {
            liveness_pass: 80.0,
            liveness_high: 70.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TierOrder {
                signal: SignalName::Liveness,
                ..
            })
        ));
    }

    #[test]
    fn weight_lookup_matches_fields() {
        let config = PolicyConfig::default();
        let total: f64 = SignalName::ALL.iter().map(|n| config.weight(*n)).sum();
        assert!((total - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        assert_eq!(config.weight(SignalName::FaceMatch), 0.45);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: PolicyConfig =
            serde_json::from_str(r#"{"approve_threshold": 80.0}"#).unwrap();
        assert_eq!(config.approve_threshold, 80.0);
        assert_eq!(config.review_threshold, 55.0);
    }
}

//! Weighted aggregation and tier mapping.

use idv_types::{
    ConfidenceTier, DecisionStatus, PolicyConfig, SignalCheck, SignalName, SignalScore,
};
use serde::Serialize;

/// Output of [`decide`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    /// Weighted confidence in `[0, 100]`, rounded to two decimals.
    ///
    /// The status is mapped from this rounded value, so a raw 74.995
    /// reads as 75.00 and meets the default approve threshold.
    pub overall_confidence: f64,
    pub status: DecisionStatus,
    /// One check per signal, in [`SignalName::ALL`] order.
    pub checks: Vec<SignalCheck>,
    pub warnings: Vec<String>,
}

/// Aggregate `signals` under `config`.
///
/// Each of the four signals is taken from its first occurrence in
/// `signals`. A signal that is missing, unavailable, or carries a
/// non-finite score contributes zero and produces a warning.
pub fn decide(signals: &[SignalScore], config: &PolicyConfig) -> PolicyDecision {
    let mut checks = Vec::with_capacity(SignalName::ALL.len());
    let mut warnings = Vec::new();
    let mut total = 0.0;

    for name in SignalName::ALL {
        let signal = signals.iter().find(|s| s.name == name);
        let weight = config.weight(name);

        let check = match signal {
            Some(s) if s.available && s.normalized_score.is_finite() => {
                let tier = classify(s.normalized_score, config, name);
                match tier {
                    ConfidenceTier::High => {}
                    ConfidenceTier::Medium => {
                        warnings.push(format!("{} confidence is medium", name.label()))
                    }
                    ConfidenceTier::Low => warnings.push(format!("{} check failed", name.label())),
                }
                warnings.extend(s.notes.iter().cloned());
                let contribution = weight * s.normalized_score;
                total += contribution;
                SignalCheck {
                    name,
                    passed: tier != ConfidenceTier::Low,
                    tier,
                    score: s.normalized_score,
                    contribution,
                }
            }
            other => {
                let reason = match other {
                    Some(s) if s.available => format!("invalid score {}", s.normalized_score),
                    Some(SignalScore { error: Some(e), .. }) => e.clone(),
                    _ => "not collected".to_string(),
                };
                warnings.push(format!("{} signal unavailable: {reason}", name.label()));
                SignalCheck {
                    name,
                    passed: false,
                    tier: ConfidenceTier::Low,
                    score: 0.0,
                    contribution: 0.0,
                }
            }
        };
        checks.push(check);
    }

    let overall_confidence = round2(total.clamp(0.0, 100.0));
    PolicyDecision {
        overall_confidence,
        status: status_for(overall_confidence, config),
        checks,
        warnings,
    }
}

/// Three-tier mapping; each boundary belongs to the higher tier.
pub fn status_for(overall_confidence: f64, config: &PolicyConfig) -> DecisionStatus {
    if overall_confidence >= config.approve_threshold {
        DecisionStatus::Approved
    } else if overall_confidence >= config.review_threshold {
        DecisionStatus::ManualReview
    } else {
        DecisionStatus::Rejected
    }
}

/// Place a normalised score against a signal's pass / high thresholds.
pub fn classify(score: f64, config: &PolicyConfig, name: SignalName) -> ConfidenceTier {
    let tier = config.tier(name);
    if score >= tier.high {
        ConfidenceTier::High
    } else if score >= tier.pass {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(face: f64, liveness: f64, document: f64, deepfake: f64) -> Vec<SignalScore> {
        vec![
            SignalScore::available(SignalName::Liveness, liveness / 100.0, liveness),
            SignalScore::available(SignalName::FaceMatch, face, face),
            SignalScore::available(SignalName::DocumentAuthenticity, document, document),
            SignalScore::available(SignalName::Deepfake, deepfake / 100.0, deepfake),
        ]
    }

    #[test]
    fn genuine_pair_is_approved() {
        let d = decide(&scores(85.0, 90.0, 80.0, 97.0), &PolicyConfig::default());
        assert_eq!(d.overall_confidence, 87.3);
        assert_eq!(d.status, DecisionStatus::Approved);
        assert!(d.checks.iter().all(|c| c.passed));
    }

    #[test]
    fn unmatched_face_is_rejected() {
        // the matcher reports an unmatched face as zero
        let d = decide(&scores(0.0, 90.0, 80.0, 97.0), &PolicyConfig::default());
        assert_eq!(d.overall_confidence, 49.05);
        assert_eq!(d.status, DecisionStatus::Rejected);
        assert!(d.warnings.contains(&"face match check failed".to_string()));
    }

    #[test]
    fn boundaries_are_inclusive() {
        let config = PolicyConfig::default();
        assert_eq!(status_for(75.0, &config), DecisionStatus::Approved);
        assert_eq!(status_for(74.99, &config), DecisionStatus::ManualReview);
        assert_eq!(status_for(55.0, &config), DecisionStatus::ManualReview);
        assert_eq!(status_for(54.99, &config), DecisionStatus::Rejected);
    }

    #[test]
    fn all_signals_at_approve_threshold_approve() {
        let d = decide(&scores(75.0, 75.0, 75.0, 75.0), &PolicyConfig::default());
        assert_eq!(d.overall_confidence, 75.0);
        assert_eq!(d.status, DecisionStatus::Approved);
    }

    #[test]
    fn unavailable_signal_contributes_zero_with_warning() {
        let mut signals = scores(85.0, 90.0, 80.0, 97.0);
        signals[3] = SignalScore::unavailable(SignalName::Deepfake, "model offline");
        let d = decide(&signals, &PolicyConfig::default());
        assert_eq!(d.overall_confidence, 72.75);
        assert_eq!(d.status, DecisionStatus::ManualReview);
        assert!(d
            .warnings
            .contains(&"deepfake signal unavailable: model offline".to_string()));
        let deepfake = &d.checks[3];
        assert!(!deepfake.passed);
        assert_eq!(deepfake.contribution, 0.0);
    }

    #[test]
    fn missing_signal_counts_as_unavailable() {
        let signals = scores(85.0, 90.0, 80.0, 97.0)[..3].to_vec();
        let d = decide(&signals, &PolicyConfig::default());
        assert!(d
            .warnings
            .contains(&"deepfake signal unavailable: not collected".to_string()));
        assert_eq!(d.checks.len(), 4);
    }

    #[test]
    fn first_occurrence_wins() {
        let mut signals = scores(85.0, 90.0, 80.0, 97.0);
        signals.push(SignalScore::available(SignalName::FaceMatch, 0.0, 0.0));
        let d = decide(&signals, &PolicyConfig::default());
        assert_eq!(d.overall_confidence, 87.3);
    }

    #[test]
    fn medium_tier_warns_but_passes() {
        let d = decide(&scores(85.0, 60.0, 80.0, 97.0), &PolicyConfig::default());
        let liveness = &d.checks[0];
        assert_eq!(liveness.tier, ConfidenceTier::Medium);
        assert!(liveness.passed);
        assert!(d.warnings.contains(&"liveness confidence is medium".to_string()));
    }

    #[test]
    fn notes_become_warnings() {
        let mut signals = scores(85.0, 90.0, 80.0, 97.0);
        signals[2] = SignalScore::available(SignalName::DocumentAuthenticity, 80.0, 80.0)
            .with_notes(vec!["document is expired".into()]);
        let d = decide(&signals, &PolicyConfig::default());
        assert!(d.warnings.contains(&"document is expired".to_string()));
    }

    #[test]
    fn classify_tiers() {
        let config = PolicyConfig::default();
        assert_eq!(classify(80.0, &config, SignalName::FaceMatch), ConfidenceTier::High);
        assert_eq!(classify(65.0, &config, SignalName::FaceMatch), ConfidenceTier::Medium);
        assert_eq!(classify(64.9, &config, SignalName::FaceMatch), ConfidenceTier::Low);
    }

    #[test]
    fn non_finite_score_counts_as_unavailable() {
        let config = PolicyConfig::default();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut signals = scores(85.0, 90.0, 80.0, 97.0);
            signals[1] = SignalScore::available(SignalName::FaceMatch, bad, bad);
            let d = decide(&signals, &config);
            assert_eq!(d.overall_confidence, 49.05, "face match {bad}");
            assert_eq!(d.status, DecisionStatus::Rejected);
            let face = &d.checks[1];
            assert_eq!(face.name, SignalName::FaceMatch);
            assert!(!face.passed);
            assert_eq!(face.score, 0.0);
            assert_eq!(face.contribution, 0.0);
            assert!(d
                .warnings
                .contains(&format!("face match signal unavailable: invalid score {bad}")));
        }
    }

    #[test]
    fn status_uses_rounded_confidence() {
        // raw total is just under 75 and rounds up to it
        let signals = vec![
            SignalScore::available(SignalName::Liveness, 0.59984, 59.984),
            SignalScore::available(SignalName::FaceMatch, 100.0, 100.0),
            SignalScore::available(SignalName::DocumentAuthenticity, 100.0, 100.0),
            SignalScore::available(SignalName::Deepfake, 0.0, 0.0),
        ];
        let d = decide(&signals, &PolicyConfig::default());
        assert_eq!(d.overall_confidence, 75.0);
        assert_eq!(d.status, DecisionStatus::Approved);
    }
}

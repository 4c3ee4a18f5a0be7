use proptest::prelude::*;

use idv_policy::{decide, status_for};
use idv_types::{DecisionStatus, PolicyConfig, SignalName, SignalScore};

fn arb_signal(name: SignalName) -> impl Strategy<Value = SignalScore> {
    prop_oneof![
        4 => (0.0f64..=100.0).prop_map(move |v| SignalScore::available(name, v, v)),
        1 => Just(SignalScore::unavailable(name, "offline")),
        1 => prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]
            .prop_map(move |v| SignalScore::available(name, v, v)),
    ]
}

fn arb_signals() -> impl Strategy<Value = Vec<SignalScore>> {
    (
        arb_signal(SignalName::Liveness),
        arb_signal(SignalName::FaceMatch),
        arb_signal(SignalName::DocumentAuthenticity),
        arb_signal(SignalName::Deepfake),
    )
        .prop_map(|(a, b, c, d)| vec![a, b, c, d])
}

proptest! {
    /// Aggregate confidence always lies in [0, 100].
    #[test]
    fn overall_confidence_is_bounded(signals in arb_signals()) {
        let d = decide(&signals, &PolicyConfig::default());
        prop_assert!((0.0..=100.0).contains(&d.overall_confidence));
        prop_assert_eq!(d.checks.len(), 4);
    }

    /// Raising face match never lowers the aggregate.
    #[test]
    fn face_match_is_monotonic(
        signals in arb_signals(),
        low in 0.0f64..=100.0,
        bump in 0.0f64..=100.0,
    ) {
        let high = (low + bump).min(100.0);
        let config = PolicyConfig::default();
        let mut a = signals.clone();
        a[1] = SignalScore::available(SignalName::FaceMatch, low, low);
        let mut b = signals;
        b[1] = SignalScore::available(SignalName::FaceMatch, high, high);
        prop_assert!(
            decide(&b, &config).overall_confidence >= decide(&a, &config).overall_confidence
        );
    }

    /// Same input, same decision.
    #[test]
    fn decide_is_deterministic(signals in arb_signals()) {
        let config = PolicyConfig::default();
        prop_assert_eq!(decide(&signals, &config), decide(&signals, &config));
    }

    /// Signal order in the input does not matter.
    #[test]
    fn input_order_is_irrelevant(signals in arb_signals()) {
        let config = PolicyConfig::default();
        let mut reversed = signals.clone();
        reversed.reverse();
        prop_assert_eq!(decide(&signals, &config), decide(&reversed, &config));
    }

    /// Status is consistent with the thresholds for any tuning.
    #[test]
    fn status_matches_thresholds(
        overall in 0.0f64..=100.0,
        review in 10.0f64..60.0,
        gap in 1.0f64..30.0,
    ) {
        let config = PolicyConfig {
            review_threshold: review,
            approve_threshold: review + gap,
            ..Default::default()
        };
        let expected = if overall >= review + gap {
            DecisionStatus::Approved
        } else if overall >= review {
            DecisionStatus::ManualReview
        } else {
            DecisionStatus::Rejected
        };
        prop_assert_eq!(status_for(overall, &config), expected);
        prop_assert_eq!(status_for(review, &config), DecisionStatus::ManualReview);
        prop_assert_eq!(status_for(review + gap, &config), DecisionStatus::Approved);
    }
}

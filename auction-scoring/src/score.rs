use serde::{Deserialize, Serialize};

use crate::{
    error::{Attribute, ScoringError},
    num::{CompositeScore, DonationReference, Normalized},
    weights::NormalizedWeights,
};

/// Upper bound of the philanthropy, social impact, and fairness scores.
pub const MAX_RATING: f64 = 100.0;

/// A bidder's raw inputs to scoring.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidderAttributes {
    pub donation_amount: f64,
    pub philanthropy_score: f64,
    pub social_impact_score: f64,
    pub fairness_score: f64,
}

impl BidderAttributes {
    /// Reject, rather than clamp, out-of-range values. A fairness score of 140 is corrupt upstream
    /// data, not a very fair bidder.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.donation_amount.is_finite() || self.donation_amount < 0.0 {
            return Err(ScoringError::InvalidAttribute {
                field: Attribute::DonationAmount,
                value: self.donation_amount,
            });
        }
        for (field, value) in [
            (Attribute::PhilanthropyScore, self.philanthropy_score),
            (Attribute::SocialImpactScore, self.social_impact_score),
            (Attribute::FairnessScore, self.fairness_score),
        ] {
            if !(0.0..=MAX_RATING).contains(&value) {
                return Err(ScoringError::InvalidAttribute { field, value });
            }
        }
        Ok(())
    }

    /// Mean of the philanthropy and social impact scores, in [0, 100].
    pub fn profile_score(&self) -> f64 {
        (self.philanthropy_score + self.social_impact_score) / 2.0
    }
}

/// The sub-scores that make up a composite score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
    pub donation_ratio: Normalized,
    /// In [0, 100].
    pub profile_score: f64,
    /// In [0, 100].
    pub fairness_score: f64,
    pub composite: CompositeScore,
}

/// Weighted linear combination of the donation ratio, profile score, and fairness score, scaled to
/// [0, 100] and rounded to 2 decimal places.
///
/// The donation ratio saturates at `reference`, so donating beyond it has no marginal effect on the
/// score. With nonzero profile or fairness weights, no bidder can win purely on donation size.
pub fn score(
    attrs: &BidderAttributes,
    weights: &NormalizedWeights,
    reference: DonationReference,
) -> Result<CompositeScore, ScoringError> {
    breakdown(attrs, weights, reference).map(|b| b.composite)
}

pub fn breakdown(
    attrs: &BidderAttributes,
    weights: &NormalizedWeights,
    reference: DonationReference,
) -> Result<ScoreBreakdown, ScoringError> {
    attrs.validate()?;
    let donation_ratio = reference.ratio(attrs.donation_amount);
    let profile_score = attrs.profile_score();
    let raw = (weights.donation.as_f64() * donation_ratio.as_f64())
        + (weights.profile.as_f64() * (profile_score / MAX_RATING))
        + (weights.fairness.as_f64() * (attrs.fairness_score / MAX_RATING));
    Ok(ScoreBreakdown {
        donation_ratio,
        profile_score,
        fairness_score: attrs.fairness_score,
        composite: CompositeScore::from_fraction(raw),
    })
}

#[cfg(test)]
mod test {
    use proptest::{prop_assert, prop_assert_eq, proptest};

    use super::{breakdown, score, BidderAttributes};
    use crate::{
        error::{Attribute, ScoringError},
        num::{CompositeScore, DonationReference},
        test::{attributes, rating, weights},
        weights::{normalize, NormalizedWeights},
    };

    fn demo_weights() -> NormalizedWeights {
        normalize(0.4, 0.4, 0.2).unwrap()
    }

    fn attrs(donation_amount: f64, philanthropy: f64, social: f64, fairness: f64) -> BidderAttributes {
        BidderAttributes {
            donation_amount,
            philanthropy_score: philanthropy,
            social_impact_score: social,
            fairness_score: fairness,
        }
    }

    #[test]
    fn profile_outweighs_donation() {
        let reference = DonationReference::new(100_000_000.0).unwrap();
        let a = breakdown(&attrs(50_000_000.0, 95.0, 92.0, 90.0), &demo_weights(), reference)
            .unwrap();
        assert_eq!(a.donation_ratio.as_f64(), 0.5);
        assert_eq!(a.profile_score, 93.5);
        assert_eq!(a.composite.as_f64(), 75.40);

        let b = score(&attrs(100_000_000.0, 60.0, 55.0, 50.0), &demo_weights(), reference).unwrap();
        assert_eq!(b.as_f64(), 73.00);
        assert!(a.composite > b);
    }

    #[test]
    fn donation_above_reference_saturates() {
        let reference = DonationReference::default();
        let b = score(&attrs(100_000_000.0, 60.0, 55.0, 50.0), &demo_weights(), reference).unwrap();
        let c = score(&attrs(150_000_000.0, 60.0, 55.0, 50.0), &demo_weights(), reference).unwrap();
        assert_eq!(b, c);
        assert_eq!(c.as_f64(), 73.00);
    }

    #[test]
    fn all_zero_scores_zero() {
        let s = score(&attrs(0.0, 0.0, 0.0, 0.0), &demo_weights(), DonationReference::default())
            .unwrap();
        assert_eq!(s, CompositeScore::ZERO);
        assert_eq!(s.to_string(), "0.00");
    }

    #[test]
    fn all_max_scores_max() {
        let s = score(
            &attrs(1e12, 100.0, 100.0, 100.0),
            &normalize(1.0, 1.0, 1.0).unwrap(),
            DonationReference::default(),
        )
        .unwrap();
        assert_eq!(s, CompositeScore::MAX);
    }

    #[test]
    fn rejects_out_of_range_attributes() {
        let weights = demo_weights();
        let reference = DonationReference::default();
        assert_eq!(
            score(&attrs(-1.0, 50.0, 50.0, 50.0), &weights, reference),
            Err(ScoringError::InvalidAttribute {
                field: Attribute::DonationAmount,
                value: -1.0
            }),
        );
        assert!(matches!(
            score(&attrs(f64::INFINITY, 50.0, 50.0, 50.0), &weights, reference),
            Err(ScoringError::InvalidAttribute {
                field: Attribute::DonationAmount,
                ..
            })
        ));
        assert_eq!(
            score(&attrs(1.0, 100.5, 50.0, 50.0), &weights, reference),
            Err(ScoringError::InvalidAttribute {
                field: Attribute::PhilanthropyScore,
                value: 100.5
            }),
        );
        assert!(matches!(
            score(&attrs(1.0, 50.0, f64::NAN, 50.0), &weights, reference),
            Err(ScoringError::InvalidAttribute {
                field: Attribute::SocialImpactScore,
                ..
            })
        ));
        assert_eq!(
            score(&attrs(1.0, 50.0, 50.0, -3.0), &weights, reference),
            Err(ScoringError::InvalidAttribute {
                field: Attribute::FairnessScore,
                value: -3.0
            }),
        );
    }

    #[test]
    fn rejects_invalid_reference() {
        for reference in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(DonationReference::new(reference).is_err());
        }
    }

    proptest! {
        #[test]
        fn bounded(attrs in attributes(), weights in weights()) {
            let s = score(&attrs, &weights, DonationReference::default()).unwrap().as_f64();
            prop_assert!((0.0..=100.0).contains(&s));
        }

        #[test]
        fn deterministic(attrs in attributes(), weights in weights()) {
            let reference = DonationReference::default();
            let a = score(&attrs, &weights, reference).unwrap();
            let b = score(&attrs, &weights, reference).unwrap();
            prop_assert_eq!(a.as_f64().to_bits(), b.as_f64().to_bits());
        }

        #[test]
        fn saturating_donation(
            mut attrs in attributes(),
            weights in weights(),
            excess in 0.0_f64..1e9,
        ) {
            let reference = DonationReference::default();
            attrs.donation_amount = reference.as_f64() + excess;
            let at_cap = score(&attrs, &weights, reference).unwrap();
            attrs.donation_amount += excess + 1.0;
            prop_assert_eq!(at_cap, score(&attrs, &weights, reference).unwrap());
        }

        #[test]
        fn monotone(
            attrs in attributes(),
            weights in weights(),
            bump in rating(),
            field in 0_usize..4,
        ) {
            let reference = DonationReference::default();
            let mut raised = attrs;
            match field {
                0 => raised.donation_amount += bump * 1_000_000.0,
                1 => raised.philanthropy_score = (raised.philanthropy_score + bump).min(100.0),
                2 => raised.social_impact_score = (raised.social_impact_score + bump).min(100.0),
                _ => raised.fairness_score = (raised.fairness_score + bump).min(100.0),
            }
            let before = score(&attrs, &weights, reference).unwrap();
            let after = score(&raised, &weights, reference).unwrap();
            prop_assert!(after >= before);
        }
    }
}

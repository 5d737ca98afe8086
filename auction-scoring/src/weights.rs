use serde::{Deserialize, Serialize};

use crate::{
    error::{Dimension, ScoringError},
    num::{Normalized, Weight},
};

/// Raw relative importance of the three scoring dimensions. The weights need not sum to 1; they
/// are normalized before every scoring pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub donation: f64,
    pub profile: f64,
    pub fairness: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            donation: 0.4,
            profile: 0.4,
            fairness: 0.2,
        }
    }
}

impl WeightConfig {
    pub fn normalize(&self) -> Result<NormalizedWeights, ScoringError> {
        normalize(self.donation, self.profile, self.fairness)
    }
}

/// A weight triple summing to 1 (within floating point tolerance).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalizedWeights {
    pub donation: Normalized,
    pub profile: Normalized,
    pub fairness: Normalized,
}

/// Whole-number percentages of a [`NormalizedWeights`], for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightPercentages {
    pub donation: u32,
    pub profile: u32,
    pub fairness: u32,
}

impl NormalizedWeights {
    pub fn equal() -> Self {
        let third = Normalized::saturating(1.0 / 3.0);
        Self {
            donation: third,
            profile: third,
            fairness: third,
        }
    }

    pub fn sum(&self) -> f64 {
        self.donation.as_f64() + self.profile.as_f64() + self.fairness.as_f64()
    }

    /// Each weight as a rounded percentage. The three values may not add up to exactly 100.
    pub fn percentages(&self) -> WeightPercentages {
        let percent = |w: Normalized| (w.as_f64() * 100.0).round() as u32;
        WeightPercentages {
            donation: percent(self.donation),
            profile: percent(self.profile),
            fairness: percent(self.fairness),
        }
    }
}

impl From<NormalizedWeights> for WeightConfig {
    fn from(weights: NormalizedWeights) -> Self {
        Self {
            donation: weights.donation.as_f64(),
            profile: weights.profile.as_f64(),
            fairness: weights.fairness.as_f64(),
        }
    }
}

/// Scale the raw weights so that they sum to 1.
///
/// Negative or non-finite weights are rejected. When the weights sum to zero (or the sum overflows)
/// there is nothing to scale by, and each dimension gets an equal third.
pub fn normalize(
    donation: f64,
    profile: f64,
    fairness: f64,
) -> Result<NormalizedWeights, ScoringError> {
    let weight = |dimension: Dimension, value: f64| {
        Weight::new(value).ok_or(ScoringError::InvalidWeight { dimension, value })
    };
    let donation = weight(Dimension::Donation, donation)?;
    let profile = weight(Dimension::Profile, profile)?;
    let fairness = weight(Dimension::Fairness, fairness)?;

    let total = donation.as_f64() + profile.as_f64() + fairness.as_f64();
    if total == 0.0 || !total.is_finite() {
        tracing::debug!(total, "degenerate weight sum, using equal weights");
        return Ok(NormalizedWeights::equal());
    }
    // w <= total for every non-negative w, so each quotient stays within [0, 1].
    Ok(NormalizedWeights {
        donation: Normalized::saturating(donation.as_f64() / total),
        profile: Normalized::saturating(profile.as_f64() / total),
        fairness: Normalized::saturating(fairness.as_f64() / total),
    })
}

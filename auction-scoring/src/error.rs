use std::fmt;

/// One of the three scoring dimensions a weight applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    Donation,
    Profile,
    Fairness,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Donation => "donation",
            Self::Profile => "profile",
            Self::Fairness => "fairness",
        })
    }
}

/// A field of [`crate::BidderAttributes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    DonationAmount,
    PhilanthropyScore,
    SocialImpactScore,
    FairnessScore,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DonationAmount => "donation amount",
            Self::PhilanthropyScore => "philanthropy score",
            Self::SocialImpactScore => "social impact score",
            Self::FairnessScore => "fairness score",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// A raw weight was negative, NaN or infinite.
    #[error("invalid {dimension} weight: {value}")]
    InvalidWeight { dimension: Dimension, value: f64 },
    /// A donation was negative or non-finite, or a score fell outside [0, 100].
    #[error("invalid {field}: {value}")]
    InvalidAttribute { field: Attribute, value: f64 },
    #[error("max reference donation must be positive and finite, got {0}")]
    InvalidReferenceDonation(f64),
}

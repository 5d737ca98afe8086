use ordered_float::NotNan;

use crate::error::ScoringError;

/// A non-NaN f64 value in the range [0, 1].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Normalized(NotNan<f64>);

impl Normalized {
    pub const ZERO: Self = Self(unsafe { NotNan::new_unchecked(0.0) });
    pub const ONE: Self = Self(unsafe { NotNan::new_unchecked(1.0) });

    pub fn new(value: f64) -> Option<Self> {
        let value = NotNan::new(value).ok()?;
        if value.is_sign_negative() || *value > 1.0 {
            return None;
        }
        Some(Self(value))
    }

    /// Clamp `value` into [0, 1]. NaN maps to zero.
    pub fn saturating(value: f64) -> Self {
        Self::new(value.clamp(0.0, 1.0)).unwrap_or(Self::ZERO)
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }

    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl std::cmp::PartialOrd for Normalized {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for Normalized {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::fmt::Debug for Normalized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative, finite f64 value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Weight(NotNan<f64>);

impl Weight {
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        // -0.0 is accepted but stored as 0.0
        let value = if value == 0.0 { 0.0 } else { value };
        NotNan::new(value).ok().map(Self)
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl std::fmt::Debug for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The donation amount that maps to a full donation ratio of 1.0. Fixed per auction, never derived
/// from the set of bidders.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DonationReference(NotNan<f64>);

impl DonationReference {
    pub const DEFAULT: Self = Self(unsafe { NotNan::new_unchecked(100_000_000.0) });

    pub fn new(max_reference_donation: f64) -> Result<Self, ScoringError> {
        if !max_reference_donation.is_finite() || max_reference_donation <= 0.0 {
            return Err(ScoringError::InvalidReferenceDonation(max_reference_donation));
        }
        NotNan::new(max_reference_donation)
            .map(Self)
            .map_err(|_| ScoringError::InvalidReferenceDonation(max_reference_donation))
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }

    /// Map a donation amount onto [0, 1], saturating at the reference.
    pub fn ratio(&self, donation_amount: f64) -> Normalized {
        Normalized::saturating(donation_amount / *self.0)
    }
}

impl Default for DonationReference {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Debug for DonationReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A composite score in [0, 100], rounded to 2 decimal places.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeScore(NotNan<f64>);

impl CompositeScore {
    pub const ZERO: Self = Self(unsafe { NotNan::new_unchecked(0.0) });
    pub const MAX: Self = Self(unsafe { NotNan::new_unchecked(100.0) });

    /// Scale a weighted sum in [0, 1] to [0, 100] and round to 2 decimal places.
    pub fn from_fraction(raw: f64) -> Self {
        // Weights that sum to 1 +- ulp can push the sum marginally past 1.
        let scaled = Normalized::saturating(raw).as_f64() * 100.0;
        let rounded = (scaled * 100.0).round() / 100.0;
        NotNan::new(rounded).map(Self).unwrap_or(Self::ZERO)
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }
}

impl std::cmp::PartialOrd for CompositeScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for CompositeScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::fmt::Debug for CompositeScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

impl std::fmt::Display for CompositeScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

#[track_caller]
pub fn assert_within(value: f64, expected: f64, tolerance: f64) {
    let diff = (value - expected).abs();
    assert!(
        diff <= tolerance,
        "Expected value of {expected} +- {tolerance} but got {value} which is off by {diff}",
    );
}

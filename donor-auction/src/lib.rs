pub mod catalog;
pub mod roster;

pub use auction_scoring::{
    ArrayVec, BidderAttributes, CompositeScore, DonationReference, Entry, NormalizedWeights,
    Ranking, ScoreBreakdown, ScoringError, WeightConfig,
};

pub use crate::{
    catalog::{AuctionConfig, AuctionStatus, AuctionTheme, ConfigError},
    roster::{BidderId, BidderKind, Profile, Roster, RosterEntry, RosterError, Strategy},
};

/// A single running auction. Owns the authoritative weight configuration; every call to
/// [`Auction::standings`] rescores the whole roster under it.
#[derive(Clone, Debug)]
pub struct Auction {
    theme: AuctionTheme,
    reference: DonationReference,
    weights: WeightConfig,
    normalized: NormalizedWeights,
    roster: Roster,
}

impl Auction {
    pub fn new(
        theme: AuctionTheme,
        reference: DonationReference,
        roster: Roster,
    ) -> Result<Self, ScoringError> {
        let weights = theme.weights;
        let normalized = weights.normalize()?;
        Ok(Self {
            theme,
            reference,
            weights,
            normalized,
            roster,
        })
    }

    pub fn from_config(
        config: &AuctionConfig,
        slug: &str,
        roster: Roster,
    ) -> Result<Self, ConfigError> {
        let theme = config
            .find(slug)
            .ok_or_else(|| ConfigError::UnknownAuction(slug.to_owned()))?
            .clone();
        let reference = config.reference()?;
        Self::new(theme, reference, roster).map_err(|source| ConfigError::InvalidWeights {
            slug: slug.to_owned(),
            source,
        })
    }

    pub fn theme(&self) -> &AuctionTheme {
        &self.theme
    }

    pub fn reference(&self) -> DonationReference {
        self.reference
    }

    pub fn weights(&self) -> WeightConfig {
        self.weights
    }

    pub fn normalized_weights(&self) -> NormalizedWeights {
        self.normalized
    }

    /// Replace the weight configuration. On error the current weights are kept.
    pub fn set_weights(&mut self, weights: WeightConfig) -> Result<(), ScoringError> {
        let normalized = weights.normalize()?;
        tracing::info!(
            auction = %self.theme.slug,
            donation = weights.donation,
            profile = weights.profile,
            fairness = weights.fairness,
            "updated weights",
        );
        self.weights = weights;
        self.normalized = normalized;
        Ok(())
    }

    /// Restore the theme's default weights.
    pub fn reset_weights(&mut self) -> Result<(), ScoringError> {
        self.set_weights(self.theme.weights)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn place_bid(
        &mut self,
        id: &BidderId,
        amount: f64,
    ) -> Result<&BidderAttributes, RosterError> {
        self.roster.place_bid(id, amount)
    }

    /// Score and rank the whole roster under the current weights.
    pub fn standings(&self) -> Standings {
        let pass = auction_scoring::score_all(&self.roster, &self.normalized, self.reference);
        let snapshot = pass
            .winner()
            .and_then(|winner| self.snapshot(winner, &pass.ranking));
        Standings {
            ranking: pass.ranking,
            rejected: pass.rejected,
            snapshot,
        }
    }

    fn snapshot(
        &self,
        winner: &Entry<BidderId>,
        ranking: &Ranking<BidderId>,
    ) -> Option<OutcomeSnapshot> {
        let entry = self.roster.get(&winner.id)?;
        let breakdown =
            auction_scoring::breakdown(entry.attributes(), &self.normalized, self.reference)
                .ok()?;
        let donation_amount = entry.attributes().donation_amount;
        let outbid = ranking
            .ids()
            .filter_map(|id| self.roster.get(id))
            .any(|other| other.attributes().donation_amount > donation_amount);
        Some(OutcomeSnapshot {
            bidder: winner.id.clone(),
            name: entry.profile().name.clone(),
            affiliation: entry.profile().affiliation.clone(),
            impact_area: self.theme.impact_area.clone(),
            composite: winner.score,
            donation_amount,
            breakdown,
            outbid_on_donation: outbid,
        })
    }
}

/// The result of one full scoring pass over an auction's roster.
#[derive(Clone, Debug)]
pub struct Standings {
    pub ranking: Ranking<BidderId>,
    /// Bidders left out of the ranking because their attributes failed validation.
    pub rejected: Vec<(BidderId, ScoringError)>,
    pub snapshot: Option<OutcomeSnapshot>,
}

impl Standings {
    pub fn winner(&self) -> Option<&BidderId> {
        self.ranking.winner().map(|entry| &entry.id)
    }

    pub fn podium<const LIMIT: usize>(&self) -> ArrayVec<&Entry<BidderId>, LIMIT> {
        self.ranking.top()
    }
}

/// What the current winner brings to the table.
#[derive(Clone, Debug, PartialEq)]
pub struct OutcomeSnapshot {
    pub bidder: BidderId,
    pub name: String,
    pub affiliation: String,
    pub impact_area: String,
    pub composite: CompositeScore,
    pub donation_amount: f64,
    pub breakdown: ScoreBreakdown,
    /// Some ranked bidder donated more than the winner.
    pub outbid_on_donation: bool,
}

impl OutcomeSnapshot {
    pub fn donation_millions(&self) -> f64 {
        self.donation_amount / 1_000_000.0
    }

    /// Profile score rounded to a whole number.
    pub fn profile_score(&self) -> u32 {
        self.breakdown.profile_score.round() as u32
    }

    pub fn fairness_score(&self) -> f64 {
        self.breakdown.fairness_score
    }
}

//! Composite scoring and ranking for multi-criteria charity auctions.
//!
//! Bidders compete on a weighted blend of donation size, philanthropic/social profile, and an
//! externally supplied fairness score. Everything here is pure: weights, attributes, and the
//! donation reference are passed in on every call and nothing is cached between passes.

pub mod error;
pub mod num;
pub mod rank;
pub mod score;
pub mod weights;

use std::fmt::Debug;

pub use arrayvec::ArrayVec;

pub use crate::{
    error::{Attribute, Dimension, ScoringError},
    num::{CompositeScore, DonationReference, Normalized},
    rank::{rank, Entry, Ranking},
    score::{breakdown, score, BidderAttributes, ScoreBreakdown},
    weights::{normalize, NormalizedWeights, WeightConfig, WeightPercentages},
};

pub trait Bidder {
    type Id: Clone + Debug;
    fn id(&self) -> Self::Id;
    fn attributes(&self) -> &BidderAttributes;
}

/// The outcome of scoring every bidder once under a single weight configuration.
#[derive(Clone, Debug)]
pub struct ScoringPass<Id> {
    pub ranking: Ranking<Id>,
    /// Bidders excluded from the ranking, in input order.
    pub rejected: Vec<(Id, ScoringError)>,
}

impl<Id> ScoringPass<Id> {
    pub fn winner(&self) -> Option<&Entry<Id>> {
        self.ranking.winner()
    }
}

/// Score and rank all `bidders`. A bidder with invalid attributes is excluded from the ranking and
/// reported in [`ScoringPass::rejected`], without affecting how the remaining bidders are ranked.
pub fn score_all<'b, B, Bidders>(
    bidders: Bidders,
    weights: &NormalizedWeights,
    reference: DonationReference,
) -> ScoringPass<B::Id>
where
    B: Bidder + 'b,
    Bidders: IntoIterator<Item = &'b B>,
{
    let mut scored = Vec::new();
    let mut rejected = Vec::new();
    for bidder in bidders {
        match score(bidder.attributes(), weights, reference) {
            Ok(composite) => {
                tracing::debug!(bidder = ?bidder.id(), %composite, "scored bidder");
                scored.push((bidder.id(), composite));
            }
            Err(err) => {
                tracing::warn!(bidder = ?bidder.id(), %err, "excluding bidder from ranking");
                rejected.push((bidder.id(), err));
            }
        }
    }
    let ranking = rank(scored);
    tracing::debug!(
        ranked = ranking.len(),
        rejected = rejected.len(),
        winner = ?ranking.winner().map(|w| &w.id),
        "ranking pass complete",
    );
    ScoringPass { ranking, rejected }
}

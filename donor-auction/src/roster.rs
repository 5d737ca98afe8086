use std::{collections::HashMap, fmt};

use auction_scoring::{Bidder, BidderAttributes, ScoringError};
use serde::{Deserialize, Serialize};

// Scores assigned to a human bidder until the profile service rates them.
pub const CLIENT_PHILANTHROPY_SCORE: f64 = 80.0;
pub const CLIENT_SOCIAL_IMPACT_SCORE: f64 = 50.0;
pub const CLIENT_FAIRNESS_SCORE: f64 = 70.0;

/// Canonical bidder identifier. Assigned by whoever registers the bidder, never derived from names
/// or emails.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidderId(String);

impl BidderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BidderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for BidderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for BidderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Greedy,
    Balanced,
    Altruistic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidderKind {
    /// A simulated bidder. The strategy is descriptive only.
    Agent(Strategy),
    /// A human bidder.
    Client,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub affiliation: String,
    pub avatar_initials: String,
    pub kind: BidderKind,
}

impl Profile {
    pub fn agent(name: &str, affiliation: &str, strategy: Strategy) -> Self {
        Self {
            name: name.to_owned(),
            affiliation: affiliation.to_owned(),
            avatar_initials: initials(name),
            kind: BidderKind::Agent(strategy),
        }
    }

    pub fn client(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            affiliation: "Individual Donor".to_owned(),
            avatar_initials: initials(name),
            kind: BidderKind::Client,
        }
    }
}

/// Up to two uppercase initials, e.g. "Quiet Impact Fund" -> "QI".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct RosterEntry {
    id: BidderId,
    profile: Profile,
    attributes: BidderAttributes,
}

impl RosterEntry {
    pub fn id(&self) -> &BidderId {
        &self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn attributes(&self) -> &BidderAttributes {
        &self.attributes
    }
}

impl Bidder for RosterEntry {
    type Id = BidderId;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn attributes(&self) -> &BidderAttributes {
        &self.attributes
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("unknown bidder {0}")]
    UnknownBidder(BidderId),
    #[error("bidder {0} is already registered")]
    DuplicateBidder(BidderId),
    #[error("invalid bid amount: {0}")]
    InvalidBidAmount(f64),
    #[error("bidder {id}: {source}")]
    InvalidAttributes { id: BidderId, source: ScoringError },
}

/// Bidders keyed by [`BidderId`], iterated in registration order. Registration order is what
/// breaks ties between equal scores.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    index: HashMap<BidderId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The simulated bidders of the demo auction.
    pub fn demo() -> Self {
        let mut roster = Self::new();
        let agents = [
            (
                "agent-1",
                Profile::agent(
                    "Adrian Foundation",
                    "Adrian Philanthropy Group",
                    Strategy::Altruistic,
                ),
                (50_000_000.0, 95.0, 92.0, 90.0),
            ),
            (
                "agent-2",
                Profile::agent("BigCheck Capital", "BigCheck Giving Fund", Strategy::Greedy),
                (100_000_000.0, 60.0, 55.0, 50.0),
            ),
            (
                "agent-3",
                Profile::agent(
                    "Quiet Impact Fund",
                    "Quiet Impact Collective",
                    Strategy::Balanced,
                ),
                (65_000_000.0, 88.0, 90.0, 93.0),
            ),
        ];
        for (id, profile, (donation_amount, philanthropy, social_impact, fairness)) in agents {
            let attributes = BidderAttributes {
                donation_amount,
                philanthropy_score: philanthropy,
                social_impact_score: social_impact,
                fairness_score: fairness,
            };
            roster.entries.push(RosterEntry {
                id: BidderId::from(id),
                profile,
                attributes,
            });
            roster.index.insert(BidderId::from(id), roster.entries.len() - 1);
        }
        roster
    }

    /// Add a bidder. Attributes are validated here so that a malformed bidder never reaches a
    /// ranking pass.
    pub fn register(
        &mut self,
        id: BidderId,
        profile: Profile,
        attributes: BidderAttributes,
    ) -> Result<&RosterEntry, RosterError> {
        if self.index.contains_key(&id) {
            return Err(RosterError::DuplicateBidder(id));
        }
        if let Err(source) = attributes.validate() {
            return Err(RosterError::InvalidAttributes { id, source });
        }
        tracing::info!(bidder = %id, name = %profile.name, "registered bidder");
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(RosterEntry {
            id,
            profile,
            attributes,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Register a human bidder with no donation yet and the default client scores.
    pub fn register_client(&mut self, id: BidderId, name: &str) -> Result<&RosterEntry, RosterError> {
        let attributes = BidderAttributes {
            donation_amount: 0.0,
            philanthropy_score: CLIENT_PHILANTHROPY_SCORE,
            social_impact_score: CLIENT_SOCIAL_IMPACT_SCORE,
            fairness_score: CLIENT_FAIRNESS_SCORE,
        };
        self.register(id, Profile::client(name), attributes)
    }

    /// Add `amount` to the bidder's donation.
    pub fn place_bid(&mut self, id: &BidderId, amount: f64) -> Result<&BidderAttributes, RosterError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RosterError::InvalidBidAmount(amount));
        }
        let current = self.get(id).ok_or_else(|| RosterError::UnknownBidder(id.clone()))?;
        let donation_amount = current.attributes.donation_amount + amount;
        let attributes = self.update_donation(id, donation_amount)?;
        tracing::info!(bidder = %id, amount, donation_amount, "placed bid");
        Ok(attributes)
    }

    /// Replace the bidder's donation amount.
    pub fn set_donation(
        &mut self,
        id: &BidderId,
        donation_amount: f64,
    ) -> Result<&BidderAttributes, RosterError> {
        let attributes = self.update_donation(id, donation_amount)?;
        tracing::info!(bidder = %id, donation_amount, "set donation");
        Ok(attributes)
    }

    fn update_donation(
        &mut self,
        id: &BidderId,
        donation_amount: f64,
    ) -> Result<&BidderAttributes, RosterError> {
        let index = *self
            .index
            .get(id)
            .ok_or_else(|| RosterError::UnknownBidder(id.clone()))?;
        let entry = &mut self.entries[index];
        let updated = BidderAttributes {
            donation_amount,
            ..entry.attributes
        };
        updated
            .validate()
            .map_err(|source| RosterError::InvalidAttributes {
                id: id.clone(),
                source,
            })?;
        entry.attributes = updated;
        Ok(&entry.attributes)
    }

    pub fn get(&self, id: &BidderId) -> Option<&RosterEntry> {
        self.index.get(id).map(|&index| &self.entries[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RosterEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'r> IntoIterator for &'r Roster {
    type Item = &'r RosterEntry;
    type IntoIter = std::slice::Iter<'r, RosterEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use auction_scoring::{Attribute, BidderAttributes, ScoringError};

    use super::{initials, BidderId, BidderKind, Profile, Roster, RosterError, Strategy};

    #[test]
    fn demo_roster() {
        let roster = Roster::demo();
        assert_eq!(roster.len(), 3);
        let ids: Vec<&str> = roster.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, ["agent-1", "agent-2", "agent-3"]);
        let quiet = roster.get(&"agent-3".into()).unwrap();
        assert_eq!(quiet.profile().avatar_initials, "QI");
        assert_eq!(quiet.profile().kind, BidderKind::Agent(Strategy::Balanced));
        assert!(roster.iter().all(|e| e.attributes().validate().is_ok()));
    }

    #[test]
    fn initials_from_name() {
        assert_eq!(initials("Adrian Foundation"), "AF");
        assert_eq!(initials("  ada   lovelace king "), "AL");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn client_registration() {
        let mut roster = Roster::demo();
        let entry = roster.register_client("client-1".into(), "Jane Doe").unwrap();
        assert_eq!(entry.profile().kind, BidderKind::Client);
        assert_eq!(entry.profile().avatar_initials, "JD");
        assert_eq!(entry.attributes().donation_amount, 0.0);
        assert_eq!(entry.attributes().philanthropy_score, 80.0);
        assert_eq!(entry.attributes().social_impact_score, 50.0);
        assert_eq!(entry.attributes().fairness_score, 70.0);
        assert_eq!(roster.iter().last().unwrap().id().as_str(), "client-1");

        let err = roster.register_client("client-1".into(), "Jane Again").unwrap_err();
        assert!(matches!(err, RosterError::DuplicateBidder(id) if id.as_str() == "client-1"));
    }

    #[test]
    fn register_rejects_invalid_attributes() {
        let mut roster = Roster::new();
        let err = roster
            .register(
                BidderId::new("broken"),
                Profile::client("Broken"),
                BidderAttributes {
                    donation_amount: 10.0,
                    philanthropy_score: 50.0,
                    social_impact_score: 50.0,
                    fairness_score: 101.0,
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            RosterError::InvalidAttributes {
                source: ScoringError::InvalidAttribute {
                    field: Attribute::FairnessScore,
                    ..
                },
                ..
            }
        ));
        assert!(roster.is_empty());
        assert!(roster.get(&"broken".into()).is_none());
    }

    #[test]
    fn bids_accumulate() {
        let mut roster = Roster::demo();
        let id = BidderId::new("agent-1");
        roster.place_bid(&id, 5_000_000.0).unwrap();
        let attributes = roster.place_bid(&id, 250_000.0).unwrap();
        assert_eq!(attributes.donation_amount, 55_250_000.0);
        assert_eq!(attributes.philanthropy_score, 95.0);
    }

    #[test]
    fn rejects_invalid_bids() {
        let mut roster = Roster::demo();
        let id = BidderId::new("agent-2");
        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                roster.place_bid(&id, amount),
                Err(RosterError::InvalidBidAmount(_))
            ));
        }
        assert!(matches!(
            roster.place_bid(&"ghost".into(), 10.0),
            Err(RosterError::UnknownBidder(_))
        ));
        assert_eq!(
            roster.get(&id).unwrap().attributes().donation_amount,
            100_000_000.0
        );

        let whale = BidderId::new("agent-1");
        roster.set_donation(&whale, f64::MAX).unwrap();
        assert!(matches!(
            roster.place_bid(&whale, f64::MAX),
            Err(RosterError::InvalidAttributes { .. })
        ));
        assert_eq!(
            roster.get(&whale).unwrap().attributes().donation_amount,
            f64::MAX
        );
    }

    #[test]
    fn set_donation_replaces() {
        let mut roster = Roster::demo();
        let id = BidderId::new("agent-3");
        roster.set_donation(&id, 1_000.0).unwrap();
        assert_eq!(roster.get(&id).unwrap().attributes().donation_amount, 1_000.0);
        assert!(matches!(
            roster.set_donation(&id, -1.0),
            Err(RosterError::InvalidAttributes { .. })
        ));
        assert_eq!(roster.get(&id).unwrap().attributes().donation_amount, 1_000.0);
    }
}

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use auction_scoring::{DonationReference, ScoringError, WeightConfig};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Upcoming,
    Live,
    Closed,
}

/// A themed auction and the default weights it starts with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuctionTheme {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub impact_area: String,
    #[serde(default)]
    pub hero_tagline: String,
    #[serde(default)]
    pub weights: WeightConfig,
    pub status: AuctionStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuctionConfig {
    /// Donation amount that earns the full donation ratio, shared by every auction in the catalog.
    #[serde(default = "default_max_reference_donation")]
    pub max_reference_donation: f64,
    #[serde(default)]
    pub auctions: Vec<AuctionTheme>,
}

fn default_max_reference_donation() -> f64 {
    DonationReference::DEFAULT.as_f64()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse auction config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("auction {slug:?}: {source}")]
    InvalidWeights { slug: String, source: ScoringError },
    #[error(transparent)]
    InvalidReference(ScoringError),
    #[error("duplicate auction slug {0:?}")]
    DuplicateSlug(String),
    #[error("no auction with slug {0:?}")]
    UnknownAuction(String),
}

impl AuctionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), auctions = config.auctions.len(), "loaded auction config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reference()?;
        let mut slugs = HashSet::new();
        for auction in &self.auctions {
            if !slugs.insert(auction.slug.as_str()) {
                return Err(ConfigError::DuplicateSlug(auction.slug.clone()));
            }
            auction
                .weights
                .normalize()
                .map_err(|source| ConfigError::InvalidWeights {
                    slug: auction.slug.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn reference(&self) -> Result<DonationReference, ConfigError> {
        DonationReference::new(self.max_reference_donation).map_err(ConfigError::InvalidReference)
    }

    pub fn find(&self, slug: &str) -> Option<&AuctionTheme> {
        self.auctions.iter().find(|a| a.slug == slug)
    }
}

impl Default for AuctionConfig {
    fn default() -> Self {
        let theme = |id: &str,
                     name: &str,
                     slug: &str,
                     description: &str,
                     impact_area: &str,
                     hero_tagline: &str,
                     (donation, profile, fairness): (f64, f64, f64),
                     status| AuctionTheme {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: description.into(),
            impact_area: impact_area.into(),
            hero_tagline: hero_tagline.into(),
            weights: WeightConfig {
                donation,
                profile,
                fairness,
            },
            status,
        };
        Self {
            max_reference_donation: default_max_reference_donation(),
            auctions: vec![
                theme(
                    "1",
                    "Rockefeller Tree of Impact",
                    "rockefeller-tree",
                    "Naming rights on a virtual Rockefeller Center tree, weighted by philanthropy, \
                     social impact, and donation size.",
                    "Global Philanthropy",
                    "Not just the biggest check, the biggest impact.",
                    (0.4, 0.4, 0.2),
                    AuctionStatus::Live,
                ),
                theme(
                    "2",
                    "LA Walk of Fame for Good",
                    "la-walk-of-fame",
                    "Stars on a virtual Walk of Fame reserved for donors with high community impact \
                     and inclusive giving.",
                    "Community & Arts",
                    "Celebrate the people who give back, not just show up.",
                    (0.3, 0.5, 0.2),
                    AuctionStatus::Upcoming,
                ),
                theme(
                    "3",
                    "Climate Champions Arena",
                    "climate-champions",
                    "Slots on a climate impact leaderboard, balancing funding with long-term \
                     environmental commitments.",
                    "Climate",
                    "Where greenwashing loses and real impact wins.",
                    (0.35, 0.45, 0.2),
                    AuctionStatus::Live,
                ),
                theme(
                    "4",
                    "Global Health Hall of Honor",
                    "global-health",
                    "Naming rights on a digital wall of honor for global health donors, scored for \
                     equity and access.",
                    "Health",
                    "Putting equitable health outcomes at center stage.",
                    (0.3, 0.5, 0.2),
                    AuctionStatus::Closed,
                ),
            ],
        }
    }
}

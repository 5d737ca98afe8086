use std::{
    io::{stdin, BufRead},
    path::PathBuf,
};

use anyhow::{anyhow, bail, Context as _};
use clap::Parser;
use donor_auction::{
    Auction, AuctionConfig, BidderAttributes, BidderId, Profile, Roster, Standings, WeightConfig,
};
use tracing_subscriber::EnvFilter;

const HEADER: &str =
    "id,name,donation_amount,philanthropy_score,social_impact_score,fairness_score";

/// Rank bidders of a charity auction by composite score.
///
/// Bidders are read from stdin as CSV rows of
/// `id,name,donation_amount,philanthropy_score,social_impact_score,fairness_score`.
#[derive(Parser)]
struct Args {
    /// Slug of the auction whose weights to use.
    #[arg(long, default_value = "rockefeller-tree")]
    auction: String,
    /// TOML auction catalog. The built-in catalog is used when omitted.
    #[arg(long, env = "AUCTION_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    donation_weight: Option<f64>,
    #[arg(long)]
    profile_weight: Option<f64>,
    #[arg(long)]
    fairness_weight: Option<f64>,
    /// Use the demo bidders instead of reading stdin.
    #[arg(long)]
    demo: bool,
    /// Bids to place before ranking, as `id=amount`. May be repeated.
    #[arg(long = "bid", value_parser = parse_bid)]
    bids: Vec<(BidderId, f64)>,
}

fn parse_bid(s: &str) -> anyhow::Result<(BidderId, f64)> {
    let (id, amount) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected id=amount"))?;
    let amount = amount.trim().parse().context("amount")?;
    Ok((BidderId::new(id.trim()), amount))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AuctionConfig::load(path)?,
        None => AuctionConfig::default(),
    };
    let roster = if args.demo {
        Roster::demo()
    } else {
        read_roster(stdin().lock())?
    };

    let mut auction = Auction::from_config(&config, &args.auction, roster)?;
    let defaults = auction.weights();
    let weights = WeightConfig {
        donation: args.donation_weight.unwrap_or(defaults.donation),
        profile: args.profile_weight.unwrap_or(defaults.profile),
        fairness: args.fairness_weight.unwrap_or(defaults.fairness),
    };
    if weights != defaults {
        auction.set_weights(weights)?;
    }
    for (id, amount) in &args.bids {
        auction
            .place_bid(id, *amount)
            .with_context(|| format!("bid {id}={amount}"))?;
    }

    report(&auction, &auction.standings());
    Ok(())
}

fn read_roster(input: impl BufRead) -> anyhow::Result<Roster> {
    let mut roster = Roster::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with(HEADER) {
            continue;
        }
        let line_number = index + 1;
        let (id, name, attributes) =
            parse_row(line).with_context(|| format!("line {line_number}"))?;
        // A bad row is skipped so the rest of the roster can still be ranked.
        if let Err(err) = roster.register(id, Profile::client(&name), attributes) {
            tracing::warn!(line = line_number, %err, "skipping bidder");
        }
    }
    Ok(roster)
}

fn parse_row(line: &str) -> anyhow::Result<(BidderId, String, BidderAttributes)> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 6 {
        bail!("expected 6 fields, got {}", fields.len());
    }
    let number = |index: usize, name: &str| -> anyhow::Result<f64> {
        fields[index].parse().with_context(|| name.to_owned())
    };
    let attributes = BidderAttributes {
        donation_amount: number(2, "donation_amount")?,
        philanthropy_score: number(3, "philanthropy_score")?,
        social_impact_score: number(4, "social_impact_score")?,
        fairness_score: number(5, "fairness_score")?,
    };
    Ok((BidderId::new(fields[0]), fields[1].to_owned(), attributes))
}

fn report(auction: &Auction, standings: &Standings) {
    let theme = auction.theme();
    let p = auction.normalized_weights().percentages();
    println!("{} ({})", theme.name, theme.impact_area);
    println!(
        "weights: donation {}%, profile {}%, fairness {}%",
        p.donation, p.profile, p.fairness
    );
    for (place, entry) in standings.ranking.entries().iter().enumerate() {
        let name = auction
            .roster()
            .get(&entry.id)
            .map(|e| e.profile().name.as_str())
            .unwrap_or_default();
        println!(
            "{:>3}. {:>6}  {} ({})",
            place + 1,
            entry.score.to_string(),
            name,
            entry.id
        );
    }
    for (id, err) in &standings.rejected {
        println!("  rejected {id}: {err}");
    }
    match &standings.snapshot {
        None => println!("no winner"),
        Some(winner) => {
            println!(
                "winner: {} ({}) with {} | donation ${:.1}M, profile {}, fairness {}",
                winner.name,
                winner.affiliation,
                winner.composite,
                winner.donation_millions(),
                winner.profile_score(),
                winner.fairness_score(),
            );
            if winner.outbid_on_donation {
                println!(
                    "{} wins without the largest check: profile and fairness carry more weight \
                     for {}.",
                    winner.name, winner.impact_area,
                );
            }
        }
    }
}

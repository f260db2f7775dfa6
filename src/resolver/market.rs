//! Market-string → statistic mapping.
//!
//! Market names are free text ("Home Runs", "Pitcher Strikeouts", "Hits +
//! Runs + RBIs") and several substrings co-occur across markets, so matching
//! is an ordered table scanned top to bottom: combined and qualified phrases
//! first, bare substrings last. Reordering entries changes which statistic a
//! market resolves to; the order is part of the contract.

use crate::types::BoxScore;

pub struct MarketStat {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub extract: fn(&BoxScore) -> f64,
}

/// Fixed-priority mapping table. Scanned in order; first match wins.
pub static MARKET_TABLE: &[MarketStat] = &[
    // Combined markets before their components.
    MarketStat {
        name: "hits_runs_rbi",
        matches: |m| m.contains("hits + runs + rbis") || m.contains("h+r+rbi"),
        extract: |b| (b.hits + b.runs + b.rbi) as f64,
    },
    MarketStat {
        name: "hits_runs",
        matches: |m| m.contains("hits and runs") || m.contains("h+r"),
        extract: |b| (b.hits + b.runs) as f64,
    },
    // Pitching markets before the batter substrings they collide with.
    MarketStat {
        name: "pitcher_strikeouts",
        matches: |m| m.contains("strikeout") && (m.contains("pitcher") || m.contains("pitching")),
        extract: |b| b.strikeouts_pitched as f64,
    },
    MarketStat {
        name: "earned_runs",
        matches: |m| m.contains("earned run"),
        extract: |b| b.earned_runs as f64,
    },
    MarketStat {
        name: "hits_allowed",
        matches: |m| m.contains("hits allowed"),
        extract: |b| b.hits_allowed as f64,
    },
    MarketStat {
        name: "walks_allowed",
        matches: |m| m.contains("walks allowed"),
        extract: |b| b.walks_allowed as f64,
    },
    MarketStat {
        name: "innings_pitched",
        matches: |m| m.contains("innings pitched"),
        extract: |b| b.innings_pitched,
    },
    MarketStat {
        name: "pitching_outs",
        matches: |m| m.contains("pitching outs") || m.contains("outs recorded"),
        extract: |b| b.pitching_outs as f64,
    },
    // Whole batting phrases before their bare substrings ("home run" and
    // "total base" both contain shorter market words).
    MarketStat {
        name: "home_runs",
        matches: |m| m.contains("home run") || m.contains("homer"),
        extract: |b| b.home_runs as f64,
    },
    MarketStat {
        name: "total_bases",
        matches: |m| m.contains("total base"),
        extract: |b| b.total_bases as f64,
    },
    MarketStat {
        name: "stolen_bases",
        matches: |m| m.contains("stolen base"),
        extract: |b| b.stolen_bases as f64,
    },
    MarketStat {
        name: "doubles",
        matches: |m| m.contains("double"),
        extract: |b| b.doubles as f64,
    },
    MarketStat {
        name: "triples",
        matches: |m| m.contains("triple"),
        extract: |b| b.triples as f64,
    },
    MarketStat {
        name: "singles",
        matches: |m| m.contains("single"),
        extract: |b| b.singles as f64,
    },
    // Bare substrings last.
    MarketStat {
        name: "hits",
        matches: |m| m.contains("hit") && !m.contains("allowed"),
        extract: |b| b.hits as f64,
    },
    MarketStat {
        name: "runs",
        matches: |m| m.contains("run") && !m.contains("earned run"),
        extract: |b| b.runs as f64,
    },
    MarketStat {
        name: "rbi",
        matches: |m| m.contains("rbi"),
        extract: |b| b.rbi as f64,
    },
    MarketStat {
        name: "walks",
        matches: |m| (m.contains("walk") || m.contains("base on balls")) && !m.contains("allowed"),
        extract: |b| b.walks as f64,
    },
    MarketStat {
        name: "strikeouts",
        matches: |m| m.contains("strikeout"),
        extract: |b| b.strikeouts as f64,
    },
    MarketStat {
        name: "fielding_assists",
        matches: |m| m.contains("assist"),
        extract: |b| b.fielding_assists as f64,
    },
    MarketStat {
        name: "fielding_putouts",
        matches: |m| m.contains("putout"),
        extract: |b| b.fielding_putouts as f64,
    },
    MarketStat {
        name: "fielding_errors",
        matches: |m| m.contains("error"),
        extract: |b| b.fielding_errors as f64,
    },
];

/// Pull the statistic a market is wagered on out of a box score.
/// Returns `None` for an unrecognized market string.
pub fn extract_stat(market: &str, score: &BoxScore) -> Option<f64> {
    let market = market.to_lowercase();
    let market = market.trim();

    MARKET_TABLE
        .iter()
        .find(|entry| (entry.matches)(market))
        .map(|entry| (entry.extract)(score))
}

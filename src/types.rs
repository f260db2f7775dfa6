//! Core domain types shared across the pipeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the line a prop recommendation points at.
///
/// `Neutral` covers both an explicit NEUTRAL suggestion and an absent one;
/// neutral props are never auto-resolved or settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Side {
    Over,
    Under,
    Neutral,
}

impl Side {
    /// Decode a feed string. Anything that is not clearly OVER or UNDER
    /// (including empty) is treated as neutral.
    pub fn from_feed(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        if upper.contains("OVER") && !upper.contains("UNDER") {
            Side::Over
        } else if upper.contains("UNDER") {
            Side::Under
        } else {
            Side::Neutral
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Over => write!(f, "OVER"),
            Side::Under => write!(f, "UNDER"),
            Side::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Outcome of one side of a resolved bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum BetOutcome {
    Win,
    Loss,
    Push,
    Unknown,
}

impl fmt::Display for BetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetOutcome::Win => write!(f, "win"),
            BetOutcome::Loss => write!(f, "loss"),
            BetOutcome::Push => write!(f, "push"),
            BetOutcome::Unknown => write!(f, "unknown"),
        }
    }
}

/// Expected-value quality bucket. `A` is best; `F` means the upstream signal
/// carried no tier at all and ranks below everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Tier {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Tier {
    /// Numeric rank used when comparing props for the best-odds view.
    /// Higher is better; the no-tier bucket ranks below E.
    pub fn rank(self) -> u8 {
        match self {
            Tier::A => 5,
            Tier::B => 4,
            Tier::C => 3,
            Tier::D => 2,
            Tier::E => 1,
            Tier::F => 0,
        }
    }

    /// Tiers worth acting on.
    pub fn is_plus_ev(self) -> bool {
        matches!(self, Tier::A | Tier::B | Tier::C)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
            Tier::F => "F",
        };
        write!(f, "{c}")
    }
}

impl FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(Tier::A),
            "B" => Ok(Tier::B),
            "C" => Ok(Tier::C),
            "D" => Ok(Tier::D),
            "E" => Ok(Tier::E),
            "F" | "" => Ok(Tier::F),
            _ => Err(()),
        }
    }
}

/// One scraped prop: a single player-statistic line at one sportsbook.
///
/// Unique per (scrape_date, player, team, market, site); a re-scrape of the
/// same key replaces the row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Prop {
    pub id: i64,
    pub scrape_date: NaiveDate,
    pub scrape_timestamp: DateTime<Utc>,
    pub session_id: String,

    pub game_id: String,
    pub game_time: Option<String>,
    pub home_team: String,
    pub away_team: String,

    pub player_name: String,
    pub team: String,

    pub site: String,
    pub market: String,
    pub over_line: Option<String>,
    pub under_line: Option<String>,

    pub implied_projection: Option<f64>,
    pub model_projection: Option<f64>,
    pub suggested_bet: Side,

    pub tier_signal: Option<String>,
    pub tier: Tier,

    pub page_number: i64,
}

/// One player's recorded statistics for one completed game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoxScore {
    pub id: i64,
    pub game_id: String,
    pub game_date: NaiveDate,
    pub player_name: String,
    pub team: String,
    pub game_completed: bool,

    // Batting
    pub at_bats: i64,
    pub hits: i64,
    pub runs: i64,
    pub rbi: i64,
    pub home_runs: i64,
    pub doubles: i64,
    pub triples: i64,
    pub singles: i64,
    pub walks: i64,
    pub strikeouts: i64,
    pub stolen_bases: i64,
    pub total_bases: i64,

    // Pitching
    pub innings_pitched: f64,
    pub pitching_outs: i64,
    pub hits_allowed: i64,
    pub earned_runs: i64,
    pub walks_allowed: i64,
    pub strikeouts_pitched: i64,

    // Fielding
    pub fielding_assists: i64,
    pub fielding_putouts: i64,
    pub fielding_errors: i64,

    pub data_source: String,
    pub data_confidence: f64,
}

/// Resolution record for one prop. At most one row ever exists per prop;
/// the `UNIQUE(prop_id)` constraint is what makes settlement at-most-once.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BetResult {
    pub id: i64,
    pub prop_id: i64,

    pub market: String,
    pub player_name: String,
    pub team: String,
    pub game_id: String,

    pub over_line: Option<String>,
    pub under_line: Option<String>,
    pub suggested_bet: Side,
    pub tier: Tier,

    pub actual_result: f64,
    pub over_result: BetOutcome,
    pub under_result: BetOutcome,

    pub result_source: String,
    pub result_confidence: f64,

    pub suggested_stake: Option<f64>,
    pub profit_loss: Option<f64>,
    pub roi_percentage: Option<f64>,

    pub resolved_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Explicit betting-name → canonical-name mapping. Team-specific entries
/// beat team-agnostic ones; the table is only ever appended to.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NameMapping {
    pub id: i64,
    pub betting_name: String,
    pub canonical_name: String,
    pub team: Option<String>,
    pub mapping_type: String,
}

/// Deduplicated view row: the single best-tier prop per
/// (scrape_date, player, market). Rebuilt from scratch for each date.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BestOdds {
    pub id: i64,
    pub scrape_date: NaiveDate,
    pub scrape_timestamp: DateTime<Utc>,

    pub game_id: String,
    pub game_time: Option<String>,
    pub home_team: String,
    pub away_team: String,

    pub player_name: String,
    pub team: String,

    pub market: String,
    pub best_site: String,
    pub over_line: Option<String>,
    pub under_line: Option<String>,

    pub implied_projection: Option<f64>,
    pub model_projection: Option<f64>,
    pub suggested_bet: Side,

    pub tier_signal: Option<String>,
    pub tier: Tier,

    pub original_prop_id: i64,
}

/// A prop row ready for insertion (no id yet).
#[derive(Debug, Clone)]
pub struct NewProp {
    pub scrape_date: NaiveDate,
    pub scrape_timestamp: DateTime<Utc>,
    pub session_id: String,

    pub game_id: String,
    pub game_time: Option<String>,
    pub home_team: String,
    pub away_team: String,

    pub player_name: String,
    pub team: String,

    pub site: String,
    pub market: String,
    pub over_line: Option<String>,
    pub under_line: Option<String>,

    pub implied_projection: Option<f64>,
    pub model_projection: Option<f64>,
    pub suggested_bet: Side,

    pub tier_signal: Option<String>,
    pub tier: Tier,

    pub page_number: i64,
}

/// A box-score row ready for insertion (no id yet).
#[derive(Debug, Clone, Default)]
pub struct NewBoxScore {
    pub game_id: String,
    pub game_date: NaiveDate,
    pub player_name: String,
    pub team: String,
    pub game_completed: bool,

    pub at_bats: i64,
    pub hits: i64,
    pub runs: i64,
    pub rbi: i64,
    pub home_runs: i64,
    pub doubles: i64,
    pub triples: i64,
    pub singles: i64,
    pub walks: i64,
    pub strikeouts: i64,
    pub stolen_bases: i64,
    pub total_bases: i64,

    pub innings_pitched: f64,
    pub pitching_outs: i64,
    pub hits_allowed: i64,
    pub earned_runs: i64,
    pub walks_allowed: i64,
    pub strikeouts_pitched: i64,

    pub fielding_assists: i64,
    pub fielding_putouts: i64,
    pub fielding_errors: i64,

    pub data_source: String,
    pub data_confidence: f64,
}

/// A resolution record ready for insertion. Stake/P&L columns stay empty
/// until the settlement pass fills them in.
#[derive(Debug, Clone)]
pub struct NewBetResult {
    pub prop_id: i64,

    pub market: String,
    pub player_name: String,
    pub team: String,
    pub game_id: String,

    pub over_line: Option<String>,
    pub under_line: Option<String>,
    pub suggested_bet: Side,
    pub tier: Tier,

    pub actual_result: f64,
    pub over_result: BetOutcome,
    pub under_result: BetOutcome,

    pub result_source: String,
    pub result_confidence: f64,

    pub resolved_at: DateTime<Utc>,
    pub notes: Option<String>,
}

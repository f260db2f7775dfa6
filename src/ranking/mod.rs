//! Ranking and aggregation over resolved and unresolved props.
//!
//! Rebuilds the deduplicated best-odds view for a date, exposes the
//! actionable plus-EV subset, and aggregates settled results into per-tier
//! and overall performance figures.

#[cfg(test)]
mod tests;

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::info;

use crate::error::Result;
use crate::storage::Database;
use crate::types::{BetOutcome, BetResult, BestOdds, Side, Tier};

/// Rebuild the best-odds view for a date: one row per (player, market),
/// keeping the prop with the best tier rank. Equal ranks keep the
/// earliest-inserted row. Returns the number of rows written.
pub async fn rebuild_best_odds(db: &Database, date: NaiveDate) -> Result<u64> {
    let props = db.props_for_date(date).await?;
    if props.is_empty() {
        info!("No props for {date}; best-odds view left empty");
        return db.replace_best_odds(date, &[]).await;
    }

    let mut best: HashMap<(String, String), usize> = HashMap::new();
    for (idx, prop) in props.iter().enumerate() {
        let key = (prop.player_name.clone(), prop.market.clone());
        match best.get(&key) {
            // Strict comparison: a tie keeps the incumbent, and rows come
            // back in insertion order within a key.
            Some(&held) if props[held].tier.rank() >= prop.tier.rank() => {}
            _ => {
                best.insert(key, idx);
            }
        }
    }

    let mut winners: Vec<_> = best.into_values().map(|idx| props[idx].clone()).collect();
    winners.sort_by(|a, b| {
        (&a.player_name, &a.market, a.id).cmp(&(&b.player_name, &b.market, b.id))
    });

    let written = db.replace_best_odds(date, &winners).await?;
    info!(
        "Best-odds view for {date}: {written} rows from {} props",
        props.len()
    );
    Ok(written)
}

/// The actionable recommendation set for a date: best-odds rows in the top
/// three tiers whose suggested side is not neutral.
pub async fn plus_ev_bets(db: &Database, date: NaiveDate) -> Result<Vec<BestOdds>> {
    db.plus_ev_for_date(date).await
}

/// Settled performance of one tier bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TierPerformance {
    pub bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    pub total_staked: f64,
    pub total_profit_loss: f64,
}

impl TierPerformance {
    /// Aggregate ROI: total P&L over total staked. This is NOT the average
    /// of per-bet ROIs; the two differ whenever stakes vary, and the
    /// aggregate form is the authoritative one.
    pub fn roi(&self) -> Option<f64> {
        if self.total_staked == 0.0 {
            return None;
        }
        Some(self.total_profit_loss / self.total_staked * 100.0)
    }

    /// Win rate with pushes excluded from the denominator.
    pub fn win_rate(&self) -> Option<f64> {
        let decided = self.wins + self.losses;
        if decided == 0 {
            return None;
        }
        Some(self.wins as f64 / decided as f64)
    }

    fn add(&mut self, result: &BetResult, outcome: BetOutcome) {
        let (Some(stake), Some(profit_loss)) = (result.suggested_stake, result.profit_loss)
        else {
            return; // not settled yet
        };

        self.bets += 1;
        self.total_staked += stake;
        self.total_profit_loss += profit_loss;
        match outcome {
            BetOutcome::Win => self.wins += 1,
            BetOutcome::Loss => self.losses += 1,
            BetOutcome::Push => self.pushes += 1,
            BetOutcome::Unknown => {}
        }
    }
}

/// Per-tier breakdown plus the overall totals for a date range.
#[derive(Debug, Clone, Default)]
pub struct PerformanceReport {
    pub overall: TierPerformance,
    pub tiers: Vec<(Tier, TierPerformance)>,
}

/// Fold settled results into per-tier and overall performance. Only bets
/// with an OVER/UNDER suggestion and settled figures count.
pub fn aggregate_performance(results: &[BetResult]) -> PerformanceReport {
    let mut overall = TierPerformance::default();
    let mut by_tier: HashMap<Tier, TierPerformance> = HashMap::new();

    for result in results {
        let outcome = match result.suggested_bet {
            Side::Over => result.over_result,
            Side::Under => result.under_result,
            Side::Neutral => continue,
        };
        if outcome == BetOutcome::Unknown {
            continue;
        }

        overall.add(result, outcome);
        by_tier.entry(result.tier).or_default().add(result, outcome);
    }

    let mut tiers: Vec<_> = by_tier.into_iter().collect();
    tiers.sort_by_key(|(tier, _)| std::cmp::Reverse(tier.rank()));

    PerformanceReport { overall, tiers }
}

/// Settled performance across a date range, broken down by tier.
pub async fn performance(
    db: &Database,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PerformanceReport> {
    let results = db.bet_results_between(from, to).await?;
    Ok(aggregate_performance(&results))
}

/// Snapshot of one date's data: prop volume, tier distribution and how much
/// of it has resolved so far.
#[derive(Debug, Clone, Default)]
pub struct DailySummary {
    pub total_props: usize,
    pub unique_players: usize,
    pub unique_markets: usize,
    pub tier_counts: Vec<(Tier, usize)>,
    pub resolved: usize,
    pub avg_result_confidence: Option<f64>,
}

pub async fn daily_summary(db: &Database, date: NaiveDate) -> Result<DailySummary> {
    let props = db.props_for_date(date).await?;
    let results = db.bet_results_for_date(date).await?;

    let mut players = std::collections::HashSet::new();
    let mut markets = std::collections::HashSet::new();
    let mut by_tier: HashMap<Tier, usize> = HashMap::new();
    for prop in &props {
        players.insert(prop.player_name.as_str());
        markets.insert(prop.market.as_str());
        *by_tier.entry(prop.tier).or_default() += 1;
    }

    let mut tier_counts: Vec<_> = by_tier.into_iter().collect();
    tier_counts.sort_by_key(|(tier, _)| std::cmp::Reverse(tier.rank()));

    let avg_result_confidence = if results.is_empty() {
        None
    } else {
        Some(results.iter().map(|r| r.result_confidence).sum::<f64>() / results.len() as f64)
    };

    Ok(DailySummary {
        total_props: props.len(),
        unique_players: players.len(),
        unique_markets: markets.len(),
        tier_counts,
        resolved: results.len(),
        avg_result_confidence,
    })
}

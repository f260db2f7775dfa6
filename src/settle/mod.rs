//! Settlement: turning a resolved outcome into stake, profit/loss and ROI.
//!
//! Pure arithmetic over the odds of the suggested side. A push always
//! settles to exactly zero profit/loss; the stake comes back, overriding
//! the win/loss formula.

#[cfg(test)]
mod tests;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;
use crate::odds;
use crate::storage::Database;
use crate::types::{BetOutcome, Prop, Side};

/// Financial settlement of one bet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub stake: f64,
    pub profit_loss: f64,
    pub roi: Option<f64>,
}

/// What one settlement pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementSummary {
    /// Bets that got stake/P&L/ROI written.
    pub settled: usize,
    /// Neutral suggestions (no wager to settle).
    pub neutral: usize,
    /// The suggested side had no odds text at all.
    pub missing_odds: usize,
    /// Odds text present but unparseable.
    pub parse_errors: usize,
    /// Resolution carried an unknown outcome (no numeric line at
    /// resolution time).
    pub unknown_outcome: usize,
}

/// Settle a single bet from its raw odds text and resolved outcome.
///
/// Returns `None` when the odds don't parse or the outcome is unknown.
pub fn settle_bet(odds_text: &str, outcome: BetOutcome) -> Option<Settlement> {
    let price = odds::parse(odds_text)?;
    let stake = odds::suggested_stake(price)?;

    let profit_loss = match outcome {
        BetOutcome::Push => 0.0,
        BetOutcome::Win => odds::profit_loss(price, stake, true),
        BetOutcome::Loss => odds::profit_loss(price, stake, false),
        BetOutcome::Unknown => return None,
    };

    Some(Settlement {
        stake,
        profit_loss,
        roi: odds::roi(profit_loss, stake),
    })
}

/// Settle a prop directly: picks the suggested side's odds text and applies
/// `settle_bet`. Neutral props have no wager and settle to `None`.
pub fn settle_prop(prop: &Prop, outcome: BetOutcome) -> Option<Settlement> {
    let odds_text = match prop.suggested_bet {
        Side::Over => prop.over_line.as_deref()?,
        Side::Under => prop.under_line.as_deref()?,
        Side::Neutral => return None,
    };
    settle_bet(odds_text, outcome)
}

/// Fill in stake/P&L/ROI for every resolved bet on `date` that has an
/// OVER/UNDER suggestion. Re-running recomputes from the same inputs, so
/// the pass is idempotent.
pub async fn settle_date(db: &Database, date: NaiveDate) -> Result<SettlementSummary> {
    let mut summary = SettlementSummary::default();
    let results = db.bet_results_for_date(date).await?;

    info!("Settling {} resolved bets for {date}", results.len());

    for result in &results {
        let (odds_text, outcome) = match result.suggested_bet {
            Side::Over => (result.over_line.as_deref(), result.over_result),
            Side::Under => (result.under_line.as_deref(), result.under_result),
            Side::Neutral => {
                summary.neutral += 1;
                continue;
            }
        };

        let Some(odds_text) = odds_text.filter(|t| !t.trim().is_empty()) else {
            summary.missing_odds += 1;
            continue;
        };

        if outcome == BetOutcome::Unknown {
            summary.unknown_outcome += 1;
            continue;
        }

        let Some(settlement) = settle_bet(odds_text, outcome) else {
            debug!("Could not parse odds '{odds_text}' for bet {}", result.id);
            summary.parse_errors += 1;
            continue;
        };

        db.update_settlement(
            result.id,
            settlement.stake,
            settlement.profit_loss,
            settlement.roi,
        )
        .await?;
        summary.settled += 1;
    }

    info!(
        "Settlement pass done: {} settled, {} neutral, {} missing odds, {} parse errors",
        summary.settled, summary.neutral, summary.missing_odds, summary.parse_errors
    );
    Ok(summary)
}

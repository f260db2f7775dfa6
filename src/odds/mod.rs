//! American-odds parsing and staking arithmetic.
//!
//! Odds arrive as free text from sportsbook pages, either bare ("+150",
//! "-110") or embedded in a compound line string ("2.5 (-110)"). Everything
//! downstream (implied probability, stake sizing, P/L) works off the parsed
//! signed integer.

#[cfg(test)]
mod tests;

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AppError, Result};

static PAREN_ODDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([+-]\d+)\)").expect("valid regex"));

static BARE_ODDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]\d+$").expect("valid regex"));

static LINE_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"));

/// Parse American odds out of a raw odds string.
///
/// Checks for a parenthesized price first ("2.5 (-110)" → -110), then a
/// bare signed integer ("+150" → 150). Returns `None` for empty or
/// unrecognized text.
pub fn parse(odds_text: &str) -> Option<i32> {
    let trimmed = odds_text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = PAREN_ODDS_RE.captures(trimmed) {
        return caps[1].parse().ok();
    }

    if BARE_ODDS_RE.is_match(trimmed) {
        return trimmed.parse().ok();
    }

    None
}

/// Extract the numeric line threshold from a raw line string, e.g.
/// "0.5 (+150)" → 0.5. Takes the first signed or unsigned decimal found.
pub fn extract_line(line_text: &str) -> Option<f64> {
    LINE_VALUE_RE
        .find(line_text.trim())
        .and_then(|m| m.as_str().parse().ok())
}

/// Implied win probability of an American price, in (0, 1).
///
/// +150 → 100/250 = 0.4; -200 → 200/300 ≈ 0.667. Zero is not a price.
pub fn implied_probability(odds: i32) -> Result<f64> {
    if odds == 0 {
        return Err(AppError::InvalidOdds(
            "zero is not a valid American price".to_string(),
        ));
    }

    let prob = if odds > 0 {
        100.0 / (f64::from(odds) + 100.0)
    } else {
        let abs = f64::from(odds.abs());
        abs / (abs + 100.0)
    };

    Ok(prob)
}

/// Tiered stake sizing in flat units.
///
/// Positive odds: [100,250]→100, (250,500]→50, (500,750]→25, above →15.
/// Positive odds below +100 also stake 100 (same band as the lowest tier;
/// a deliberate policy, such prices are rare). Negative odds stake |odds|,
/// i.e. risk enough to win 100 units. Zero has no stake.
pub fn suggested_stake(odds: i32) -> Option<f64> {
    if odds > 0 {
        let stake = match odds {
            100..=250 => 100.0,
            251..=500 => 50.0,
            501..=750 => 25.0,
            751.. => 15.0,
            _ => 100.0,
        };
        Some(stake)
    } else if odds < 0 {
        Some(f64::from(odds.abs()))
    } else {
        None
    }
}

/// Profit (positive) or loss (negative) of a settled wager.
///
/// A lost bet forfeits the stake. A won bet at positive odds pays
/// odds/100 per unit staked; at negative odds it pays 100/|odds| per unit.
pub fn profit_loss(odds: i32, stake: f64, won: bool) -> f64 {
    if !won {
        return -stake;
    }

    if odds > 0 {
        (f64::from(odds) / 100.0) * stake
    } else if odds < 0 {
        (100.0 / f64::from(odds.abs())) * stake
    } else {
        0.0
    }
}

/// Return on investment as a percentage. Undefined for a zero stake.
pub fn roi(profit_loss: f64, stake: f64) -> Option<f64> {
    if stake == 0.0 {
        return None;
    }
    Some((profit_loss / stake) * 100.0)
}

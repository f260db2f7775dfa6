//! Expected-value estimation and tier classification.
//!
//! Combines the model projection with the posted price on each side of a
//! line to score how much edge a prop carries, then buckets the result into
//! discrete tiers used for ranking and filtering.


use serde::Deserialize;

use crate::odds;
use crate::types::{Prop, Side, Tier};

/// EV thresholds for the A–D tiers, applied to |EV| in descending order.
/// Anything below the D cut (or any negative EV) lands in E.
const TIER_CUTS: [(f64, Tier); 4] = [
    (0.08, Tier::A),
    (0.04, Tier::B),
    (0.02, Tier::C),
    (0.01, Tier::D),
];

/// Computed value signal for one prop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEstimate {
    pub ev: f64,
    pub tier: Tier,
    pub side: Side,
}

/// Probability that the actual statistic lands over the line, as a step
/// function of `projection - line`.
///
/// The breakpoints are a hand-tuned heuristic, not a fitted distribution;
/// they are kept exactly as calibrated against historical results. A real
/// probabilistic model would replace this function wholesale.
pub fn estimate_probability_over(projection: f64, line: f64) -> f64 {
    let diff = projection - line;

    if diff >= 0.5 {
        0.75
    } else if diff >= 0.2 {
        0.65
    } else if diff >= 0.05 {
        0.58
    } else if diff >= -0.05 {
        0.52
    } else if diff >= -0.2 {
        0.45
    } else {
        0.35
    }
}

pub fn estimate_probability_under(projection: f64, line: f64) -> f64 {
    1.0 - estimate_probability_over(projection, line)
}

/// EV of one side given its win probability and raw odds text.
/// `ev = p * payout_ratio - (1 - p)` with `payout_ratio = 1/implied - 1`.
fn side_ev(prob_win: f64, odds_text: &str) -> Option<f64> {
    let price = odds::parse(odds_text)?;
    let implied = odds::implied_probability(price).ok()?;
    let payout_ratio = 1.0 / implied - 1.0;
    Some(prob_win * payout_ratio - (1.0 - prob_win))
}

/// Expected value per unit staked for a prop side.
///
/// With an explicit OVER/UNDER side, only that side is priced. With a
/// neutral side, both sides are priced and the higher EV wins; if only one
/// side has parseable odds, that side is used.
pub fn expected_value(
    side: Side,
    projection: f64,
    line: f64,
    over_odds: Option<&str>,
    under_odds: Option<&str>,
) -> Option<(f64, Side)> {
    let over = over_odds.and_then(|o| side_ev(estimate_probability_over(projection, line), o));
    let under = under_odds.and_then(|o| side_ev(estimate_probability_under(projection, line), o));

    match side {
        Side::Over => over.map(|ev| (ev, Side::Over)),
        Side::Under => under.map(|ev| (ev, Side::Under)),
        Side::Neutral => match (over, under) {
            (Some(o), Some(u)) => {
                if o > u {
                    Some((o, Side::Over))
                } else {
                    Some((u, Side::Under))
                }
            }
            (Some(o), None) => Some((o, Side::Over)),
            (None, Some(u)) => Some((u, Side::Under)),
            (None, None) => None,
        },
    }
}

/// Bucket an EV fraction into a tier.
///
/// Negative EV is always E no matter its magnitude: a confidently negative
/// bet must never rank above a barely-positive one.
pub fn classify_tier(ev: f64) -> Tier {
    if ev < 0.0 {
        return Tier::E;
    }

    for (cut, tier) in TIER_CUTS {
        if ev.abs() >= cut {
            return tier;
        }
    }

    Tier::E
}

/// Full value signal for a prop: EV, tier and effective side.
///
/// Returns `None` when the prop is missing a model projection, a numeric
/// line, or any parseable odds.
pub fn compute_value(prop: &Prop) -> Option<ValueEstimate> {
    let projection = prop.model_projection?;
    let line = prop
        .over_line
        .as_deref()
        .and_then(odds::extract_line)
        .or_else(|| prop.under_line.as_deref().and_then(odds::extract_line))?;

    let (ev, side) = expected_value(
        prop.suggested_bet,
        projection,
        line,
        prop.over_line.as_deref(),
        prop.under_line.as_deref(),
    )?;

    Some(ValueEstimate {
        ev,
        tier: classify_tier(ev),
        side,
    })
}

#[derive(Debug, Deserialize)]
struct RawSignalBlob {
    #[serde(default)]
    images: Vec<RawSignalImage>,
}

#[derive(Debug, Deserialize)]
struct RawSignalImage {
    #[serde(default)]
    src: String,
}

/// Decode the upstream tier signal into a tier letter.
///
/// The signal is either a JSON blob of scraped image tags or a plain string;
/// the `plus_*` asset name inside it carries the tier. The mapping is
/// inverted relative to the asset letters (plus_e is the TOP tier) and must
/// not be reordered. Anything unrecognized is the no-tier bucket.
pub fn decode_tier_signal(raw: Option<&str>) -> Tier {
    let Some(raw) = raw else {
        return Tier::F;
    };
    if raw.trim().is_empty() {
        return Tier::F;
    }

    let haystack = match serde_json::from_str::<RawSignalBlob>(raw) {
        Ok(blob) => match blob.images.into_iter().next() {
            Some(img) => img.src,
            None => return Tier::F,
        },
        Err(_) => raw.to_string(),
    };

    if haystack.contains("plus_e") {
        Tier::A
    } else if haystack.contains("plus_d") {
        Tier::B
    } else if haystack.contains("plus_c") {
        Tier::C
    } else if haystack.contains("plus_b") {
        Tier::D
    } else if haystack.contains("plus_a") {
        Tier::E
    } else {
        Tier::F
    }
}

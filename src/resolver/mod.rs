//! Bet resolution: matching open props against arrived box scores.
//!
//! A prop is OPEN until a box score for its player and date shows up and its
//! market maps to a known statistic; then a single resolution row is written
//! and the prop is RESOLVED forever. There is no failure state; a prop with
//! no matching result simply stays OPEN until one arrives.

mod market;

pub use market::{extract_stat, MARKET_TABLE};

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::ident::{normalize_key, NameBook};
use crate::storage::Database;
use crate::types::{BetOutcome, BoxScore, NewBetResult, Prop, Side};

/// What one `resolve_all` pass did. Safe to sum across repeated calls:
/// already-resolved props are never revisited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    /// Props that got a resolution row this pass.
    pub resolved: usize,
    /// Props whose market string maps to no known statistic.
    pub errors: usize,
    /// Props left OPEN: neutral suggestion, or no matching box score yet.
    pub skipped: usize,
    /// OPEN props considered this pass.
    pub total_open: usize,
    /// Box-score rows available for the date.
    pub box_scores: usize,
}

pub struct BetResolver<'a> {
    db: &'a Database,
    result_source: String,
    result_confidence: f64,
}

enum BetFate {
    Resolved,
    NoBoxScore,
    NeutralSide,
    UnknownMarket,
    AlreadyResolved,
}

impl<'a> BetResolver<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            result_source: "box_score_auto".to_string(),
            result_confidence: 0.95,
        }
    }

    pub fn with_source(mut self, source: &str, confidence: f64) -> Self {
        self.result_source = source.to_string();
        self.result_confidence = confidence;
        self
    }

    /// Resolve every OPEN prop for `date` against the box scores currently
    /// on hand. Idempotent: a second call with unchanged data resolves
    /// nothing and writes nothing.
    pub async fn resolve_all(&self, date: NaiveDate) -> Result<ResolutionSummary> {
        let mut summary = ResolutionSummary::default();

        let box_scores = self.db.box_scores_for_date(date).await?;
        summary.box_scores = box_scores.len();
        if box_scores.is_empty() {
            info!("No box scores for {date} yet; nothing to resolve");
            return Ok(summary);
        }

        let open = self.db.unresolved_props_for_date(date).await?;
        summary.total_open = open.len();
        if open.is_empty() {
            info!("No open props for {date}");
            return Ok(summary);
        }

        let book = NameBook::new(self.db.name_mappings().await?);
        let lookup = build_lookup(&box_scores, &book);

        info!(
            "Resolving {} open props for {date} against {} box scores",
            open.len(),
            box_scores.len()
        );

        for prop in &open {
            match self.resolve_one(prop, &lookup, &book).await? {
                BetFate::Resolved => summary.resolved += 1,
                BetFate::UnknownMarket => summary.errors += 1,
                BetFate::NoBoxScore | BetFate::NeutralSide | BetFate::AlreadyResolved => {
                    summary.skipped += 1
                }
            }
        }

        info!(
            "Resolution pass done: {} resolved, {} errors, {} skipped",
            summary.resolved, summary.errors, summary.skipped
        );
        Ok(summary)
    }

    async fn resolve_one(
        &self,
        prop: &Prop,
        lookup: &HashMap<String, &BoxScore>,
        book: &NameBook,
    ) -> Result<BetFate> {
        // A neutral (or absent) suggestion carries no wager to settle.
        if prop.suggested_bet == Side::Neutral {
            debug!(
                "Skipping {} {}: no suggested side",
                prop.player_name, prop.market
            );
            return Ok(BetFate::NeutralSide);
        }

        // Direct key first, then the canonical name from the mapping table.
        let direct_key = normalize_key(&prop.player_name, &prop.team);
        let score = match lookup.get(&direct_key) {
            Some(score) => *score,
            None => {
                let canonical = book.resolve(&prop.player_name, &prop.team);
                if canonical == prop.player_name {
                    debug!(
                        "No box score for {} ({}) yet",
                        prop.player_name, prop.team
                    );
                    return Ok(BetFate::NoBoxScore);
                }
                match lookup.get(&normalize_key(&canonical, &prop.team)) {
                    Some(score) => {
                        debug!("Matched '{}' via mapping '{canonical}'", prop.player_name);
                        *score
                    }
                    None => return Ok(BetFate::NoBoxScore),
                }
            }
        };

        let Some(actual) = extract_stat(&prop.market, score) else {
            warn!(
                "Unknown market '{}' for {}; leaving open",
                prop.market, prop.player_name
            );
            return Ok(BetFate::UnknownMarket);
        };

        let line_text = match prop.suggested_bet {
            Side::Over => prop.over_line.as_deref(),
            Side::Under => prop.under_line.as_deref(),
            Side::Neutral => unreachable!("neutral handled above"),
        };
        let (over_result, under_result) = determine_outcomes(actual, line_text);

        let row = NewBetResult {
            prop_id: prop.id,
            market: prop.market.clone(),
            player_name: prop.player_name.clone(),
            team: prop.team.clone(),
            game_id: prop.game_id.clone(),
            over_line: prop.over_line.clone(),
            under_line: prop.under_line.clone(),
            suggested_bet: prop.suggested_bet,
            tier: prop.tier,
            actual_result: actual,
            over_result,
            under_result,
            result_source: self.result_source.clone(),
            result_confidence: self.result_confidence,
            resolved_at: Utc::now(),
            notes: Some(format!("Auto-resolved from {} box score", score.data_source)),
        };

        if self.db.insert_bet_result(&row).await? {
            debug!(
                "Resolved {} {}: actual {actual} ({over_result}/{under_result})",
                prop.player_name, prop.market
            );
            Ok(BetFate::Resolved)
        } else {
            // Lost the race against an earlier write; the constraint makes
            // this a no-op.
            Ok(BetFate::AlreadyResolved)
        }
    }
}

/// Win/loss/push for both sides of the line.
///
/// The line is the first decimal in the suggested side's raw odds text;
/// without one, both outcomes are unknown (the stat is still recorded).
fn determine_outcomes(actual: f64, line_text: Option<&str>) -> (BetOutcome, BetOutcome) {
    let Some(line) = line_text.and_then(crate::odds::extract_line) else {
        return (BetOutcome::Unknown, BetOutcome::Unknown);
    };

    if actual > line {
        (BetOutcome::Win, BetOutcome::Loss)
    } else if actual < line {
        (BetOutcome::Loss, BetOutcome::Win)
    } else {
        (BetOutcome::Push, BetOutcome::Push)
    }
}

/// Index box scores by normalized player key, including one entry per
/// betting alias of each canonical name so feed spellings hit directly.
/// First writer wins on key collisions (one game per player per day).
fn build_lookup<'s>(
    box_scores: &'s [BoxScore],
    book: &NameBook,
) -> HashMap<String, &'s BoxScore> {
    let mut lookup: HashMap<String, &BoxScore> = HashMap::new();

    for score in box_scores {
        lookup
            .entry(normalize_key(&score.player_name, &score.team))
            .or_insert(score);

        for alias in book.aliases_for(&score.player_name) {
            lookup
                .entry(normalize_key(alias, &score.team))
                .or_insert(score);
        }
    }

    lookup
}

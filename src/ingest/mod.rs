//! Feed ingestion: raw upstream records → normalized rows.
//!
//! The scrapers and stats providers live outside this crate; they hand over
//! plain record sequences (here, JSON files at the CLI boundary). Ingestion
//! normalizes free-text fields (projections, suggested side, tier signal,
//! game string) and writes rows with replace semantics, wrapped in a scrape
//! session for bookkeeping.

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::Database;
use crate::types::{NewBoxScore, NewProp, Side};
use crate::value;

/// Source of raw prop records for a date.
#[async_trait]
pub trait OddsFeed {
    async fn fetch_props(&self, date: NaiveDate) -> Result<Vec<RawPropRecord>>;
}

/// Source of raw box-score records for a date.
#[async_trait]
pub trait StatsFeed {
    async fn fetch_box_scores(&self, date: NaiveDate) -> Result<Vec<RawBoxScoreRecord>>;
}

/// One scraped prop row as the odds feed emits it. Everything numeric
/// arrives as text and is parsed best-effort during normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPropRecord {
    pub game: String,
    #[serde(default)]
    pub time: Option<String>,
    pub player: String,
    pub team: String,
    pub site: String,
    pub market: String,
    #[serde(default)]
    pub over: Option<String>,
    #[serde(default)]
    pub under: Option<String>,
    #[serde(default)]
    pub implied_projection: Option<String>,
    #[serde(default)]
    pub model_projection: Option<String>,
    #[serde(default)]
    pub suggested_bet: Option<String>,
    #[serde(default)]
    pub expected_value: Option<String>,
    #[serde(default)]
    pub page_number: Option<i64>,
}

/// One player's game statistics as a stats provider emits them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBoxScoreRecord {
    pub game_id: String,
    pub game_date: NaiveDate,
    pub player_name: String,
    pub team: String,
    #[serde(default)]
    pub game_completed: bool,

    #[serde(default)]
    pub at_bats: i64,
    #[serde(default)]
    pub hits: i64,
    #[serde(default)]
    pub runs: i64,
    #[serde(default)]
    pub rbi: i64,
    #[serde(default)]
    pub home_runs: i64,
    #[serde(default)]
    pub doubles: i64,
    #[serde(default)]
    pub triples: i64,
    #[serde(default)]
    pub singles: i64,
    #[serde(default)]
    pub walks: i64,
    #[serde(default)]
    pub strikeouts: i64,
    #[serde(default)]
    pub stolen_bases: i64,
    #[serde(default)]
    pub total_bases: i64,

    #[serde(default)]
    pub innings_pitched: f64,
    #[serde(default)]
    pub pitching_outs: i64,
    #[serde(default)]
    pub hits_allowed: i64,
    #[serde(default)]
    pub earned_runs: i64,
    #[serde(default)]
    pub walks_allowed: i64,
    #[serde(default)]
    pub strikeouts_pitched: i64,

    #[serde(default)]
    pub fielding_assists: i64,
    #[serde(default)]
    pub fielding_putouts: i64,
    #[serde(default)]
    pub fielding_errors: i64,

    #[serde(default = "default_source")]
    pub data_source: String,
    #[serde(default = "default_confidence")]
    pub data_confidence: f64,
}

fn default_source() -> String {
    "unknown".to_string()
}

fn default_confidence() -> f64 {
    1.0
}

/// Feed that reads record sequences from JSON files, the stand-in for the
/// external scraper processes at the CLI boundary.
pub struct JsonFeed {
    path: PathBuf,
}

impl JsonFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl OddsFeed for JsonFeed {
    async fn fetch_props(&self, _date: NaiveDate) -> Result<Vec<RawPropRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl StatsFeed for JsonFeed {
    async fn fetch_box_scores(&self, _date: NaiveDate) -> Result<Vec<RawBoxScoreRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// What one ingest pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub received: usize,
    pub written: u64,
    pub skipped: usize,
}

fn parse_projection(raw: &Option<String>) -> Option<f64> {
    raw.as_deref()?.trim().parse().ok()
}

/// Split a game string like "SEA@BOS" into (away, home).
fn split_game(game: &str) -> (String, String) {
    match game.split_once('@') {
        Some((away, home)) => (away.trim().to_string(), home.trim().to_string()),
        None => (String::new(), String::new()),
    }
}

/// Normalize one raw prop record. `None` when the identifying fields are
/// missing; one bad record never aborts the batch.
fn normalize_prop(
    record: &RawPropRecord,
    scrape_date: NaiveDate,
    session_id: &str,
) -> Option<NewProp> {
    if record.player.trim().is_empty()
        || record.market.trim().is_empty()
        || record.site.trim().is_empty()
    {
        return None;
    }

    let (away_team, home_team) = split_game(&record.game);
    let tier = value::decode_tier_signal(record.expected_value.as_deref());

    Some(NewProp {
        scrape_date,
        scrape_timestamp: Utc::now(),
        session_id: session_id.to_string(),
        game_id: record.game.trim().to_string(),
        game_time: record.time.clone(),
        home_team,
        away_team,
        player_name: record.player.trim().to_string(),
        team: record.team.trim().to_uppercase(),
        site: record.site.trim().to_string(),
        market: record.market.trim().to_string(),
        over_line: record.over.clone().filter(|s| !s.trim().is_empty()),
        under_line: record.under.clone().filter(|s| !s.trim().is_empty()),
        implied_projection: parse_projection(&record.implied_projection),
        model_projection: parse_projection(&record.model_projection),
        suggested_bet: Side::from_feed(record.suggested_bet.as_deref().unwrap_or("")),
        tier_signal: record.expected_value.clone(),
        tier,
        page_number: record.page_number.unwrap_or(0),
    })
}

/// Ingest a batch of raw prop records for a date under a scrape session.
pub async fn ingest_props(
    db: &Database,
    scrape_date: NaiveDate,
    records: Vec<RawPropRecord>,
) -> Result<IngestReport> {
    let session_id = db.start_session(scrape_date).await?;
    let mut report = IngestReport {
        received: records.len(),
        ..IngestReport::default()
    };

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        match normalize_prop(record, scrape_date, &session_id) {
            Some(row) => rows.push(row),
            None => {
                warn!("Skipping prop record with missing fields: {record:?}");
                report.skipped += 1;
            }
        }
    }

    match db.upsert_props(&rows).await {
        Ok(written) => {
            report.written = written;
            db.finish_session(&session_id, "completed", written as i64, None)
                .await?;
        }
        Err(e) => {
            db.finish_session(&session_id, "failed", 0, Some(&e.to_string()))
                .await?;
            return Err(e);
        }
    }

    info!(
        "Ingested {} of {} prop records for {scrape_date} ({} skipped)",
        report.written, report.received, report.skipped
    );
    Ok(report)
}

/// Ingest a batch of raw box scores. Rows for games not yet confirmed
/// complete are skipped; the result store only ever holds finished games.
pub async fn ingest_box_scores(
    db: &Database,
    records: Vec<RawBoxScoreRecord>,
) -> Result<IngestReport> {
    let mut report = IngestReport {
        received: records.len(),
        ..IngestReport::default()
    };

    let rows: Vec<NewBoxScore> = records
        .into_iter()
        .filter(|r| {
            if r.game_completed && !r.player_name.trim().is_empty() {
                true
            } else {
                report.skipped += 1;
                false
            }
        })
        .map(|r| NewBoxScore {
            game_id: r.game_id,
            game_date: r.game_date,
            player_name: r.player_name.trim().to_string(),
            team: r.team.trim().to_uppercase(),
            game_completed: r.game_completed,
            at_bats: r.at_bats,
            hits: r.hits,
            runs: r.runs,
            rbi: r.rbi,
            home_runs: r.home_runs,
            doubles: r.doubles,
            triples: r.triples,
            singles: r.singles,
            walks: r.walks,
            strikeouts: r.strikeouts,
            stolen_bases: r.stolen_bases,
            total_bases: r.total_bases,
            innings_pitched: r.innings_pitched,
            pitching_outs: r.pitching_outs,
            hits_allowed: r.hits_allowed,
            earned_runs: r.earned_runs,
            walks_allowed: r.walks_allowed,
            strikeouts_pitched: r.strikeouts_pitched,
            fielding_assists: r.fielding_assists,
            fielding_putouts: r.fielding_putouts,
            fielding_errors: r.fielding_errors,
            data_source: r.data_source,
            data_confidence: r.data_confidence,
        })
        .collect();

    report.written = db.upsert_box_scores(&rows).await?;

    info!(
        "Ingested {} of {} box-score records ({} skipped as incomplete)",
        report.written, report.received, report.skipped
    );
    Ok(report)
}

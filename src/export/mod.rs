//! CSV export of the best-odds view joined with resolution results.
//!
//! One file per date: every best-odds row, its resolution (if any), the
//! settled figures, and a single bet label derived from the suggested side.


use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::storage::Database;
use crate::types::{BetOutcome, Side, Tier};

/// One joined row of the export. `bet_results` columns are null for props
/// that have not resolved yet.
#[derive(Debug, sqlx::FromRow)]
pub struct ExportRow {
    pub scrape_date: NaiveDate,
    pub game_id: String,
    pub player_name: String,
    pub team: String,
    pub market: String,
    pub best_site: String,
    pub over_line: Option<String>,
    pub under_line: Option<String>,
    pub suggested_bet: Side,
    pub tier: Tier,
    pub implied_projection: Option<f64>,
    pub model_projection: Option<f64>,

    pub actual_result: Option<f64>,
    pub over_result: Option<BetOutcome>,
    pub under_result: Option<BetOutcome>,
    pub suggested_stake: Option<f64>,
    pub profit_loss: Option<f64>,
    pub roi_percentage: Option<f64>,
    pub canonical_name: Option<String>,
}

impl ExportRow {
    /// Single bet label from the suggested side's outcome.
    pub fn bet_label(&self) -> &'static str {
        let outcome = match self.suggested_bet {
            Side::Over => self.over_result,
            Side::Under => self.under_result,
            Side::Neutral => return "NO_BET",
        };

        match outcome {
            None => "UNRESOLVED",
            Some(BetOutcome::Win) => "WIN",
            Some(BetOutcome::Loss) => "LOSS",
            Some(BetOutcome::Push) => "PUSH",
            Some(BetOutcome::Unknown) => "UNKNOWN",
        }
    }
}

pub async fn export_rows(db: &Database, date: NaiveDate) -> Result<Vec<ExportRow>> {
    let rows = sqlx::query_as::<_, ExportRow>(
        r#"
        SELECT
            bo.scrape_date, bo.game_id, bo.player_name, bo.team, bo.market,
            bo.best_site, bo.over_line, bo.under_line, bo.suggested_bet,
            bo.tier, bo.implied_projection, bo.model_projection,
            br.actual_result, br.over_result, br.under_result,
            br.suggested_stake, br.profit_loss, br.roi_percentage,
            nm.canonical_name
        FROM best_odds bo
        LEFT JOIN bet_results br ON bo.original_prop_id = br.prop_id
        LEFT JOIN name_mapping nm ON bo.player_name = nm.betting_name
        WHERE bo.scrape_date = ?
        ORDER BY bo.tier, br.roi_percentage DESC, bo.player_name, bo.market
        "#,
    )
    .bind(date)
    .fetch_all(db.pool())
    .await?;
    Ok(rows)
}

/// Write the joined view for a date to a CSV file. Returns the row count.
pub async fn export_date_csv(db: &Database, date: NaiveDate, out_path: &Path) -> Result<usize> {
    let rows = export_rows(db, date).await?;

    let mut writer = csv::Writer::from_path(out_path)?;
    writer.write_record([
        "scrape_date",
        "game_id",
        "player_name",
        "canonical_name",
        "team",
        "market",
        "best_site",
        "over_line",
        "under_line",
        "suggested_bet",
        "tier",
        "implied_projection",
        "model_projection",
        "actual_result",
        "over_result",
        "under_result",
        "bet_result",
        "suggested_stake",
        "profit_loss",
        "roi_percentage",
    ])?;

    for row in &rows {
        writer.write_record([
            row.scrape_date.to_string(),
            row.game_id.clone(),
            row.player_name.clone(),
            row.canonical_name.clone().unwrap_or_default(),
            row.team.clone(),
            row.market.clone(),
            row.best_site.clone(),
            row.over_line.clone().unwrap_or_default(),
            row.under_line.clone().unwrap_or_default(),
            row.suggested_bet.to_string(),
            row.tier.to_string(),
            fmt_opt_f64(row.implied_projection),
            fmt_opt_f64(row.model_projection),
            fmt_opt_f64(row.actual_result),
            row.over_result.map(|o| o.to_string()).unwrap_or_default(),
            row.under_result.map(|o| o.to_string()).unwrap_or_default(),
            row.bet_label().to_string(),
            fmt_opt_f64(row.suggested_stake),
            fmt_opt_f64(row.profit_loss),
            fmt_opt_f64(row.roi_percentage),
        ])?;
    }

    writer.flush()?;
    info!("Exported {} rows for {date} to {}", rows.len(), out_path.display());
    Ok(rows.len())
}

fn fmt_opt_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

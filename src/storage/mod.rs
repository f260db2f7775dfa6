//! SQLite persistence behind an explicit `Database` handle.
//!
//! Every component that needs storage takes this handle as an argument;
//! there is no ambient global connection. Queries are kept dumb; decision
//! logic (tier comparison, outcome math) lives in the calling modules.

mod schema;

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{
    BestOdds, BetResult, BoxScore, NameMapping, NewBetResult, NewBoxScore, NewProp, Prop,
};

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `path` and ensure the
    /// schema exists.
    pub async fn connect(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        schema::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Raw pool access for read-only query surfaces (export, reporting).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ----- scrape sessions -------------------------------------------------

    pub async fn start_session(&self, scrape_date: NaiveDate) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO scrape_sessions (session_id, scrape_date, started_at, status)
            VALUES (?, ?, ?, 'running')
            "#,
        )
        .bind(&session_id)
        .bind(scrape_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(session_id)
    }

    pub async fn finish_session(
        &self,
        session_id: &str,
        status: &str,
        records_ingested: i64,
        error_message: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scrape_sessions
            SET finished_at = ?, status = ?, records_ingested = ?, error_message = ?
            WHERE session_id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(status)
        .bind(records_ingested)
        .bind(error_message)
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ----- props -----------------------------------------------------------

    /// Insert props with replace semantics: a re-scrape of the same
    /// (date, player, team, market, site) key supersedes the earlier row.
    pub async fn upsert_props(&self, rows: &[NewProp]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for row in rows {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO props (
                    scrape_date, scrape_timestamp, session_id,
                    game_id, game_time, home_team, away_team,
                    player_name, team, site, market, over_line, under_line,
                    implied_projection, model_projection, suggested_bet,
                    tier_signal, tier, page_number
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(row.scrape_date)
            .bind(row.scrape_timestamp)
            .bind(&row.session_id)
            .bind(&row.game_id)
            .bind(&row.game_time)
            .bind(&row.home_team)
            .bind(&row.away_team)
            .bind(&row.player_name)
            .bind(&row.team)
            .bind(&row.site)
            .bind(&row.market)
            .bind(&row.over_line)
            .bind(&row.under_line)
            .bind(row.implied_projection)
            .bind(row.model_projection)
            .bind(row.suggested_bet)
            .bind(&row.tier_signal)
            .bind(row.tier)
            .bind(row.page_number)
            .execute(&mut *tx)
            .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    pub async fn props_for_date(&self, scrape_date: NaiveDate) -> Result<Vec<Prop>> {
        let rows = sqlx::query_as::<_, Prop>(
            "SELECT * FROM props WHERE scrape_date = ? ORDER BY player_name, market, id",
        )
        .bind(scrape_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Props for a date with no resolution row yet (still OPEN).
    pub async fn unresolved_props_for_date(&self, scrape_date: NaiveDate) -> Result<Vec<Prop>> {
        let rows = sqlx::query_as::<_, Prop>(
            r#"
            SELECT p.*
            FROM props p
            LEFT JOIN bet_results br ON p.id = br.prop_id
            WHERE br.id IS NULL AND p.scrape_date = ?
            ORDER BY p.player_name, p.market
            "#,
        )
        .bind(scrape_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ----- box scores ------------------------------------------------------

    /// Insert box scores, replacing earlier rows for the same
    /// (game, player, team, date) key so partial data can be corrected.
    pub async fn upsert_box_scores(&self, rows: &[NewBoxScore]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for row in rows {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO box_scores (
                    game_id, game_date, player_name, team, game_completed,
                    at_bats, hits, runs, rbi, home_runs, doubles, triples, singles,
                    walks, strikeouts, stolen_bases, total_bases,
                    innings_pitched, pitching_outs, hits_allowed, earned_runs,
                    walks_allowed, strikeouts_pitched,
                    fielding_assists, fielding_putouts, fielding_errors,
                    data_source, data_confidence
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.game_id)
            .bind(row.game_date)
            .bind(&row.player_name)
            .bind(&row.team)
            .bind(row.game_completed)
            .bind(row.at_bats)
            .bind(row.hits)
            .bind(row.runs)
            .bind(row.rbi)
            .bind(row.home_runs)
            .bind(row.doubles)
            .bind(row.triples)
            .bind(row.singles)
            .bind(row.walks)
            .bind(row.strikeouts)
            .bind(row.stolen_bases)
            .bind(row.total_bases)
            .bind(row.innings_pitched)
            .bind(row.pitching_outs)
            .bind(row.hits_allowed)
            .bind(row.earned_runs)
            .bind(row.walks_allowed)
            .bind(row.strikeouts_pitched)
            .bind(row.fielding_assists)
            .bind(row.fielding_putouts)
            .bind(row.fielding_errors)
            .bind(&row.data_source)
            .bind(row.data_confidence)
            .execute(&mut *tx)
            .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    pub async fn box_scores_for_date(&self, game_date: NaiveDate) -> Result<Vec<BoxScore>> {
        let rows = sqlx::query_as::<_, BoxScore>(
            "SELECT * FROM box_scores WHERE game_date = ? ORDER BY game_id, team, player_name",
        )
        .bind(game_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ----- bet results -----------------------------------------------------

    /// Insert a resolution row. Returns false when the prop already has one
    /// (the UNIQUE(prop_id) constraint makes settlement at-most-once; a
    /// duplicate attempt is a no-op, not an error).
    pub async fn insert_bet_result(&self, row: &NewBetResult) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO bet_results (
                prop_id, market, player_name, team, game_id,
                over_line, under_line, suggested_bet, tier,
                actual_result, over_result, under_result,
                result_source, result_confidence, resolved_at, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(row.prop_id)
        .bind(&row.market)
        .bind(&row.player_name)
        .bind(&row.team)
        .bind(&row.game_id)
        .bind(&row.over_line)
        .bind(&row.under_line)
        .bind(row.suggested_bet)
        .bind(row.tier)
        .bind(row.actual_result)
        .bind(row.over_result)
        .bind(row.under_result)
        .bind(&row.result_source)
        .bind(row.result_confidence)
        .bind(row.resolved_at)
        .bind(&row.notes)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn bet_results_for_date(&self, scrape_date: NaiveDate) -> Result<Vec<BetResult>> {
        self.bet_results_between(scrape_date, scrape_date).await
    }

    pub async fn bet_results_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<BetResult>> {
        let rows = sqlx::query_as::<_, BetResult>(
            r#"
            SELECT br.*
            FROM bet_results br
            JOIN props p ON br.prop_id = p.id
            WHERE p.scrape_date >= ? AND p.scrape_date <= ?
            ORDER BY br.id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_settlement(
        &self,
        bet_result_id: i64,
        stake: f64,
        profit_loss: f64,
        roi_percentage: Option<f64>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE bet_results
            SET suggested_stake = ?, profit_loss = ?, roi_percentage = ?
            WHERE id = ?
            "#,
        )
        .bind(stake)
        .bind(profit_loss)
        .bind(roi_percentage)
        .bind(bet_result_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ----- name mappings ---------------------------------------------------

    pub async fn add_name_mapping(
        &self,
        betting_name: &str,
        canonical_name: &str,
        team: Option<&str>,
        mapping_type: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO name_mapping (betting_name, canonical_name, team, mapping_type)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(betting_name)
        .bind(canonical_name)
        .bind(team)
        .bind(mapping_type)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn name_mappings(&self) -> Result<Vec<NameMapping>> {
        let rows =
            sqlx::query_as::<_, NameMapping>("SELECT * FROM name_mapping ORDER BY betting_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    // ----- best odds -------------------------------------------------------

    /// Replace the best-odds view for a date with the given winning props.
    /// The previous rows for the date are discarded first.
    pub async fn replace_best_odds(&self, scrape_date: NaiveDate, winners: &[Prop]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM best_odds WHERE scrape_date = ?")
            .bind(scrape_date)
            .execute(&mut *tx)
            .await?;

        let mut written = 0u64;
        for prop in winners {
            sqlx::query(
                r#"
                INSERT INTO best_odds (
                    scrape_date, scrape_timestamp,
                    game_id, game_time, home_team, away_team,
                    player_name, team, market, best_site, over_line, under_line,
                    implied_projection, model_projection, suggested_bet,
                    tier_signal, tier, original_prop_id
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(prop.scrape_date)
            .bind(prop.scrape_timestamp)
            .bind(&prop.game_id)
            .bind(&prop.game_time)
            .bind(&prop.home_team)
            .bind(&prop.away_team)
            .bind(&prop.player_name)
            .bind(&prop.team)
            .bind(&prop.market)
            .bind(&prop.site)
            .bind(&prop.over_line)
            .bind(&prop.under_line)
            .bind(prop.implied_projection)
            .bind(prop.model_projection)
            .bind(prop.suggested_bet)
            .bind(&prop.tier_signal)
            .bind(prop.tier)
            .bind(prop.id)
            .execute(&mut *tx)
            .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    pub async fn best_odds_for_date(&self, scrape_date: NaiveDate) -> Result<Vec<BestOdds>> {
        let rows = sqlx::query_as::<_, BestOdds>(
            "SELECT * FROM best_odds WHERE scrape_date = ? ORDER BY player_name, market",
        )
        .bind(scrape_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn best_odds_by_tier(
        &self,
        scrape_date: NaiveDate,
        tier: crate::types::Tier,
    ) -> Result<Vec<BestOdds>> {
        let rows = sqlx::query_as::<_, BestOdds>(
            "SELECT * FROM best_odds WHERE scrape_date = ? AND tier = ? ORDER BY player_name, market",
        )
        .bind(scrape_date)
        .bind(tier)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The actionable subset of the best-odds view: top three tiers with a
    /// non-neutral suggestion.
    pub async fn plus_ev_for_date(&self, scrape_date: NaiveDate) -> Result<Vec<BestOdds>> {
        let rows = sqlx::query_as::<_, BestOdds>(
            r#"
            SELECT * FROM best_odds
            WHERE scrape_date = ?
              AND tier IN ('A', 'B', 'C')
              AND suggested_bet != 'NEUTRAL'
            ORDER BY tier, player_name, market
            "#,
        )
        .bind(scrape_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

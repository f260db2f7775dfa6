//! SQLite schema, created in code at connect time.
//!
//! Tables:
//! - props: every scraped prop line, unique per (date, player, team, market, site)
//! - best_odds: best-tier prop per (date, player, market), rebuilt per date
//! - box_scores: per-player statistics for completed games
//! - bet_results: one resolution row per prop, UNIQUE(prop_id)
//! - name_mapping: betting-name → canonical-name overrides
//! - scrape_sessions: ingest bookkeeping

use sqlx::SqlitePool;

use crate::error::Result;

pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS props (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scrape_date DATE NOT NULL,
            scrape_timestamp DATETIME NOT NULL,
            session_id TEXT NOT NULL,

            game_id TEXT NOT NULL,
            game_time TEXT,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,

            player_name TEXT NOT NULL,
            team TEXT NOT NULL,

            site TEXT NOT NULL,
            market TEXT NOT NULL,
            over_line TEXT,
            under_line TEXT,

            implied_projection REAL,
            model_projection REAL,
            suggested_bet TEXT NOT NULL DEFAULT 'NEUTRAL',

            tier_signal TEXT,
            tier TEXT NOT NULL DEFAULT 'F',

            page_number INTEGER NOT NULL DEFAULT 0,

            UNIQUE(scrape_date, player_name, team, market, site)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS best_odds (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            scrape_date DATE NOT NULL,
            scrape_timestamp DATETIME NOT NULL,

            game_id TEXT NOT NULL,
            game_time TEXT,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,

            player_name TEXT NOT NULL,
            team TEXT NOT NULL,

            market TEXT NOT NULL,
            best_site TEXT NOT NULL,
            over_line TEXT,
            under_line TEXT,

            implied_projection REAL,
            model_projection REAL,
            suggested_bet TEXT NOT NULL DEFAULT 'NEUTRAL',

            tier_signal TEXT,
            tier TEXT NOT NULL DEFAULT 'F',

            original_prop_id INTEGER NOT NULL REFERENCES props(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS box_scores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_id TEXT NOT NULL,
            game_date DATE NOT NULL,
            player_name TEXT NOT NULL,
            team TEXT NOT NULL,
            game_completed BOOLEAN NOT NULL DEFAULT FALSE,

            at_bats INTEGER NOT NULL DEFAULT 0,
            hits INTEGER NOT NULL DEFAULT 0,
            runs INTEGER NOT NULL DEFAULT 0,
            rbi INTEGER NOT NULL DEFAULT 0,
            home_runs INTEGER NOT NULL DEFAULT 0,
            doubles INTEGER NOT NULL DEFAULT 0,
            triples INTEGER NOT NULL DEFAULT 0,
            singles INTEGER NOT NULL DEFAULT 0,
            walks INTEGER NOT NULL DEFAULT 0,
            strikeouts INTEGER NOT NULL DEFAULT 0,
            stolen_bases INTEGER NOT NULL DEFAULT 0,
            total_bases INTEGER NOT NULL DEFAULT 0,

            innings_pitched REAL NOT NULL DEFAULT 0.0,
            pitching_outs INTEGER NOT NULL DEFAULT 0,
            hits_allowed INTEGER NOT NULL DEFAULT 0,
            earned_runs INTEGER NOT NULL DEFAULT 0,
            walks_allowed INTEGER NOT NULL DEFAULT 0,
            strikeouts_pitched INTEGER NOT NULL DEFAULT 0,

            fielding_assists INTEGER NOT NULL DEFAULT 0,
            fielding_putouts INTEGER NOT NULL DEFAULT 0,
            fielding_errors INTEGER NOT NULL DEFAULT 0,

            data_source TEXT NOT NULL,
            data_confidence REAL NOT NULL DEFAULT 1.0,

            UNIQUE(game_id, player_name, team, game_date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bet_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            prop_id INTEGER NOT NULL REFERENCES props(id),

            market TEXT NOT NULL,
            player_name TEXT NOT NULL,
            team TEXT NOT NULL,
            game_id TEXT NOT NULL,

            over_line TEXT,
            under_line TEXT,
            suggested_bet TEXT NOT NULL,
            tier TEXT NOT NULL,

            actual_result REAL NOT NULL,
            over_result TEXT NOT NULL,
            under_result TEXT NOT NULL,

            result_source TEXT NOT NULL,
            result_confidence REAL NOT NULL,

            suggested_stake REAL,
            profit_loss REAL,
            roi_percentage REAL,

            resolved_at DATETIME NOT NULL,
            notes TEXT,

            UNIQUE(prop_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS name_mapping (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            betting_name TEXT NOT NULL,
            canonical_name TEXT NOT NULL,
            team TEXT,
            mapping_type TEXT NOT NULL DEFAULT 'manual',

            UNIQUE(betting_name, canonical_name, team)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scrape_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id TEXT UNIQUE NOT NULL,
            scrape_date DATE NOT NULL,
            started_at DATETIME NOT NULL,
            finished_at DATETIME,
            status TEXT NOT NULL,
            records_ingested INTEGER NOT NULL DEFAULT 0,
            error_message TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_props_scrape_date ON props(scrape_date)",
        "CREATE INDEX IF NOT EXISTS idx_props_player_team ON props(player_name, team)",
        "CREATE INDEX IF NOT EXISTS idx_props_tier ON props(tier)",
        "CREATE INDEX IF NOT EXISTS idx_best_odds_scrape_date ON best_odds(scrape_date)",
        "CREATE INDEX IF NOT EXISTS idx_best_odds_tier ON best_odds(tier)",
        "CREATE INDEX IF NOT EXISTS idx_box_scores_date ON box_scores(game_date)",
        "CREATE INDEX IF NOT EXISTS idx_bet_results_prop ON bet_results(prop_id)",
    ];
    for sql in indexes {
        sqlx::query(sql).execute(pool).await?;
    }

    Ok(())
}

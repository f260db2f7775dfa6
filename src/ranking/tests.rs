//! Tests for best-odds rebuild and performance aggregation

use super::*;
use crate::types::NewProp;
use chrono::Utc;
use tempfile::TempDir;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 26).unwrap()
}

fn settled_result(
    tier: Tier,
    side: Side,
    over: BetOutcome,
    under: BetOutcome,
    stake: Option<f64>,
    profit_loss: Option<f64>,
) -> BetResult {
    BetResult {
        id: 0,
        prop_id: 0,
        market: "Hits".to_string(),
        player_name: "James Smith".to_string(),
        team: "BOS".to_string(),
        game_id: "SEA@BOS".to_string(),
        over_line: Some("1.5 (-110)".to_string()),
        under_line: Some("1.5 (-110)".to_string()),
        suggested_bet: side,
        tier,
        actual_result: 2.0,
        over_result: over,
        under_result: under,
        result_source: "box_score_auto".to_string(),
        result_confidence: 0.95,
        suggested_stake: stake,
        profit_loss,
        roi_percentage: None,
        resolved_at: Utc::now(),
        notes: None,
    }
}

#[test]
fn aggregate_uses_suggested_side_outcome() {
    let results = vec![
        settled_result(
            Tier::A,
            Side::Over,
            BetOutcome::Win,
            BetOutcome::Loss,
            Some(100.0),
            Some(150.0),
        ),
        settled_result(
            Tier::A,
            Side::Under,
            BetOutcome::Win,
            BetOutcome::Loss,
            Some(110.0),
            Some(-110.0),
        ),
    ];

    let report = aggregate_performance(&results);
    assert_eq!(report.overall.bets, 2);
    // The under bet's outcome is its under_result (a loss), not the win
    // recorded for the over side.
    assert_eq!(report.overall.wins, 1);
    assert_eq!(report.overall.losses, 1);
    assert_eq!(report.overall.total_staked, 210.0);
    assert_eq!(report.overall.total_profit_loss, 40.0);
}

#[test]
fn aggregate_roi_is_pool_based_not_averaged() {
    // Per-bet ROIs are +150% and -100%; a naive average would be +25%.
    let results = vec![
        settled_result(
            Tier::B,
            Side::Over,
            BetOutcome::Win,
            BetOutcome::Loss,
            Some(100.0),
            Some(150.0),
        ),
        settled_result(
            Tier::B,
            Side::Over,
            BetOutcome::Loss,
            BetOutcome::Win,
            Some(300.0),
            Some(-300.0),
        ),
    ];

    let report = aggregate_performance(&results);
    let roi = report.overall.roi().unwrap();
    assert!((roi - (-150.0 / 400.0 * 100.0)).abs() < 1e-9);
}

#[test]
fn win_rate_excludes_pushes() {
    let results = vec![
        settled_result(
            Tier::C,
            Side::Over,
            BetOutcome::Win,
            BetOutcome::Loss,
            Some(100.0),
            Some(120.0),
        ),
        settled_result(
            Tier::C,
            Side::Over,
            BetOutcome::Loss,
            BetOutcome::Win,
            Some(100.0),
            Some(-100.0),
        ),
        settled_result(
            Tier::C,
            Side::Over,
            BetOutcome::Push,
            BetOutcome::Push,
            Some(100.0),
            Some(0.0),
        ),
    ];

    let report = aggregate_performance(&results);
    assert_eq!(report.overall.pushes, 1);
    assert_eq!(report.overall.win_rate(), Some(0.5));
}

#[test]
fn aggregate_skips_neutral_unknown_and_unsettled() {
    let results = vec![
        settled_result(
            Tier::A,
            Side::Neutral,
            BetOutcome::Win,
            BetOutcome::Loss,
            Some(100.0),
            Some(150.0),
        ),
        settled_result(
            Tier::A,
            Side::Over,
            BetOutcome::Unknown,
            BetOutcome::Unknown,
            Some(100.0),
            Some(0.0),
        ),
        settled_result(
            Tier::A,
            Side::Over,
            BetOutcome::Win,
            BetOutcome::Loss,
            None,
            None,
        ),
    ];

    let report = aggregate_performance(&results);
    assert_eq!(report.overall.bets, 0);
    assert_eq!(report.overall.roi(), None);
    assert_eq!(report.overall.win_rate(), None);
}

#[test]
fn tiers_sorted_best_first() {
    let results = vec![
        settled_result(
            Tier::C,
            Side::Over,
            BetOutcome::Win,
            BetOutcome::Loss,
            Some(100.0),
            Some(120.0),
        ),
        settled_result(
            Tier::A,
            Side::Over,
            BetOutcome::Loss,
            BetOutcome::Win,
            Some(100.0),
            Some(-100.0),
        ),
    ];

    let report = aggregate_performance(&results);
    let tiers: Vec<Tier> = report.tiers.iter().map(|(t, _)| *t).collect();
    assert_eq!(tiers, vec![Tier::A, Tier::C]);
}

// ----- best-odds rebuild ---------------------------------------------------

async fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("props.db");
    let db = Database::connect(path.to_str().unwrap()).await.unwrap();
    (dir, db)
}

fn new_prop(player: &str, market: &str, site: &str, tier: Tier) -> NewProp {
    NewProp {
        scrape_date: date(),
        scrape_timestamp: Utc::now(),
        session_id: "session-1".to_string(),
        game_id: "SEA@BOS".to_string(),
        game_time: None,
        home_team: "BOS".to_string(),
        away_team: "SEA".to_string(),
        player_name: player.to_string(),
        team: "BOS".to_string(),
        site: site.to_string(),
        market: market.to_string(),
        over_line: Some("1.5 (-110)".to_string()),
        under_line: Some("1.5 (-110)".to_string()),
        implied_projection: Some(1.2),
        model_projection: Some(1.4),
        suggested_bet: Side::Over,
        tier_signal: None,
        tier,
        page_number: 1,
    }
}

fn find<'p>(rows: &'p [BestOdds], player: &str) -> &'p BestOdds {
    rows.iter().find(|r| r.player_name == player).unwrap()
}

#[tokio::test]
async fn best_odds_keeps_best_tier_per_player_market() {
    let (_dir, db) = test_db().await;

    db.upsert_props(&[
        new_prop("James Smith", "Hits", "Fliff", Tier::C),
        new_prop("James Smith", "Hits", "Fanatics", Tier::A),
        new_prop("James Smith", "Runs", "Fliff", Tier::D),
    ])
    .await
    .unwrap();

    let written = rebuild_best_odds(&db, date()).await.unwrap();
    assert_eq!(written, 2);

    let rows = db.best_odds_for_date(date()).await.unwrap();
    let hits = rows.iter().find(|r| r.market == "Hits").unwrap();
    assert_eq!(hits.best_site, "Fanatics");
    assert_eq!(hits.tier, Tier::A);
}

#[tokio::test]
async fn best_odds_tie_keeps_earliest_row() {
    let (_dir, db) = test_db().await;

    db.upsert_props(&[new_prop("James Smith", "Hits", "Fliff", Tier::B)])
        .await
        .unwrap();
    db.upsert_props(&[new_prop("James Smith", "Hits", "Fanatics", Tier::B)])
        .await
        .unwrap();

    rebuild_best_odds(&db, date()).await.unwrap();

    let rows = db.best_odds_for_date(date()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(find(&rows, "James Smith").best_site, "Fliff");
}

#[tokio::test]
async fn best_odds_no_tier_ranks_below_everything() {
    let (_dir, db) = test_db().await;

    db.upsert_props(&[
        new_prop("James Smith", "Hits", "Fliff", Tier::F),
        new_prop("James Smith", "Hits", "Fanatics", Tier::E),
    ])
    .await
    .unwrap();

    rebuild_best_odds(&db, date()).await.unwrap();

    let rows = db.best_odds_for_date(date()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tier, Tier::E);
}

#[tokio::test]
async fn best_odds_queryable_by_tier() {
    let (_dir, db) = test_db().await;

    db.upsert_props(&[
        new_prop("James Smith", "Hits", "Fliff", Tier::A),
        new_prop("Al Jones", "Runs", "Fliff", Tier::C),
    ])
    .await
    .unwrap();
    rebuild_best_odds(&db, date()).await.unwrap();

    let tier_a = db.best_odds_by_tier(date(), Tier::A).await.unwrap();
    assert_eq!(tier_a.len(), 1);
    assert_eq!(tier_a[0].player_name, "James Smith");
    assert!(db.best_odds_by_tier(date(), Tier::B).await.unwrap().is_empty());
}

#[tokio::test]
async fn daily_summary_counts_tiers_and_resolutions() {
    let (_dir, db) = test_db().await;

    db.upsert_props(&[
        new_prop("James Smith", "Hits", "Fliff", Tier::A),
        new_prop("James Smith", "Runs", "Fliff", Tier::C),
        new_prop("Al Jones", "Hits", "Fanatics", Tier::C),
    ])
    .await
    .unwrap();

    let summary = daily_summary(&db, date()).await.unwrap();
    assert_eq!(summary.total_props, 3);
    assert_eq!(summary.unique_players, 2);
    assert_eq!(summary.unique_markets, 2);
    assert_eq!(summary.tier_counts, vec![(Tier::A, 1), (Tier::C, 2)]);
    assert_eq!(summary.resolved, 0);
    assert_eq!(summary.avg_result_confidence, None);
}

#[tokio::test]
async fn rebuild_replaces_prior_rows_for_the_date() {
    let (_dir, db) = test_db().await;

    db.upsert_props(&[new_prop("James Smith", "Hits", "Fliff", Tier::C)])
        .await
        .unwrap();
    rebuild_best_odds(&db, date()).await.unwrap();
    rebuild_best_odds(&db, date()).await.unwrap();

    let rows = db.best_odds_for_date(date()).await.unwrap();
    assert_eq!(rows.len(), 1);
}

//! Tests for settlement math and the settlement pass

use super::*;
use crate::resolver::BetResolver;
use crate::types::{NewBoxScore, NewProp, Tier};
use chrono::Utc;
use tempfile::TempDir;

#[test]
fn win_at_plus_260_stakes_50_and_pays_130() {
    let s = settle_bet("0.5 (+260)", BetOutcome::Win).unwrap();
    assert_eq!(s.stake, 50.0);
    assert!((s.profit_loss - 130.0).abs() < 1e-12);
    assert_eq!(s.roi, Some(260.0));
}

#[test]
fn loss_forfeits_the_stake() {
    let s = settle_bet("-110", BetOutcome::Loss).unwrap();
    assert_eq!(s.stake, 110.0);
    assert_eq!(s.profit_loss, -110.0);
    assert_eq!(s.roi, Some(-100.0));
}

#[test]
fn win_at_negative_odds_pays_to_win_100() {
    let s = settle_bet("-200", BetOutcome::Win).unwrap();
    assert_eq!(s.stake, 200.0);
    assert!((s.profit_loss - 100.0).abs() < 1e-12);
    assert_eq!(s.roi, Some(50.0));
}

#[test]
fn push_is_exactly_zero_regardless_of_odds() {
    for odds in ["+150", "-4000", "0.5 (+1420)"] {
        let s = settle_bet(odds, BetOutcome::Push).unwrap();
        assert_eq!(s.profit_loss, 0.0);
        assert_eq!(s.roi, Some(0.0));
    }
}

#[test]
fn unparseable_or_unknown_settles_nothing() {
    assert!(settle_bet("even", BetOutcome::Win).is_none());
    assert!(settle_bet("", BetOutcome::Loss).is_none());
    assert!(settle_bet("+150", BetOutcome::Unknown).is_none());
}

#[test]
fn settle_prop_uses_the_suggested_side() {
    let over_prop = full_prop(Side::Over);
    let s = settle_prop(&over_prop, BetOutcome::Win).unwrap();
    assert_eq!(s.stake, 50.0); // +260 band

    let under_prop = full_prop(Side::Under);
    let s = settle_prop(&under_prop, BetOutcome::Win).unwrap();
    assert_eq!(s.stake, 340.0); // -340 risks to win 100

    assert!(settle_prop(&full_prop(Side::Neutral), BetOutcome::Win).is_none());
}

fn full_prop(side: Side) -> Prop {
    Prop {
        id: 1,
        scrape_date: date(),
        scrape_timestamp: Utc::now(),
        session_id: "session-1".to_string(),
        game_id: "SEA@BOS".to_string(),
        game_time: None,
        home_team: "BOS".to_string(),
        away_team: "SEA".to_string(),
        player_name: "James Smith".to_string(),
        team: "BOS".to_string(),
        site: "Fliff".to_string(),
        market: "Home Runs".to_string(),
        over_line: Some("0.5 (+260)".to_string()),
        under_line: Some("0.5 (-340)".to_string()),
        implied_projection: Some(0.4),
        model_projection: Some(0.7),
        suggested_bet: side,
        tier_signal: None,
        tier: Tier::B,
        page_number: 1,
    }
}

// ----- settlement pass -----------------------------------------------------

fn date() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2025, 6, 26).unwrap()
}

async fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("props.db");
    let db = Database::connect(path.to_str().unwrap()).await.unwrap();
    (dir, db)
}

fn prop_fixture(player: &str, side: Side, over: &str, under: &str) -> NewProp {
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
        site: "Fliff".to_string(),
        market: "Home Runs".to_string(),
        over_line: Some(over.to_string()),
        under_line: Some(under.to_string()),
        implied_projection: Some(0.4),
        model_projection: Some(0.7),
        suggested_bet: side,
        tier_signal: None,
        tier: Tier::B,
        page_number: 1,
    }
}

fn box_score_fixture(player: &str, home_runs: i64) -> NewBoxScore {
    NewBoxScore {
        game_id: "SEA@BOS".to_string(),
        game_date: date(),
        player_name: player.to_string(),
        team: "BOS".to_string(),
        game_completed: true,
        home_runs,
        data_source: "primary".to_string(),
        data_confidence: 0.95,
        ..NewBoxScore::default()
    }
}

#[tokio::test]
async fn settle_pass_writes_stake_and_roi() {
    let (_dir, db) = test_db().await;

    // Over 0.5 at +260, player hits a home run: win, $50 stake, $130 profit.
    db.upsert_props(&[prop_fixture("James Smith", Side::Over, "0.5 (+260)", "0.5 (-340)")])
        .await
        .unwrap();
    db.upsert_box_scores(&[box_score_fixture("James Smith", 1)])
        .await
        .unwrap();
    BetResolver::new(&db).resolve_all(date()).await.unwrap();

    let summary = settle_date(&db, date()).await.unwrap();
    assert_eq!(summary.settled, 1);

    let result = &db.bet_results_for_date(date()).await.unwrap()[0];
    assert_eq!(result.suggested_stake, Some(50.0));
    assert_eq!(result.profit_loss, Some(130.0));
    assert_eq!(result.roi_percentage, Some(260.0));
}

#[tokio::test]
async fn settle_pass_counts_missing_odds() {
    let (_dir, db) = test_db().await;

    let mut prop = prop_fixture("James Smith", Side::Under, "0.5 (+260)", "");
    prop.under_line = None;
    db.upsert_props(&[prop]).await.unwrap();
    db.upsert_box_scores(&[box_score_fixture("James Smith", 0)])
        .await
        .unwrap();
    BetResolver::new(&db).resolve_all(date()).await.unwrap();

    let summary = settle_date(&db, date()).await.unwrap();
    assert_eq!(summary.settled, 0);
    assert_eq!(summary.missing_odds, 1);
}

#[tokio::test]
async fn settle_pass_is_idempotent() {
    let (_dir, db) = test_db().await;

    db.upsert_props(&[prop_fixture("James Smith", Side::Over, "0.5 (+260)", "0.5 (-340)")])
        .await
        .unwrap();
    db.upsert_box_scores(&[box_score_fixture("James Smith", 1)])
        .await
        .unwrap();
    BetResolver::new(&db).resolve_all(date()).await.unwrap();

    settle_date(&db, date()).await.unwrap();
    let second = settle_date(&db, date()).await.unwrap();
    assert_eq!(second.settled, 1);

    let result = &db.bet_results_for_date(date()).await.unwrap()[0];
    assert_eq!(result.profit_loss, Some(130.0));
}

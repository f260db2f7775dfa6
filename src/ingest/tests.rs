//! Tests for feed normalization and ingestion

use super::*;
use crate::types::Tier;
use tempfile::TempDir;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 26).unwrap()
}

async fn test_db() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("props.db");
    let db = Database::connect(path.to_str().unwrap()).await.unwrap();
    (dir, db)
}

fn raw_prop(player: &str) -> RawPropRecord {
    RawPropRecord {
        game: "SEA@BOS".to_string(),
        time: Some("7:10 PM".to_string()),
        player: player.to_string(),
        team: "bos".to_string(),
        site: "Fliff".to_string(),
        market: "Home Runs".to_string(),
        over: Some("0.5 (+260)".to_string()),
        under: Some("0.5 (-340)".to_string()),
        implied_projection: Some("0.4".to_string()),
        model_projection: Some("0.7".to_string()),
        suggested_bet: Some("OVER".to_string()),
        expected_value: Some(r#"{"images":[{"src":"plus_d_4.png"}]}"#.to_string()),
        page_number: Some(2),
    }
}

fn raw_box_score(player: &str, completed: bool) -> RawBoxScoreRecord {
    RawBoxScoreRecord {
        game_id: "SEA@BOS".to_string(),
        game_date: date(),
        player_name: player.to_string(),
        team: "BOS".to_string(),
        game_completed: completed,
        at_bats: 4,
        hits: 2,
        runs: 1,
        rbi: 0,
        home_runs: 1,
        doubles: 0,
        triples: 0,
        singles: 1,
        walks: 0,
        strikeouts: 1,
        stolen_bases: 0,
        total_bases: 5,
        innings_pitched: 0.0,
        pitching_outs: 0,
        hits_allowed: 0,
        earned_runs: 0,
        walks_allowed: 0,
        strikeouts_pitched: 0,
        fielding_assists: 0,
        fielding_putouts: 0,
        fielding_errors: 0,
        data_source: "primary".to_string(),
        data_confidence: 0.95,
    }
}

#[test]
fn split_game_handles_both_shapes() {
    assert_eq!(
        split_game("SEA@BOS"),
        ("SEA".to_string(), "BOS".to_string())
    );
    assert_eq!(split_game("TBD"), (String::new(), String::new()));
}

#[test]
fn normalize_prop_decodes_derived_fields() {
    let row = normalize_prop(&raw_prop("J. Smith"), date(), "session-1").unwrap();
    assert_eq!(row.team, "BOS");
    assert_eq!(row.away_team, "SEA");
    assert_eq!(row.home_team, "BOS");
    assert_eq!(row.suggested_bet, Side::Over);
    assert_eq!(row.tier, Tier::B);
    assert_eq!(row.implied_projection, Some(0.4));
    assert_eq!(row.model_projection, Some(0.7));
}

#[test]
fn normalize_prop_rejects_missing_identity() {
    let mut record = raw_prop("");
    record.player = "  ".to_string();
    assert!(normalize_prop(&record, date(), "session-1").is_none());

    let mut record = raw_prop("J. Smith");
    record.market = String::new();
    assert!(normalize_prop(&record, date(), "session-1").is_none());
}

#[test]
fn normalize_prop_tolerates_unparseable_numbers() {
    let mut record = raw_prop("J. Smith");
    record.model_projection = Some("n/a".to_string());
    record.expected_value = None;
    let row = normalize_prop(&record, date(), "session-1").unwrap();
    assert_eq!(row.model_projection, None);
    assert_eq!(row.tier, Tier::F);
}

#[tokio::test]
async fn ingest_props_writes_and_counts() {
    let (_dir, db) = test_db().await;

    let mut bad = raw_prop("");
    bad.player = String::new();
    let report = ingest_props(&db, date(), vec![raw_prop("J. Smith"), bad])
        .await
        .unwrap();

    assert_eq!(report.received, 2);
    assert_eq!(report.written, 1);
    assert_eq!(report.skipped, 1);

    let props = db.props_for_date(date()).await.unwrap();
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].tier, Tier::B);
}

#[tokio::test]
async fn ingest_props_empty_batch_is_a_zero_work_pass() {
    let (_dir, db) = test_db().await;
    let report = ingest_props(&db, date(), vec![]).await.unwrap();
    assert_eq!(report, IngestReport::default());
}

#[tokio::test]
async fn ingest_box_scores_skips_incomplete_games() {
    let (_dir, db) = test_db().await;

    let report = ingest_box_scores(
        &db,
        vec![
            raw_box_score("James Smith", true),
            raw_box_score("In Progress", false),
        ],
    )
    .await
    .unwrap();

    assert_eq!(report.written, 1);
    assert_eq!(report.skipped, 1);

    let scores = db.box_scores_for_date(date()).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].player_name, "James Smith");
}

#[tokio::test]
async fn json_feed_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("props.json");
    let json = r#"[{
        "game": "SEA@BOS",
        "player": "J. Smith",
        "team": "BOS",
        "site": "Fliff",
        "market": "Home Runs",
        "over": "0.5 (+260)",
        "suggested_bet": "OVER"
    }]"#;
    tokio::fs::write(&path, json).await.unwrap();

    let records = JsonFeed::new(&path).fetch_props(date()).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].player, "J. Smith");
    assert_eq!(records[0].under, None);
}

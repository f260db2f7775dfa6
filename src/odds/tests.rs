//! Tests for odds parsing and staking math

use super::*;

#[test]
fn parse_bare_positive_and_negative() {
    assert_eq!(parse("+150"), Some(150));
    assert_eq!(parse("-110"), Some(-110));
    assert_eq!(parse(" +1420 "), Some(1420));
}

#[test]
fn parse_parenthesized_compound() {
    assert_eq!(parse("2.5 (-110)"), Some(-110));
    assert_eq!(parse("0.5 (+260)"), Some(260));
    assert_eq!(parse("(-4000)"), Some(-4000));
}

#[test]
fn parse_rejects_garbage() {
    assert_eq!(parse(""), None);
    assert_eq!(parse("   "), None);
    assert_eq!(parse("even"), None);
    assert_eq!(parse("150"), None); // missing sign
    assert_eq!(parse("1.5"), None);
}

#[test]
fn extract_line_takes_first_decimal() {
    assert_eq!(extract_line("0.5 (+150)"), Some(0.5));
    assert_eq!(extract_line("3.5"), Some(3.5));
    assert_eq!(extract_line("-0.5 (-110)"), Some(-0.5));
    assert_eq!(extract_line("no numbers"), None);
}

#[test]
fn implied_probability_positive() {
    assert!((implied_probability(150).unwrap() - 0.4).abs() < 1e-12);
    assert!((implied_probability(100).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn implied_probability_negative() {
    assert!((implied_probability(-200).unwrap() - 200.0 / 300.0).abs() < 1e-12);
    assert!((implied_probability(-110).unwrap() - 110.0 / 210.0).abs() < 1e-12);
}

#[test]
fn implied_probability_zero_is_an_error() {
    assert!(implied_probability(0).is_err());
}

#[test]
fn stake_tiers_at_band_edges() {
    assert_eq!(suggested_stake(100), Some(100.0));
    assert_eq!(suggested_stake(250), Some(100.0));
    assert_eq!(suggested_stake(251), Some(50.0));
    assert_eq!(suggested_stake(500), Some(50.0));
    assert_eq!(suggested_stake(501), Some(25.0));
    assert_eq!(suggested_stake(750), Some(25.0));
    assert_eq!(suggested_stake(751), Some(15.0));
    assert_eq!(suggested_stake(1420), Some(15.0));
}

#[test]
fn stake_below_plus_100_uses_lowest_band() {
    assert_eq!(suggested_stake(99), Some(100.0));
    assert_eq!(suggested_stake(1), Some(100.0));
}

#[test]
fn stake_negative_risks_to_win_100() {
    assert_eq!(suggested_stake(-110), Some(110.0));
    assert_eq!(suggested_stake(-4000), Some(4000.0));
}

#[test]
fn stake_zero_is_invalid() {
    assert_eq!(suggested_stake(0), None);
}

#[test]
fn profit_loss_won_positive_odds() {
    assert!((profit_loss(150, 100.0, true) - 150.0).abs() < 1e-12);
    assert!((profit_loss(260, 50.0, true) - 130.0).abs() < 1e-12);
}

#[test]
fn profit_loss_won_negative_odds() {
    assert!((profit_loss(-200, 200.0, true) - 100.0).abs() < 1e-12);
}

#[test]
fn profit_loss_lost_forfeits_stake() {
    assert_eq!(profit_loss(150, 100.0, false), -100.0);
    assert_eq!(profit_loss(-110, 110.0, false), -110.0);
    assert_eq!(profit_loss(750, 25.0, false), -25.0);
}

#[test]
fn roi_basic_and_zero_stake() {
    assert_eq!(roi(130.0, 50.0), Some(260.0));
    assert_eq!(roi(-100.0, 100.0), Some(-100.0));
    assert_eq!(roi(10.0, 0.0), None);
}

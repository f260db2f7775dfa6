//! MLB props pipeline CLI
//!
//! Subcommands mirror the daily workflow: ingest the morning's props,
//! rebuild the best-odds view, then (next morning) ingest box scores,
//! resolve, settle and export.

use chrono::{Days, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mlb_props::{
    config::Config,
    error::Result,
    export,
    ingest::{self, JsonFeed, OddsFeed, StatsFeed},
    ranking,
    resolver::BetResolver,
    settle,
    storage::Database,
    types::Tier,
};

#[derive(Parser)]
#[command(name = "mlb-props")]
#[command(about = "MLB player-prop odds tracking, bet resolution and ROI pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a JSON file of scraped props
    IngestProps {
        /// Path to the props JSON file
        file: PathBuf,
        /// Scrape date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Ingest a JSON file of box scores
    IngestResults {
        /// Path to the box-scores JSON file
        file: PathBuf,
    },
    /// Rebuild the best-odds view for a date
    BestOdds {
        /// Scrape date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Resolve open props against available box scores
    Resolve {
        /// Scrape date (defaults to yesterday)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Fill in stake/P&L/ROI for resolved bets
    Settle {
        /// Scrape date (defaults to yesterday)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the actionable plus-EV recommendations for a date
    Recommend {
        /// Scrape date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Prop volume and tier distribution for a date
    Summary {
        /// Scrape date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Performance report by tier over a date range
    Report {
        /// Start date (defaults to yesterday)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date (defaults to the start date)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Export the joined best-odds + results view to CSV
    Export {
        /// Scrape date (defaults to yesterday)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output file (defaults to <export.dir>/best_odds_<date>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Add a betting-name → canonical-name mapping
    MapName {
        betting_name: String,
        canonical_name: String,
        /// Restrict the mapping to one team
        #[arg(long)]
        team: Option<String>,
    },
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn yesterday() -> NaiveDate {
    today() - Days::new(1)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let db = Database::connect(&config.database.path).await?;

    match cli.command {
        Commands::IngestProps { file, date } => {
            ingest_props(&db, &file, date.unwrap_or_else(today)).await?
        }
        Commands::IngestResults { file } => ingest_results(&db, &file).await?,
        Commands::BestOdds { date } => best_odds(&db, date.unwrap_or_else(today)).await?,
        Commands::Resolve { date } => {
            resolve(&db, &config, date.unwrap_or_else(yesterday)).await?
        }
        Commands::Settle { date } => settle_cmd(&db, date.unwrap_or_else(yesterday)).await?,
        Commands::Recommend { date } => recommend(&db, date.unwrap_or_else(today)).await?,
        Commands::Summary { date } => summary(&db, date.unwrap_or_else(today)).await?,
        Commands::Report { from, to } => {
            let from = from.unwrap_or_else(yesterday);
            report(&db, from, to.unwrap_or(from)).await?
        }
        Commands::Export { date, out } => {
            let date = date.unwrap_or_else(yesterday);
            let out = out.unwrap_or_else(|| {
                PathBuf::from(&config.export.dir).join(format!("best_odds_{date}.csv"))
            });
            export_cmd(&db, date, &out).await?
        }
        Commands::MapName {
            betting_name,
            canonical_name,
            team,
        } => {
            db.add_name_mapping(&betting_name, &canonical_name, team.as_deref(), "manual")
                .await?;
            println!("Mapped '{betting_name}' -> '{canonical_name}'");
        }
    }

    Ok(())
}

async fn ingest_props(db: &Database, file: &PathBuf, date: NaiveDate) -> Result<()> {
    let records = JsonFeed::new(file).fetch_props(date).await?;
    let report = ingest::ingest_props(db, date, records).await?;
    println!(
        "Ingested {} of {} prop records for {date} ({} skipped)",
        report.written, report.received, report.skipped
    );
    Ok(())
}

async fn ingest_results(db: &Database, file: &PathBuf) -> Result<()> {
    let records = JsonFeed::new(file).fetch_box_scores(today()).await?;
    let report = ingest::ingest_box_scores(db, records).await?;
    println!(
        "Ingested {} of {} box-score records ({} skipped as incomplete)",
        report.written, report.received, report.skipped
    );
    Ok(())
}

async fn best_odds(db: &Database, date: NaiveDate) -> Result<()> {
    let written = ranking::rebuild_best_odds(db, date).await?;
    println!("Best-odds view for {date}: {written} rows");
    Ok(())
}

async fn resolve(db: &Database, config: &Config, date: NaiveDate) -> Result<()> {
    let resolver = BetResolver::new(db).with_source(
        &config.resolution.result_source,
        config.resolution.result_confidence,
    );
    let summary = resolver.resolve_all(date).await?;
    println!(
        "Resolution for {date}: {} resolved, {} errors, {} skipped ({} open, {} box scores)",
        summary.resolved, summary.errors, summary.skipped, summary.total_open, summary.box_scores
    );
    Ok(())
}

async fn settle_cmd(db: &Database, date: NaiveDate) -> Result<()> {
    let summary = settle::settle_date(db, date).await?;
    println!(
        "Settlement for {date}: {} settled, {} neutral, {} missing odds, {} parse errors, {} unknown",
        summary.settled,
        summary.neutral,
        summary.missing_odds,
        summary.parse_errors,
        summary.unknown_outcome
    );
    Ok(())
}

async fn recommend(db: &Database, date: NaiveDate) -> Result<()> {
    let bets = ranking::plus_ev_bets(db, date).await?;

    println!("\nPlus-EV recommendations for {date} ({} bets):\n", bets.len());
    println!(
        "{:<4} {:<22} {:<4} {:<24} {:<10} {:>6} {:>14}",
        "Tier", "Player", "Team", "Market", "Site", "Side", "Line"
    );
    println!("{}", "-".repeat(90));

    for bet in &bets {
        let line = match bet.suggested_bet {
            mlb_props::types::Side::Under => bet.under_line.as_deref(),
            _ => bet.over_line.as_deref(),
        }
        .unwrap_or("-");
        println!(
            "{:<4} {:<22} {:<4} {:<24} {:<10} {:>6} {:>14}",
            bet.tier.to_string(),
            bet.player_name,
            bet.team,
            bet.market,
            bet.best_site,
            bet.suggested_bet.to_string(),
            line
        );
    }

    Ok(())
}

async fn summary(db: &Database, date: NaiveDate) -> Result<()> {
    let summary = ranking::daily_summary(db, date).await?;

    println!("\nSummary for {date}:");
    println!(
        "  {} props | {} players | {} markets | {} resolved",
        summary.total_props, summary.unique_players, summary.unique_markets, summary.resolved
    );
    for (tier, count) in &summary.tier_counts {
        println!("  Tier {tier}: {count}");
    }
    if let Some(confidence) = summary.avg_result_confidence {
        println!("  Avg result confidence: {confidence:.2}");
    }

    Ok(())
}

async fn report(db: &Database, from: NaiveDate, to: NaiveDate) -> Result<()> {
    let report = ranking::performance(db, from, to).await?;

    println!("\nPerformance {from} to {to}\n");
    println!(
        "{:<7} {:>5} {:>5} {:>6} {:>7} {:>13} {:>11} {:>9} {:>9}",
        "Tier", "Bets", "Wins", "Losses", "Pushes", "Staked", "P/L", "ROI", "Win rate"
    );
    println!("{}", "-".repeat(80));

    let print_row = |label: &str, perf: &ranking::TierPerformance| {
        println!(
            "{:<7} {:>5} {:>5} {:>6} {:>7} {:>13.2} {:>+11.2} {:>8} {:>9}",
            label,
            perf.bets,
            perf.wins,
            perf.losses,
            perf.pushes,
            perf.total_staked,
            perf.total_profit_loss,
            perf.roi()
                .map(|r| format!("{r:+.1}%"))
                .unwrap_or_else(|| "-".to_string()),
            perf.win_rate()
                .map(|w| format!("{:.1}%", w * 100.0))
                .unwrap_or_else(|| "-".to_string()),
        );
    };

    for (tier, perf) in &report.tiers {
        print_row(&format!("Tier {tier}"), perf);
    }
    print_row("Total", &report.overall);

    let plus_ev: Vec<&(Tier, ranking::TierPerformance)> = report
        .tiers
        .iter()
        .filter(|(tier, _)| tier.is_plus_ev())
        .collect();
    if !plus_ev.is_empty() {
        let staked: f64 = plus_ev.iter().map(|(_, p)| p.total_staked).sum();
        let pl: f64 = plus_ev.iter().map(|(_, p)| p.total_profit_loss).sum();
        if staked > 0.0 {
            println!("\nPlus-EV tiers (A-C) combined ROI: {:+.1}%", pl / staked * 100.0);
        }
    }

    Ok(())
}

async fn export_cmd(db: &Database, date: NaiveDate, out: &std::path::Path) -> Result<()> {
    let count = export::export_date_csv(db, date, out).await?;
    println!("Exported {count} rows to {}", out.display());
    Ok(())
}

pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod rating;
pub mod services;

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use log::info;

use crate::cli::{Cli, Command};
use crate::config::{AppConfig, Sport};
use crate::database::DbPool;
use crate::domain::PlayerId;
use crate::errors::LedgerError;
use crate::rating::RatingCalculator;
use crate::services::server::ServerService;
use crate::services::{LeaderboardRanker, ReferralLedger, SortKey, StatsLedger};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup(reset: bool) -> Result<()> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.store)?;
    let conn = database::get_connection(&pool)?;

    if reset {
        info!("Resetting ledger at {}", config.store.database_path);
        database::setup::reset_database(&conn)?;
    } else {
        database::setup::ensure_schema(&conn)?;
    }

    let recorded = database::matches::count_all(&conn)?;
    println!(
        "{} {} ({recorded} matches recorded)",
        "Ledger ready:".green().bold(),
        config.store.database_path
    );
    Ok(())
}

pub fn handle_leaderboard(
    sport: &str,
    sort_by: &str,
    min_matches: Option<u32>,
    limit: Option<usize>,
) -> Result<()> {
    let sport: Sport = sport.parse()?;
    let sort_key: SortKey = sort_by.parse()?;
    let (config, pool) = open_ledger()?;

    let ranker = LeaderboardRanker::new(pool, config.leaderboard);
    let rows = ranker.rank(sport, min_matches, sort_key, limit)?;

    println!("{}", format!("{} leaderboard by {sort_key}", sport.label()).bold());
    if rows.is_empty() {
        println!("{}", "No ranked players yet".dimmed());
        return Ok(());
    }
    for (i, row) in rows.iter().enumerate() {
        let rank = format!("{:>3}.", i + 1);
        let rank = match i {
            0 => rank.yellow().bold(),
            1 | 2 => rank.cyan().bold(),
            _ => rank.normal(),
        };
        println!(
            "{rank} {:<24} {:>5}  {}W {}L {}D  {:.1}%",
            row.player_id.as_str(),
            row.rating,
            row.wins,
            row.losses,
            row.draws,
            row.win_rate()
        );
    }
    Ok(())
}

pub fn handle_stats(player: &str) -> Result<()> {
    let (config, pool) = open_ledger()?;
    let ledger = StatsLedger::new(pool, RatingCalculator::new(config.rating));
    let player_id = PlayerId::new(player);

    let rows = match ledger.for_player(&player_id) {
        Ok(rows) => rows,
        Err(LedgerError::NotFound(_)) => {
            println!("{}", format!("No stats for {player_id}").dimmed());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", format!("Stats for {player_id}").bold());
    for row in rows {
        println!(
            "  {:<18} {} (peak {})  {}W {}L {}D  {}:{}",
            row.sport.label(),
            row.rating.to_string().green(),
            row.highest_rating,
            row.wins,
            row.losses,
            row.draws,
            row.points_scored,
            row.points_conceded
        );
    }
    Ok(())
}

pub fn handle_tickets(player: &str) -> Result<()> {
    let (config, pool) = open_ledger()?;
    let ledger = ReferralLedger::new(pool, config.referral);
    let player_id = PlayerId::new(player);
    let row = ledger.tickets(&player_id)?;

    println!(
        "{}: {} tickets, {} referrals ({} pending)",
        player_id.to_string().bold(),
        row.tickets.to_string().green(),
        row.total_referrals,
        row.pending_referrals.to_string().yellow()
    );
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn open_ledger() -> Result<(AppConfig, DbPool)> {
    let config = AppConfig::from_env();
    let pool = database::create_pool(&config.store)?;
    let conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&conn).context("Ledger schema is not usable")?;
    Ok((config, pool))
}

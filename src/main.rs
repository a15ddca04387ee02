use anyhow::Result;

use pullup_ledger::cli::Command;
use pullup_ledger::{
    handle_completions, handle_leaderboard, handle_serve, handle_setup, handle_stats, handle_tickets,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Setup { reset } => handle_setup(*reset),
        Command::Leaderboard {
            sport,
            sort_by,
            min_matches,
            limit,
        } => handle_leaderboard(sport, sort_by, *min_matches, *limit),
        Command::Stats { player } => handle_stats(player),
        Command::Tickets { player } => handle_tickets(player),
        Command::Completions { shell } => handle_completions(*shell),
    }
}

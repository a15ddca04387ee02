use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "PullUp match ledger and rating engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the ledger schema
    Setup {
        /// Drop every table first. Destroys all data.
        #[arg(long)]
        reset: bool,
    },
    /// Print a sport's leaderboard
    Leaderboard {
        /// Sport tag, e.g. pickleball
        sport: String,
        /// elo, wins, winrate or matches
        #[arg(short, long, default_value = "elo")]
        sort_by: String,
        #[arg(short, long)]
        min_matches: Option<u32>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print a player's per-sport stats
    Stats {
        player: String,
    },
    /// Print a player's referral tickets
    Tickets {
        player: String,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

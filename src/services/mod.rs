pub mod leaderboard;
pub mod match_recorder;
pub mod referrals;
pub mod server;
pub mod stats_ledger;

pub use leaderboard::{LeaderboardRanker, SortKey};
pub use match_recorder::MatchRecorder;
pub use referrals::ReferralLedger;
pub use stats_ledger::StatsLedger;

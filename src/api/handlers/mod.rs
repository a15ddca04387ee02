use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::database::DbPool;
use crate::errors::{LedgerError, LedgerResult};
use crate::services::{LeaderboardRanker, MatchRecorder, ReferralLedger};

pub mod leaderboard;
pub mod matches;
pub mod players;
pub mod referrals;

pub struct AppState {
    pub recorder: MatchRecorder,
    pub leaderboard: LeaderboardRanker,
    pub referrals: ReferralLedger,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            recorder: MatchRecorder::new(pool.clone(), &config)?,
            leaderboard: LeaderboardRanker::new(pool.clone(), config.leaderboard.clone()),
            referrals: ReferralLedger::new(pool, config.referral.clone()),
        })
    }
}

/// Runs a store call off the async executor. SQLite calls block.
pub(crate) async fn blocking<T, F>(state: &Arc<AppState>, call: F) -> LedgerResult<T>
where
    F: FnOnce(&AppState) -> LedgerResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || call(&state))
        .await
        .map_err(|e| LedgerError::Storage(format!("store task failed: {e}")))?
}

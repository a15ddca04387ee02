use std::collections::HashMap;
use std::str::FromStr;

use log::warn;

use super::sports::Sport;

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub seed_rating: i32,
    pub rating_floor: i32,
    pub default_k_factor: i32,
    pub k_factor_overrides: HashMap<Sport, i32>,
}

impl RatingSettings {
    pub fn k_factor_for(&self, sport: Sport) -> i32 {
        self.k_factor_overrides
            .get(&sport)
            .copied()
            .unwrap_or(self.default_k_factor)
    }

    pub fn with_k_factor(mut self, sport: Sport, k_factor: i32) -> Self {
        self.k_factor_overrides.insert(sport, k_factor);
        self
    }
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            seed_rating: 1200,
            rating_floor: 100,
            default_k_factor: 32,
            k_factor_overrides: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeaderboardSettings {
    pub default_min_matches: u32,
    pub max_entries: usize,
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            default_min_matches: 1,
            max_entries: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReferralSettings {
    pub code_length: usize,
    pub app_url: String,
}

impl Default for ReferralSettings {
    fn default() -> Self {
        Self {
            code_length: 6,
            app_url: "https://pullup-sepia.vercel.app".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub database_path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: "pullup_ledger.db".to_string(),
            pool_size: 8,
            busy_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub leaderboard: LeaderboardSettings,
    pub referral: ReferralSettings,
    pub store: StoreSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `DATABASE_PATH`, `PULLUP_SEED_RATING`,
    /// `PULLUP_K_FACTOR` and `PULLUP_RATING_FLOOR` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(path) = lookup("DATABASE_PATH") {
            config.store.database_path = path;
        }
        if let Some(seed) = parse_var(&lookup, "PULLUP_SEED_RATING") {
            config.rating.seed_rating = seed;
        }
        if let Some(k) = parse_var(&lookup, "PULLUP_K_FACTOR") {
            config.rating.default_k_factor = k;
        }
        if let Some(floor) = parse_var(&lookup, "PULLUP_RATING_FLOOR") {
            config.rating.rating_floor = floor;
        }

        config
    }

    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.store.database_path = path.into();
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {key}={raw}: not a valid number");
            None
        }
    }
}

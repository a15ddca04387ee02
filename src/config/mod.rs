pub mod settings;
pub mod sports;

pub use settings::{AppConfig, LeaderboardSettings, RatingSettings, ReferralSettings, StoreSettings};
pub use sports::Sport;

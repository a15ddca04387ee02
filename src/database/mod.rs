pub mod connection;
pub mod matches;
pub mod models;
pub mod player_stats;
pub mod referrals;
pub mod setup;

pub use connection::{begin_write, create_pool, get_connection, DbConn, DbPool};

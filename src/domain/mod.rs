pub mod models;
pub mod validation;

pub use models::*;
pub use validation::{DraftValidator, MAX_NOTE_CHARS};

//! Personal spaced-repetition flashcards backed by SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod models;
pub mod review;
pub mod scheduler;

pub use db::Database;
pub use error::{Error, Result};
pub use listing::list_due;
pub use models::{Card, IntervalIndex, Outcome};
pub use review::{review_next, Review};

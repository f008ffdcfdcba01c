use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::error::Result;

/// Fronts of every card due at `now`, in store order. Read-only.
pub fn list_due(db: &Database, now: DateTime<Utc>) -> Result<Vec<String>> {
    let mut fronts = Vec::new();
    db.scan_cards(|card| {
        if card.is_due(now) {
            fronts.push(card.front);
        }
    })?;
    Ok(fronts)
}

//! One interactive review per invocation.
//!
//! The session scans the store for the first due card, shows its front,
//! waits for a line, shows the back, then asks whether the card was recalled.
//! The reply decides the card's next interval, which is written back before
//! the session ends.

use chrono::{DateTime, Utc};
use std::io::{BufRead, Write};
use tracing::debug;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Card, IntervalIndex, Outcome};
use crate::scheduler;

pub const OUTCOME_PROMPT: &str = "Ok? (Y/n) ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Review {
    NothingDue,
    Reviewed {
        front: String,
        outcome: Outcome,
        interval_index: IntervalIndex,
    },
}

/// Reviews the first due card in store order, if there is one.
pub fn review_next<R, W>(
    db: &Database,
    mut input: R,
    mut output: W,
    now: DateTime<Utc>,
) -> Result<Review>
where
    R: BufRead,
    W: Write,
{
    let Some(card) = first_due(db, now)? else {
        debug!("nothing due");
        return Ok(Review::NothingDue);
    };

    write!(output, "{}", card.front)?;
    output.flush()?;
    // Only paces the reveal; the content is ignored.
    read_reply(&mut input)?;

    writeln!(output, "{}", card.back)?;
    write!(output, "{}", OUTCOME_PROMPT)?;
    output.flush()?;
    let outcome = Outcome::from_reply(&read_reply(&mut input)?);

    let interval_index = scheduler::next_interval(card.interval_index, outcome);
    debug!(
        front = %card.front,
        outcome = outcome.as_str(),
        from = card.interval_index.get(),
        to = interval_index.get(),
        "committing review"
    );
    db.update_interval(&card.front, interval_index)?;

    Ok(Review::Reviewed {
        front: card.front,
        outcome,
        interval_index,
    })
}

// Runs the whole scan but keeps only the first due card seen.
fn first_due(db: &Database, now: DateTime<Utc>) -> Result<Option<Card>> {
    let mut found = None;
    db.scan_cards(|card| {
        if found.is_none() && card.is_due(now) {
            found = Some(card);
        }
    })?;
    Ok(found)
}

// End of input reads as an empty line.
fn read_reply<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

use chrono::{DateTime, Utc};
use rusqlite::{ffi, params, Connection, Row};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, StoreContext};
use crate::models::{Card, IntervalIndex};

const SELECT_CARDS: &str = r#"
    SELECT front, back, interval,
           COALESCE(CAST(strftime('%s', created_at) AS INTEGER), 0),
           COALESCE(CAST(strftime('%s', updated_at) AS INTEGER), 0)
    FROM cards
"#;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path).context("open database")?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open database")?;
        Ok(Self { conn })
    }

    /// Creates the schema if it is missing. Safe to call on every start.
    pub fn init(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS cards (
                    front TEXT PRIMARY KEY,
                    back TEXT NOT NULL,
                    interval INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
                );
                "#,
            )
            .context("create table")?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    /// Releases the connection, reporting any failure to do so.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, source)| source)
            .context("close database")
    }

    pub fn insert_card(&self, front: &str, back: &str) -> Result<()> {
        if front.is_empty() {
            return Err(Error::InvalidCard("front must not be empty"));
        }
        if back.is_empty() {
            return Err(Error::InvalidCard("back must not be empty"));
        }

        let result = self.conn.execute(
            "INSERT INTO cards (front, back) VALUES (?1, ?2)",
            params![front, back],
        );

        match result {
            Ok(_) => {
                info!(front, "card added");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Err(Error::DuplicateKey(front.to_string()))
            }
            Err(e) => Err(e).context("insert into table"),
        }
    }

    /// Steps through every card, handing each one to `visit` as it is read.
    ///
    /// Order follows the storage engine and is not guaranteed. The cursor is
    /// always run to completion; a failing row aborts the whole scan.
    pub fn scan_cards<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Card),
    {
        let mut stmt = self.conn.prepare(SELECT_CARDS).context("select from table")?;
        let mut rows = stmt.query([]).context("select from table")?;

        let mut count = 0usize;
        while let Some(row) = rows.next().context("select from table")? {
            visit(card_from_row(row).context("select from table")?);
            count += 1;
        }
        debug!(count, "scanned cards");

        Ok(())
    }

    pub fn select_all(&self) -> Result<Vec<Card>> {
        let mut cards = Vec::new();
        self.scan_cards(|card| cards.push(card))?;
        Ok(cards)
    }

    pub fn get_card(&self, front: &str) -> Result<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE front = ?1", SELECT_CARDS))
            .context("select from table")?;

        match stmt.query_row(params![front], card_from_row) {
            Ok(card) => Ok(Some(card)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).context("select from table"),
        }
    }

    /// Sets the interval and stamps `updated_at` with the current time.
    ///
    /// Returns the number of rows touched; a missing card is not an error.
    pub fn update_interval(&self, front: &str, index: IntervalIndex) -> Result<usize> {
        let rows = self
            .conn
            .execute(
                "UPDATE cards SET interval = ?1, updated_at = CURRENT_TIMESTAMP WHERE front = ?2",
                params![index, front],
            )
            .context("update table")?;

        if rows == 0 {
            warn!(front, "no card to update");
        } else {
            info!(front, interval = index.get(), "interval updated");
        }
        Ok(rows)
    }

    /// Removes the card if present. Returns the number of rows deleted.
    pub fn delete_card(&self, front: &str) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM cards WHERE front = ?1", params![front])
            .context("delete from table")?;

        if rows == 0 {
            warn!(front, "no card to delete");
        } else {
            info!(front, "card removed");
        }
        Ok(rows)
    }
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        front: row.get(0)?,
        back: row.get(1)?,
        interval_index: row.get(2)?,
        created_at: timestamp(row, 3)?,
        updated_at: timestamp(row, 4)?,
    })
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

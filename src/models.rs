use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::scheduler;

/// Position in the interval table. Always a valid index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct IntervalIndex(usize);

impl IntervalIndex {
    pub const FIRST: IntervalIndex = IntervalIndex(0);
    pub const LAST: IntervalIndex = IntervalIndex(scheduler::INTERVAL_DAYS.len() - 1);
    /// Where a lapsed card re-enters the table: the one-day step.
    pub const LAPSE: IntervalIndex = IntervalIndex(1);

    pub fn new(index: usize) -> Option<Self> {
        (index < scheduler::INTERVAL_DAYS.len()).then_some(IntervalIndex(index))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for IntervalIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for IntervalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromSql for IntervalIndex {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = i64::column_result(value)?;
        usize::try_from(raw)
            .ok()
            .and_then(IntervalIndex::new)
            .ok_or(FromSqlError::OutOfRange(raw))
    }
}

impl ToSql for IntervalIndex {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = i64::try_from(self.0)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub front: String,
    pub back: String,
    pub interval_index: IntervalIndex,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn due_at(&self) -> DateTime<Utc> {
        scheduler::due_at(self.interval_index, self.updated_at)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_at()
    }
}

/// How the user judged their recall of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Recalled,
    Lapsed,
}

impl Outcome {
    /// Empty, "Y" and "y" count as recalled; anything else is a lapse.
    pub fn from_reply(reply: &str) -> Self {
        match reply {
            "" | "Y" | "y" => Outcome::Recalled,
            _ => Outcome::Lapsed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Recalled => "recalled",
            Outcome::Lapsed => "lapsed",
        }
    }
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod interval_index_tests {
        use super::*;

        #[test]
        fn new_accepts_every_table_position() {
            for i in 0..scheduler::INTERVAL_DAYS.len() {
                assert_eq!(IntervalIndex::new(i).map(IntervalIndex::get), Some(i));
            }
        }

        #[test]
        fn new_rejects_past_the_table() {
            assert!(IntervalIndex::new(scheduler::INTERVAL_DAYS.len()).is_none());
            assert!(IntervalIndex::new(usize::MAX).is_none());
        }

        #[test]
        fn bounds() {
            assert_eq!(IntervalIndex::FIRST.get(), 0);
            assert_eq!(IntervalIndex::LAST.get(), 7);
            assert_eq!(IntervalIndex::LAPSE.get(), 1);
            assert_eq!(IntervalIndex::default(), IntervalIndex::FIRST);
        }

        #[test]
        fn from_sql_rejects_negative() {
            let result = IntervalIndex::column_result(ValueRef::Integer(-1));
            assert!(matches!(result, Err(FromSqlError::OutOfRange(-1))));
        }

        #[test]
        fn from_sql_rejects_too_large() {
            let result = IntervalIndex::column_result(ValueRef::Integer(8));
            assert!(matches!(result, Err(FromSqlError::OutOfRange(8))));
        }

        #[test]
        fn from_sql_accepts_in_range() {
            let index = IntervalIndex::column_result(ValueRef::Integer(3)).unwrap();
            assert_eq!(index.get(), 3);
        }

        #[test]
        fn serializes_as_number() {
            let json = serde_json::to_string(&IntervalIndex::LAST).unwrap();
            assert_eq!(json, "7");
        }
    }

    mod card_tests {
        use super::*;
        use chrono::{Duration, TimeZone};

        fn card_at(index: usize) -> Card {
            let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
            Card {
                front: "Q".to_string(),
                back: "A".to_string(),
                interval_index: IntervalIndex::new(index).unwrap(),
                created_at: stamp,
                updated_at: stamp,
            }
        }

        #[test]
        fn due_at_adds_table_interval() {
            let card = card_at(4);
            assert_eq!(card.due_at(), card.updated_at + Duration::days(8));
        }

        #[test]
        fn is_due_from_due_at() {
            let card = card_at(2);
            assert!(!card.is_due(card.due_at() - Duration::seconds(1)));
            assert!(card.is_due(card.due_at()));
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn empty_reply_is_recalled() {
            assert_eq!(Outcome::from_reply(""), Outcome::Recalled);
        }

        #[test]
        fn yes_replies_are_recalled() {
            assert_eq!(Outcome::from_reply("Y"), Outcome::Recalled);
            assert_eq!(Outcome::from_reply("y"), Outcome::Recalled);
        }

        #[test]
        fn anything_else_is_lapsed() {
            for reply in ["n", "N", "no", "yes", " y", "Y ", "0"] {
                assert_eq!(Outcome::from_reply(reply), Outcome::Lapsed, "reply {:?}", reply);
            }
        }

        #[test]
        fn as_str_values() {
            assert_eq!(Outcome::Recalled.as_str(), "recalled");
            assert_eq!(Outcome::Lapsed.as_str(), "lapsed");
        }
    }

    mod json_output_tests {
        use super::*;

        #[test]
        fn ok_with_list() {
            let output = JsonOutput::ok(vec!["2+2"]);
            assert!(output.success);
            assert_eq!(output.data, Some(vec!["2+2"]));
            assert!(output.error.is_none());
        }

        #[test]
        fn err_has_message() {
            let output = JsonOutput::<()>::err("boom");
            assert!(!output.success);
            assert!(output.data.is_none());
            assert_eq!(output.error, Some("boom".to_string()));
        }

        #[test]
        fn serializes_envelope() {
            let json = serde_json::to_string(&JsonOutput::ok(1)).unwrap();
            assert_eq!(json, r#"{"success":true,"data":1,"error":null}"#);
        }
    }
}
